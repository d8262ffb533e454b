use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // ============================================
    // INITIALIZATION ERRORS (1-5)
    // ============================================
    /// Contract already initialized
    AlreadyInitialized = 1,
    /// Contract not initialized
    NotInitialized = 2,
    /// Weight share outside the basis-point range
    InvalidConfig = 3,

    // ============================================
    // AUTHORIZATION ERRORS (10-15)
    // ============================================
    /// Caller lacks the required role
    Unauthorized = 10,

    // ============================================
    // POLL ERRORS (20-29)
    // ============================================
    /// No poll registered for this milestone
    PollNotFound = 20,
    /// A poll already exists for this milestone
    PollAlreadyExists = 21,
    /// Operation requires a different poll stage
    InvalidState = 22,
    /// No objective under this id or type in the poll
    ObjectiveNotFound = 23,

    // ============================================
    // BIDDING ERRORS (30-39)
    // ============================================
    /// The time gate for this operation has not opened yet
    NotYetEligible = 30,
    /// The bid deadline has passed
    WindowExpired = 31,
    /// Regulator already bid on this objective
    AlreadyBid = 32,
    /// Regulator has no bid on this objective
    NoBid = 33,

    // ============================================
    // VOTE/REWARD ERRORS (40-49)
    // ============================================
    /// Amount must be positive
    InvalidAmount = 40,
    /// Vote exceeds the voter's remaining available votes
    InsufficientVotes = 41,
    /// No unclaimed reward under this entry
    AlreadyClaimed = 42,
    /// Accumulation would overflow
    Overflow = 43,
}
