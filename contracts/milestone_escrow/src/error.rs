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

    // ============================================
    // AUTHORIZATION ERRORS (10-15)
    // ============================================
    /// Caller lacks the required role
    Unauthorized = 10,

    // ============================================
    // MILESTONE ERRORS (20-29)
    // ============================================
    /// No milestone under this project id and number
    MilestoneNotFound = 20,
    /// Operation requires a different milestone or project state
    InvalidState = 21,
    /// Milestone shorter than the minimum that fits the rating and refund
    /// windows
    InvalidLength = 22,
    /// The preceding milestone has not reached completion
    PredecessorNotComplete = 23,

    // ============================================
    // WINDOW ERRORS (30-39)
    // ============================================
    /// The time gate for this operation has not opened yet
    NotYetEligible = 30,
    /// The time window for this operation has closed
    WindowExpired = 31,
    /// Start window bounds are inverted
    InvalidWindow = 32,

    // ============================================
    // AMOUNT/BALANCE ERRORS (40-49)
    // ============================================
    /// Amount must be positive (or converts to zero value)
    InvalidAmount = 40,
    /// Balance cannot cover the requested lock or refund
    InsufficientBalance = 41,
    /// Nothing left to withdraw under this claim
    AlreadyClaimed = 42,
    /// Accumulation would overflow
    Overflow = 43,
}
