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
    // PROJECT LIFECYCLE ERRORS (20-29)
    // ============================================
    /// No project registered under this id
    ProjectNotFound = 20,
    /// A project already exists under this id
    ProjectAlreadyExists = 21,
    /// Operation requires a different lifecycle state, or the requested
    /// transition skips a stage
    InvalidState = 22,
    /// Token address may only be set once
    TokenAlreadySet = 23,
    /// Operation requires a bound token address
    TokenNotSet = 24,

    // ============================================
    // TOKEN SALE ERRORS (30-39)
    // ============================================
    /// No sale recorded for this project
    SaleNotStarted = 30,
    /// Sale already started for this project
    SaleAlreadyStarted = 31,
    /// Sale already finalized; the average price is fixed
    SaleAlreadyFinalized = 32,
    /// Operation requires a finalized sale
    SaleNotFinalized = 33,
    /// Purchase exceeds the unsold remainder
    ExceedsSaleSupply = 34,
    /// Unsold tokens already withdrawn
    AlreadyClaimed = 35,

    // ============================================
    // AMOUNT/BALANCE ERRORS (40-49)
    // ============================================
    /// Amount must be positive
    InvalidAmount = 40,
    /// Raised funds cannot cover the regulator reward reserve
    InsufficientBalance = 41,
    /// Accumulation would overflow
    Overflow = 42,
}
