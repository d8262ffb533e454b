use shared_types::{Objective, ProjectId};
use soroban_sdk::{contracttype, Address, Symbol, Vec};

#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PollStage {
    /// Created at milestone activation, bidding not yet open
    Registered = 0,
    /// Regulators may bid on objectives
    Bidding = 1,
    /// Rewards computed, withdrawals open
    Finalized = 2,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct Poll {
    /// Settlement price fixed at sale finalize; vote weight multiplier
    pub price: i128,
    /// The project token votes are denominated in
    pub token: Address,
    pub stage: PollStage,
    /// Bids and votes close here; finalize opens after
    pub bid_deadline: u64,
    pub objectives: Vec<Objective>,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    /// Reputation oracle allowed to write available votes
    Oracle,
    FundLedger,
    ProjectRegistry,
    /// Share of established reputation in the final weight, in basis points
    EstablishedWeightBps,
    Poll(ProjectId, u32),
    /// Oracle-written voting power per voter per poll
    AvailableVotes(ProjectId, u32, Address),
    VotesUsed(ProjectId, u32, Address),
    /// Weighted votes a regulator obtained per objective type
    Tally(ProjectId, u32, Symbol, Address),
    /// Flag: regulator has an open bid on this objective id
    Bid(ProjectId, u32, Symbol, Address),
    /// Regulators with open bids per objective id
    Bidders(ProjectId, u32, Symbol),
    /// Computed reward per objective id per regulator; zeroed on withdrawal
    Reward(ProjectId, u32, Symbol, Address),
    /// Established reputation per regulator per objective type, cross-poll
    Reputation(Address, Symbol),
    Initialized,
}
