use shared_types::{MilestoneState, Objective, ProjectId};
use soroban_sdk::{contracttype, Address, Vec};

#[contracttype]
#[derive(Clone, Debug)]
pub struct Milestone {
    /// Scheduled duration in seconds, fixed at declaration
    pub length: u64,
    /// Stored state; views promote to `Completion` once the window elapses
    pub state: MilestoneState,
    /// Ledger time of activation; 0 while inactive
    pub start_time: u64,
    /// `start_time + length`, restated to actual close on founder finalize
    pub end_time: u64,
    /// Value currency committed at activation
    pub locked: i128,
    pub objectives: Vec<Objective>,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    FundLedger,
    ProjectRegistry,
    RegulatorRating,
    Milestone(ProjectId, u32),
    /// Milestone numbers run 1..=count with no gaps
    MilestoneCount(ProjectId),
    /// Project-wide sum of objective reward caps, reserved at sale finalize
    TotalRewardCap(ProjectId),
    /// Gate before which a purchaser's refund stays locked
    RefundAvailableTime(ProjectId, u32, Address),
    Initialized,
}
