use shared_types::ProjectId;
use soroban_sdk::{contracttype, Address, Symbol};

#[contracttype]
#[derive(Clone, Debug)]
pub struct PollRegisteredEvent {
    pub project_id: ProjectId,
    pub milestone_id: u32,
    pub price: i128,
    pub bid_deadline: u64,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct BiddingOpenedEvent {
    pub project_id: ProjectId,
    pub milestone_id: u32,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct VotesWrittenEvent {
    pub project_id: ProjectId,
    pub milestone_id: u32,
    pub voter: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct VoteCastEvent {
    pub project_id: ProjectId,
    pub milestone_id: u32,
    pub voter: Address,
    pub regulator: Address,
    pub objective_type: Symbol,
    pub weight: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct BidPlacedEvent {
    pub project_id: ProjectId,
    pub milestone_id: u32,
    pub objective_id: Symbol,
    pub regulator: Address,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct BidWithdrawnEvent {
    pub project_id: ProjectId,
    pub milestone_id: u32,
    pub objective_id: Symbol,
    pub regulator: Address,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct BidsFinalizedEvent {
    pub project_id: ProjectId,
    pub milestone_id: u32,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct RewardWithdrawnEvent {
    pub project_id: ProjectId,
    pub milestone_id: u32,
    pub objective_id: Symbol,
    pub regulator: Address,
    pub amount: i128,
}
