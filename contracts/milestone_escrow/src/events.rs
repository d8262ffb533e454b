use shared_types::ProjectId;
use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug)]
pub struct MilestoneAddedEvent {
    pub project_id: ProjectId,
    pub milestone_id: u32,
    pub length: u64,
    pub reward_cap: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct MilestoneActivatedEvent {
    pub project_id: ProjectId,
    pub milestone_id: u32,
    pub start_time: u64,
    pub end_time: u64,
    pub locked: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct RatingStageOpenedEvent {
    pub project_id: ProjectId,
    pub milestone_id: u32,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct RefundStageStartedEvent {
    pub project_id: ProjectId,
    pub milestone_id: u32,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct MilestoneFinalizedEvent {
    pub project_id: ProjectId,
    pub milestone_id: u32,
    pub end_time: u64,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct RefundEvent {
    pub project_id: ProjectId,
    pub milestone_id: u32,
    pub purchaser: Address,
    pub tokens: i128,
    pub value: i128,
    pub available_time: u64,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct RefundWithdrawnEvent {
    pub project_id: ProjectId,
    pub milestone_id: u32,
    pub beneficiary: Address,
    pub value: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct PaymentWithdrawnEvent {
    pub project_id: ProjectId,
    pub milestone_id: u32,
    pub owner: Address,
    pub value: i128,
}
