use shared_types::{ProjectId, ProjectState};
use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug)]
pub struct ProjectRegisteredEvent {
    pub project_id: ProjectId,
    pub owner: Address,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct ProjectStateChangedEvent {
    pub project_id: ProjectId,
    pub state: ProjectState,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct ProjectUnregisteredEvent {
    pub project_id: ProjectId,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct TokenSaleStartedEvent {
    pub project_id: ProjectId,
    pub rate: i128,
    pub total_for_sale: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct TokensPurchasedEvent {
    pub project_id: ProjectId,
    pub purchaser: Address,
    pub paid: i128,
    pub tokens: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct SaleFinalizedEvent {
    pub project_id: ProjectId,
    pub average_price: i128,
    pub total_received: i128,
    pub reward_reserve: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct UnsoldWithdrawnEvent {
    pub project_id: ProjectId,
    pub owner: Address,
    pub tokens: i128,
}
