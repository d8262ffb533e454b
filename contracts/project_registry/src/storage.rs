use shared_types::{ProjectId, ProjectState};
use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug)]
pub struct Project {
    /// Address funding the project and running its milestones
    pub owner: Address,
    /// Current lifecycle state; advances strictly forward
    pub state: ProjectState,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct Sale {
    /// Project tokens delivered per unit of value currency
    pub rate: i128,
    /// Tokens escrowed for sale at start
    pub total_for_sale: i128,
    /// Tokens delivered to purchasers so far
    pub total_sold: i128,
    /// Value currency received so far
    pub total_received: i128,
    /// Fixed at finalize; the sole conversion rate for later refunds
    pub average_price: i128,
    /// Set by finalize, one-shot
    pub finalized: bool,
    /// Unsold remainder returned to the owner
    pub unsold_withdrawn: bool,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    /// Admission authority (the external token-curated registry)
    Registry,
    ValueToken,
    FundLedger,
    MilestoneEscrow,
    Project(ProjectId),
    /// Set exactly once, at or after acceptance
    ProjectToken(ProjectId),
    Sale(ProjectId),
    Initialized,
}
