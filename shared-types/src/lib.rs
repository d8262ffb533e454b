#![no_std]

//! Shared vocabulary for the milestone escrow contracts: lifecycle enums,
//! objective records, fund-ledger purpose keys and stage-window constants.

use soroban_sdk::{contracttype, Address, BytesN, Symbol};

/// Stable hash of the project name, computed by the caller.
pub type ProjectId = BytesN<32>;

pub const ONE_WEEK: u64 = 7 * 24 * 60 * 60;

/// A milestone's refund stage occupies its final week.
pub const REFUND_PERIOD_LENGTH: u64 = ONE_WEEK;

/// Regulator bids close three weeks before the milestone ends, leaving room
/// for reward settlement ahead of the refund stage.
pub const RATING_CLOSE_BEFORE_END: u64 = 3 * ONE_WEEK;

/// Shortest milestone that still fits the rating and refund windows.
pub const MIN_MILESTONE_LENGTH: u64 = 4 * ONE_WEEK;

pub const BASIS_POINTS: i128 = 10_000;

#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ProjectState {
    /// No record for this project id
    NotExist = 0,
    /// Application submitted to the registry, admission pending
    AppSubmitted = 1,
    /// Admitted by the registry, milestones may be declared
    AppAccepted = 2,
    /// Token sale in progress
    TokenSale = 3,
    /// Sale finalized, milestones executing
    Milestone = 4,
    /// Final milestone closed
    Complete = 5,
}

impl ProjectState {
    /// Whether `next` is the immediate successor of `self` in the forward
    /// lifecycle. Removal back to `NotExist` is handled by unregistration,
    /// never by a state update.
    pub fn is_next(self, next: ProjectState) -> bool {
        matches!(
            (self, next),
            (ProjectState::NotExist, ProjectState::AppSubmitted)
                | (ProjectState::AppSubmitted, ProjectState::AppAccepted)
                | (ProjectState::AppAccepted, ProjectState::TokenSale)
                | (ProjectState::TokenSale, ProjectState::Milestone)
                | (ProjectState::Milestone, ProjectState::Complete)
        )
    }
}

#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MilestoneState {
    /// Declared but not yet scheduled
    Inactive = 0,
    /// Running with funds locked
    InProgress = 1,
    /// Final week; purchasers may return tokens
    RefundPeriod = 2,
    /// Closed; unspent funds withdrawable by the owner
    Completion = 3,
}

/// A reviewable sub-goal within a milestone, carrying a reward cap.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Objective {
    /// Unique within its milestone
    pub id: Symbol,
    /// Review category regulators are voted into
    pub objective_type: Symbol,
    /// Reward cap split among bidding regulators
    pub max_reward: i128,
}

/// Purpose-tagged key for fund-ledger entries. One scalar balance per key;
/// the fund ledger is the only writer.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EntryKey {
    /// Value currency received but not committed to any milestone
    ProjectBalance(ProjectId),
    /// Value currency locked for one milestone
    MilestoneLocked(ProjectId, u32),
    /// Refund owed to one beneficiary out of one milestone's lock
    RefundLocked(ProjectId, u32, Address),
    /// Reserve backing regulator rewards across all milestones
    RegulatorReserve(ProjectId),
    /// Project tokens returned by purchasers (custody at the escrow)
    RefundableTokens(ProjectId),
}
