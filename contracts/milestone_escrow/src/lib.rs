#![no_std]

mod error;
mod events;
mod storage;
mod validation;

pub use error::Error;
pub use storage::Milestone;

use events::*;
use storage::DataKey;

use shared_types::{EntryKey, MilestoneState, Objective, ProjectId, ProjectState};
use soroban_sdk::{contract, contractimpl, token, vec, Address, Env, IntoVal, Symbol, Vec};

#[contract]
pub struct MilestoneEscrow;

#[contractimpl]
impl MilestoneEscrow {
    // ============================================
    // INITIALIZATION
    // ============================================

    /// Initialize with the collaborator addresses
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    pub fn initialize(
        env: Env,
        admin: Address,
        fund_ledger: Address,
        project_registry: Address,
        regulator_rating: Address,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        admin.require_auth();

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::FundLedger, &fund_ledger);
        env.storage()
            .instance()
            .set(&DataKey::ProjectRegistry, &project_registry);
        env.storage()
            .instance()
            .set(&DataKey::RegulatorRating, &regulator_rating);

        Ok(())
    }

    // ============================================
    // MILESTONE LIFECYCLE
    // ============================================

    /// Declare the next milestone (owner only, before the milestone phase
    /// begins). Returns the new milestone number; numbers run 1..=count.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `InvalidState`: Project already past its token sale
    /// - `InvalidLength`: Shorter than the minimum milestone length
    /// - `InvalidAmount`: An objective carries a non-positive reward cap
    /// - `Overflow`: Reward-cap accumulation overflows
    pub fn add_milestone(
        env: Env,
        project_id: ProjectId,
        length: u64,
        objectives: Vec<Objective>,
    ) -> Result<u32, Error> {
        let registry = Self::registry_addr(&env)?;
        let owner = Self::project_owner(&env, &registry, &project_id);
        owner.require_auth();

        // declarations freeze once the sale settles into the milestone phase
        let state = Self::project_state(&env, &registry, &project_id);
        if state != ProjectState::AppSubmitted
            && state != ProjectState::AppAccepted
            && state != ProjectState::TokenSale
        {
            return Err(Error::InvalidState);
        }

        if !validation::valid_length(length) {
            return Err(Error::InvalidLength);
        }

        let mut reward_cap: i128 = env
            .storage()
            .instance()
            .get(&DataKey::TotalRewardCap(project_id.clone()))
            .unwrap_or(0);
        let mut milestone_cap: i128 = 0;
        for objective in objectives.iter() {
            if objective.max_reward <= 0 {
                return Err(Error::InvalidAmount);
            }
            milestone_cap = milestone_cap
                .checked_add(objective.max_reward)
                .ok_or(Error::Overflow)?;
        }
        reward_cap = reward_cap.checked_add(milestone_cap).ok_or(Error::Overflow)?;
        env.storage()
            .instance()
            .set(&DataKey::TotalRewardCap(project_id.clone()), &reward_cap);

        let count: u32 = env
            .storage()
            .instance()
            .get(&DataKey::MilestoneCount(project_id.clone()))
            .unwrap_or(0);
        let milestone_id = count + 1;

        let milestone = Milestone {
            length,
            state: MilestoneState::Inactive,
            start_time: 0,
            end_time: 0,
            locked: 0,
            objectives,
        };
        env.storage()
            .instance()
            .set(&DataKey::Milestone(project_id.clone(), milestone_id), &milestone);
        env.storage()
            .instance()
            .set(&DataKey::MilestoneCount(project_id.clone()), &milestone_id);

        env.events().publish(
            (Symbol::new(&env, "milestone_added"), project_id.clone()),
            MilestoneAddedEvent {
                project_id,
                milestone_id,
                length,
                reward_cap: milestone_cap,
            },
        );

        Ok(milestone_id)
    }

    /// Schedule and fund the next milestone (owner only). Locks
    /// `amount_to_lock` out of the project's uncommitted balance and
    /// registers the milestone's reputation poll.
    ///
    /// # Errors
    /// - `MilestoneNotFound` / `InvalidState` / `PredecessorNotComplete`
    /// - `InvalidWindow`: `min_start > max_start`
    /// - `NotYetEligible` / `WindowExpired`: `now` outside the start window
    /// - `InvalidAmount`: Lock amount not positive
    /// - `InsufficientBalance`: Uncommitted balance below the lock amount
    pub fn activate(
        env: Env,
        project_id: ProjectId,
        milestone_id: u32,
        amount_to_lock: i128,
        min_start: u64,
        max_start: u64,
    ) -> Result<(), Error> {
        let registry = Self::registry_addr(&env)?;
        let owner = Self::project_owner(&env, &registry, &project_id);
        owner.require_auth();

        if Self::project_state(&env, &registry, &project_id) != ProjectState::Milestone {
            return Err(Error::InvalidState);
        }

        let mut milestone = Self::load_milestone(&env, &project_id, milestone_id)?;
        if milestone.state != MilestoneState::Inactive {
            return Err(Error::InvalidState);
        }

        // strictly ascending activation; the predecessor must have run its
        // full window
        if milestone_id > 1 {
            let prev = Self::load_milestone(&env, &project_id, milestone_id - 1)?;
            let now = env.ledger().timestamp();
            if validation::computed_state(prev.state, prev.end_time, now)
                != MilestoneState::Completion
            {
                return Err(Error::PredecessorNotComplete);
            }
        }

        if min_start > max_start {
            return Err(Error::InvalidWindow);
        }
        let now = env.ledger().timestamp();
        if now < min_start {
            return Err(Error::NotYetEligible);
        }
        if now > max_start {
            return Err(Error::WindowExpired);
        }

        if amount_to_lock <= 0 {
            return Err(Error::InvalidAmount);
        }

        let fund_ledger = Self::fund_ledger_addr(&env)?;
        let uncommitted: i128 = env.invoke_contract(
            &fund_ledger,
            &Symbol::new(&env, "balance"),
            vec![
                &env,
                EntryKey::ProjectBalance(project_id.clone()).into_val(&env),
            ],
        );
        if amount_to_lock > uncommitted {
            return Err(Error::InsufficientBalance);
        }

        let end_time = now.checked_add(milestone.length).ok_or(Error::Overflow)?;
        milestone.start_time = now;
        milestone.end_time = end_time;
        milestone.locked = amount_to_lock;
        milestone.state = MilestoneState::InProgress;
        env.storage()
            .instance()
            .set(&DataKey::Milestone(project_id.clone(), milestone_id), &milestone);

        env.invoke_contract::<()>(
            &fund_ledger,
            &Symbol::new(&env, "transfer_entry"),
            vec![
                &env,
                EntryKey::ProjectBalance(project_id.clone()).into_val(&env),
                EntryKey::MilestoneLocked(project_id.clone(), milestone_id).into_val(&env),
                amount_to_lock.into_val(&env),
            ],
        );

        // the poll carries the settlement price and token fixed at sale
        // finalize
        let price: i128 = env.invoke_contract(
            &registry,
            &Symbol::new(&env, "get_average_price"),
            vec![&env, project_id.into_val(&env)],
        );
        let project_token: Address = env.invoke_contract(
            &registry,
            &Symbol::new(&env, "get_token_address"),
            vec![&env, project_id.into_val(&env)],
        );
        let rating = Self::rating_addr(&env)?;
        env.invoke_contract::<()>(
            &rating,
            &Symbol::new(&env, "register_poll"),
            vec![
                &env,
                project_id.into_val(&env),
                milestone_id.into_val(&env),
                price.into_val(&env),
                project_token.to_val(),
                validation::bid_deadline(milestone.end_time).into_val(&env),
                milestone.objectives.into_val(&env),
            ],
        );

        env.events().publish(
            (Symbol::new(&env, "milestone_activated"), project_id.clone()),
            MilestoneActivatedEvent {
                project_id,
                milestone_id,
                start_time: now,
                end_time,
                locked: amount_to_lock,
            },
        );

        Ok(())
    }

    /// Open regulator bidding on the milestone's poll (owner only)
    ///
    /// # Errors
    /// - `MilestoneNotFound` / `InvalidState`
    /// - `WindowExpired`: Bids already closed for this milestone
    pub fn start_rating_stage(
        env: Env,
        project_id: ProjectId,
        milestone_id: u32,
    ) -> Result<(), Error> {
        let registry = Self::registry_addr(&env)?;
        let owner = Self::project_owner(&env, &registry, &project_id);
        owner.require_auth();

        let milestone = Self::load_milestone(&env, &project_id, milestone_id)?;
        if milestone.state != MilestoneState::InProgress {
            return Err(Error::InvalidState);
        }
        if env.ledger().timestamp() > validation::bid_deadline(milestone.end_time) {
            return Err(Error::WindowExpired);
        }

        let rating = Self::rating_addr(&env)?;
        env.invoke_contract::<()>(
            &rating,
            &Symbol::new(&env, "open_bidding"),
            vec![&env, project_id.into_val(&env), milestone_id.into_val(&env)],
        );

        env.events().publish(
            (Symbol::new(&env, "rating_stage"), project_id.clone()),
            RatingStageOpenedEvent {
                project_id,
                milestone_id,
            },
        );

        Ok(())
    }

    /// Enter the refund stage. Callable by anyone once the milestone is in
    /// its final week; purchasers should not depend on the owner for it.
    ///
    /// # Errors
    /// - `MilestoneNotFound` / `InvalidState`
    /// - `NotYetEligible`: Final week not reached
    /// - `WindowExpired`: Milestone window already elapsed
    pub fn start_refund_stage(
        env: Env,
        project_id: ProjectId,
        milestone_id: u32,
    ) -> Result<(), Error> {
        let mut milestone = Self::load_milestone(&env, &project_id, milestone_id)?;
        if milestone.state != MilestoneState::InProgress {
            return Err(Error::InvalidState);
        }

        let now = env.ledger().timestamp();
        if !validation::refund_stage_open(milestone.end_time, now) {
            return Err(Error::NotYetEligible);
        }
        if now >= milestone.end_time {
            return Err(Error::WindowExpired);
        }

        milestone.state = MilestoneState::RefundPeriod;
        env.storage()
            .instance()
            .set(&DataKey::Milestone(project_id.clone(), milestone_id), &milestone);

        env.events().publish(
            (Symbol::new(&env, "refund_stage"), project_id.clone()),
            RefundStageStartedEvent {
                project_id,
                milestone_id,
            },
        );

        Ok(())
    }

    /// Close the milestone (owner only, after its scheduled window). When
    /// the call arrives late, the recorded end time is restated to the
    /// actual close. Closing the last milestone completes the project.
    ///
    /// # Errors
    /// - `MilestoneNotFound` / `InvalidState`
    /// - `NotYetEligible`: Scheduled window not elapsed
    pub fn founder_finalize(
        env: Env,
        project_id: ProjectId,
        milestone_id: u32,
    ) -> Result<(), Error> {
        let registry = Self::registry_addr(&env)?;
        let owner = Self::project_owner(&env, &registry, &project_id);
        owner.require_auth();

        let mut milestone = Self::load_milestone(&env, &project_id, milestone_id)?;
        if milestone.state != MilestoneState::InProgress
            && milestone.state != MilestoneState::RefundPeriod
        {
            return Err(Error::InvalidState);
        }

        let now = env.ledger().timestamp();
        if now < milestone.end_time {
            return Err(Error::NotYetEligible);
        }

        milestone.end_time = now;
        milestone.state = MilestoneState::Completion;
        env.storage()
            .instance()
            .set(&DataKey::Milestone(project_id.clone(), milestone_id), &milestone);

        let count: u32 = env
            .storage()
            .instance()
            .get(&DataKey::MilestoneCount(project_id.clone()))
            .unwrap_or(0);
        if milestone_id == count {
            env.invoke_contract::<()>(
                &registry,
                &Symbol::new(&env, "complete_project"),
                vec![&env, project_id.into_val(&env)],
            );
        }

        env.events().publish(
            (Symbol::new(&env, "milestone_finalized"), project_id.clone()),
            MilestoneFinalizedEvent {
                project_id,
                milestone_id,
                end_time: now,
            },
        );

        Ok(())
    }

    // ============================================
    // REFUNDS
    // ============================================

    /// Return project tokens during the refund stage. Converts once at the
    /// average price fixed at sale finalize and locks the value for the
    /// purchaser until the milestone closes.
    ///
    /// # Errors
    /// - `MilestoneNotFound` / `InvalidState`
    /// - `WindowExpired`: Milestone window already elapsed
    /// - `InvalidAmount`: Token amount not positive, or below one price unit
    /// - `InsufficientBalance`: Refund value exceeds the remaining lock
    pub fn refund(
        env: Env,
        project_id: ProjectId,
        milestone_id: u32,
        purchaser: Address,
        token_amount: i128,
    ) -> Result<(), Error> {
        purchaser.require_auth();

        let milestone = Self::load_milestone(&env, &project_id, milestone_id)?;
        if milestone.state != MilestoneState::RefundPeriod {
            return Err(Error::InvalidState);
        }
        let now = env.ledger().timestamp();
        if now >= milestone.end_time {
            return Err(Error::WindowExpired);
        }

        if token_amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let registry = Self::registry_addr(&env)?;
        let price: i128 = env.invoke_contract(
            &registry,
            &Symbol::new(&env, "get_average_price"),
            vec![&env, project_id.into_val(&env)],
        );
        let value = token_amount.checked_div(price).ok_or(Error::InvalidAmount)?;
        if value <= 0 {
            return Err(Error::InvalidAmount);
        }

        let fund_ledger = Self::fund_ledger_addr(&env)?;
        let remaining: i128 = env.invoke_contract(
            &fund_ledger,
            &Symbol::new(&env, "balance"),
            vec![
                &env,
                EntryKey::MilestoneLocked(project_id.clone(), milestone_id).into_val(&env),
            ],
        );
        if value > remaining {
            return Err(Error::InsufficientBalance);
        }

        // bookkeeping first: earmark the value and count the returned tokens
        env.invoke_contract::<()>(
            &fund_ledger,
            &Symbol::new(&env, "transfer_entry"),
            vec![
                &env,
                EntryKey::MilestoneLocked(project_id.clone(), milestone_id).into_val(&env),
                EntryKey::RefundLocked(project_id.clone(), milestone_id, purchaser.clone())
                    .into_val(&env),
                value.into_val(&env),
            ],
        );
        env.invoke_contract::<()>(
            &fund_ledger,
            &Symbol::new(&env, "credit"),
            vec![
                &env,
                EntryKey::RefundableTokens(project_id.clone()).into_val(&env),
                token_amount.into_val(&env),
            ],
        );

        // withdrawable once this milestone has closed
        let available_time = milestone.end_time;
        env.storage().instance().set(
            &DataKey::RefundAvailableTime(project_id.clone(), milestone_id, purchaser.clone()),
            &available_time,
        );

        let project_token: Address = env.invoke_contract(
            &registry,
            &Symbol::new(&env, "get_token_address"),
            vec![&env, project_id.into_val(&env)],
        );
        let token_client = token::Client::new(&env, &project_token);
        token_client.transfer(&purchaser, &env.current_contract_address(), &token_amount);

        env.events().publish(
            (Symbol::new(&env, "refund"), project_id.clone()),
            RefundEvent {
                project_id,
                milestone_id,
                purchaser,
                tokens: token_amount,
                value,
                available_time,
            },
        );

        Ok(())
    }

    /// Pay out a locked refund once its gate has passed
    ///
    /// # Errors
    /// - `NotYetEligible`: Milestone not closed yet
    /// - `AlreadyClaimed`: No unclaimed refund for this beneficiary
    pub fn refund_withdraw(
        env: Env,
        project_id: ProjectId,
        milestone_id: u32,
        beneficiary: Address,
    ) -> Result<(), Error> {
        beneficiary.require_auth();

        let available_time: u64 = env
            .storage()
            .instance()
            .get(&DataKey::RefundAvailableTime(
                project_id.clone(),
                milestone_id,
                beneficiary.clone(),
            ))
            .ok_or(Error::AlreadyClaimed)?;
        if env.ledger().timestamp() < available_time {
            return Err(Error::NotYetEligible);
        }

        let fund_ledger = Self::fund_ledger_addr(&env)?;
        let value: i128 = env.invoke_contract(
            &fund_ledger,
            &Symbol::new(&env, "balance"),
            vec![
                &env,
                EntryKey::RefundLocked(project_id.clone(), milestone_id, beneficiary.clone())
                    .into_val(&env),
            ],
        );
        if value == 0 {
            return Err(Error::AlreadyClaimed);
        }

        env.invoke_contract::<()>(
            &fund_ledger,
            &Symbol::new(&env, "withdraw"),
            vec![
                &env,
                EntryKey::RefundLocked(project_id.clone(), milestone_id, beneficiary.clone())
                    .into_val(&env),
                beneficiary.to_val(),
                value.into_val(&env),
            ],
        );

        env.events().publish(
            (Symbol::new(&env, "refund_withdrawn"), project_id.clone()),
            RefundWithdrawnEvent {
                project_id,
                milestone_id,
                beneficiary,
                value,
            },
        );

        Ok(())
    }

    // ============================================
    // PAYMENT SETTLEMENT
    // ============================================

    /// Pay the owner the milestone's remaining lock, net of refunds issued
    /// (owner only, completed milestones)
    ///
    /// # Errors
    /// - `MilestoneNotFound`
    /// - `NotYetEligible`: Milestone not completed
    /// - `AlreadyClaimed`: Remainder already withdrawn
    pub fn payment_withdraw(
        env: Env,
        project_id: ProjectId,
        milestone_id: u32,
    ) -> Result<(), Error> {
        let registry = Self::registry_addr(&env)?;
        let owner = Self::project_owner(&env, &registry, &project_id);
        owner.require_auth();

        let milestone = Self::load_milestone(&env, &project_id, milestone_id)?;
        let now = env.ledger().timestamp();
        if validation::computed_state(milestone.state, milestone.end_time, now)
            != MilestoneState::Completion
        {
            return Err(Error::NotYetEligible);
        }

        let fund_ledger = Self::fund_ledger_addr(&env)?;
        let remaining: i128 = env.invoke_contract(
            &fund_ledger,
            &Symbol::new(&env, "balance"),
            vec![
                &env,
                EntryKey::MilestoneLocked(project_id.clone(), milestone_id).into_val(&env),
            ],
        );
        if remaining == 0 {
            return Err(Error::AlreadyClaimed);
        }

        env.invoke_contract::<()>(
            &fund_ledger,
            &Symbol::new(&env, "withdraw"),
            vec![
                &env,
                EntryKey::MilestoneLocked(project_id.clone(), milestone_id).into_val(&env),
                owner.to_val(),
                remaining.into_val(&env),
            ],
        );

        env.events().publish(
            (Symbol::new(&env, "payment_withdrawn"), project_id.clone()),
            PaymentWithdrawnEvent {
                project_id,
                milestone_id,
                owner,
                value: remaining,
            },
        );

        Ok(())
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    /// Effective milestone state: the stored state, promoted to `Completion`
    /// once the scheduled window has fully elapsed
    pub fn milestone_state(
        env: Env,
        project_id: ProjectId,
        milestone_id: u32,
    ) -> Result<MilestoneState, Error> {
        let milestone = Self::load_milestone(&env, &project_id, milestone_id)?;
        Ok(validation::computed_state(
            milestone.state,
            milestone.end_time,
            env.ledger().timestamp(),
        ))
    }

    pub fn get_milestone_info(
        env: Env,
        project_id: ProjectId,
        milestone_id: u32,
    ) -> Result<Milestone, Error> {
        Self::load_milestone(&env, &project_id, milestone_id)
    }

    pub fn get_milestone_objectives(
        env: Env,
        project_id: ProjectId,
        milestone_id: u32,
    ) -> Result<Vec<Objective>, Error> {
        Ok(Self::load_milestone(&env, &project_id, milestone_id)?.objectives)
    }

    pub fn get_number_of_milestones(env: Env, project_id: ProjectId) -> u32 {
        env.storage()
            .instance()
            .get(&DataKey::MilestoneCount(project_id))
            .unwrap_or(0)
    }

    /// Project-wide sum of objective reward caps; reserved out of the raised
    /// funds when the sale finalizes
    pub fn get_total_reward_cap(env: Env, project_id: ProjectId) -> i128 {
        env.storage()
            .instance()
            .get(&DataKey::TotalRewardCap(project_id))
            .unwrap_or(0)
    }

    // ============================================
    // INTERNAL HELPERS
    // ============================================

    fn load_milestone(
        env: &Env,
        project_id: &ProjectId,
        milestone_id: u32,
    ) -> Result<Milestone, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Milestone(project_id.clone(), milestone_id))
            .ok_or(Error::MilestoneNotFound)
    }

    fn registry_addr(env: &Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::ProjectRegistry)
            .ok_or(Error::NotInitialized)
    }

    fn fund_ledger_addr(env: &Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::FundLedger)
            .ok_or(Error::NotInitialized)
    }

    fn rating_addr(env: &Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::RegulatorRating)
            .ok_or(Error::NotInitialized)
    }

    fn project_owner(env: &Env, registry: &Address, project_id: &ProjectId) -> Address {
        env.invoke_contract(
            registry,
            &Symbol::new(env, "get_project_owner"),
            vec![env, project_id.into_val(env)],
        )
    }

    fn project_state(env: &Env, registry: &Address, project_id: &ProjectId) -> ProjectState {
        let (_, state, _): (bool, ProjectState, i128) = env.invoke_contract(
            registry,
            &Symbol::new(env, "get_project_info"),
            vec![env, project_id.into_val(env)],
        );
        state
    }
}
