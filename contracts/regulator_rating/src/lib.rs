#![no_std]

mod error;
mod events;
mod rewards;
mod storage;

pub use error::Error;
pub use storage::{Poll, PollStage};

use events::*;
use storage::DataKey;

use shared_types::{EntryKey, Objective, ProjectId, BASIS_POINTS};
use soroban_sdk::{contract, contractimpl, vec, Address, Env, IntoVal, Symbol, Vec};

#[contract]
pub struct RegulatorRating;

#[contractimpl]
impl RegulatorRating {
    // ============================================
    // INITIALIZATION
    // ============================================

    /// Initialize with the reputation oracle, collaborator addresses and the
    /// established-reputation weight share
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    /// - `InvalidConfig`: Weight share outside 0..=10000 bps
    pub fn initialize(
        env: Env,
        admin: Address,
        oracle: Address,
        fund_ledger: Address,
        project_registry: Address,
        established_weight_bps: i128,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        if established_weight_bps < 0 || established_weight_bps > BASIS_POINTS {
            return Err(Error::InvalidConfig);
        }

        admin.require_auth();

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::Oracle, &oracle);
        env.storage().instance().set(&DataKey::FundLedger, &fund_ledger);
        env.storage()
            .instance()
            .set(&DataKey::ProjectRegistry, &project_registry);
        env.storage()
            .instance()
            .set(&DataKey::EstablishedWeightBps, &established_weight_bps);

        Ok(())
    }

    // ============================================
    // POLL LIFECYCLE
    // ============================================

    /// Register a milestone's reputation poll. Called by the escrow at
    /// milestone activation with the price and token fixed at sale finalize.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `PollAlreadyExists`: Poll already registered for this milestone
    /// - `InvalidAmount`: Price not positive
    pub fn register_poll(
        env: Env,
        project_id: ProjectId,
        milestone_id: u32,
        price: i128,
        token: Address,
        bid_deadline: u64,
        objectives: Vec<Objective>,
    ) -> Result<(), Error> {
        if !env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::NotInitialized);
        }

        if env
            .storage()
            .instance()
            .has(&DataKey::Poll(project_id.clone(), milestone_id))
        {
            return Err(Error::PollAlreadyExists);
        }

        if price <= 0 {
            return Err(Error::InvalidAmount);
        }

        let poll = Poll {
            price,
            token,
            stage: PollStage::Registered,
            bid_deadline,
            objectives,
        };
        env.storage()
            .instance()
            .set(&DataKey::Poll(project_id.clone(), milestone_id), &poll);

        env.events().publish(
            (Symbol::new(&env, "poll_registered"), project_id.clone()),
            PollRegisteredEvent {
                project_id,
                milestone_id,
                price,
                bid_deadline,
            },
        );

        Ok(())
    }

    /// Open regulator bidding on a registered poll
    ///
    /// # Errors
    /// - `PollNotFound` / `InvalidState`
    /// - `WindowExpired`: Bid deadline already passed
    pub fn open_bidding(env: Env, project_id: ProjectId, milestone_id: u32) -> Result<(), Error> {
        let mut poll = Self::load_poll(&env, &project_id, milestone_id)?;
        if poll.stage != PollStage::Registered {
            return Err(Error::InvalidState);
        }
        if env.ledger().timestamp() > poll.bid_deadline {
            return Err(Error::WindowExpired);
        }

        poll.stage = PollStage::Bidding;
        env.storage()
            .instance()
            .set(&DataKey::Poll(project_id.clone(), milestone_id), &poll);

        env.events().publish(
            (Symbol::new(&env, "bidding_opened"), project_id.clone()),
            BiddingOpenedEvent {
                project_id,
                milestone_id,
            },
        );

        Ok(())
    }

    // ============================================
    // VOTING
    // ============================================

    /// Record a voter's voting power for one poll (oracle only). The write
    /// is absolute, replacing any earlier value.
    ///
    /// # Errors
    /// - `NotInitialized` / `PollNotFound`
    /// - `InvalidAmount`: Negative amount
    pub fn write_available_votes(
        env: Env,
        project_id: ProjectId,
        milestone_id: u32,
        voter: Address,
        amount: i128,
    ) -> Result<(), Error> {
        let oracle: Address = env
            .storage()
            .instance()
            .get(&DataKey::Oracle)
            .ok_or(Error::NotInitialized)?;
        oracle.require_auth();

        Self::load_poll(&env, &project_id, milestone_id)?;

        if amount < 0 {
            return Err(Error::InvalidAmount);
        }

        env.storage().instance().set(
            &DataKey::AvailableVotes(project_id.clone(), milestone_id, voter.clone()),
            &amount,
        );

        env.events().publish(
            (Symbol::new(&env, "votes_written"), project_id.clone()),
            VotesWrittenEvent {
                project_id,
                milestone_id,
                voter,
                amount,
            },
        );

        Ok(())
    }

    /// Cast votes for a regulator on one objective type. Each vote carries
    /// the poll's price as weight.
    ///
    /// # Errors
    /// - `PollNotFound` / `InvalidState` / `ObjectiveNotFound`
    /// - `WindowExpired`: Bid deadline already passed
    /// - `InvalidAmount`: Amount not positive
    /// - `InsufficientVotes`: Amount exceeds the voter's remaining votes
    pub fn vote(
        env: Env,
        project_id: ProjectId,
        milestone_id: u32,
        voter: Address,
        regulator: Address,
        objective_type: Symbol,
        amount: i128,
    ) -> Result<(), Error> {
        voter.require_auth();

        let poll = Self::load_poll(&env, &project_id, milestone_id)?;
        if poll.stage == PollStage::Finalized {
            return Err(Error::InvalidState);
        }
        if env.ledger().timestamp() > poll.bid_deadline {
            return Err(Error::WindowExpired);
        }
        if !Self::has_objective_type(&poll, &objective_type) {
            return Err(Error::ObjectiveNotFound);
        }

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let available: i128 = env
            .storage()
            .instance()
            .get(&DataKey::AvailableVotes(
                project_id.clone(),
                milestone_id,
                voter.clone(),
            ))
            .unwrap_or(0);
        let used: i128 = env
            .storage()
            .instance()
            .get(&DataKey::VotesUsed(
                project_id.clone(),
                milestone_id,
                voter.clone(),
            ))
            .unwrap_or(0);
        if amount > available - used {
            return Err(Error::InsufficientVotes);
        }

        let weight = amount.checked_mul(poll.price).ok_or(Error::Overflow)?;

        let tally_key = DataKey::Tally(
            project_id.clone(),
            milestone_id,
            objective_type.clone(),
            regulator.clone(),
        );
        let tally: i128 = env.storage().instance().get(&tally_key).unwrap_or(0);
        let tally = tally.checked_add(weight).ok_or(Error::Overflow)?;
        env.storage().instance().set(&tally_key, &tally);

        env.storage().instance().set(
            &DataKey::VotesUsed(project_id.clone(), milestone_id, voter.clone()),
            &(used + amount),
        );

        env.events().publish(
            (Symbol::new(&env, "vote_cast"), project_id.clone()),
            VoteCastEvent {
                project_id,
                milestone_id,
                voter,
                regulator,
                objective_type,
                weight,
            },
        );

        Ok(())
    }

    // ============================================
    // BIDDING
    // ============================================

    /// Bid to regulate one objective
    ///
    /// # Errors
    /// - `PollNotFound` / `InvalidState` / `ObjectiveNotFound`
    /// - `WindowExpired`: Bid deadline already passed
    /// - `AlreadyBid`: Regulator already bid on this objective
    pub fn bid(
        env: Env,
        project_id: ProjectId,
        milestone_id: u32,
        objective_id: Symbol,
        regulator: Address,
    ) -> Result<(), Error> {
        regulator.require_auth();

        let poll = Self::load_poll(&env, &project_id, milestone_id)?;
        if poll.stage != PollStage::Bidding {
            return Err(Error::InvalidState);
        }
        if env.ledger().timestamp() > poll.bid_deadline {
            return Err(Error::WindowExpired);
        }
        if !Self::has_objective_id(&poll, &objective_id) {
            return Err(Error::ObjectiveNotFound);
        }

        let bid_key = DataKey::Bid(
            project_id.clone(),
            milestone_id,
            objective_id.clone(),
            regulator.clone(),
        );
        if env.storage().instance().has(&bid_key) {
            return Err(Error::AlreadyBid);
        }
        env.storage().instance().set(&bid_key, &true);

        let bidders_key = DataKey::Bidders(project_id.clone(), milestone_id, objective_id.clone());
        let mut bidders: Vec<Address> = env
            .storage()
            .instance()
            .get(&bidders_key)
            .unwrap_or(Vec::new(&env));
        bidders.push_back(regulator.clone());
        env.storage().instance().set(&bidders_key, &bidders);

        env.events().publish(
            (Symbol::new(&env, "bid_placed"), project_id.clone()),
            BidPlacedEvent {
                project_id,
                milestone_id,
                objective_id,
                regulator,
            },
        );

        Ok(())
    }

    /// Withdraw an open bid before the deadline
    ///
    /// # Errors
    /// - `PollNotFound` / `InvalidState`
    /// - `WindowExpired`: Bid deadline already passed
    /// - `NoBid`: Regulator has no bid on this objective
    pub fn back_out_from_bid(
        env: Env,
        project_id: ProjectId,
        milestone_id: u32,
        objective_id: Symbol,
        regulator: Address,
    ) -> Result<(), Error> {
        regulator.require_auth();

        let poll = Self::load_poll(&env, &project_id, milestone_id)?;
        if poll.stage != PollStage::Bidding {
            return Err(Error::InvalidState);
        }
        if env.ledger().timestamp() > poll.bid_deadline {
            return Err(Error::WindowExpired);
        }

        let bid_key = DataKey::Bid(
            project_id.clone(),
            milestone_id,
            objective_id.clone(),
            regulator.clone(),
        );
        if !env.storage().instance().has(&bid_key) {
            return Err(Error::NoBid);
        }
        env.storage().instance().remove(&bid_key);

        let bidders_key = DataKey::Bidders(project_id.clone(), milestone_id, objective_id.clone());
        let mut bidders: Vec<Address> = env
            .storage()
            .instance()
            .get(&bidders_key)
            .unwrap_or(Vec::new(&env));
        if let Some(index) = bidders.first_index_of(&regulator) {
            bidders.remove(index);
        }
        env.storage().instance().set(&bidders_key, &bidders);

        env.events().publish(
            (Symbol::new(&env, "bid_withdrawn"), project_id.clone()),
            BidWithdrawnEvent {
                project_id,
                milestone_id,
                objective_id,
                regulator,
            },
        );

        Ok(())
    }

    // ============================================
    // REWARD SETTLEMENT
    // ============================================

    /// Compute every objective's reward split (project owner only, after the
    /// bid deadline). Each bidder's weight blends established reputation
    /// with this poll's tally; the poll's tallies then fold into standing
    /// reputation with the same blend.
    ///
    /// # Errors
    /// - `NotInitialized` / `PollNotFound` / `InvalidState`
    /// - `NotYetEligible`: Bid deadline not reached
    /// - `Overflow`: Weight accumulation overflows
    pub fn finalize_all_bids(
        env: Env,
        project_id: ProjectId,
        milestone_id: u32,
    ) -> Result<(), Error> {
        let registry: Address = env
            .storage()
            .instance()
            .get(&DataKey::ProjectRegistry)
            .ok_or(Error::NotInitialized)?;
        let owner: Address = env.invoke_contract(
            &registry,
            &Symbol::new(&env, "get_project_owner"),
            vec![&env, project_id.into_val(&env)],
        );
        owner.require_auth();

        let mut poll = Self::load_poll(&env, &project_id, milestone_id)?;
        if poll.stage != PollStage::Bidding {
            return Err(Error::InvalidState);
        }
        if env.ledger().timestamp() <= poll.bid_deadline {
            return Err(Error::NotYetEligible);
        }

        let established_bps: i128 = env
            .storage()
            .instance()
            .get(&DataKey::EstablishedWeightBps)
            .ok_or(Error::NotInitialized)?;

        // reward split per objective among its bidders
        for objective in poll.objectives.iter() {
            let bidders: Vec<Address> = env
                .storage()
                .instance()
                .get(&DataKey::Bidders(
                    project_id.clone(),
                    milestone_id,
                    objective.id.clone(),
                ))
                .unwrap_or(Vec::new(&env));

            let mut weights: Vec<i128> = Vec::new(&env);
            let mut total_weight: i128 = 0;
            for regulator in bidders.iter() {
                let tally: i128 = env
                    .storage()
                    .instance()
                    .get(&DataKey::Tally(
                        project_id.clone(),
                        milestone_id,
                        objective.objective_type.clone(),
                        regulator.clone(),
                    ))
                    .unwrap_or(0);
                let reputation: i128 = env
                    .storage()
                    .instance()
                    .get(&DataKey::Reputation(
                        regulator.clone(),
                        objective.objective_type.clone(),
                    ))
                    .unwrap_or(0);
                let weight = rewards::blended_weight(reputation, tally, established_bps)
                    .ok_or(Error::Overflow)?;
                weights.push_back(weight);
                total_weight = total_weight.checked_add(weight).ok_or(Error::Overflow)?;
            }

            for (regulator, weight) in bidders.iter().zip(weights.iter()) {
                let reward = rewards::reward_share(objective.max_reward, weight, total_weight)
                    .ok_or(Error::Overflow)?;
                if reward > 0 {
                    env.storage().instance().set(
                        &DataKey::Reward(
                            project_id.clone(),
                            milestone_id,
                            objective.id.clone(),
                            regulator,
                        ),
                        &reward,
                    );
                }
            }
        }

        // fold this poll's tallies into standing reputation, once per
        // regulator per objective type
        let mut folded_types: Vec<Symbol> = Vec::new(&env);
        for objective in poll.objectives.iter() {
            if folded_types.contains(&objective.objective_type) {
                continue;
            }
            folded_types.push_back(objective.objective_type.clone());

            let mut folded: Vec<Address> = Vec::new(&env);
            for candidate in poll.objectives.iter() {
                if candidate.objective_type != objective.objective_type {
                    continue;
                }
                let bidders: Vec<Address> = env
                    .storage()
                    .instance()
                    .get(&DataKey::Bidders(
                        project_id.clone(),
                        milestone_id,
                        candidate.id.clone(),
                    ))
                    .unwrap_or(Vec::new(&env));
                for regulator in bidders.iter() {
                    if folded.contains(&regulator) {
                        continue;
                    }
                    folded.push_back(regulator.clone());

                    let tally: i128 = env
                        .storage()
                        .instance()
                        .get(&DataKey::Tally(
                            project_id.clone(),
                            milestone_id,
                            objective.objective_type.clone(),
                            regulator.clone(),
                        ))
                        .unwrap_or(0);
                    let reputation_key =
                        DataKey::Reputation(regulator.clone(), objective.objective_type.clone());
                    let reputation: i128 =
                        env.storage().instance().get(&reputation_key).unwrap_or(0);
                    let updated = rewards::blended_weight(reputation, tally, established_bps)
                        .ok_or(Error::Overflow)?;
                    env.storage().instance().set(&reputation_key, &updated);
                }
            }
        }

        poll.stage = PollStage::Finalized;
        env.storage()
            .instance()
            .set(&DataKey::Poll(project_id.clone(), milestone_id), &poll);

        env.events().publish(
            (Symbol::new(&env, "bids_finalized"), project_id.clone()),
            BidsFinalizedEvent {
                project_id,
                milestone_id,
            },
        );

        Ok(())
    }

    /// Pay out a regulator's reward from the project's regulator reserve
    ///
    /// # Errors
    /// - `NotInitialized` / `PollNotFound`
    /// - `NotYetEligible`: Poll not finalized
    /// - `AlreadyClaimed`: No unclaimed reward under this entry
    pub fn withdraw_reward(
        env: Env,
        project_id: ProjectId,
        milestone_id: u32,
        objective_id: Symbol,
        regulator: Address,
    ) -> Result<(), Error> {
        regulator.require_auth();

        let poll = Self::load_poll(&env, &project_id, milestone_id)?;
        if poll.stage != PollStage::Finalized {
            return Err(Error::NotYetEligible);
        }

        let reward_key = DataKey::Reward(
            project_id.clone(),
            milestone_id,
            objective_id.clone(),
            regulator.clone(),
        );
        let reward: i128 = env.storage().instance().get(&reward_key).unwrap_or(0);
        if reward == 0 {
            return Err(Error::AlreadyClaimed);
        }
        env.storage().instance().remove(&reward_key);

        let fund_ledger: Address = env
            .storage()
            .instance()
            .get(&DataKey::FundLedger)
            .ok_or(Error::NotInitialized)?;
        env.invoke_contract::<()>(
            &fund_ledger,
            &Symbol::new(&env, "withdraw"),
            vec![
                &env,
                EntryKey::RegulatorReserve(project_id.clone()).into_val(&env),
                regulator.to_val(),
                reward.into_val(&env),
            ],
        );

        env.events().publish(
            (Symbol::new(&env, "reward_withdrawn"), project_id.clone()),
            RewardWithdrawnEvent {
                project_id,
                milestone_id,
                objective_id,
                regulator,
                amount: reward,
            },
        );

        Ok(())
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    pub fn get_regulation_rewards(
        env: Env,
        project_id: ProjectId,
        milestone_id: u32,
        objective_id: Symbol,
        regulator: Address,
    ) -> i128 {
        env.storage()
            .instance()
            .get(&DataKey::Reward(project_id, milestone_id, objective_id, regulator))
            .unwrap_or(0)
    }

    /// Raw weighted votes a regulator obtained on one objective type
    pub fn get_voting_result(
        env: Env,
        project_id: ProjectId,
        milestone_id: u32,
        objective_type: Symbol,
        regulator: Address,
    ) -> i128 {
        env.storage()
            .instance()
            .get(&DataKey::Tally(project_id, milestone_id, objective_type, regulator))
            .unwrap_or(0)
    }

    pub fn get_reputation(env: Env, regulator: Address, objective_type: Symbol) -> i128 {
        env.storage()
            .instance()
            .get(&DataKey::Reputation(regulator, objective_type))
            .unwrap_or(0)
    }

    pub fn get_remaining_votes(
        env: Env,
        project_id: ProjectId,
        milestone_id: u32,
        voter: Address,
    ) -> i128 {
        let available: i128 = env
            .storage()
            .instance()
            .get(&DataKey::AvailableVotes(
                project_id.clone(),
                milestone_id,
                voter.clone(),
            ))
            .unwrap_or(0);
        let used: i128 = env
            .storage()
            .instance()
            .get(&DataKey::VotesUsed(project_id, milestone_id, voter))
            .unwrap_or(0);
        available - used
    }

    pub fn get_poll_info(
        env: Env,
        project_id: ProjectId,
        milestone_id: u32,
    ) -> Result<Poll, Error> {
        Self::load_poll(&env, &project_id, milestone_id)
    }

    // ============================================
    // INTERNAL HELPERS
    // ============================================

    fn load_poll(env: &Env, project_id: &ProjectId, milestone_id: u32) -> Result<Poll, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Poll(project_id.clone(), milestone_id))
            .ok_or(Error::PollNotFound)
    }

    fn has_objective_type(poll: &Poll, objective_type: &Symbol) -> bool {
        poll.objectives
            .iter()
            .any(|o| o.objective_type == *objective_type)
    }

    fn has_objective_id(poll: &Poll, objective_id: &Symbol) -> bool {
        poll.objectives.iter().any(|o| o.id == *objective_id)
    }
}
