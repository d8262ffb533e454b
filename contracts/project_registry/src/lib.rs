#![no_std]

mod error;
mod events;
mod storage;

pub use error::Error;
pub use storage::Sale;

use events::*;
use storage::{DataKey, Project};

use shared_types::{EntryKey, ProjectId, ProjectState};
use soroban_sdk::{contract, contractimpl, token, vec, Address, Env, IntoVal, Symbol};

#[contract]
pub struct ProjectRegistry;

#[contractimpl]
impl ProjectRegistry {
    // ============================================
    // INITIALIZATION
    // ============================================

    /// Initialize with the admission authority and collaborator addresses
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    pub fn initialize(
        env: Env,
        admin: Address,
        registry: Address,
        value_token: Address,
        fund_ledger: Address,
        milestone_escrow: Address,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        admin.require_auth();

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::Registry, &registry);
        env.storage().instance().set(&DataKey::ValueToken, &value_token);
        env.storage().instance().set(&DataKey::FundLedger, &fund_ledger);
        env.storage()
            .instance()
            .set(&DataKey::MilestoneEscrow, &milestone_escrow);

        Ok(())
    }

    // ============================================
    // PROJECT LIFECYCLE
    // ============================================

    /// Register a newly submitted application (admission authority only)
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `ProjectAlreadyExists`: Id already registered
    pub fn register_project(env: Env, project_id: ProjectId, owner: Address) -> Result<(), Error> {
        let registry: Address = env
            .storage()
            .instance()
            .get(&DataKey::Registry)
            .ok_or(Error::NotInitialized)?;
        registry.require_auth();

        if env
            .storage()
            .instance()
            .has(&DataKey::Project(project_id.clone()))
        {
            return Err(Error::ProjectAlreadyExists);
        }

        let project = Project {
            owner: owner.clone(),
            state: ProjectState::AppSubmitted,
        };
        env.storage()
            .instance()
            .set(&DataKey::Project(project_id.clone()), &project);

        env.events().publish(
            (Symbol::new(&env, "project_registered"), project_id.clone()),
            ProjectRegisteredEvent { project_id, owner },
        );

        Ok(())
    }

    /// Record the registry's admission signal (admission authority only)
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `ProjectNotFound`: No project under this id
    /// - `InvalidState`: Project is not `AppSubmitted`
    pub fn accept_application(env: Env, project_id: ProjectId) -> Result<(), Error> {
        let registry: Address = env
            .storage()
            .instance()
            .get(&DataKey::Registry)
            .ok_or(Error::NotInitialized)?;
        registry.require_auth();

        let mut project = Self::load_project(&env, &project_id)?;
        if project.state != ProjectState::AppSubmitted {
            return Err(Error::InvalidState);
        }

        project.state = ProjectState::AppAccepted;
        env.storage()
            .instance()
            .set(&DataKey::Project(project_id.clone()), &project);

        env.events().publish(
            (Symbol::new(&env, "project_state"), project_id.clone()),
            ProjectStateChangedEvent {
                project_id,
                state: ProjectState::AppAccepted,
            },
        );

        Ok(())
    }

    /// Mark the project complete. Only the milestone escrow calls this,
    /// when the project's last milestone closes; direct invocation carries
    /// the escrow contract's own authorization.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `ProjectNotFound`: No project under this id
    /// - `InvalidState`: Project is not in its milestone phase
    pub fn complete_project(env: Env, project_id: ProjectId) -> Result<(), Error> {
        let escrow: Address = env
            .storage()
            .instance()
            .get(&DataKey::MilestoneEscrow)
            .ok_or(Error::NotInitialized)?;
        escrow.require_auth();

        let mut project = Self::load_project(&env, &project_id)?;
        if !project.state.is_next(ProjectState::Complete) {
            return Err(Error::InvalidState);
        }

        project.state = ProjectState::Complete;
        env.storage()
            .instance()
            .set(&DataKey::Project(project_id.clone()), &project);

        env.events().publish(
            (Symbol::new(&env, "project_state"), project_id.clone()),
            ProjectStateChangedEvent {
                project_id,
                state: ProjectState::Complete,
            },
        );

        Ok(())
    }

    /// Bind the project token (owner only, exactly once)
    ///
    /// # Errors
    /// - `ProjectNotFound`: No project under this id
    /// - `TokenAlreadySet`: Token already bound
    pub fn set_token_address(env: Env, project_id: ProjectId, token: Address) -> Result<(), Error> {
        let project = Self::load_project(&env, &project_id)?;
        project.owner.require_auth();

        if env
            .storage()
            .instance()
            .has(&DataKey::ProjectToken(project_id.clone()))
        {
            return Err(Error::TokenAlreadySet);
        }

        env.storage()
            .instance()
            .set(&DataKey::ProjectToken(project_id), &token);

        Ok(())
    }

    /// Remove a project after a successful registry challenge (admission
    /// authority only). Only pre-sale states can be removed.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `ProjectNotFound`: No project under this id
    /// - `InvalidState`: Project already past acceptance
    pub fn unregister_project(env: Env, project_id: ProjectId) -> Result<(), Error> {
        let registry: Address = env
            .storage()
            .instance()
            .get(&DataKey::Registry)
            .ok_or(Error::NotInitialized)?;
        registry.require_auth();

        let project = Self::load_project(&env, &project_id)?;
        if project.state != ProjectState::AppSubmitted
            && project.state != ProjectState::AppAccepted
        {
            return Err(Error::InvalidState);
        }

        env.storage()
            .instance()
            .remove(&DataKey::Project(project_id.clone()));
        env.storage()
            .instance()
            .remove(&DataKey::ProjectToken(project_id.clone()));
        env.storage()
            .instance()
            .remove(&DataKey::Sale(project_id.clone()));

        env.events().publish(
            (Symbol::new(&env, "project_unregistered"), project_id.clone()),
            ProjectUnregisteredEvent { project_id },
        );

        Ok(())
    }

    // ============================================
    // TOKEN SALE
    // ============================================

    /// Open the token sale (owner only). Escrows the full sale supply.
    ///
    /// # Errors
    /// - `ProjectNotFound`: No project under this id
    /// - `InvalidState`: Project is not `AppAccepted`
    /// - `TokenNotSet`: No token bound yet
    /// - `SaleAlreadyStarted`: Sale record already exists
    /// - `InvalidAmount`: Rate or supply not positive
    pub fn start_token_sale(
        env: Env,
        project_id: ProjectId,
        rate: i128,
        total_for_sale: i128,
    ) -> Result<(), Error> {
        let mut project = Self::load_project(&env, &project_id)?;
        project.owner.require_auth();

        if project.state != ProjectState::AppAccepted {
            return Err(Error::InvalidState);
        }

        if rate <= 0 || total_for_sale <= 0 {
            return Err(Error::InvalidAmount);
        }

        if env
            .storage()
            .instance()
            .has(&DataKey::Sale(project_id.clone()))
        {
            return Err(Error::SaleAlreadyStarted);
        }

        let project_token: Address = env
            .storage()
            .instance()
            .get(&DataKey::ProjectToken(project_id.clone()))
            .ok_or(Error::TokenNotSet)?;

        let sale = Sale {
            rate,
            total_for_sale,
            total_sold: 0,
            total_received: 0,
            average_price: 0,
            finalized: false,
            unsold_withdrawn: false,
        };
        env.storage()
            .instance()
            .set(&DataKey::Sale(project_id.clone()), &sale);

        project.state = ProjectState::TokenSale;
        env.storage()
            .instance()
            .set(&DataKey::Project(project_id.clone()), &project);

        // escrow the sale supply before purchases open
        let token_client = token::Client::new(&env, &project_token);
        token_client.transfer(
            &project.owner,
            &env.current_contract_address(),
            &total_for_sale,
        );

        env.events().publish(
            (Symbol::new(&env, "sale_started"), project_id.clone()),
            TokenSaleStartedEvent {
                project_id,
                rate,
                total_for_sale,
            },
        );

        Ok(())
    }

    /// Purchase project tokens with value currency. Funds land in the fund
    /// ledger's uncommitted balance; tokens are delivered immediately.
    ///
    /// # Errors
    /// - `ProjectNotFound`: No project under this id
    /// - `InvalidState`: Project is not in `TokenSale`
    /// - `SaleNotStarted` / `SaleAlreadyFinalized`
    /// - `InvalidAmount`: Payment not positive
    /// - `ExceedsSaleSupply`: Purchase overruns the unsold remainder
    /// - `Overflow`: Token amount overflows
    pub fn buy_tokens(
        env: Env,
        project_id: ProjectId,
        purchaser: Address,
        amount: i128,
    ) -> Result<(), Error> {
        let project = Self::load_project(&env, &project_id)?;
        if project.state != ProjectState::TokenSale {
            return Err(Error::InvalidState);
        }

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        purchaser.require_auth();

        let mut sale = Self::load_sale(&env, &project_id)?;
        if sale.finalized {
            return Err(Error::SaleAlreadyFinalized);
        }

        let tokens = amount.checked_mul(sale.rate).ok_or(Error::Overflow)?;
        let remaining = sale.total_for_sale - sale.total_sold;
        if tokens > remaining {
            return Err(Error::ExceedsSaleSupply);
        }

        sale.total_sold = sale.total_sold.checked_add(tokens).ok_or(Error::Overflow)?;
        sale.total_received = sale
            .total_received
            .checked_add(amount)
            .ok_or(Error::Overflow)?;
        env.storage()
            .instance()
            .set(&DataKey::Sale(project_id.clone()), &sale);

        // value currency in: deposited to the ledger's uncommitted balance
        let fund_ledger: Address = env
            .storage()
            .instance()
            .get(&DataKey::FundLedger)
            .ok_or(Error::NotInitialized)?;
        env.invoke_contract::<()>(
            &fund_ledger,
            &Symbol::new(&env, "deposit"),
            vec![
                &env,
                purchaser.to_val(),
                EntryKey::ProjectBalance(project_id.clone()).into_val(&env),
                amount.into_val(&env),
            ],
        );

        // tokens out
        let project_token: Address = env
            .storage()
            .instance()
            .get(&DataKey::ProjectToken(project_id.clone()))
            .ok_or(Error::TokenNotSet)?;
        let token_client = token::Client::new(&env, &project_token);
        token_client.transfer(&env.current_contract_address(), &purchaser, &tokens);

        env.events().publish(
            (Symbol::new(&env, "tokens_purchased"), project_id.clone()),
            TokensPurchasedEvent {
                project_id,
                purchaser,
                paid: amount,
                tokens,
            },
        );

        Ok(())
    }

    /// Close the sale (owner only, one-shot). Fixes the average price,
    /// reserves the project's cumulative regulator-reward cap out of the
    /// raised funds, and advances the project into its milestone phase.
    ///
    /// # Errors
    /// - `ProjectNotFound` / `SaleNotStarted`
    /// - `SaleAlreadyFinalized`: Repeat finalize
    /// - `InvalidState`: Project is not in `TokenSale` and was never finalized
    /// - `InsufficientBalance`: Raised funds below the reward cap
    pub fn finalize(env: Env, project_id: ProjectId) -> Result<(), Error> {
        let mut project = Self::load_project(&env, &project_id)?;
        project.owner.require_auth();

        let mut sale = Self::load_sale(&env, &project_id)?;
        if sale.finalized {
            return Err(Error::SaleAlreadyFinalized);
        }
        if project.state != ProjectState::TokenSale {
            return Err(Error::InvalidState);
        }

        let milestone_escrow: Address = env
            .storage()
            .instance()
            .get(&DataKey::MilestoneEscrow)
            .ok_or(Error::NotInitialized)?;
        let reward_cap: i128 = env.invoke_contract(
            &milestone_escrow,
            &Symbol::new(&env, "get_total_reward_cap"),
            vec![&env, project_id.into_val(&env)],
        );

        if reward_cap > sale.total_received {
            return Err(Error::InsufficientBalance);
        }

        // single-rate model: the average is the rate, immutable from here on
        sale.average_price = sale.rate;
        sale.finalized = true;
        env.storage()
            .instance()
            .set(&DataKey::Sale(project_id.clone()), &sale);

        if reward_cap > 0 {
            let fund_ledger: Address = env
                .storage()
                .instance()
                .get(&DataKey::FundLedger)
                .ok_or(Error::NotInitialized)?;
            env.invoke_contract::<()>(
                &fund_ledger,
                &Symbol::new(&env, "transfer_entry"),
                vec![
                    &env,
                    EntryKey::ProjectBalance(project_id.clone()).into_val(&env),
                    EntryKey::RegulatorReserve(project_id.clone()).into_val(&env),
                    reward_cap.into_val(&env),
                ],
            );
        }

        project.state = ProjectState::Milestone;
        env.storage()
            .instance()
            .set(&DataKey::Project(project_id.clone()), &project);

        env.events().publish(
            (Symbol::new(&env, "sale_finalized"), project_id.clone()),
            SaleFinalizedEvent {
                project_id,
                average_price: sale.average_price,
                total_received: sale.total_received,
                reward_reserve: reward_cap,
            },
        );

        Ok(())
    }

    /// Return the unsold remainder to the owner (owner only, post-finalize,
    /// one-shot)
    ///
    /// # Errors
    /// - `ProjectNotFound` / `SaleNotStarted`
    /// - `SaleNotFinalized`: Sale still open
    /// - `AlreadyClaimed`: Remainder already withdrawn
    pub fn withdraw_unsold_tokens(env: Env, project_id: ProjectId) -> Result<(), Error> {
        let project = Self::load_project(&env, &project_id)?;
        project.owner.require_auth();

        let mut sale = Self::load_sale(&env, &project_id)?;
        if !sale.finalized {
            return Err(Error::SaleNotFinalized);
        }
        if sale.unsold_withdrawn {
            return Err(Error::AlreadyClaimed);
        }

        let unsold = sale.total_for_sale - sale.total_sold;
        sale.unsold_withdrawn = true;
        env.storage()
            .instance()
            .set(&DataKey::Sale(project_id.clone()), &sale);

        if unsold > 0 {
            let project_token: Address = env
                .storage()
                .instance()
                .get(&DataKey::ProjectToken(project_id.clone()))
                .ok_or(Error::TokenNotSet)?;
            let token_client = token::Client::new(&env, &project_token);
            token_client.transfer(&env.current_contract_address(), &project.owner, &unsold);
        }

        env.events().publish(
            (Symbol::new(&env, "unsold_withdrawn"), project_id.clone()),
            UnsoldWithdrawnEvent {
                project_id,
                owner: project.owner,
                tokens: unsold,
            },
        );

        Ok(())
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    /// `(exists, state, uncommitted_balance)`; the balance is read from the
    /// fund ledger so the view can never diverge from custody
    pub fn get_project_info(env: Env, project_id: ProjectId) -> (bool, ProjectState, i128) {
        let project = match env
            .storage()
            .instance()
            .get::<DataKey, Project>(&DataKey::Project(project_id.clone()))
        {
            Some(p) => p,
            None => return (false, ProjectState::NotExist, 0),
        };

        let fund_ledger: Address = match env.storage().instance().get(&DataKey::FundLedger) {
            Some(a) => a,
            None => return (true, project.state, 0),
        };
        let balance: i128 = env.invoke_contract(
            &fund_ledger,
            &Symbol::new(&env, "balance"),
            vec![&env, EntryKey::ProjectBalance(project_id).into_val(&env)],
        );

        (true, project.state, balance)
    }

    pub fn get_project_owner(env: Env, project_id: ProjectId) -> Result<Address, Error> {
        Ok(Self::load_project(&env, &project_id)?.owner)
    }

    pub fn get_token_address(env: Env, project_id: ProjectId) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::ProjectToken(project_id))
            .ok_or(Error::TokenNotSet)
    }

    pub fn get_sale_info(env: Env, project_id: ProjectId) -> Result<Sale, Error> {
        Self::load_sale(&env, &project_id)
    }

    /// The conversion rate fixed at sale finalize
    ///
    /// # Errors
    /// - `SaleNotStarted` / `SaleNotFinalized`
    pub fn get_average_price(env: Env, project_id: ProjectId) -> Result<i128, Error> {
        let sale = Self::load_sale(&env, &project_id)?;
        if !sale.finalized {
            return Err(Error::SaleNotFinalized);
        }
        Ok(sale.average_price)
    }

    // ============================================
    // INTERNAL HELPERS
    // ============================================

    fn load_project(env: &Env, project_id: &ProjectId) -> Result<Project, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Project(project_id.clone()))
            .ok_or(Error::ProjectNotFound)
    }

    fn load_sale(env: &Env, project_id: &ProjectId) -> Result<Sale, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Sale(project_id.clone()))
            .ok_or(Error::SaleNotStarted)
    }
}
