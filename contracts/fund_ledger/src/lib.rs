#![no_std]

mod error;
mod events;
mod storage;

pub use error::Error;

use events::{CreditEvent, DepositEvent, EntryMovedEvent, WithdrawEvent};
use storage::DataKey;

use shared_types::EntryKey;
use soroban_sdk::{contract, contractimpl, token, Address, Env, Symbol};

#[contract]
pub struct FundLedger;

#[contractimpl]
impl FundLedger {
    // ============================================
    // INITIALIZATION & ADMIN
    // ============================================

    /// Initialize the ledger with its admin and the value-currency token
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    pub fn initialize(env: Env, admin: Address, value_token: Address) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        admin.require_auth();

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::ValueToken, &value_token);

        Ok(())
    }

    /// Add an operator (an engine contract allowed to direct funds)
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `Unauthorized`: Caller is not admin
    pub fn add_operator(env: Env, operator: Address) -> Result<(), Error> {
        let admin: Address = env
            .storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(Error::NotInitialized)?;
        admin.require_auth();

        env.storage()
            .instance()
            .set(&DataKey::Operators(operator), &true);

        Ok(())
    }

    /// Remove an operator
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `Unauthorized`: Caller is not admin
    pub fn remove_operator(env: Env, operator: Address) -> Result<(), Error> {
        let admin: Address = env
            .storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(Error::NotInitialized)?;
        admin.require_auth();

        env.storage()
            .instance()
            .remove(&DataKey::Operators(operator));

        Ok(())
    }

    // ============================================
    // ENTRY MUTATION
    // ============================================

    /// Credit `key` and pull the value currency in from `from`.
    ///
    /// The entry is credited before the external transfer runs, so a
    /// reentrant callee never observes a ledger that undercounts custody.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `InvalidAmount`: Amount <= 0
    /// - `Overflow`: Entry would overflow
    pub fn deposit(env: Env, from: Address, key: EntryKey, amount: i128) -> Result<(), Error> {
        let value_token: Address = env
            .storage()
            .instance()
            .get(&DataKey::ValueToken)
            .ok_or(Error::NotInitialized)?;

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        from.require_auth();

        Self::credit_entry(&env, &key, amount)?;

        let token_client = token::Client::new(&env, &value_token);
        token_client.transfer(&from, &env.current_contract_address(), &amount);

        env.events().publish(
            (Symbol::new(&env, "deposit"),),
            DepositEvent {
                key,
                from,
                amount,
            },
        );

        Ok(())
    }

    /// Debit `key` and pay the value currency out to `to` (operators only).
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `InvalidAmount`: Amount <= 0
    /// - `InsufficientBalance`: Entry lower than `amount` (including zero,
    ///   the already-claimed case)
    pub fn withdraw(env: Env, key: EntryKey, to: Address, amount: i128) -> Result<(), Error> {
        let value_token: Address = env
            .storage()
            .instance()
            .get(&DataKey::ValueToken)
            .ok_or(Error::NotInitialized)?;

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        Self::debit_entry(&env, &key, amount)?;

        let token_client = token::Client::new(&env, &value_token);
        token_client.transfer(&env.current_contract_address(), &to, &amount);

        env.events().publish(
            (Symbol::new(&env, "withdraw"),),
            WithdrawEvent { key, to, amount },
        );

        Ok(())
    }

    /// Move a balance between two purposes without moving tokens
    /// (operators only).
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `InvalidAmount`: Amount <= 0
    /// - `InsufficientBalance`: Source entry lower than `amount`
    /// - `Overflow`: Destination entry would overflow
    pub fn transfer_entry(
        env: Env,
        from_key: EntryKey,
        to_key: EntryKey,
        amount: i128,
    ) -> Result<(), Error> {
        if !env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::NotInitialized);
        }

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        Self::debit_entry(&env, &from_key, amount)?;
        Self::credit_entry(&env, &to_key, amount)?;

        env.events().publish(
            (Symbol::new(&env, "entry_moved"),),
            EntryMovedEvent {
                from_key,
                to_key,
                amount,
            },
        );

        Ok(())
    }

    /// Credit an entry with no token motion (operators only). Used for
    /// counters whose physical asset is custodied elsewhere, such as
    /// returned project tokens.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `InvalidAmount`: Amount <= 0
    /// - `Overflow`: Entry would overflow
    pub fn credit(env: Env, key: EntryKey, amount: i128) -> Result<(), Error> {
        if !env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::NotInitialized);
        }

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        Self::credit_entry(&env, &key, amount)?;

        env.events().publish(
            (Symbol::new(&env, "credit"),),
            CreditEvent { key, amount },
        );

        Ok(())
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    /// Balance of one entry; 0 for keys never written
    pub fn balance(env: Env, key: EntryKey) -> i128 {
        env.storage()
            .instance()
            .get::<DataKey, i128>(&DataKey::Entry(key))
            .unwrap_or(0)
    }

    /// Check if address is an operator
    pub fn is_operator(env: Env, address: Address) -> bool {
        env.storage()
            .instance()
            .get::<DataKey, bool>(&DataKey::Operators(address))
            .unwrap_or(false)
    }

    // ============================================
    // INTERNAL HELPERS
    // ============================================

    fn credit_entry(env: &Env, key: &EntryKey, amount: i128) -> Result<(), Error> {
        let entry_key = DataKey::Entry(key.clone());
        let current = env
            .storage()
            .instance()
            .get::<DataKey, i128>(&entry_key)
            .unwrap_or(0);

        let updated = current.checked_add(amount).ok_or(Error::Overflow)?;
        env.storage().instance().set(&entry_key, &updated);

        Ok(())
    }

    fn debit_entry(env: &Env, key: &EntryKey, amount: i128) -> Result<(), Error> {
        let entry_key = DataKey::Entry(key.clone());
        let current = env
            .storage()
            .instance()
            .get::<DataKey, i128>(&entry_key)
            .unwrap_or(0);

        if current < amount {
            return Err(Error::InsufficientBalance);
        }

        let updated = current - amount;
        if updated == 0 {
            env.storage().instance().remove(&entry_key);
        } else {
            env.storage().instance().set(&entry_key, &updated);
        }

        Ok(())
    }
}
