use shared_types::EntryKey;
use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    ValueToken,
    Operators(Address),
    Entry(EntryKey),
    Initialized,
}
