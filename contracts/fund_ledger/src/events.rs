use shared_types::EntryKey;
use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug)]
pub struct DepositEvent {
    pub key: EntryKey,
    pub from: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct WithdrawEvent {
    pub key: EntryKey,
    pub to: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct EntryMovedEvent {
    pub from_key: EntryKey,
    pub to_key: EntryKey,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct CreditEvent {
    pub key: EntryKey,
    pub amount: i128,
}
