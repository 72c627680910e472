//! Error types for the accrue ledger.
use thiserror::Error;

use crate::types::{AccountId, Amount};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("yearly return rate {rate}% outside 1..=100")] RateOutOfRange { rate: u32 },
    #[error("minimum deposit must be positive")] ZeroMinDeposit,
    #[error("seconds per time unit must be positive")] ZeroSecondsPerTimeUnit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("insufficient balance for {account}: have {have}, need {need}")] InsufficientBalance { account: AccountId, have: Amount, need: Amount },
    #[error("custody shortfall: have {have}, need {need}")] CustodyShortfall { have: Amount, need: Amount },
    #[error("transfers frozen")] Frozen,
    #[error("balance overflow")] BalanceOverflow,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MintError {
    #[error("supply cap {cap} exceeded by mint of {requested}")] SupplyCapExceeded { cap: Amount, requested: Amount },
    #[error("supply overflow")] SupplyOverflow,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("configuration: {0}")] Configuration(#[from] ConfigError),
    #[error("deposit {amount} below minimum {minimum}")] InsufficientAmount { amount: Amount, minimum: Amount },
    #[error("active deposit already exists for {0}")] ActiveDepositExists(AccountId),
    #[error("no active deposit for {0}")] NoActiveDeposit(AccountId),
    #[error("transfer failed: {0}")] TransferFailure(#[from] TransferError),
    #[error("reward mint failed: {0}")] MintFailure(#[from] MintError),
    #[error("invariant violation: {0}")] InvariantViolation(String),
    #[error("arithmetic overflow")] ArithmeticOverflow,
    #[error("storage: {0}")] Storage(String),
}
