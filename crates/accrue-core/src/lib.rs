//! # accrue-core
//! Custodial savings ledger: deposits, simple-interest accrual, settlement.

pub mod config;
pub mod constants;
pub mod custody;
pub mod error;
pub mod interest;
pub mod ledger;
pub mod reward;
pub mod store;
pub mod traits;
pub mod types;

pub use config::LedgerConfig;
pub use error::LedgerError;
pub use ledger::{Ledger, SharedLedger};
