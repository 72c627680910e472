//! Shared fixtures for E2E and property tests.

use std::sync::Arc;

use accrue_core::constants::SECONDS_PER_YEAR;
use accrue_core::custody::MemoryCustody;
use accrue_core::reward::MemoryRewardToken;
use accrue_core::types::{AccountId, Amount};
use accrue_core::{Ledger, LedgerConfig};

/// Minimum deposit for which every whole rate yields an exact per-second value.
pub const MIN: Amount = SECONDS_PER_YEAR as Amount * 100;

/// Seconds per time unit used by [`TestBed`].
pub const SPU: u64 = 12;

/// Time units in one year at [`SPU`].
pub const UNITS_PER_YEAR: u64 = SECONDS_PER_YEAR / SPU;

/// Account id from an index, e.g. `acct(3) == "acct-3"`.
pub fn acct(i: usize) -> AccountId {
    AccountId::from(format!("acct-{i}"))
}

/// Ledger config using [`MIN`] and [`SPU`].
pub fn config(rate: u32) -> LedgerConfig {
    LedgerConfig {
        yearly_return_rate_percent: rate,
        min_deposit_amount: MIN,
        seconds_per_time_unit: SPU,
    }
}

/// A ledger wired to in-memory custody and reward token, with handles kept
/// for inspecting the environment.
pub struct TestBed {
    pub ledger: Ledger,
    pub custody: Arc<MemoryCustody>,
    pub token: Arc<MemoryRewardToken>,
}

impl TestBed {
    pub fn new(rate: u32) -> Self {
        Self::with_token(rate, MemoryRewardToken::new())
    }

    pub fn with_token(rate: u32, token: MemoryRewardToken) -> Self {
        let custody = Arc::new(MemoryCustody::new());
        let token = Arc::new(token);
        let ledger = Ledger::new(config(rate), token.clone(), custody.clone()).unwrap();
        Self { ledger, custody, token }
    }

    /// Credit `amount` native units to each of the first `n` accounts.
    pub fn fund(&self, n: usize, amount: Amount) {
        for i in 0..n {
            self.custody.credit(&acct(i), amount).unwrap();
        }
    }

    /// Native units held outside custody by the first `n` accounts.
    pub fn wallet_total(&self, n: usize) -> Amount {
        (0..n).map(|i| self.custody.balance_of(&acct(i))).sum()
    }
}
