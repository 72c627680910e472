//! Ledger configuration.
//!
//! [`LedgerConfig`] is fixed at initialization. It can be built
//! programmatically or deserialized from a config source; either way it is
//! checked by [`LedgerConfig::validate`] before a ledger accepts it.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_MIN_DEPOSIT, DEFAULT_RATE_PERCENT, DEFAULT_SECONDS_PER_TIME_UNIT, MAX_RATE_PERCENT,
    MIN_RATE_PERCENT,
};
use crate::error::{ConfigError, LedgerError};
use crate::interest;
use crate::types::Amount;

/// Immutable ledger parameters.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct LedgerConfig {
    /// Simple yearly interest, in whole percent (1..=100).
    pub yearly_return_rate_percent: u32,
    /// Smallest deposit accepted, in native base units.
    pub min_deposit_amount: Amount,
    /// Seconds per tick of the ledger time counter.
    pub seconds_per_time_unit: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_RATE_PERCENT)
    }
}

impl LedgerConfig {
    /// Config with the given rate and default minimum deposit / time conversion.
    pub fn new(yearly_return_rate_percent: u32) -> Self {
        Self {
            yearly_return_rate_percent,
            min_deposit_amount: DEFAULT_MIN_DEPOSIT,
            seconds_per_time_unit: DEFAULT_SECONDS_PER_TIME_UNIT,
        }
    }

    /// Check every field against its allowed range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_RATE_PERCENT..=MAX_RATE_PERCENT).contains(&self.yearly_return_rate_percent) {
            return Err(ConfigError::RateOutOfRange {
                rate: self.yearly_return_rate_percent,
            });
        }
        if self.min_deposit_amount == 0 {
            return Err(ConfigError::ZeroMinDeposit);
        }
        if self.seconds_per_time_unit == 0 {
            return Err(ConfigError::ZeroSecondsPerTimeUnit);
        }
        Ok(())
    }

    /// Per-second interest earned by exactly one minimum deposit.
    ///
    /// Validates first, so an out-of-range rate never yields a value.
    pub fn interest_per_second_for_min_deposit(&self) -> Result<Amount, LedgerError> {
        self.validate()?;
        interest::interest_per_second_for_min_deposit(
            self.min_deposit_amount,
            self.yearly_return_rate_percent,
        )
    }
}
