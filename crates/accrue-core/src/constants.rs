//! Ledger constants. All native-currency values in base units (1 coin = 10^18 units).

use crate::types::Amount;

/// Base units per whole native coin.
pub const NATIVE_UNIT: Amount = 1_000_000_000_000_000_000;

/// Seconds in a 365-day year. Leap days are not counted.
///
/// # Examples
///
/// ```
/// use accrue_core::constants::SECONDS_PER_YEAR;
/// assert_eq!(SECONDS_PER_YEAR, 365 * 24 * 60 * 60);
/// ```
pub const SECONDS_PER_YEAR: u64 = 31_536_000;

/// Smallest deposit that opens an account: one whole native coin.
pub const DEFAULT_MIN_DEPOSIT: Amount = NATIVE_UNIT;

/// Seconds represented by one tick of the ledger time counter.
///
/// The counter is expected to be a block height; 12 seconds matches a
/// fixed-slot chain.
pub const DEFAULT_SECONDS_PER_TIME_UNIT: u64 = 12;

/// Default yearly return rate used by the CLI when none is configured.
pub const DEFAULT_RATE_PERCENT: u32 = 10;

pub const MIN_RATE_PERCENT: u32 = 1;
pub const MAX_RATE_PERCENT: u32 = 100;

/// Divisor turning a whole-percent rate into a fraction.
pub const PERCENT_PRECISION: Amount = 100;

/// Time units that make up one year at the default conversion factor.
///
/// # Examples
///
/// ```
/// use accrue_core::constants::{
///     DEFAULT_SECONDS_PER_TIME_UNIT, SECONDS_PER_YEAR, TIME_UNITS_PER_YEAR,
/// };
/// assert_eq!(TIME_UNITS_PER_YEAR * DEFAULT_SECONDS_PER_TIME_UNIT, SECONDS_PER_YEAR);
/// ```
pub const TIME_UNITS_PER_YEAR: u64 = SECONDS_PER_YEAR / DEFAULT_SECONDS_PER_TIME_UNIT;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seconds_per_year_value() {
        assert_eq!(SECONDS_PER_YEAR, 31_536_000);
    }

    #[test]
    fn default_min_deposit_is_one_coin() {
        assert_eq!(DEFAULT_MIN_DEPOSIT, NATIVE_UNIT);
    }

    #[test]
    fn default_conversion_divides_year_evenly() {
        assert_eq!(SECONDS_PER_YEAR % DEFAULT_SECONDS_PER_TIME_UNIT, 0);
    }

    #[test]
    fn default_rate_in_range() {
        assert!((MIN_RATE_PERCENT..=MAX_RATE_PERCENT).contains(&DEFAULT_RATE_PERCENT));
    }
}
