//! Simple-interest accrual arithmetic.
//!
//! Interest is quoted per second for exactly one minimum deposit:
//!
//! ```text
//! per_second_for_min = floor(floor(min_deposit * rate / 100) / SECONDS_PER_YEAR)
//! ```
//!
//! A deposit earns `per_second_for_min * floor(amount / min_deposit)` per
//! second. Every division rounds down, so the ledger never pays more than
//! the nominal rate. The part of a deposit beyond a whole multiple of the
//! minimum earns nothing.
//!
//! All functions use checked arithmetic and report overflow as
//! [`LedgerError::ArithmeticOverflow`] rather than wrapping.

use crate::config::LedgerConfig;
use crate::constants::{PERCENT_PRECISION, SECONDS_PER_YEAR};
use crate::error::LedgerError;
use crate::types::{Amount, TimeUnit};

/// Per-second interest (in reward units) for one minimum deposit.
///
/// # Examples
///
/// ```
/// use accrue_core::interest::interest_per_second_for_min_deposit;
/// // 31_536_000 * 100 units at 100% earn 100 units per second.
/// assert_eq!(interest_per_second_for_min_deposit(3_153_600_000, 100).unwrap(), 100);
/// ```
pub fn interest_per_second_for_min_deposit(
    min_deposit: Amount,
    rate_percent: u32,
) -> Result<Amount, LedgerError> {
    let yearly = min_deposit
        .checked_mul(Amount::from(rate_percent))
        .ok_or(LedgerError::ArithmeticOverflow)?
        / PERCENT_PRECISION;
    Ok(yearly / Amount::from(SECONDS_PER_YEAR))
}

/// Ticks of the time counter between `start` and `now`.
///
/// A counter that runs backwards is an invariant violation, never clamped.
pub fn elapsed_time_units(start: TimeUnit, now: TimeUnit) -> Result<TimeUnit, LedgerError> {
    now.checked_sub(start).ok_or_else(|| {
        LedgerError::InvariantViolation(format!(
            "time counter moved backwards: start {start}, now {now}"
        ))
    })
}

/// Convert counter ticks to seconds.
pub fn elapsed_seconds(units: TimeUnit, seconds_per_unit: u64) -> Result<u64, LedgerError> {
    units
        .checked_mul(seconds_per_unit)
        .ok_or(LedgerError::ArithmeticOverflow)
}

/// Whole multiples of the minimum deposit contained in `amount`.
///
/// Zero scale means the record should never have been active.
pub fn deposit_scale(amount: Amount, min_deposit: Amount) -> Result<Amount, LedgerError> {
    if min_deposit == 0 {
        return Err(LedgerError::InvariantViolation("zero minimum deposit".into()));
    }
    let scale = amount / min_deposit;
    if scale == 0 {
        return Err(LedgerError::InvariantViolation(format!(
            "active deposit {amount} below minimum {min_deposit}"
        )));
    }
    Ok(scale)
}

/// Interest accrued by `amount` over `elapsed_seconds`.
pub fn accrued_interest(
    amount: Amount,
    min_deposit: Amount,
    per_second_for_min: Amount,
    elapsed_seconds: u64,
) -> Result<Amount, LedgerError> {
    let scale = deposit_scale(amount, min_deposit)?;
    let per_second = per_second_for_min
        .checked_mul(scale)
        .ok_or(LedgerError::ArithmeticOverflow)?;
    per_second
        .checked_mul(Amount::from(elapsed_seconds))
        .ok_or(LedgerError::ArithmeticOverflow)
}

/// Interest `amount` would accrue over one full year under `config`.
pub fn yearly_interest(amount: Amount, config: &LedgerConfig) -> Result<Amount, LedgerError> {
    let per_second = config.interest_per_second_for_min_deposit()?;
    accrued_interest(amount, config.min_deposit_amount, per_second, SECONDS_PER_YEAR)
}
