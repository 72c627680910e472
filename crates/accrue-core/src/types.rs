//! Core ledger types: account identities, deposit records, settlements.
//!
//! Native and reward currency amounts share the [`Amount`] representation
//! (base units, `u128`). Time is the ledger's monotonic counter, not seconds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Amount in base units of either the native or the reward currency.
pub type Amount = u128;

/// One tick of the ledger time counter (e.g. a block height).
pub type TimeUnit = u64;

/// Unique external identifier of a depositor.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Build an account id, rejecting empty or whitespace-only input.
    ///
    /// # Examples
    ///
    /// ```
    /// use accrue_core::types::AccountId;
    /// assert!(AccountId::parse("alice").is_some());
    /// assert!(AccountId::parse("  ").is_none());
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl From<String> for AccountId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl AsRef<str> for AccountId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Per-account deposit state.
///
/// `Default` is the zeroed inactive record every unseen account resolves to.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct DepositRecord {
    /// Whether a deposit is currently held for this account.
    pub has_active_deposit: bool,
    /// Native-currency principal held in custody.
    pub amount: Amount,
    /// Time counter value when the deposit was opened.
    pub start_time_unit: TimeUnit,
}

impl DepositRecord {
    /// The zeroed inactive record.
    pub const INACTIVE: Self = Self {
        has_active_deposit: false,
        amount: 0,
        start_time_unit: 0,
    };

    /// Whether this record satisfies the per-record ledger invariants.
    ///
    /// Inactive records must be fully zeroed; active records must hold at
    /// least one minimum deposit.
    pub fn is_well_formed(&self, min_deposit: Amount) -> bool {
        if self.has_active_deposit {
            self.amount >= min_deposit
        } else {
            self.amount == 0 && self.start_time_unit == 0
        }
    }
}

/// Outcome of settling (or quoting) a withdrawal.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Settlement {
    /// Account the settlement pays.
    pub account: AccountId,
    /// Native-currency principal returned from custody.
    pub principal: Amount,
    /// Reward-currency interest minted.
    pub interest: Amount,
    /// Ticks of the time counter since the deposit opened.
    pub elapsed_time_units: TimeUnit,
    /// `elapsed_time_units` converted to seconds.
    pub elapsed_seconds: u64,
}
