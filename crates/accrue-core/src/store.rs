//! Account table storage interface and in-memory implementation.
//!
//! Provides the [`AccountStore`] trait mapping account identities to
//! [`DepositRecord`]s. Lookups are get-or-default: an account never seen
//! before resolves to [`DepositRecord::INACTIVE`] rather than an error.
//! [`MemoryAccountStore`] keeps everything in a `HashMap`.

use std::collections::HashMap;

use crate::error::LedgerError;
use crate::types::{AccountId, Amount, DepositRecord};

/// Mutable account table owned by a ledger.
///
/// Not thread-safe on its own; the ledger serializes access (see
/// [`SharedLedger`](crate::ledger::SharedLedger)).
pub trait AccountStore: Send + Sync {
    /// Record for `account`, or the zeroed inactive record if unknown.
    fn get_or_default(&self, account: &AccountId) -> Result<DepositRecord, LedgerError>;

    /// Overwrite the record for `account`.
    fn put(&mut self, account: &AccountId, record: DepositRecord) -> Result<(), LedgerError>;

    /// All stored records, in no particular order.
    fn records(&self) -> Result<Vec<(AccountId, DepositRecord)>, LedgerError>;

    /// Records with an active deposit.
    ///
    /// Default implementation filters [`records`](Self::records).
    fn active_records(&self) -> Result<Vec<(AccountId, DepositRecord)>, LedgerError> {
        Ok(self
            .records()?
            .into_iter()
            .filter(|(_, rec)| rec.has_active_deposit)
            .collect())
    }

    /// Sum of active principal across all accounts.
    fn total_principal(&self) -> Result<Amount, LedgerError> {
        self.active_records()?
            .iter()
            .try_fold(0 as Amount, |acc, (_, rec)| acc.checked_add(rec.amount))
            .ok_or(LedgerError::ArithmeticOverflow)
    }
}

/// In-memory account table.
///
/// Only active deposits are kept as entries: storing the zeroed record
/// removes the key, and lookups of missing keys yield the default.
#[derive(Debug, Default, Clone)]
pub struct MemoryAccountStore {
    records: HashMap<AccountId, DepositRecord>,
}

impl MemoryAccountStore {
    /// Create an empty account table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a table from previously exported records.
    pub fn from_records(records: impl IntoIterator<Item = (AccountId, DepositRecord)>) -> Self {
        let mut store = Self::new();
        for (account, record) in records {
            store.insert(account, record);
        }
        store
    }

    /// Number of entries held (active deposits).
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn insert(&mut self, account: AccountId, record: DepositRecord) {
        if record == DepositRecord::INACTIVE {
            self.records.remove(&account);
        } else {
            self.records.insert(account, record);
        }
    }
}

impl AccountStore for MemoryAccountStore {
    fn get_or_default(&self, account: &AccountId) -> Result<DepositRecord, LedgerError> {
        Ok(self.records.get(account).copied().unwrap_or_default())
    }

    fn put(&mut self, account: &AccountId, record: DepositRecord) -> Result<(), LedgerError> {
        self.insert(account.clone(), record);
        Ok(())
    }

    fn records(&self) -> Result<Vec<(AccountId, DepositRecord)>, LedgerError> {
        Ok(self
            .records
            .iter()
            .map(|(account, rec)| (account.clone(), *rec))
            .collect())
    }
}
