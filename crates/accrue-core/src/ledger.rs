//! The savings ledger state machine.
//!
//! A [`Ledger`] owns the account table and the fixed configuration. Each
//! account cycles `Inactive --deposit--> Active --withdraw--> Inactive`;
//! there is no top-up and no partial withdrawal.
//!
//! Transitions are all-or-nothing. Preconditions are checked before any
//! external effect. In `withdraw` the record reset is staged first, with
//! the previous record kept as undo data, and rolled back if the principal
//! pay-out or the interest mint fails.
//!
//! [`SharedLedger`] wraps a ledger in a mutex for callers that are not
//! already serialized.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::config::LedgerConfig;
use crate::error::LedgerError;
use crate::interest;
use crate::store::{AccountStore, MemoryAccountStore};
use crate::traits::{NativeCustody, RewardIssuer};
use crate::types::{AccountId, Amount, DepositRecord, Settlement, TimeUnit};

/// Custodial savings ledger.
pub struct Ledger<S: AccountStore = MemoryAccountStore> {
    config: LedgerConfig,
    /// Derived once at initialization.
    interest_per_second_for_min_deposit: Amount,
    store: S,
    issuer: Arc<dyn RewardIssuer>,
    custody: Arc<dyn NativeCustody>,
}

impl Ledger<MemoryAccountStore> {
    /// Create a ledger with an empty in-memory account table.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::Configuration`] if `config` fails validation
    pub fn new(
        config: LedgerConfig,
        issuer: Arc<dyn RewardIssuer>,
        custody: Arc<dyn NativeCustody>,
    ) -> Result<Self, LedgerError> {
        Self::with_store(config, MemoryAccountStore::new(), issuer, custody)
    }
}

impl<S: AccountStore> Ledger<S> {
    /// Create a ledger over an existing account table.
    pub fn with_store(
        config: LedgerConfig,
        store: S,
        issuer: Arc<dyn RewardIssuer>,
        custody: Arc<dyn NativeCustody>,
    ) -> Result<Self, LedgerError> {
        let per_second = config.interest_per_second_for_min_deposit()?;
        info!(
            rate = config.yearly_return_rate_percent,
            min_deposit = %config.min_deposit_amount,
            seconds_per_time_unit = config.seconds_per_time_unit,
            per_second = %per_second,
            "ledger initialized"
        );
        Ok(Self {
            config,
            interest_per_second_for_min_deposit: per_second,
            store,
            issuer,
            custody,
        })
    }

    /// Open a deposit of `amount` for `caller` at time `now`.
    ///
    /// Moves `amount` from the caller into custody and activates the record.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InsufficientAmount`] if `amount` is below the minimum
    /// - [`LedgerError::ActiveDepositExists`] if the caller already has a deposit
    /// - [`LedgerError::TransferFailure`] if custody refuses the funds
    pub fn deposit(
        &mut self,
        caller: &AccountId,
        amount: Amount,
        now: TimeUnit,
    ) -> Result<(), LedgerError> {
        let minimum = self.config.min_deposit_amount;
        if amount < minimum {
            debug!(account = %caller, amount = %amount, "deposit rejected: below minimum");
            return Err(LedgerError::InsufficientAmount { amount, minimum });
        }

        let record = self.store.get_or_default(caller)?;
        if record.has_active_deposit {
            debug!(account = %caller, "deposit rejected: already active");
            return Err(LedgerError::ActiveDepositExists(caller.clone()));
        }

        // Additive: an inactive record holds zero, so this equals `amount`.
        let held = record
            .amount
            .checked_add(amount)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        let opened = DepositRecord {
            has_active_deposit: true,
            amount: held,
            start_time_unit: now,
        };

        self.custody.accept(caller, amount)?;

        if let Err(e) = self.store.put(caller, opened) {
            warn!(account = %caller, error = %e, "deposit store failed, returning funds");
            self.custody.pay_out(caller, amount).map_err(|undo| {
                LedgerError::InvariantViolation(format!(
                    "deposit of {amount} by {caller} accepted but not returned: {undo}"
                ))
            })?;
            return Err(e);
        }

        info!(account = %caller, amount = %amount, start = now, "deposit opened");
        Ok(())
    }

    /// Close `caller`'s deposit at time `now`.
    ///
    /// Returns the principal from custody, mints the accrued interest and
    /// resets the record to inactive.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NoActiveDeposit`] if the caller has nothing deposited
    /// - [`LedgerError::InvariantViolation`] if `now` precedes the deposit start
    /// - [`LedgerError::TransferFailure`] if custody cannot pay the principal
    /// - [`LedgerError::MintFailure`] if the reward issuer refuses the mint
    pub fn withdraw(&mut self, caller: &AccountId, now: TimeUnit) -> Result<Settlement, LedgerError> {
        let record = self.active_record(caller)?;
        let settlement = self.settle(caller, &record, now)?;

        // Stage the reset; `record` is the undo data.
        self.store.put(caller, DepositRecord::INACTIVE)?;

        if let Err(e) = self.custody.pay_out(caller, settlement.principal) {
            warn!(account = %caller, error = %e, "principal pay-out failed, restoring deposit");
            self.store.put(caller, record)?;
            return Err(e.into());
        }

        if let Err(e) = self.issuer.mint(caller, settlement.interest) {
            warn!(account = %caller, error = %e, "interest mint failed, reclaiming principal");
            // The record stays reset if the principal cannot be recovered:
            // it has left custody, so an active record would overstate it.
            self.custody.accept(caller, settlement.principal).map_err(|undo| {
                LedgerError::InvariantViolation(format!(
                    "principal of {caller} paid out but not reclaimed after mint failure: {undo}"
                ))
            })?;
            self.store.put(caller, record)?;
            return Err(e.into());
        }

        info!(
            account = %caller,
            principal = %settlement.principal,
            interest = %settlement.interest,
            elapsed_seconds = settlement.elapsed_seconds,
            "deposit withdrawn"
        );
        Ok(settlement)
    }

    /// What [`withdraw`](Self::withdraw) would settle at `now`, without
    /// changing anything.
    pub fn quote(&self, caller: &AccountId, now: TimeUnit) -> Result<Settlement, LedgerError> {
        let record = self.active_record(caller)?;
        self.settle(caller, &record, now)
    }

    fn active_record(&self, caller: &AccountId) -> Result<DepositRecord, LedgerError> {
        let record = self.store.get_or_default(caller)?;
        if !record.has_active_deposit {
            debug!(account = %caller, "no active deposit");
            return Err(LedgerError::NoActiveDeposit(caller.clone()));
        }
        Ok(record)
    }

    fn settle(
        &self,
        caller: &AccountId,
        record: &DepositRecord,
        now: TimeUnit,
    ) -> Result<Settlement, LedgerError> {
        let elapsed_time_units = interest::elapsed_time_units(record.start_time_unit, now)?;
        let elapsed_seconds =
            interest::elapsed_seconds(elapsed_time_units, self.config.seconds_per_time_unit)?;
        let interest = interest::accrued_interest(
            record.amount,
            self.config.min_deposit_amount,
            self.interest_per_second_for_min_deposit,
            elapsed_seconds,
        )?;
        Ok(Settlement {
            account: caller.clone(),
            principal: record.amount,
            interest,
            elapsed_time_units,
            elapsed_seconds,
        })
    }

    /// Yearly return rate in whole percent.
    pub fn yearly_return_rate(&self) -> u32 {
        self.config.yearly_return_rate_percent
    }

    /// Per-second interest for exactly one minimum deposit.
    pub fn interest_per_second_for_min_deposit(&self) -> Amount {
        self.interest_per_second_for_min_deposit
    }

    /// Deposit record of `account` (zeroed if never seen).
    pub fn investor(&self, account: &AccountId) -> Result<DepositRecord, LedgerError> {
        self.store.get_or_default(account)
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Sum of active principal.
    pub fn total_principal(&self) -> Result<Amount, LedgerError> {
        self.store.total_principal()
    }

    /// Check every record is well-formed and custody equals total principal.
    ///
    /// Assumes the custody handle holds funds for this ledger only.
    pub fn audit(&self) -> Result<(), LedgerError> {
        for (account, record) in self.store.records()? {
            if !record.is_well_formed(self.config.min_deposit_amount) {
                return Err(LedgerError::InvariantViolation(format!(
                    "malformed record for {account}: {record:?}"
                )));
            }
        }
        let principal = self.total_principal()?;
        let held = self.custody.custody_balance();
        if principal != held {
            return Err(LedgerError::InvariantViolation(format!(
                "custody {held} differs from active principal {principal}"
            )));
        }
        Ok(())
    }
}

/// A [`Ledger`] behind a mutex, cloneable across threads.
///
/// Every call holds the lock for the whole transition, so deposits and
/// withdrawals never interleave.
pub struct SharedLedger<S: AccountStore = MemoryAccountStore> {
    inner: Arc<Mutex<Ledger<S>>>,
}

impl<S: AccountStore> Clone for SharedLedger<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: AccountStore> SharedLedger<S> {
    pub fn new(ledger: Ledger<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ledger)),
        }
    }

    pub fn deposit(
        &self,
        caller: &AccountId,
        amount: Amount,
        now: TimeUnit,
    ) -> Result<(), LedgerError> {
        self.inner.lock().deposit(caller, amount, now)
    }

    pub fn withdraw(&self, caller: &AccountId, now: TimeUnit) -> Result<Settlement, LedgerError> {
        self.inner.lock().withdraw(caller, now)
    }

    pub fn quote(&self, caller: &AccountId, now: TimeUnit) -> Result<Settlement, LedgerError> {
        self.inner.lock().quote(caller, now)
    }

    pub fn investor(&self, account: &AccountId) -> Result<DepositRecord, LedgerError> {
        self.inner.lock().investor(account)
    }

    pub fn total_principal(&self) -> Result<Amount, LedgerError> {
        self.inner.lock().total_principal()
    }

    /// Run `f` against the ledger under a single lock acquisition.
    pub fn with_ledger<R>(&self, f: impl FnOnce(&Ledger<S>) -> R) -> R {
        f(&self.inner.lock())
    }
}
