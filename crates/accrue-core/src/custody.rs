//! In-memory native-currency environment.
//!
//! [`MemoryCustody`] tracks spendable balances per account plus the pool
//! held in ledger custody, and implements [`NativeCustody`] over them.
//! Accounts are funded with [`credit`](MemoryCustody::credit).

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::error::TransferError;
use crate::traits::NativeCustody;
use crate::types::{AccountId, Amount};

#[derive(Debug, Default)]
struct CustodyState {
    balances: HashMap<AccountId, Amount>,
    held: Amount,
    frozen: bool,
}

/// Native-currency balances and the ledger custody pool.
#[derive(Debug, Default)]
pub struct MemoryCustody {
    state: Mutex<CustodyState>,
}

impl MemoryCustody {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore balances and the custody pool from exported values.
    pub fn from_parts(balances: impl IntoIterator<Item = (AccountId, Amount)>, held: Amount) -> Self {
        Self {
            state: Mutex::new(CustodyState {
                balances: balances.into_iter().filter(|(_, b)| *b > 0).collect(),
                held,
                frozen: false,
            }),
        }
    }

    /// Add `amount` to `account`'s spendable balance.
    pub fn credit(&self, account: &AccountId, amount: Amount) -> Result<(), TransferError> {
        let mut state = self.state.lock();
        let balance = state.balances.entry(account.clone()).or_default();
        *balance = balance
            .checked_add(amount)
            .ok_or(TransferError::BalanceOverflow)?;
        Ok(())
    }

    /// Spendable (not in custody) balance of `account`.
    pub fn balance_of(&self, account: &AccountId) -> Amount {
        self.state.lock().balances.get(account).copied().unwrap_or(0)
    }

    /// All non-zero spendable balances.
    pub fn balances(&self) -> Vec<(AccountId, Amount)> {
        self.state
            .lock()
            .balances
            .iter()
            .filter(|(_, b)| **b > 0)
            .map(|(a, b)| (a.clone(), *b))
            .collect()
    }

    /// Refuse every pay-out while frozen. Deposits are still accepted.
    pub fn set_frozen(&self, frozen: bool) {
        self.state.lock().frozen = frozen;
    }
}

impl NativeCustody for MemoryCustody {
    fn accept(&self, from: &AccountId, amount: Amount) -> Result<(), TransferError> {
        let mut state = self.state.lock();
        let have = state.balances.get(from).copied().unwrap_or(0);
        if have < amount {
            return Err(TransferError::InsufficientBalance {
                account: from.clone(),
                have,
                need: amount,
            });
        }
        let held = state
            .held
            .checked_add(amount)
            .ok_or(TransferError::BalanceOverflow)?;
        state.balances.insert(from.clone(), have - amount);
        state.held = held;
        Ok(())
    }

    fn pay_out(&self, to: &AccountId, amount: Amount) -> Result<(), TransferError> {
        let mut state = self.state.lock();
        if state.frozen {
            return Err(TransferError::Frozen);
        }
        if state.held < amount {
            return Err(TransferError::CustodyShortfall {
                have: state.held,
                need: amount,
            });
        }
        let have = state.balances.get(to).copied().unwrap_or(0);
        let credited = have
            .checked_add(amount)
            .ok_or(TransferError::BalanceOverflow)?;
        state.held -= amount;
        state.balances.insert(to.clone(), credited);
        Ok(())
    }

    fn custody_balance(&self) -> Amount {
        self.state.lock().held
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> AccountId {
        AccountId::from("alice")
    }

    #[test]
    fn credit_increases_balance() {
        let c = MemoryCustody::new();
        c.credit(&alice(), 10).unwrap();
        c.credit(&alice(), 5).unwrap();
        assert_eq!(c.balance_of(&alice()), 15);
    }

    #[test]
    fn credit_overflow_rejected() {
        let c = MemoryCustody::new();
        c.credit(&alice(), Amount::MAX).unwrap();
        assert_eq!(c.credit(&alice(), 1).unwrap_err(), TransferError::BalanceOverflow);
        assert_eq!(c.balance_of(&alice()), Amount::MAX);
    }

    #[test]
    fn accept_moves_into_custody() {
        let c = MemoryCustody::new();
        c.credit(&alice(), 100).unwrap();
        c.accept(&alice(), 40).unwrap();
        assert_eq!(c.balance_of(&alice()), 60);
        assert_eq!(c.custody_balance(), 40);
    }

    #[test]
    fn accept_overdraft_changes_nothing() {
        let c = MemoryCustody::new();
        c.credit(&alice(), 10).unwrap();
        let err = c.accept(&alice(), 11).unwrap_err();
        assert_eq!(
            err,
            TransferError::InsufficientBalance { account: alice(), have: 10, need: 11 }
        );
        assert_eq!(c.balance_of(&alice()), 10);
        assert_eq!(c.custody_balance(), 0);
    }

    #[test]
    fn pay_out_returns_to_account() {
        let c = MemoryCustody::new();
        c.credit(&alice(), 100).unwrap();
        c.accept(&alice(), 100).unwrap();
        c.pay_out(&alice(), 100).unwrap();
        assert_eq!(c.balance_of(&alice()), 100);
        assert_eq!(c.custody_balance(), 0);
    }

    #[test]
    fn pay_out_shortfall() {
        let c = MemoryCustody::new();
        let err = c.pay_out(&alice(), 1).unwrap_err();
        assert_eq!(err, TransferError::CustodyShortfall { have: 0, need: 1 });
    }

    #[test]
    fn frozen_refuses_pay_out_only() {
        let c = MemoryCustody::new();
        c.credit(&alice(), 100).unwrap();
        c.set_frozen(true);
        c.accept(&alice(), 50).unwrap();
        assert_eq!(c.pay_out(&alice(), 50).unwrap_err(), TransferError::Frozen);
        assert_eq!(c.custody_balance(), 50);
        c.set_frozen(false);
        c.pay_out(&alice(), 50).unwrap();
        assert_eq!(c.custody_balance(), 0);
    }

    #[test]
    fn from_parts_restores_state() {
        let c = MemoryCustody::from_parts(vec![(alice(), 7), (AccountId::from("bob"), 0)], 30);
        assert_eq!(c.balance_of(&alice()), 7);
        assert_eq!(c.custody_balance(), 30);
        assert_eq!(c.balances().len(), 1);
    }
}
