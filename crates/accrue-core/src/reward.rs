//! In-memory reward token.
//!
//! [`MemoryRewardToken`] is a minimal [`RewardIssuer`]: it keeps reward
//! balances and total supply, optionally bounded by a supply cap. Interest
//! settlement is the only source of new tokens.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::error::MintError;
use crate::traits::RewardIssuer;
use crate::types::{AccountId, Amount};

#[derive(Debug, Default)]
struct TokenState {
    balances: HashMap<AccountId, Amount>,
    total_supply: Amount,
}

/// Reward-currency balances with mint-on-demand.
#[derive(Debug, Default)]
pub struct MemoryRewardToken {
    state: Mutex<TokenState>,
    cap: Option<Amount>,
}

impl MemoryRewardToken {
    /// Uncapped token with no supply.
    pub fn new() -> Self {
        Self::default()
    }

    /// Token whose total supply may never exceed `cap`.
    pub fn with_cap(cap: Amount) -> Self {
        Self {
            cap: Some(cap),
            ..Self::default()
        }
    }

    /// Restore balances from exported values. Total supply is their sum.
    pub fn from_balances(
        balances: impl IntoIterator<Item = (AccountId, Amount)>,
        cap: Option<Amount>,
    ) -> Result<Self, MintError> {
        let mut state = TokenState::default();
        for (account, amount) in balances {
            state.total_supply = state
                .total_supply
                .checked_add(amount)
                .ok_or(MintError::SupplyOverflow)?;
            if amount > 0 {
                state.balances.insert(account, amount);
            }
        }
        if let Some(cap) = cap {
            if state.total_supply > cap {
                return Err(MintError::SupplyCapExceeded {
                    cap,
                    requested: state.total_supply,
                });
            }
        }
        Ok(Self {
            state: Mutex::new(state),
            cap,
        })
    }

    pub fn balance_of(&self, account: &AccountId) -> Amount {
        self.state.lock().balances.get(account).copied().unwrap_or(0)
    }

    pub fn total_supply(&self) -> Amount {
        self.state.lock().total_supply
    }

    pub fn cap(&self) -> Option<Amount> {
        self.cap
    }

    /// All non-zero reward balances.
    pub fn balances(&self) -> Vec<(AccountId, Amount)> {
        self.state
            .lock()
            .balances
            .iter()
            .map(|(a, b)| (a.clone(), *b))
            .collect()
    }
}

impl RewardIssuer for MemoryRewardToken {
    fn mint(&self, recipient: &AccountId, amount: Amount) -> Result<(), MintError> {
        if amount == 0 {
            return Ok(());
        }
        let mut state = self.state.lock();
        let supply = state
            .total_supply
            .checked_add(amount)
            .ok_or(MintError::SupplyOverflow)?;
        if let Some(cap) = self.cap {
            if supply > cap {
                return Err(MintError::SupplyCapExceeded { cap, requested: amount });
            }
        }
        let balance = state.balances.get(recipient).copied().unwrap_or(0);
        // Balance never exceeds supply, so this cannot overflow once supply didn't.
        state.balances.insert(recipient.clone(), balance + amount);
        state.total_supply = supply;
        Ok(())
    }
}
