//! Capability interfaces the ledger consumes.
//!
//! - [`RewardIssuer`]: mints reward-currency interest (the reward token implements)
//! - [`NativeCustody`]: moves native currency in and out of ledger custody
//!   (the execution environment implements)
//!
//! Both take `&self` and are shared as `Arc<dyn ...>` handles; implementations
//! use interior mutability. Each call must be atomic on its own: it either
//! fully applies or returns an error having changed nothing.

use crate::error::{MintError, TransferError};
use crate::types::{AccountId, Amount};

/// Minting capability of the reward currency.
///
/// The ledger only ever calls [`mint`](Self::mint); it never reads supply or
/// balances through this interface.
pub trait RewardIssuer: Send + Sync {
    /// Create `amount` new reward units owned by `recipient`.
    ///
    /// A zero amount must succeed without side effects.
    fn mint(&self, recipient: &AccountId, amount: Amount) -> Result<(), MintError>;
}

/// Native-currency custody held on behalf of the ledger.
pub trait NativeCustody: Send + Sync {
    /// Move `amount` from `from`'s spendable balance into custody.
    fn accept(&self, from: &AccountId, amount: Amount) -> Result<(), TransferError>;

    /// Move `amount` out of custody to `to`.
    fn pay_out(&self, to: &AccountId, amount: Amount) -> Result<(), TransferError>;

    /// Native currency currently held in custody.
    fn custody_balance(&self) -> Amount;
}
