//! Persistent simulation state.
//!
//! The CLI keeps the whole environment in one JSON file: the ledger config
//! and account table, the time counter, native balances and custody pool,
//! and reward balances. Each command loads it into a live [`Environment`],
//! runs one operation and writes it back.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use accrue_core::custody::MemoryCustody;
use accrue_core::reward::MemoryRewardToken;
use accrue_core::store::{AccountStore, MemoryAccountStore};
use accrue_core::traits::NativeCustody;
use accrue_core::types::{AccountId, Amount, DepositRecord, TimeUnit};
use accrue_core::{Ledger, LedgerConfig};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

/// Format version written into every state file.
pub const STATE_VERSION: u32 = 1;

/// On-disk snapshot of a simulated ledger environment.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StateFile {
    pub version: u32,
    pub config: LedgerConfig,
    /// Current value of the ledger time counter.
    pub now: TimeUnit,
    pub records: BTreeMap<AccountId, DepositRecord>,
    pub native_balances: BTreeMap<AccountId, Amount>,
    pub custody_pool: Amount,
    pub reward_balances: BTreeMap<AccountId, Amount>,
    pub reward_supply: Amount,
}

/// A live ledger with handles to its simulated custody and reward token.
pub struct Environment {
    pub now: TimeUnit,
    pub ledger: Ledger,
    pub custody: Arc<MemoryCustody>,
    pub token: Arc<MemoryRewardToken>,
}

impl StateFile {
    /// Empty environment at time zero.
    pub fn fresh(config: LedgerConfig) -> Self {
        Self {
            version: STATE_VERSION,
            config,
            now: 0,
            records: BTreeMap::new(),
            native_balances: BTreeMap::new(),
            custody_pool: 0,
            reward_balances: BTreeMap::new(),
            reward_supply: 0,
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)
            .with_context(|| format!("Failed to read state file: {}", path.display()))?;
        let state: Self = serde_json::from_slice(&data)
            .with_context(|| format!("Corrupted state file: {}", path.display()))?;
        if state.version != STATE_VERSION {
            bail!("Unsupported state file version: {}", state.version);
        }
        Ok(state)
    }

    /// Write atomically: a sibling temp file is renamed over `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_vec_pretty(self).context("Failed to serialize state")?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)
            .with_context(|| format!("Failed to write state file: {}", tmp.display()))?;
        std::fs::rename(&tmp, path)
            .with_context(|| format!("Failed to replace state file: {}", path.display()))?;
        Ok(())
    }

    /// Rebuild the live environment and check it is self-consistent.
    pub fn into_environment(self) -> Result<Environment> {
        let token = MemoryRewardToken::from_balances(self.reward_balances, None)
            .context("Invalid reward balances")?;
        if token.total_supply() != self.reward_supply {
            bail!(
                "Reward supply {} does not match balances totalling {}",
                self.reward_supply,
                token.total_supply()
            );
        }
        let token = Arc::new(token);
        let custody = Arc::new(MemoryCustody::from_parts(self.native_balances, self.custody_pool));
        let store = MemoryAccountStore::from_records(self.records);

        let ledger = Ledger::with_store(self.config, store, token.clone(), custody.clone())
            .context("Invalid ledger configuration")?;
        ledger.audit().context("State file failed the ledger audit")?;

        Ok(Environment {
            now: self.now,
            ledger,
            custody,
            token,
        })
    }

    /// Snapshot a live environment.
    pub fn from_environment(env: &Environment) -> Result<Self> {
        Ok(Self {
            version: STATE_VERSION,
            config: *env.ledger.config(),
            now: env.now,
            records: env.ledger.store().records()?.into_iter().collect(),
            native_balances: env.custody.balances().into_iter().collect(),
            custody_pool: env.custody.custody_balance(),
            reward_balances: env.token.balances().into_iter().collect(),
            reward_supply: env.token.total_supply(),
        })
    }
}
