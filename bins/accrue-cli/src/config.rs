//! CLI configuration for accrue.
//!
//! Settings are layered with the `config` crate: built-in defaults, then an
//! optional TOML file, then `ACCRUE_*` environment variables. Command-line
//! flags are applied last through [`Overrides`].

use std::path::{Path, PathBuf};

use accrue_core::LedgerConfig;
use accrue_core::types::Amount;
use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

/// Name of the JSON state file inside the data directory.
pub const STATE_FILE: &str = "state.json";

/// Settings as read from the file and environment layers.
///
/// `min_deposit` is read as text so values beyond `i64` survive the
/// environment layer.
#[derive(Debug, Deserialize)]
struct Layered {
    data_dir: Option<PathBuf>,
    log_level: String,
    log_format: String,
    rate: Option<u32>,
    min_deposit: Option<String>,
    seconds_per_unit: Option<u64>,
}

/// Values given explicitly on the command line.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub data_dir: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_format: Option<String>,
    pub rate: Option<u32>,
    pub min_deposit: Option<Amount>,
    pub seconds_per_unit: Option<u64>,
}

/// Fully resolved CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Directory holding the state file.
    pub data_dir: PathBuf,
    /// Log level filter string (e.g. "info", "accrue_core=debug").
    pub log_level: String,
    /// "text" or "json".
    pub log_format: String,
    /// Parameters used when `init` creates a new ledger.
    pub ledger: LedgerConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            ledger: LedgerConfig::default(),
        }
    }
}

impl CliConfig {
    /// Resolve configuration from every layer.
    ///
    /// A `file` that is given must exist.
    pub fn load(file: Option<&Path>, overrides: Overrides) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("log_level", "info")?
            .set_default("log_format", "text")?;
        if let Some(path) = file {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }
        let layered: Layered = builder
            .add_source(Environment::with_prefix("ACCRUE"))
            .build()
            .context("Failed to load configuration")?
            .try_deserialize()
            .context("Failed to parse configuration")?;
        Self::resolve(layered, overrides)
    }

    fn resolve(layered: Layered, overrides: Overrides) -> Result<Self> {
        let mut ledger = LedgerConfig::default();
        if let Some(rate) = overrides.rate.or(layered.rate) {
            ledger.yearly_return_rate_percent = rate;
        }
        if let Some(min) = overrides.min_deposit {
            ledger.min_deposit_amount = min;
        } else if let Some(raw) = layered.min_deposit {
            ledger.min_deposit_amount = raw
                .trim()
                .parse()
                .with_context(|| format!("Invalid min_deposit: {raw}"))?;
        }
        if let Some(spu) = overrides.seconds_per_unit.or(layered.seconds_per_unit) {
            ledger.seconds_per_time_unit = spu;
        }

        Ok(Self {
            data_dir: overrides
                .data_dir
                .or(layered.data_dir)
                .unwrap_or_else(default_data_dir),
            log_level: overrides.log_level.unwrap_or(layered.log_level),
            log_format: overrides.log_format.unwrap_or(layered.log_format),
            ledger,
        })
    }

    /// Path to the JSON state file.
    pub fn state_path(&self) -> PathBuf {
        self.data_dir.join(STATE_FILE)
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("accrue")
}

#[cfg(test)]
mod tests {
    use super::*;
    use accrue_core::constants::{DEFAULT_MIN_DEPOSIT, DEFAULT_RATE_PERCENT};

    fn write_toml(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("accrue.toml");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn default_data_dir_ends_with_accrue() {
        let cfg = CliConfig::default();
        assert!(cfg.data_dir.ends_with("accrue"));
        assert_eq!(cfg.state_path().file_name().unwrap(), STATE_FILE);
    }

    #[test]
    fn defaults_without_file() {
        let cfg = CliConfig::load(None, Overrides::default()).unwrap();
        assert_eq!(cfg.ledger.yearly_return_rate_percent, DEFAULT_RATE_PERCENT);
        assert_eq!(cfg.ledger.min_deposit_amount, DEFAULT_MIN_DEPOSIT);
    }

    #[test]
    fn toml_file_sets_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_toml(
            dir.path(),
            "log_level = \"debug\"\nrate = 7\nmin_deposit = \"500\"\nseconds_per_unit = 3\n",
        );
        let cfg = CliConfig::load(Some(&path), Overrides::default()).unwrap();
        assert_eq!(cfg.log_level, "debug");
        assert_eq!(cfg.ledger.yearly_return_rate_percent, 7);
        assert_eq!(cfg.ledger.min_deposit_amount, 500);
        assert_eq!(cfg.ledger.seconds_per_time_unit, 3);
    }

    #[test]
    fn flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_toml(dir.path(), "rate = 7\nlog_format = \"json\"\n");
        let overrides = Overrides {
            rate: Some(20),
            data_dir: Some(dir.path().to_path_buf()),
            ..Overrides::default()
        };
        let cfg = CliConfig::load(Some(&path), overrides).unwrap();
        assert_eq!(cfg.ledger.yearly_return_rate_percent, 20);
        assert_eq!(cfg.log_format, "json");
        assert_eq!(cfg.data_dir, dir.path());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(CliConfig::load(Some(&missing), Overrides::default()).is_err());
    }

    #[test]
    fn bad_min_deposit_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_toml(dir.path(), "min_deposit = \"lots\"\n");
        let err = CliConfig::load(Some(&path), Overrides::default()).unwrap_err();
        assert!(err.to_string().contains("min_deposit"));
    }
}
