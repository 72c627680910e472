//! accrue-cli: command-line driver for a simulated accrue savings ledger.
//!
//! Keeps the ledger, native balances and reward token in a JSON state file
//! and runs one ledger operation per invocation against it. The time
//! counter only moves through `advance`.

mod config;
mod state;

use std::path::PathBuf;

use accrue_core::LedgerConfig;
use accrue_core::interest;
use accrue_core::traits::NativeCustody;
use accrue_core::types::{AccountId, Amount, DepositRecord, Settlement, TimeUnit};
use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::{CliConfig, Overrides};
use crate::state::{Environment, StateFile};

/// Simulated custodial savings ledger with simple interest.
#[derive(Parser, Debug)]
#[command(name = "accrue-cli", version, about = "Deposit, accrue, withdraw.")]
struct Cli {
    /// Data directory holding the state file
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log output format ("text" or "json")
    #[arg(long, global = true)]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a fresh state file.
    Init(InitArgs),
    /// Credit native balance to an account.
    Fund(FundArgs),
    /// Move the time counter forward.
    Advance(AdvanceArgs),
    /// Open a deposit.
    Deposit(DepositArgs),
    /// Close a deposit and collect interest.
    Withdraw(AccountArgs),
    /// Show what a withdrawal would settle now.
    Quote(AccountArgs),
    /// Print the ledger summary, or one account.
    Show(ShowArgs),
}

#[derive(Args, Debug)]
struct InitArgs {
    /// Yearly return rate in whole percent (1-100)
    #[arg(long)]
    rate: Option<u32>,

    /// Minimum deposit in native base units
    #[arg(long)]
    min_deposit: Option<Amount>,

    /// Seconds per tick of the time counter
    #[arg(long)]
    seconds_per_unit: Option<u64>,

    /// Overwrite an existing state file
    #[arg(long)]
    force: bool,
}

#[derive(Args, Debug)]
struct FundArgs {
    #[arg(long)]
    account: String,

    /// Native base units to credit
    #[arg(long)]
    amount: Amount,
}

#[derive(Args, Debug)]
struct AdvanceArgs {
    /// Ticks to add to the time counter
    #[arg(long)]
    units: TimeUnit,
}

#[derive(Args, Debug)]
struct DepositArgs {
    #[arg(long)]
    account: String,

    /// Native base units to deposit
    #[arg(long)]
    amount: Amount,
}

#[derive(Args, Debug)]
struct AccountArgs {
    #[arg(long)]
    account: String,
}

#[derive(Args, Debug)]
struct ShowArgs {
    #[arg(long)]
    account: Option<String>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        let mut overrides = Overrides {
            data_dir: self.data_dir.clone(),
            log_level: self.log_level.clone(),
            log_format: self.log_format.clone(),
            ..Overrides::default()
        };
        if let Commands::Init(args) = &self.command {
            overrides.rate = args.rate;
            overrides.min_deposit = args.min_deposit;
            overrides.seconds_per_unit = args.seconds_per_unit;
        }
        overrides
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = CliConfig::load(cli.config.as_deref(), cli.overrides())?;

    init_logging(&config.log_level, &config.log_format);
    debug!(data_dir = %config.data_dir.display(), "configuration loaded");

    match cli.command {
        Commands::Init(args) => cmd_init(&config, args.force),
        Commands::Fund(args) => cmd_fund(&config, args),
        Commands::Advance(args) => cmd_advance(&config, args),
        Commands::Deposit(args) => cmd_deposit(&config, args),
        Commands::Withdraw(args) => cmd_withdraw(&config, args),
        Commands::Quote(args) => cmd_quote(&config, args),
        Commands::Show(args) => cmd_show(&config, args),
    }
}

/// Initialize tracing subscriber with the given log level and output format.
///
/// Pass `format = "json"` for structured JSON output. Any other value
/// defaults to human-readable text. Logs go to stderr so command output on
/// stdout stays machine-readable.
fn init_logging(level_str: &str, format: &str) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_str));

    if format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_init(config: &CliConfig, force: bool) -> Result<()> {
    let path = config.state_path();
    if path.exists() && !force {
        bail!("State file already exists: {} (use --force)", path.display());
    }
    let state = StateFile::fresh(config.ledger);
    let env = state.clone().into_environment()?;

    std::fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("Failed to create directory: {}", config.data_dir.display()))?;
    state.save(&path)?;

    info!(path = %path.display(), "state file created");
    print_json(&summary(&env)?)
}

fn cmd_fund(config: &CliConfig, args: FundArgs) -> Result<()> {
    let account = parse_account(&args.account)?;
    with_environment(config, |env| {
        env.custody
            .credit(&account, args.amount)
            .with_context(|| format!("Failed to fund {account}"))?;
        info!(account = %account, amount = %args.amount, "account funded");
        account_view(env, &account)
    })
}

fn cmd_advance(config: &CliConfig, args: AdvanceArgs) -> Result<()> {
    with_environment(config, |env| {
        env.now = env
            .now
            .checked_add(args.units)
            .ok_or_else(|| anyhow!("Time counter overflow"))?;
        info!(now = env.now, "time advanced");
        summary(env)
    })
}

fn cmd_deposit(config: &CliConfig, args: DepositArgs) -> Result<()> {
    let account = parse_account(&args.account)?;
    with_environment(config, |env| {
        env.ledger
            .deposit(&account, args.amount, env.now)
            .with_context(|| format!("Deposit by {account} failed"))?;
        account_view(env, &account)
    })
}

fn cmd_withdraw(config: &CliConfig, args: AccountArgs) -> Result<()> {
    let account = parse_account(&args.account)?;
    with_environment(config, |env| {
        let settlement = env
            .ledger
            .withdraw(&account, env.now)
            .with_context(|| format!("Withdrawal by {account} failed"))?;
        Ok(settlement)
    })
}

fn cmd_quote(config: &CliConfig, args: AccountArgs) -> Result<()> {
    let account = parse_account(&args.account)?;
    let env = load_environment(config)?;
    let settlement: Settlement = env
        .ledger
        .quote(&account, env.now)
        .with_context(|| format!("Quote for {account} failed"))?;
    print_json(&settlement)
}

fn cmd_show(config: &CliConfig, args: ShowArgs) -> Result<()> {
    let env = load_environment(config)?;
    match args.account {
        Some(raw) => print_json(&account_view(&env, &parse_account(&raw)?)?),
        None => print_json(&summary(&env)?),
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Whole-ledger summary printed by `show`, `init` and `advance`.
#[derive(Serialize, Debug)]
struct Summary {
    config: LedgerConfig,
    now: TimeUnit,
    interest_per_second_for_min_deposit: Amount,
    yearly_interest_per_min_deposit: Amount,
    active_deposits: usize,
    total_principal: Amount,
    custody_pool: Amount,
    reward_supply: Amount,
}

/// One account's balances and deposit, printed by `show --account`.
#[derive(Serialize, Debug)]
struct AccountView {
    account: AccountId,
    native_balance: Amount,
    reward_balance: Amount,
    deposit: DepositRecord,
    /// Interest a withdrawal would mint now, if a deposit is open.
    accrued_interest: Option<Amount>,
}

fn summary(env: &Environment) -> Result<Summary> {
    let config = *env.ledger.config();
    Ok(Summary {
        config,
        now: env.now,
        interest_per_second_for_min_deposit: env.ledger.interest_per_second_for_min_deposit(),
        yearly_interest_per_min_deposit: interest::yearly_interest(config.min_deposit_amount, &config)?,
        active_deposits: env.ledger.store().len(),
        total_principal: env.ledger.total_principal()?,
        custody_pool: env.custody.custody_balance(),
        reward_supply: env.token.total_supply(),
    })
}

fn account_view(env: &Environment, account: &AccountId) -> Result<AccountView> {
    let deposit = env.ledger.investor(account)?;
    let accrued_interest = if deposit.has_active_deposit {
        Some(env.ledger.quote(account, env.now)?.interest)
    } else {
        None
    };
    Ok(AccountView {
        account: account.clone(),
        native_balance: env.custody.balance_of(account),
        reward_balance: env.token.balance_of(account),
        deposit,
        accrued_interest,
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_account(raw: &str) -> Result<AccountId> {
    AccountId::parse(raw).ok_or_else(|| anyhow!("Account id must not be empty"))
}

fn load_environment(config: &CliConfig) -> Result<Environment> {
    let path = config.state_path();
    if !path.exists() {
        bail!("No state file at {} (run `accrue-cli init` first)", path.display());
    }
    StateFile::load(&path)?.into_environment()
}

/// Load the environment, run `op`, and save only if `op` succeeded.
fn with_environment<T, F>(config: &CliConfig, op: F) -> Result<()>
where
    T: Serialize,
    F: FnOnce(&mut Environment) -> Result<T>,
{
    let mut env = load_environment(config)?;
    let output = op(&mut env)?;
    StateFile::from_environment(&env)?.save(&config.state_path())?;
    print_json(&output)
}
