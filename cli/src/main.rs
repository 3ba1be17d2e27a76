//! Epoxy command line: operate a token set ledger kept in a local state file.

mod state;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Parser;
use epoxy_ledger::{LedgerConfig, MintRequest};
use epoxy_types::{Address, SetId};
use epoxy_utils::LogFormat;
use serde_json::json;

use crate::state::{StateFile, Workspace};

#[derive(Parser)]
#[command(name = "epoxy", about = "Token set ledger")]
struct Cli {
    /// Path to a TOML ledger configuration file. Without one, the ledger
    /// runs with default settings and charges no fees.
    #[arg(long, env = "EPOXY_CONFIG")]
    config: Option<PathBuf>,

    /// Ledger state file.
    #[arg(long, default_value = "./epoxy.state", env = "EPOXY_STATE")]
    state: PathBuf,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, default_value = "info", env = "EPOXY_LOG_LEVEL")]
    log_level: String,

    /// Log output: "human" or "json".
    #[arg(long, default_value = "human", env = "EPOXY_LOG_FORMAT")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Create an empty state file.
    Init {
        /// Replace an existing state file.
        #[arg(long)]
        force: bool,
    },

    /// Mint every (id, amount) pair into every recipient.
    Mint {
        #[arg(long)]
        caller: Address,
        /// Recipient; repeat or comma-separate for several.
        #[arg(long = "to", required = true, value_delimiter = ',')]
        recipients: Vec<Address>,
        #[arg(long = "id", required = true, value_delimiter = ',')]
        ids: Vec<String>,
        #[arg(long = "amount", required = true, value_delimiter = ',')]
        amounts: Vec<u128>,
        /// Metadata override per id; omit for none.
        #[arg(long = "uri")]
        uris: Vec<String>,
        /// Manager of the sets this call creates. Without one they are frozen.
        #[arg(long)]
        manager: Option<Address>,
    },

    /// Set metadata overrides; an empty URI restores the base URI.
    SetUri {
        #[arg(long)]
        caller: Address,
        #[arg(long = "id", required = true)]
        ids: Vec<String>,
        #[arg(long = "uri", required = true)]
        uris: Vec<String>,
    },

    /// Hand management of sets to another account.
    SetManager {
        #[arg(long)]
        caller: Address,
        #[arg(long = "id", required = true, value_delimiter = ',')]
        ids: Vec<String>,
        #[arg(long)]
        manager: Address,
    },

    /// Permanently freeze sets.
    Freeze {
        #[arg(long)]
        caller: Address,
        #[arg(long = "id", required = true, value_delimiter = ',')]
        ids: Vec<String>,
    },

    /// Destroy part of an account's balance.
    Burn {
        #[arg(long)]
        caller: Address,
        /// Defaults to the caller.
        #[arg(long)]
        account: Option<Address>,
        #[arg(long)]
        id: String,
        #[arg(long)]
        amount: u128,
    },

    /// Move balances between accounts.
    Transfer {
        #[arg(long)]
        caller: Address,
        /// Defaults to the caller.
        #[arg(long)]
        from: Option<Address>,
        #[arg(long)]
        to: Address,
        #[arg(long = "id", required = true, value_delimiter = ',')]
        ids: Vec<String>,
        #[arg(long = "amount", required = true, value_delimiter = ',')]
        amounts: Vec<u128>,
    },

    /// Grant or revoke an operator over all of the owner's balances.
    ApproveOperator {
        #[arg(long)]
        owner: Address,
        #[arg(long)]
        operator: Address,
        #[arg(long)]
        revoke: bool,
    },

    /// Credit fee asset units to an account.
    FeeFund { account: Address, amount: u128 },

    /// Allow the ledger to draw minting fees from `owner`.
    FeeApprove { owner: Address, amount: u128 },

    /// Print a token set's lifecycle state and metadata URI.
    Show { id: String },

    /// Print an account's balance of a set.
    Balance { account: Address, id: String },
}

impl Command {
    fn is_query(&self) -> bool {
        matches!(self, Command::Show { .. } | Command::Balance { .. })
    }
}

fn set_ids(raw: Vec<String>) -> Vec<SetId> {
    raw.into_iter().map(SetId::from).collect()
}

fn load_config(path: Option<&Path>) -> anyhow::Result<LedgerConfig> {
    match path {
        Some(path) => {
            let config = LedgerConfig::from_toml_file(path)
                .with_context(|| format!("loading config {}", path.display()))?;
            tracing::info!("Loaded config from {}", path.display());
            Ok(config)
        }
        None => Ok(LedgerConfig::default()),
    }
}

fn print(value: serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    epoxy_utils::init_logging(cli.log_format, &cli.log_level);

    let config = load_config(cli.config.as_deref())?;

    if let Command::Init { force } = cli.command {
        if cli.state.exists() && !force {
            bail!(
                "state file {} already exists (use --force to replace it)",
                cli.state.display()
            );
        }
        StateFile::empty(&config)?.save(&cli.state)?;
        tracing::info!(path = %cli.state.display(), "state file initialised");
        return print(json!({ "state": cli.state.display().to_string() }));
    }

    let mut workspace = StateFile::load(&cli.state)?.open(config)?;
    let query = cli.command.is_query();
    let output = run(&mut workspace, cli.command)?;

    let events = workspace.ledger.drain_events();
    if !query {
        workspace.into_state()?.save(&cli.state)?;
    }
    print(json!({ "result": output, "events": events }))
}

/// Execute one command against the restored ledger. Queries return their
/// view; mutations return what changed.
fn run(workspace: &mut Workspace, command: Command) -> anyhow::Result<serde_json::Value> {
    let ledger = &mut workspace.ledger;
    let value = match command {
        Command::Init { .. } => bail!("init takes no state file"),

        Command::Mint {
            caller,
            recipients,
            ids,
            amounts,
            uris,
            manager,
        } => {
            let mut request = MintRequest::new(recipients, set_ids(ids), amounts);
            if !uris.is_empty() {
                request = request.with_uris(uris);
            }
            if let Some(manager) = manager {
                request = request.with_manager(manager);
            }
            let receipt = ledger.mint(&caller, request)?;
            serde_json::to_value(receipt)?
        }

        Command::SetUri { caller, ids, uris } => {
            ledger.set_uri(&caller, &set_ids(ids), &uris)?;
            serde_json::Value::Null
        }

        Command::SetManager {
            caller,
            ids,
            manager,
        } => {
            ledger.set_manager(&caller, &set_ids(ids), manager)?;
            serde_json::Value::Null
        }

        Command::Freeze { caller, ids } => {
            ledger.freeze(&caller, &set_ids(ids))?;
            serde_json::Value::Null
        }

        Command::Burn {
            caller,
            account,
            id,
            amount,
        } => {
            let account = account.unwrap_or(caller);
            let id = SetId::from(id);
            ledger.burn(&caller, &account, &id, amount)?;
            json!({ "balance": ledger.balance_of(&account, &id).to_string() })
        }

        Command::Transfer {
            caller,
            from,
            to,
            ids,
            amounts,
        } => {
            let from = from.unwrap_or(caller);
            ledger.safe_batch_transfer_from(&caller, &from, &to, &set_ids(ids), &amounts, &[])?;
            serde_json::Value::Null
        }

        Command::ApproveOperator {
            owner,
            operator,
            revoke,
        } => {
            ledger.set_approval_for_all(&owner, &operator, !revoke)?;
            serde_json::Value::Null
        }

        Command::FeeFund { account, amount } => {
            let asset = workspace
                .fee_asset_mut()
                .context("state file has no fee asset")?;
            asset.mint(&account, amount)?;
            let balance = asset.balance_of(&account);
            tracing::info!(account = %account, amount = %amount, "fee asset funded");
            json!({ "balance": balance.to_string() })
        }

        Command::FeeApprove { owner, amount } => {
            let spender = workspace.ledger.address();
            let asset = workspace
                .fee_asset_mut()
                .context("state file has no fee asset")?;
            asset.approve(&owner, &spender, amount);
            tracing::info!(owner = %owner, spender = %spender, amount = %amount, "fee allowance set");
            json!({ "allowance": amount.to_string() })
        }

        Command::Show { id } => {
            let id = SetId::from(id);
            json!({
                "id": id.as_str(),
                "created": ledger.created(&id),
                "frozen": ledger.frozen(&id),
                "manager": ledger.manager(&id),
                "uri": ledger.uri(&id),
                "total_supply": ledger.total_supply(&id).to_string(),
            })
        }

        Command::Balance { account, id } => {
            let id = SetId::from(id);
            json!({
                "account": account,
                "id": id.as_str(),
                "balance": ledger.balance_of(&account, &id).to_string(),
            })
        }
    };
    Ok(value)
}
