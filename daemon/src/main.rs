//! quorum daemon: command-line access to a group store.

mod config;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;

use config::DaemonConfig;
use quorum_groups::{allocator, BasicGasMeter, GasMeter, GenesisState, GroupKeeper};
use quorum_store::KvStore;
use quorum_store_lmdb::LmdbEnvironment;
use quorum_types::{Address, Group};
use quorum_utils::LogFormat;

/// Named databases the environment may hold.
const MAX_DBS: u32 = 4;

#[derive(Parser)]
#[command(name = "quorum-daemon", about = "Weighted threshold group store")]
struct Cli {
    /// Data directory for the LMDB environment.
    #[arg(long, env = "QUORUM_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "QUORUM_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log output format.
    #[arg(long, env = "QUORUM_LOG_FORMAT", value_parser = ["human", "json"])]
    log_format: Option<String>,

    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "QUORUM_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Import genesis groups from a JSON file into an empty store.
    Genesis {
        /// JSON file holding `{"groups": [...]}`.
        file: PathBuf,
    },
    /// Print every stored group as genesis JSON.
    Export,
    /// Create a group from a JSON file and print its identifier.
    Create {
        /// JSON file holding `{"decision_threshold": .., "members": [..]}`.
        file: PathBuf,
    },
    /// Print a stored group as JSON.
    Show {
        /// Hex-encoded group identifier.
        group: Address,
    },
    /// Check whether a signer set satisfies a group.
    Authorize {
        /// Hex-encoded group identifier.
        group: Address,

        /// Hex-encoded signer address. May be repeated.
        #[arg(long = "signer")]
        signers: Vec<Address>,

        /// Gas available to the check; defaults to the configured limit.
        #[arg(long)]
        gas_limit: Option<u64>,
    },
    /// Print the identifier the next created group will receive.
    NextId,
}

fn load_config(cli: &Cli) -> anyhow::Result<DaemonConfig> {
    let mut config = match &cli.config {
        Some(path) => DaemonConfig::from_toml_file(path)?,
        None => DaemonConfig::default(),
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    match cli.log_format.as_deref() {
        Some("json") => config.log_format = LogFormat::Json,
        Some(_) => config.log_format = LogFormat::Human,
        None => {}
    }
    Ok(config)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid JSON in {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    quorum_utils::init_tracing_with(&config.log_level, config.log_format);

    if cli.config.is_some() {
        tracing::info!(data_dir = %config.data_dir.display(), "loaded config file");
    }

    let output = execute(&config, cli.command)?;
    println!("{output}");
    Ok(())
}

/// Run one command against the store in `config.data_dir` and render its
/// output.
fn execute(config: &DaemonConfig, command: Command) -> anyhow::Result<String> {
    let env = LmdbEnvironment::open(&config.data_dir, MAX_DBS, config.map_size)
        .with_context(|| format!("failed to open store at {}", config.data_dir.display()))?;
    let keeper = GroupKeeper::new(config.auth.clone());

    let output = match command {
        Command::Genesis { file } => {
            let genesis: GenesisState = read_json(&file)?;
            let ids = keeper.apply_genesis(&env, &genesis)?;
            ids.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n")
        }
        Command::Export => {
            let txn = env.read_txn()?;
            let genesis = keeper.export_genesis(&txn)?;
            serde_json::to_string_pretty(&genesis)?
        }
        Command::Create { file } => {
            let group: Group = read_json(&file)?;
            keeper.create_committed(&env, group)?.to_string()
        }
        Command::Show { group } => {
            let txn = env.read_txn()?;
            let info = keeper.get_group(&txn, &group)?;
            serde_json::to_string_pretty(&info)?
        }
        Command::Authorize {
            group,
            signers,
            gas_limit,
        } => {
            let txn = env.read_txn()?;
            let mut meter = BasicGasMeter::new(gas_limit.unwrap_or(config.auth.default_gas_limit));
            let authorized = keeper.authorize(&txn, &mut meter, &group, &signers)?;
            tracing::info!(%group, authorized, gas = meter.consumed(), "authorization checked");
            authorized.to_string()
        }
        Command::NextId => {
            let txn = env.read_txn()?;
            let next = allocator::peek_next(&txn)?;
            next.to_string()
        }
    };
    Ok(output)
}
