//! simple-storage
//!
//! Reads the value held by a deployed `SimpleStorage` contract, sets it,
//! adds to it, and prints each step.
//!
//! # Flow
//!
//! ```text
//!   .env / environment ──▶ config ──▶ BlockchainClient ──▶ SimpleStorage
//!                                          │
//!                         get ─▶ set ─▶ wait ─▶ get ─▶ add ─▶ wait ─▶ get
//! ```
//!
//! Progress lines go to stdout, logs to stderr. Any failure exits with
//! status 1.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use simple_storage_client::blockchain::BlockchainClient;
use simple_storage_client::config::loader::{env_lookup, load_env_file};
use simple_storage_client::config::{ConfigSources, TransactionOverrides};
use simple_storage_client::observability::logging;
use simple_storage_client::{execute, BlockchainError};

#[derive(Parser)]
#[command(name = "simple-storage")]
#[command(about = "Read, set and add to a deployed SimpleStorage contract", long_about = None)]
struct Cli {
    /// TOML file with a [transaction] table
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// .env file to load (default: ./.env when present)
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Value passed to set()
    #[arg(long)]
    set_value: Option<u64>,

    /// Value passed to add()
    #[arg(long)]
    add_value: Option<u64>,

    /// Maximum wait for each receipt, in seconds
    #[arg(long)]
    confirmation_timeout_secs: Option<u64>,

    /// Delay between receipt queries, in milliseconds
    #[arg(long)]
    poll_interval_ms: Option<u64>,

    /// Timeout for each RPC request, in seconds
    #[arg(long)]
    rpc_timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init();

    tracing::info!("simple-storage v{} starting", env!("CARGO_PKG_VERSION"));

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(
                step = e.step(),
                tx_hash = ?e.tx_hash(),
                error = %e,
                "Fatal"
            );
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), BlockchainError> {
    if let Some(path) = load_env_file(cli.env_file.as_deref())? {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }

    let sources = ConfigSources {
        file: cli.config,
        overrides: TransactionOverrides {
            rpc_timeout_secs: cli.rpc_timeout_secs,
            confirmation_timeout_secs: cli.confirmation_timeout_secs,
            poll_interval_ms: cli.poll_interval_ms,
            set_value: cli.set_value,
            add_value: cli.add_value,
        },
    };

    execute(env_lookup, &sources, BlockchainClient::connect, std::io::stdout()).await?;
    Ok(())
}
