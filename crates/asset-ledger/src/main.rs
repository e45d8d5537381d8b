//! `asset-ledger`: record lifecycle over a custody-encrypted world state.
//!
//! Startup sequence:
//! 0. Parse the command line ([`cli::Cli`]).
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise JSON tracing.
//! 3. Generate a master secret, split it into shares, and install the
//!    process-wide [`CustodyManager`].
//! 4. Build the [`AssetContract`] over an in-memory world state.
//! 5. Seed the sample assets when `SEED_LEDGER` is set.
//! 6. Run the requested operation (default: list decrypted assets) and print
//!    its JSON result on stdout, or an `ErrorResponse` on failure.

mod cli;
mod config;
mod contract;
mod store;
mod telemetry;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use common::error::ServiceError;
use common::protocol::ErrorResponse;
use custody::{CustodyManager, MasterSecret};
use tracing::{error, info};

use config::Config;
use contract::{AssetContract, ContractError};
use store::MemoryWorldState;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e:#}");
        e
    })?;
    let selection = cfg.share_selection()?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init(&cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        share_count = cfg.share_count,
        threshold = cfg.share_threshold,
        "asset-ledger starting"
    );

    // -----------------------------------------------------------------------
    // 3. Custody
    // -----------------------------------------------------------------------
    let secret = MasterSecret::generate(cfg.secret_len);
    let manager = CustodyManager::provision(secret, cfg.share_count, cfg.share_threshold)
        .context("failed to provision custody shares")?;
    custody::install_global(Arc::new(manager)).context("failed to install custody manager")?;

    // -----------------------------------------------------------------------
    // 4. Contract
    // -----------------------------------------------------------------------
    let custody = custody::global().context("custody manager missing after install")?;
    let contract = AssetContract::new(MemoryWorldState::new(), custody, selection);

    // -----------------------------------------------------------------------
    // 5-6. Seed and run
    // -----------------------------------------------------------------------
    let command = cli.command.unwrap_or_default();
    info!(operation = command.name(), "running ledger operation");
    let outcome = async {
        if cfg.seed_ledger {
            contract.init_ledger().await?;
        }
        cli::execute(&contract, command).await
    };

    match outcome.await {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
        Err(e) => {
            let response = report(e);
            println!("{}", serde_json::to_string_pretty(&response)?);
            anyhow::bail!("{}", response.message)
        }
    }
}

fn report(err: ContractError) -> ErrorResponse {
    let service = ServiceError::from(err);
    error!(code = service.code(), error = %service, "asset ledger operation failed");
    ErrorResponse::from(&service)
}
