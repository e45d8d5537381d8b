//! Telemetry initialisation for the asset-ledger binary.
//!
//! Structured JSON logs only, written to stderr so that stdout carries the
//! command's output.
//!
//! # Telemetry invariants
//!
//! - **No plaintext field values, shares, or key material** may appear in any
//!   log field.
//! - Log level is configurable via `LOG_LEVEL` (default: `info`), overridden by
//!   `RUST_LOG` when set.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Initialise the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if the subscriber has already been set.
pub fn init(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise asset-ledger tracing subscriber: {e}"))
}
