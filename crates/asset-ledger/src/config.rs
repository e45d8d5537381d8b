//! Configuration loading and validation for the asset-ledger binary.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any required variable is missing or invalid.

use anyhow::{Context, Result};
use serde::Deserialize;

/// Validated asset-ledger configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Number of shares the master secret is split into.
    #[serde(default = "default_share_count")]
    pub share_count: usize,

    /// Number of shares required to reconstruct the master secret.
    #[serde(default = "default_share_threshold")]
    pub share_threshold: usize,

    /// Comma-separated indices of the shares to combine, e.g. `"3,4"`. **Required.**
    pub reconstruct_shares: String,

    /// Length in bytes of the generated master secret.
    #[serde(default = "default_secret_len")]
    pub secret_len: usize,

    /// Whether to populate the ledger with the sample assets at startup.
    #[serde(default = "default_seed_ledger")]
    pub seed_ledger: bool,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_share_count() -> usize {
    10
}
fn default_share_threshold() -> usize {
    2
}
fn default_secret_len() -> usize {
    32
}
fn default_seed_ledger() -> bool {
    true
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required variable is absent or cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Parse `RECONSTRUCT_SHARES` into share indices.
    ///
    /// # Errors
    ///
    /// Returns an error if an entry is not an integer in `1..=255`.
    pub fn share_selection(&self) -> Result<Vec<u8>> {
        self.reconstruct_shares
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<u8>()
                    .ok()
                    .filter(|&i| i != 0)
                    .with_context(|| format!("RECONSTRUCT_SHARES entry `{s}` is not a share index in 1..=255"))
            })
            .collect()
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        if self.share_count == 0 || self.share_count > custody::shares::MAX_SHARES {
            anyhow::bail!(
                "SHARE_COUNT must be in 1..={}",
                custody::shares::MAX_SHARES
            );
        }
        if self.share_threshold == 0 || self.share_threshold > self.share_count {
            anyhow::bail!("SHARE_THRESHOLD must be in 1..=SHARE_COUNT");
        }
        if self.secret_len == 0 {
            anyhow::bail!("SECRET_LEN must be > 0");
        }

        let selection = self.share_selection()?;
        if selection.is_empty() {
            anyhow::bail!("RECONSTRUCT_SHARES is required and must not be empty");
        }
        let mut seen = [false; 256];
        for &i in &selection {
            if usize::from(i) > self.share_count {
                anyhow::bail!("RECONSTRUCT_SHARES index {i} exceeds SHARE_COUNT");
            }
            if seen[usize::from(i)] {
                anyhow::bail!("RECONSTRUCT_SHARES index {i} is listed twice");
            }
            seen[usize::from(i)] = true;
        }
        if selection.len() < self.share_threshold {
            anyhow::bail!(
                "RECONSTRUCT_SHARES lists {} shares but SHARE_THRESHOLD is {}",
                selection.len(),
                self.share_threshold
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Config {
        Config {
            share_count: default_share_count(),
            share_threshold: default_share_threshold(),
            reconstruct_shares: "3,4".into(),
            secret_len: default_secret_len(),
            seed_ledger: default_seed_ledger(),
            log_level: default_log_level(),
        }
    }

    #[test]
    fn defaults_are_correct() {
        assert_eq!(default_share_count(), 10);
        assert_eq!(default_share_threshold(), 2);
        assert_eq!(default_secret_len(), 32);
        assert!(default_seed_ledger());
        assert_eq!(default_log_level(), "info");
    }

    #[test]
    fn validate_accepts_valid_config() {
        assert!(valid().validate().is_ok());
        assert_eq!(valid().share_selection().unwrap(), vec![3, 4]);
    }

    #[test]
    fn selection_tolerates_whitespace() {
        let cfg = Config {
            reconstruct_shares: " 1, 10 ,".into(),
            ..valid()
        };
        assert_eq!(cfg.share_selection().unwrap(), vec![1, 10]);
    }

    #[test]
    fn validate_rejects_threshold_above_count() {
        let cfg = Config {
            share_threshold: 11,
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_threshold() {
        let cfg = Config {
            share_threshold: 0,
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_too_many_shares() {
        let cfg = Config {
            share_count: 256,
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_selection() {
        let cfg = Config {
            reconstruct_shares: " ".into(),
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_out_of_range_selection() {
        for bad in ["0,1", "3,11", "a,b", "3,3"] {
            let cfg = Config {
                reconstruct_shares: bad.into(),
                ..valid()
            };
            assert!(cfg.validate().is_err(), "accepted {bad}");
        }
    }

    #[test]
    fn validate_rejects_selection_below_threshold() {
        let cfg = Config {
            reconstruct_shares: "7".into(),
            ..valid()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("SHARE_THRESHOLD is 2"));

        let cfg = Config {
            share_threshold: 3,
            reconstruct_shares: "1,2,3".into(),
            ..valid()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_secret_len() {
        let cfg = Config {
            secret_len: 0,
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }
}
