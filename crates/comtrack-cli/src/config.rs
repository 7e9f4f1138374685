//! CLI configuration.
//!
//! Loaded from an optional YAML file, then overridden from the environment:
//!
//! - `COMTRACK_ROLE`: role used for CSV export permission.
//! - `COMTRACK_PERIOD`: default reporting period (`thisMonth`,
//!   `last3Months`, `last6Months`, `ytd`).
//!
//! Example file:
//!
//! ```yaml
//! role: manager
//! defaultPeriod: ytd
//! policies:
//!   - productId: LIFE-01
//!     productRatePct: 20
//!     marginPct: 10
//!     thresholdMultiplier: 0.6
//!     split: { Advisor: 0.5, Introducer: 0.1, Manager: 0.2, ExecSalesManager: 0.2 }
//! ```

use std::path::{Path, PathBuf};

use comtrack_core::{Policy, PolicyBook};
use comtrack_engine::Period;
use serde::{Deserialize, Serialize};

/// Environment variable overriding the export role.
pub const ENV_ROLE: &str = "COMTRACK_ROLE";
/// Environment variable overriding the default period.
pub const ENV_PERIOD: &str = "COMTRACK_PERIOD";

/// Settings shared by every subcommand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CliConfig {
    /// Product policies used to price payments.
    #[serde(default)]
    pub policies: Vec<Policy>,
    /// Period used by `rollup` when no window is given.
    #[serde(default)]
    pub default_period: Period,
    /// Role used for CSV export permission.
    #[serde(default)]
    pub role: Option<String>,
}

impl CliConfig {
    /// Load from `path` (defaults when `None`) and apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.with_overrides(|var| std::env::var(var).ok())
    }

    /// Parse a YAML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(role) = lookup(ENV_ROLE).filter(|r| !r.trim().is_empty()) {
            self.role = Some(role);
        }
        if let Some(period) = lookup(ENV_PERIOD) {
            self.default_period = period.parse().map_err(|_| ConfigError::InvalidEnv {
                var: ENV_PERIOD,
                value: period,
            })?;
        }
        Ok(self)
    }

    /// The policies indexed by product.
    pub fn policy_book(&self) -> PolicyBook {
        self.policies.iter().cloned().collect()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("invalid value {value:?} for {var}")]
    InvalidEnv { var: &'static str, value: String },
}
