//! Application configuration loading and validation.
//!
//! [`Config`] aggregates every section of `fleetline.toml`. All sections are
//! optional. The bearer token is read from `FLEETLINE_TOKEN` and never from
//! the file.
//!
//! # Example
//!
//! ```no_run
//! use fleetline::infrastructure::config::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("fleetline.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use super::dashboard::DashboardConfig;
use super::kube::KubeConfig;
use super::logging::LoggingConfig;
use super::manager::ManagerConfig;
use crate::error::{ConfigError, Result};

/// Environment variable holding the bearer token for both remote APIs.
pub const TOKEN_ENV: &str = "FLEETLINE_TOKEN";

/// Config file looked up when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "fleetline.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub manager: ManagerConfig,

    #[serde(default)]
    pub kube: KubeConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Loaded from [`TOKEN_ENV`].
    #[serde(skip)]
    pub token: Option<String>,
}

impl Config {
    /// Parse configuration from TOML content and validate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.token = std::env::var(TOKEN_ENV).ok().filter(|token| !token.is_empty());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is malformed, or fails
    /// validation.
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`] when the file exists.
    #[allow(clippy::result_large_err)]
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Self::parse_toml("")
        }
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] for empty URLs and
    /// [`ConfigError::InvalidValue`] for unparsable URLs or inconsistent
    /// timings.
    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        validate_url("manager.url", &self.manager.url)?;
        validate_url("kube.url", &self.kube.url)?;

        if self.manager.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "manager.poll_interval_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.manager.poll_timeout_ms <= self.manager.poll_interval_ms {
            return Err(ConfigError::InvalidValue {
                field: "manager.poll_timeout_ms",
                reason: "must be greater than poll_interval_ms".to_string(),
            }
            .into());
        }
        if self.kube.asset_group.is_empty() {
            return Err(ConfigError::MissingField {
                field: "kube.asset_group",
            }
            .into());
        }
        if self.kube.request_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "kube.request_timeout_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.dashboard.query_timeout_ms == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "dashboard.query_timeout_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Per-query dashboard timeout.
    #[must_use]
    pub fn dashboard_timeout(&self) -> Duration {
        Duration::from_millis(
            self.dashboard
                .query_timeout_ms
                .unwrap_or(self.manager.poll_timeout_ms),
        )
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

#[allow(clippy::result_large_err)]
fn validate_url(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::MissingField { field }.into());
    }
    Url::parse(value).map_err(|err| ConfigError::InvalidValue {
        field,
        reason: err.to_string(),
    })?;
    Ok(())
}
