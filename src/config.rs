//! # Configuration
//!
//! [`CatalogConfig`] holds everything the catalog needs to reach its backend and run
//! the view actor. Values come from three layers, later layers winning:
//!
//! 1. Built-in defaults ([`CatalogConfig::default`])
//! 2. An optional JSON file ([`CatalogConfig::from_file`])
//! 3. Environment overrides ([`CatalogConfig::with_env_overrides`])
//!
//! | Variable | Field |
//! |----------|-------|
//! | `CATALOG_BASE_URL` | `base_url` |
//! | `CATALOG_TIMEOUT_SECS` | `request_timeout_secs` |
//! | `CATALOG_CHANNEL_CAPACITY` | `channel_capacity` |
//! | `CATALOG_NOTIFY_ON_LOAD_FAILURE` | `notify_on_load_failure` |

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

pub const ENV_BASE_URL: &str = "CATALOG_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "CATALOG_TIMEOUT_SECS";
pub const ENV_CHANNEL_CAPACITY: &str = "CATALOG_CHANNEL_CAPACITY";
pub const ENV_NOTIFY_ON_LOAD_FAILURE: &str = "CATALOG_NOTIFY_ON_LOAD_FAILURE";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("Failed to parse config file {path}: {reason}")]
    Parse { path: String, reason: String },

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// Runtime configuration for the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Scheme and authority of the backend; the product resource lives under `/api/product`.
    pub base_url: String,
    /// Per-request timeout applied by the HTTP client.
    pub request_timeout_secs: u64,
    /// Capacity of the view actor's request channel.
    pub channel_capacity: usize,
    /// Surface a failed list load to the user instead of only logging it.
    pub notify_on_load_failure: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "https://localhost:7170".to_string(),
            request_timeout_secs: 30,
            channel_capacity: 32,
            notify_on_load_failure: false,
        }
    }
}

impl CatalogConfig {
    /// Reads a JSON config file. Missing keys keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        info!(path = %path.display(), "Loaded catalog config");
        config.validated()
    }

    /// Defaults with environment overrides applied.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    /// Applies `CATALOG_*` environment variables on top of this config.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary key lookup.
    ///
    /// Kept separate from the environment so tests don't have to mutate process state.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(value) = lookup(ENV_TIMEOUT_SECS) {
            self.request_timeout_secs = parse(ENV_TIMEOUT_SECS, value)?;
        }
        if let Some(value) = lookup(ENV_CHANNEL_CAPACITY) {
            self.channel_capacity = parse(ENV_CHANNEL_CAPACITY, value)?;
        }
        if let Some(value) = lookup(ENV_NOTIFY_ON_LOAD_FAILURE) {
            self.notify_on_load_failure = parse(ENV_NOTIFY_ON_LOAD_FAILURE, value)?;
        }
        self.validated()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Root of the product REST resource, without a trailing slash.
    pub fn resource_root(&self) -> String {
        format!("{}/api/product", self.base_url.trim_end_matches('/'))
    }

    fn validated(self) -> Result<Self, ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "base_url",
                value: self.base_url,
            });
        }
        // tokio's mpsc panics on a zero-capacity channel
        if self.channel_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                key: "channel_capacity",
                value: "0".to_string(),
            });
        }
        Ok(self)
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { key, value })
}
