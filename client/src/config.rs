//! Client configuration from environment variables or a TOML file.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::query::{DateRange, DEFAULT_WINDOW_DAYS};
use crate::transport::TransportError;

/// Public deployment of the scheduling service.
pub const DEFAULT_BASE_URL: &str = "https://baipot-backend.onrender.com";

/// Longest accepted initial date range, in days.
pub const MAX_WINDOW_DAYS: i64 = 366;

/// Error raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },

    #[error("No baipot.toml found in standard locations")]
    NotFound,

    #[error("Failed to build HTTP transport: {0}")]
    Transport(#[from] TransportError),
}

/// Settings for talking to the scheduling service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base address the capability paths are appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout imposed by the HTTP transport; none by default
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    /// Length of the initial date range, in days
    #[serde(default = "default_window_days")]
    pub window_days: i64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_window_days() -> i64 {
    DEFAULT_WINDOW_DAYS
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: None,
            window_days: default_window_days(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `BAIPOT_API_URL` (optional): service base address
    /// - `BAIPOT_TIMEOUT_SECS` (optional): request timeout in seconds
    /// - `BAIPOT_WINDOW_DAYS` (optional, default: 5): initial date range length
    ///
    /// # Errors
    /// Returns an error if a numeric variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = env::var("BAIPOT_API_URL").unwrap_or_else(|_| default_base_url());

        let request_timeout_secs = match env::var("BAIPOT_TIMEOUT_SECS") {
            Ok(value) => Some(value.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "BAIPOT_TIMEOUT_SECS",
                value,
            })?),
            Err(_) => None,
        };

        let window_days = match env::var("BAIPOT_WINDOW_DAYS") {
            Ok(value) => value.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "BAIPOT_WINDOW_DAYS",
                value,
            })?,
            Err(_) => default_window_days(),
        };
        check_window_days("BAIPOT_WINDOW_DAYS", window_days)?;

        Ok(Self {
            base_url,
            request_timeout_secs,
            window_days,
        })
    }

    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|source| ConfigError::Read {
            path: path.as_ref().to_path_buf(),
            source,
        })?;

        let config: ClientConfig = toml::from_str(&content)?;
        check_window_days("window_days", config.window_days)?;
        Ok(config)
    }

    /// The initial date range: today (UTC) plus `window_days`.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] when `window_days` is outside
    /// `1..=MAX_WINDOW_DAYS`.
    pub fn date_range(&self) -> Result<DateRange, ConfigError> {
        check_window_days("window_days", self.window_days)?;
        DateRange::starting_today(self.window_days).ok_or(ConfigError::InvalidValue {
            key: "window_days",
            value: self.window_days.to_string(),
        })
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `baipot.toml` in:
    /// 1. Current directory
    /// 2. `client/` directory
    pub fn from_default_location() -> Result<Self, ConfigError> {
        let search_paths = [PathBuf::from("baipot.toml"), PathBuf::from("client/baipot.toml")];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(ConfigError::NotFound)
    }
}

fn check_window_days(key: &'static str, days: i64) -> Result<(), ConfigError> {
    if (1..=MAX_WINDOW_DAYS).contains(&days) {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            key,
            value: days.to_string(),
        })
    }
}
