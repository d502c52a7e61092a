//! Application configuration.

use std::path::Path;

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::db::DEFAULT_POOL_SIZE;

/// Environment variable that overrides [`AppConfig::database_url`].
pub const DATABASE_URL_ENV: &str = "TICTACTOE_DATABASE_URL";

/// Settings for the store and the game front-end.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct AppConfig {
    /// SQLite database path.
    #[serde(default = "default_database_url")]
    database_url: String,

    /// Maximum pooled connections.
    #[serde(default = "default_pool_size")]
    pool_size: u32,

    /// Tiles cleared after an Endless-mode full board.
    #[serde(default = "default_endless_clear_count")]
    endless_clear_count: usize,

    /// Tracing filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    log_filter: String,
}

#[instrument]
fn default_database_url() -> String {
    "tictactoe.db".to_string()
}

#[instrument]
fn default_pool_size() -> u32 {
    DEFAULT_POOL_SIZE
}

#[instrument]
fn default_endless_clear_count() -> usize {
    3
}

#[instrument]
fn default_log_filter() -> String {
    "info,tictactoe=debug".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            pool_size: default_pool_size(),
            endless_clear_count: default_endless_clear_count(),
            log_filter: default_log_filter(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text. Missing keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the text is not valid configuration.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        if config.pool_size == 0 {
            return Err(ConfigError::new("pool_size must be at least 1"));
        }

        info!(database_url = %config.database_url, pool_size = config.pool_size, "Config loaded");
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise defaults, then applies the
    /// [`DATABASE_URL_ENV`] override.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if an existing file cannot be read or parsed.
    #[instrument(skip(path))]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) if path.exists() => Self::from_file(path)?,
            Some(path) => {
                info!("Config file not found at {}, using defaults", path.display());
                Self::default()
            }
            None => Self::default(),
        };

        Ok(match std::env::var(DATABASE_URL_ENV) {
            Ok(url) if !url.is_empty() => {
                debug!(url = %url, "Database URL overridden from environment");
                config.with_database_url(url)
            }
            _ => config,
        })
    }

    /// Returns this configuration pointing at `database_url`.
    pub fn with_database_url(mut self, database_url: impl Into<String>) -> Self {
        self.database_url = database_url.into();
        self
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
