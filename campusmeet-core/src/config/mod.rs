//! Configuration management for CampusMeet
//!
//! Environment-based configuration with defaults and validation.
//! Variables follow the pattern: CAMPUSMEET_<SECTION>_<KEY>
//! Example: CAMPUSMEET_STORE_BACKEND=sqlite

use crate::logging::LogLevel;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

mod error;

pub use error::ConfigError;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Store configuration
    pub store: StoreConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Which document store backend to open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreBackend {
    /// In-memory store, state lost on shutdown (tests and local development)
    Memory,
    /// SQLite-backed durable store
    Sqlite,
}

/// Store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Backend selection
    pub backend: StoreBackend,

    /// Database path (sqlite backend only)
    pub db_path: PathBuf,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Enable JSON formatting
    pub json_format: bool,

    /// Include target module
    pub with_target: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Sqlite,
            db_path: PathBuf::from("./data/campusmeet.db"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            with_target: true,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(backend) = env::var("CAMPUSMEET_STORE_BACKEND") {
            config.store.backend = match backend.to_lowercase().as_str() {
                "memory" => StoreBackend::Memory,
                "sqlite" => StoreBackend::Sqlite,
                other => {
                    return Err(ConfigError::InvalidValue(format!(
                        "unknown store backend: {other}"
                    )))
                }
            };
        }
        if let Ok(path) = env::var("CAMPUSMEET_STORE_DB_PATH") {
            config.store.db_path = PathBuf::from(path);
        }

        if let Ok(level) = env::var("CAMPUSMEET_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Ok(json) = env::var("CAMPUSMEET_LOG_JSON") {
            config.logging.json_format = json
                .parse()
                .map_err(|e| ConfigError::InvalidValue(format!("invalid log json flag: {e}")))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if LogLevel::parse(&self.logging.level).is_none() {
            return Err(ConfigError::ValidationFailed(format!(
                "unknown log level: {}",
                self.logging.level
            )));
        }
        if self.store.backend == StoreBackend::Sqlite
            && self.store.db_path.as_os_str().is_empty()
        {
            return Err(ConfigError::ValidationFailed(
                "sqlite backend requires a database path".to_string(),
            ));
        }
        Ok(())
    }
}
