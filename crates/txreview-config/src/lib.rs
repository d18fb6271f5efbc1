//! Configuration management for txreview
//!
//! This module handles loading, validation, and management of
//! txreview configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use error::{ConfigError, ConfigErrorDetails, ConfigResult};

// ==================== Configuration Types ====================

/// Data source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Path to the JSON dataset (employees and transactions)
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
        }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from("./data/mock_data.json")
}

/// Transaction feed settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Transactions returned per page by the paginated feed
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Simulated latency for every backend call, in milliseconds
    #[serde(default)]
    pub latency_ms: u64,
    /// Cache successful reads until the feed is invalidated
    #[serde(default = "default_true")]
    pub cache_enable: bool,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            latency_ms: 0,
            cache_enable: true,
        }
    }
}

fn default_page_size() -> usize {
    5
}

fn default_true() -> bool {
    true
}

/// Review list display settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Currency used when formatting amounts
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Load all transactions once the employee directory settles
    #[serde(default = "default_true")]
    pub auto_load: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            auto_load: true,
        }
    }
}

fn default_currency() -> String {
    "USD".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Data source settings
    #[serde(default)]
    pub data: DataConfig,
    /// Feed settings
    #[serde(default)]
    pub feed: FeedConfig,
    /// Display settings
    #[serde(default)]
    pub view: ViewConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_string_lossy().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::IoError {
            path: path.to_string_lossy().to_string(),
        })?;
        Self::from_yaml(&content)
    }

    /// Load configuration from a YAML file, falling back to defaults when the file is missing
    pub fn load_or_default(path: impl AsRef<Path>) -> ConfigResult<Self> {
        match Self::load(path) {
            Err(ConfigError::FileNotFound { .. }) => Ok(Self::default()),
            other => other,
        }
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> ConfigResult<Self> {
        let config: Config =
            serde_yaml::from_str(content).map_err(|e| ConfigError::InvalidYaml {
                message: e.to_string(),
            })?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        if self.feed.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "feed.page_size".to_string(),
                reason: "Page size must be greater than 0".to_string(),
            });
        }

        if self.feed.latency_ms > 10_000 {
            return Err(ConfigError::InvalidValue {
                field: "feed.latency_ms".to_string(),
                reason: "Latency must be at most 10000 ms".to_string(),
            });
        }

        if self.view.currency.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "view.currency".to_string(),
            });
        }

        let level = self.logging.level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                reason: format!("Log level must be one of {}", LOG_LEVELS.join(", ")),
            });
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }
}

// ==================== Tests ====================
