//! Configuration management for sitegraph.
//!
//! This module provides configuration loading with multiple sources:
//! 1. Default values (hardcoded)
//! 2. Configuration file (YAML)
//! 3. Environment variables (override)
//!
//! # Configuration Hierarchy
//!
//! Environment variables take precedence over config file values,
//! which take precedence over defaults.
//!
//! # Example
//!
//! ```ignore
//! use sitegraph_server::config::ServerConfig;
//!
//! // Load from file with env overrides
//! let config = ServerConfig::load("sitegraph.yaml")?;
//!
//! // Or load from environment only
//! let config = ServerConfig::from_env()?;
//! ```

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use sitegraph_domain::membership::DEFAULT_MAX_LIST_SIZE;
use sitegraph_domain::MembershipConfig;
use std::path::Path;

/// Environment variable prefix: `SITEGRAPH_MEMBERSHIP__MAX_LIST_SIZE` -> `membership.max_list_size`.
const ENV_PREFIX: &str = "SITEGRAPH";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ServerConfig {
    /// Membership resolution and listing settings
    #[serde(default)]
    pub membership: MembershipSettings,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,

    /// Entity store settings
    #[serde(default)]
    pub store: StoreSettings,
}

/// Membership resolution and listing settings.
///
/// # Example YAML Configuration
///
/// ```yaml
/// membership:
///   max_list_size: 10000
///   default_items: 25
///   max_items: 1000
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct MembershipSettings {
    /// Cap on groups and on users in one membership graph.
    ///
    /// Environment variable: `SITEGRAPH_MEMBERSHIP__MAX_LIST_SIZE`
    #[serde(default = "default_max_list_size")]
    pub max_list_size: usize,

    /// Page size used when a request gives no usable `items`.
    #[serde(default = "default_items")]
    pub default_items: usize,

    /// Largest page size a request may ask for.
    #[serde(default = "default_max_items")]
    pub max_items: usize,
}

impl Default for MembershipSettings {
    fn default() -> Self {
        Self {
            max_list_size: default_max_list_size(),
            default_items: default_items(),
            max_items: default_max_items(),
        }
    }
}

impl MembershipSettings {
    /// Domain-level configuration for the graph builder.
    pub fn to_membership_config(&self) -> MembershipConfig {
        MembershipConfig::default().with_max_list_size(self.max_list_size)
    }
}

fn default_max_list_size() -> usize {
    DEFAULT_MAX_LIST_SIZE
}

fn default_items() -> usize {
    25
}

fn default_max_items() -> usize {
    1000
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LoggingSettings {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Use JSON format (true for production, false for development)
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Entity store settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct StoreSettings {
    /// JSON fixture loaded into the in-memory store at startup.
    ///
    /// Environment variable: `SITEGRAPH_STORE__FIXTURE_PATH`
    pub fixture_path: Option<String>,
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ConfigError),

    #[error("configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("invalid configuration: {message}")]
    Invalid { message: String },
}

impl ServerConfig {
    /// Load configuration from a YAML file with environment variable overrides.
    ///
    /// Environment variables are prefixed with `SITEGRAPH_` and use `__` as separator.
    /// For example:
    /// - `SITEGRAPH_MEMBERSHIP__DEFAULT_ITEMS=50` overrides `membership.default_items`
    /// - `SITEGRAPH_LOGGING__JSON=true` overrides `logging.json`
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigLoadError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let config = Config::builder()
            .add_source(Config::try_from(&ServerConfig::default())?)
            .add_source(File::from(path).format(FileFormat::Yaml))
            .add_source(env_source())
            .build()?;

        let server_config: ServerConfig = config.try_deserialize()?;
        server_config.validate()?;

        Ok(server_config)
    }

    /// Load configuration from environment variables only.
    pub fn from_env() -> Result<Self, ConfigLoadError> {
        let config = Config::builder()
            .add_source(Config::try_from(&ServerConfig::default())?)
            .add_source(env_source())
            .build()?;

        let server_config: ServerConfig = config.try_deserialize()?;
        server_config.validate()?;

        Ok(server_config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.membership.max_list_size == 0 {
            return Err(ConfigLoadError::Invalid {
                message: "membership.max_list_size must be greater than 0".to_string(),
            });
        }

        if self.membership.max_items == 0 {
            return Err(ConfigLoadError::Invalid {
                message: "membership.max_items must be greater than 0".to_string(),
            });
        }

        if self.membership.default_items == 0
            || self.membership.default_items > self.membership.max_items
        {
            return Err(ConfigLoadError::Invalid {
                message: format!(
                    "membership.default_items must be between 1 and membership.max_items ({}), got: {}",
                    self.membership.max_items, self.membership.default_items
                ),
            });
        }

        if self
            .store
            .fixture_path
            .as_deref()
            .is_some_and(|p| p.trim().is_empty())
        {
            return Err(ConfigLoadError::Invalid {
                message: "store.fixture_path cannot be empty when set".to_string(),
            });
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigLoadError::Invalid {
                message: format!(
                    "logging.level must be one of: {:?}, got: {}",
                    valid_levels, self.logging.level
                ),
            });
        }

        Ok(())
    }
}

// `__` separates nested keys: SITEGRAPH_LOGGING__LEVEL -> logging.level
fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}
