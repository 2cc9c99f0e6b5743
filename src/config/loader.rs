use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validation::EndpointRules;

/// Errors that can occur when loading engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

/// Tunables for the settings engine itself (not the user's settings).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub events: EventsConfig,
}

/// Endpoint shape rules applied before create/update calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    #[serde(default = "default_true")]
    pub endpoint_require_leading_slash: bool,
    #[serde(default)]
    pub endpoint_forbid_trailing_slash: bool,
    #[serde(default)]
    pub allow_empty_endpoint: bool,
}

/// Lifecycle notification channel settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventsConfig {
    /// Broadcast buffer size (default: 32).
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_true() -> bool {
    true
}

fn default_channel_capacity() -> usize {
    32
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            endpoint_require_leading_slash: true,
            endpoint_forbid_trailing_slash: false,
            allow_empty_endpoint: false,
        }
    }
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
        }
    }
}

impl ValidationConfig {
    pub fn endpoint_rules(&self) -> EndpointRules {
        EndpointRules {
            allow_empty: self.allow_empty_endpoint,
            require_leading_slash: self.endpoint_require_leading_slash,
            forbid_trailing_slash: self.endpoint_forbid_trailing_slash,
        }
    }
}

impl EngineConfig {
    /// Returns the path to the engine configuration file.
    ///
    /// Uses `~/.config/settings-engine/engine.toml` on Unix/macOS,
    /// or equivalent on other platforms via `dirs::config_dir()`.
    /// Falls back to current directory if config_dir is unavailable.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("settings-engine").join("engine.toml")
    }

    /// Loads configuration from the default config file.
    ///
    /// A missing file yields `EngineConfig::default()`.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(EngineConfig::default());
        }
        Self::load_from(&path)
    }

    /// Loads and validates configuration from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: EngineConfig = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.events.channel_capacity == 0 {
            return Err(ConfigError::ValidationError {
                message: "events.channel_capacity must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}
