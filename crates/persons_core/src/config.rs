//! Application configuration loaded from TOML.
//!
//! ```toml
//! [database]
//! path = "/var/lib/persons/persons.db"   # omit for an in-memory database
//!
//! [logging]
//! level = "info"
//! dir = "/var/log/persons"               # omit to disable file logging
//! ```

use crate::logging::{default_log_level, parse_level};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config `{}`: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config value: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite file; `None` selects an in-memory database.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Absolute directory for rolling log files; `None` disables logging.
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            dir: None,
        }
    }
}

impl AppConfig {
    /// Reads and validates a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Parses and validates TOML text; missing sections take defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        parse_level(&self.logging.level)
            .map_err(|err| ConfigError::Invalid(err.to_string()))?;
        if let Some(dir) = &self.logging.dir {
            if !dir.is_absolute() {
                return Err(ConfigError::Invalid(format!(
                    "logging.dir must be absolute, got `{}`",
                    dir.display()
                )));
            }
        }
        Ok(())
    }
}
