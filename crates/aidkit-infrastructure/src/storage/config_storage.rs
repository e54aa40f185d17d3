//! Application config file storage.
//!
//! Reads `config.toml` into the `AppConfig` domain model. A missing or empty
//! file yields `None` so callers can fall back to defaults.

use aidkit_core::AidError;
use aidkit_core::config::AppConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// Errors that can occur during config storage operations.
#[derive(Debug)]
pub enum ConfigStorageError {
    /// File I/O error.
    IoError(std::io::Error),
    /// TOML parsing error.
    TomlParseError(toml::de::Error),
}

impl std::fmt::Display for ConfigStorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigStorageError::IoError(e) => write!(f, "I/O error: {}", e),
            ConfigStorageError::TomlParseError(e) => write!(f, "TOML parse error: {}", e),
        }
    }
}

impl std::error::Error for ConfigStorageError {}

impl From<std::io::Error> for ConfigStorageError {
    fn from(e: std::io::Error) -> Self {
        ConfigStorageError::IoError(e)
    }
}

impl From<toml::de::Error> for ConfigStorageError {
    fn from(e: toml::de::Error) -> Self {
        ConfigStorageError::TomlParseError(e)
    }
}

impl From<ConfigStorageError> for AidError {
    fn from(e: ConfigStorageError) -> Self {
        AidError::configuration(e.to_string())
    }
}

/// Read-only handle on a `config.toml` file.
pub struct ConfigStorage {
    path: PathBuf,
}

impl ConfigStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads the config file.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(AppConfig))`: Successfully loaded and parsed
    /// - `Ok(None)`: File doesn't exist or is empty
    /// - `Err`: Failed to read or parse the file
    pub fn load(&self) -> Result<Option<AppConfig>, ConfigStorageError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;

        if content.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(toml::from_str(&content)?))
    }

    /// Loads the config file, falling back to defaults when it is absent.
    pub fn load_or_default(&self) -> Result<AppConfig, ConfigStorageError> {
        match self.load()? {
            Some(config) => {
                tracing::info!("Loaded configuration from {}", self.path.display());
                Ok(config)
            }
            None => {
                tracing::info!(
                    "No configuration at {}, using defaults",
                    self.path.display()
                );
                Ok(AppConfig::default())
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
