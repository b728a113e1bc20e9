//! Configuration module for curatr
//!
//! Manages where the session lives, where archive images are extracted, and
//! defaults for output, tag placement, logging and scraping.
//! Configuration is stored in the user's config directory.

mod setup;

pub use setup::first_time_setup;

use std::fs;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::mutate::Placement;
use crate::scrape::ScrapeOptions;

/// Application configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct CuratrConfig {
    /// Directory of the persisted session database
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_path: Option<PathBuf>,

    /// Directory that images extracted from imported archives are written to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_dir: Option<PathBuf>,

    /// Suppress informational output by default
    #[serde(default)]
    pub quiet: bool,

    /// Placement used by `add-tags` when none is given
    #[serde(default)]
    pub default_placement: Placement,

    /// Log filter used when `RUST_LOG` is unset, e.g. `curatr=debug`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    /// Options handed to tag scrapers
    #[serde(default)]
    pub scrape: ScrapeOptions,
}

impl CuratrConfig {
    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::Message("Could not determine config directory".to_string()))?;
        Ok(config_dir.join("curatr").join("config.toml"))
    }

    /// Base directory for data written by curatr
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system data directory cannot be determined.
    pub fn data_dir() -> Result<PathBuf, ConfigError> {
        dirs::data_local_dir()
            .map(|dir| dir.join("curatr"))
            .ok_or_else(|| ConfigError::Message("Could not determine data directory".to_string()))
    }

    /// Load configuration from file, creating default if it doesn't exist
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file cannot be read, parsed, or created.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific file, creating it with defaults if missing
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read, parsed, or created.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let default_config = Self::default();
            default_config.save_to(path)?;
            return Ok(default_config);
        }

        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml))
            .build()?;

        settings.try_deserialize()
    }

    /// Load configuration, running first-time setup if config doesn't exist
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if loading or creating the configuration fails.
    pub fn load_or_setup() -> Result<Self, ConfigError> {
        if Self::config_path()?.exists() {
            Self::load()
        } else {
            first_time_setup()
        }
    }

    /// Save configuration to file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration cannot be written.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the directory cannot be created, the configuration
    /// cannot be serialized to TOML, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Message(format!("Failed to create config directory: {e}")))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;

        fs::write(path, toml_string)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Session directory, falling back to `<data dir>/curatr/session`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if no path is configured and the data directory
    /// cannot be determined.
    pub fn session_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.session_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::data_dir()?.join("session")),
        }
    }

    /// Media directory, falling back to `<data dir>/curatr/media`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if no path is configured and the data directory
    /// cannot be determined.
    pub fn media_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.media_dir {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::data_dir()?.join("media")),
        }
    }
}
