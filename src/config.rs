//! Engine configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Engine configuration loaded from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Data directory path
    #[serde(skip)]
    pub data_dir: PathBuf,
    /// Decay settings
    pub decay: DecaySettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::new(),
            decay: DecaySettings::default(),
        }
    }
}

/// Decay-related settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecaySettings {
    /// Days of inactivity before a domain rating starts to decay
    pub inactivity_days: i64,
}

impl Default for DecaySettings {
    fn default() -> Self {
        Self { inactivity_days: 14 }
    }
}

/// Get the engine data directory.
pub fn get_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "vibelevel", "VibeLevel")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the configuration file path.
pub fn get_config_path() -> PathBuf {
    get_data_dir().join("config.toml")
}

/// Get the database file path.
pub fn get_database_path() -> PathBuf {
    get_data_dir().join("vibelevel.db")
}

/// Load engine configuration, defaulting when the file is absent.
pub fn load_config() -> Result<EngineConfig, ConfigError> {
    let path = get_config_path();

    if !path.exists() {
        let config = EngineConfig {
            data_dir: get_data_dir(),
            ..Default::default()
        };
        return Ok(config);
    }

    let content =
        std::fs::read_to_string(&path).map_err(|e| ConfigError::IoError(e.to_string()))?;

    let mut config: EngineConfig =
        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

    config.data_dir = get_data_dir();

    Ok(config)
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}
