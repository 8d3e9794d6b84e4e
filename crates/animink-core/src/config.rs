//! Editor configuration.
//!
//! Stored as JSON. Every field has a default, so partial files are valid.

use crate::scene::TextDefaults;
use crate::scripts::ScriptType;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default auto-save interval in seconds.
pub const DEFAULT_AUTOSAVE_INTERVAL_SECS: u64 = 30;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Attributes of text created by the text tool.
    pub text: TextDefaults,
    /// Pointer hit tolerance in scene units.
    pub hit_tolerance: f64,
    /// Minimum time between autosaves.
    pub autosave_interval_secs: u64,
    /// Category the add-script picker opens on.
    pub add_script_tab: ScriptType,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            text: TextDefaults::default(),
            hit_tolerance: 2.0,
            autosave_interval_secs: DEFAULT_AUTOSAVE_INTERVAL_SECS,
            add_script_tab: ScriptType::Mouse,
        }
    }
}

impl EditorConfig {
    /// Default config file location.
    ///
    /// On Unix: `~/.config/animink/config.json`
    /// On Windows: `%APPDATA%\animink\config.json`
    pub fn default_path() -> ConfigResult<PathBuf> {
        let base = dirs::config_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| ConfigError::Io("Could not determine home directory".to_string()))?;
        Ok(base.join("animink").join("config.json"))
    }

    pub fn from_json(json: &str) -> ConfigResult<Self> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn to_json(&self) -> ConfigResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn load(path: &Path) -> ConfigResult<Self> {
        let json = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    /// Write the config, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Io(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
        fs::write(path, self.to_json()?)
            .map_err(|e| ConfigError::Io(format!("Failed to write {}: {}", path.display(), e)))
    }

    /// Load from `path`, falling back to defaults when the file is missing
    /// or unreadable.
    pub fn load_or_default_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Using default config: {}", e);
                Self::default()
            }
        }
    }

    /// Load from the default location, falling back to defaults.
    pub fn load_or_default() -> Self {
        match Self::default_path() {
            Ok(path) => Self::load_or_default_from(&path),
            Err(e) => {
                log::warn!("Using default config: {}", e);
                Self::default()
            }
        }
    }
}
