//! Config module - blobcrypt settings (blobcrypt.toml).
//!
//! The config file holds:
//! - The service base URL and an optional request timeout
//! - Auto-save defaults (toggle, note, owner)
//!
//! Passwords are never stored here.

use crate::orchestrator::{SaveDefaults, DEFAULT_NOTE};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding `api.base_url`.
pub const BASE_URL_ENV: &str = "BLOBCRYPT_BASE_URL";

/// Service connection settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    /// Base URL of the service, endpoint paths are appended to it
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds (unset: transport default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

/// Auto-save settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SaveConfig {
    /// Save every new ciphertext right after encrypting
    #[serde(default = "default_auto_save")]
    pub auto_save: bool,
    /// Note used when none is given
    #[serde(default = "default_note")]
    pub default_note: String,
    /// Owner recorded with every save
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

fn default_auto_save() -> bool {
    true
}

fn default_note() -> String {
    DEFAULT_NOTE.to_string()
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            auto_save: default_auto_save(),
            default_note: default_note(),
            owner: None,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Config version (for future migrations)
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub save: SaveConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            api: ApiConfig::default(),
            save: SaveConfig::default(),
        }
    }
}

/// Default config directory (~/.config/blobcrypt/)
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("blobcrypt"))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Default config file path
pub fn default_config_path() -> PathBuf {
    default_config_dir().join("blobcrypt.toml")
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Cannot parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load from `path`, falling back to defaults when the file is missing
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Write config to a file, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).with_context(|| "Cannot serialize config to TOML")?;

        std::fs::write(path, content)
            .with_context(|| format!("Cannot write config file: {}", path.display()))?;

        Ok(())
    }

    /// Base URL after applying overrides: flag, then environment, then file.
    pub fn resolve_base_url(&self, flag: Option<&str>, env: Option<&str>) -> String {
        flag.or(env)
            .filter(|url| !url.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| self.api.base_url.clone())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.api.timeout_secs.map(Duration::from_secs)
    }

    pub fn save_defaults(&self) -> SaveDefaults {
        SaveDefaults {
            note: self.save.default_note.clone(),
            owner: self.save.owner.clone(),
        }
    }
}
