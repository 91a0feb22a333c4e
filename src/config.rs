//! User configuration, loaded from `~/.config/vtmark/config.toml`.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::controller::SyncOptions;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub browser: BrowserConfig,
    pub sync: SyncConfig,
}

/// Where the timestamp collection lives.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path of the JSON store. Defaults to
    /// `<data dir>/vtmark/timestamps.json`.
    pub path: Option<PathBuf>,
}

/// How saved links get opened.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Command used to open deep links. Defaults to `$BROWSER`, falling
    /// back to `xdg-open`.
    pub command: Option<String>,
}

/// Settle parameters for navigate-then-seek.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Poll interval while waiting for a navigated page, in milliseconds.
    pub settle_interval_ms: u64,
    /// Maximum settle polls before giving up and seeking anyway.
    pub settle_max_attempts: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            settle_interval_ms: 100,
            settle_max_attempts: 20,
        }
    }
}

impl Config {
    /// Path of the config file.
    pub fn config_path() -> Result<PathBuf> {
        let dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(dir.join("vtmark").join("config.toml"))
    }

    /// Load the config, falling back to defaults when the file does not
    /// exist.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Write the config, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Resolved storage path.
    pub fn storage_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.storage.path {
            return Ok(path.clone());
        }
        let dir = dirs::data_dir().context("Could not determine data directory")?;
        Ok(dir.join("vtmark").join("timestamps.json"))
    }

    /// Resolved browser command.
    pub fn browser_command(&self) -> String {
        if let Some(command) = &self.browser.command {
            return command.clone();
        }
        std::env::var("BROWSER").unwrap_or_else(|_| "xdg-open".to_string())
    }

    /// Settle parameters as controller options.
    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            settle_interval: Duration::from_millis(self.sync.settle_interval_ms),
            settle_max_attempts: self.sync.settle_max_attempts,
        }
    }
}
