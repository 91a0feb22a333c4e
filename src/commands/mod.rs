//! CLI subcommand handlers.

pub mod config;
pub mod markers;
pub mod popup;
pub mod records;

use std::path::PathBuf;

use anyhow::Result;

use crate::config::Config;
use crate::store::{FileBackend, SharedStore, TimestampStore};

/// Open the shared store, honoring an explicit `--store` override.
pub fn open_store(config: &Config, store_override: Option<&PathBuf>) -> Result<SharedStore> {
    let path = match store_override {
        Some(path) => path.clone(),
        None => config.storage_path()?,
    };
    Ok(TimestampStore::open_shared(Box::new(FileBackend::new(path))))
}

/// Spawn the configured browser on a URL. Failures are reported, not
/// fatal - the record is still intact.
pub fn open_in_browser(command: &str, url: &str) -> Result<()> {
    std::process::Command::new(command)
        .arg(url)
        .spawn()
        .map_err(|e| anyhow::anyhow!("Failed to launch '{}': {}", command, e))?;
    Ok(())
}
