//! Persistence backends for the timestamp store.
//!
//! The persisted state is a single `savedTimestamps` key holding the
//! ordered record collection, JSON-array-shaped, the same layout the
//! browser extension kept in its local storage namespace.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::record::TimestampRecord;

/// Errors from the persistence layer.
///
/// Callers above the backend treat these as degradation signals, not
/// fatal conditions.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read timestamp storage: {0}")]
    Read(#[source] anyhow::Error),

    #[error("Failed to write timestamp storage: {0}")]
    Write(#[source] anyhow::Error),
}

/// On-disk shape: an object with the single collection key.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StorageFile {
    #[serde(default, rename = "savedTimestamps")]
    saved_timestamps: Vec<TimestampRecord>,
}

/// Read/write access to the persisted record collection.
///
/// Backends own durability only; ordering, migration and notifications
/// live in `TimestampStore`.
pub trait StorageBackend {
    fn read(&self) -> Result<Vec<TimestampRecord>, StoreError>;
    fn write(&mut self, records: &[TimestampRecord]) -> Result<(), StoreError>;
}

/// JSON-file backend. A missing file reads as an empty collection.
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorageBackend for FileBackend {
    fn read(&self) -> Result<Vec<TimestampRecord>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)
            .map_err(|e| StoreError::Read(anyhow::Error::new(e)))?;
        let file: StorageFile =
            serde_json::from_str(&content).map_err(|e| StoreError::Read(anyhow::Error::new(e)))?;
        Ok(file.saved_timestamps)
    }

    fn write(&mut self, records: &[TimestampRecord]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::Write(anyhow::Error::new(e)))?;
        }
        let file = StorageFile {
            saved_timestamps: records.to_vec(),
        };
        let content = serde_json::to_string_pretty(&file)
            .map_err(|e| StoreError::Write(anyhow::Error::new(e)))?;
        fs::write(&self.path, content).map_err(|e| StoreError::Write(anyhow::Error::new(e)))?;
        Ok(())
    }
}

/// In-memory backend for tests, with failure injection.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    pub records: Vec<TimestampRecord>,
    pub fail_reads: bool,
    pub fail_writes: bool,
    /// Number of successful writes, for asserting migration persists once.
    pub write_count: usize,
}

impl MemoryBackend {
    pub fn with_records(records: Vec<TimestampRecord>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self) -> Result<Vec<TimestampRecord>, StoreError> {
        if self.fail_reads {
            return Err(StoreError::Read(anyhow::anyhow!("injected read failure")));
        }
        Ok(self.records.clone())
    }

    fn write(&mut self, records: &[TimestampRecord]) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Write(anyhow::anyhow!("injected write failure")));
        }
        self.records = records.to_vec();
        self.write_count += 1;
        Ok(())
    }
}
