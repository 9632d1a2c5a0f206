//! Durable storage for session start timestamps

use crate::error::{Result, SessionError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio::fs;

/// Key/value storage holding one string entry per session key.
///
/// Entries are never deleted by the session runtime.
#[async_trait]
pub trait ClockStorage: Send + Sync {
    /// Read the value stored under `key`, if any
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// File-based clock storage, one file per session key
#[derive(Clone, Debug)]
pub struct FileClockStorage {
    base_path: PathBuf,
}

impl FileClockStorage {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// File holding `key`. The key is form-urlencoded, so any participant id
    /// maps to a single file name inside `base_path`.
    fn entry_path(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() {
            return Err(SessionError::StorageError(
                "storage key must not be empty".to_string(),
            ));
        }
        let file_name: String = url::form_urlencoded::byte_serialize(key.as_bytes()).collect();
        Ok(self.base_path.join(format!("{file_name}.start")))
    }
}

#[async_trait]
impl ClockStorage for FileClockStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.entry_path(key)?;

        match fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents.trim().to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.entry_path(key)?;
        fs::create_dir_all(&self.base_path).await?;
        fs::write(&path, value).await?;
        Ok(())
    }
}

/// In-memory clock storage, used by tests and the `status` dry run
#[derive(Default, Debug)]
pub struct MemoryClockStorage {
    entries: Mutex<HashMap<String, String>>,
    writes: Mutex<usize>,
}

impl MemoryClockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `set` calls performed so far
    pub fn write_count(&self) -> usize {
        self.writes.lock().map(|w| *w).unwrap_or_default()
    }
}

#[async_trait]
impl ClockStorage for MemoryClockStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| SessionError::StorageError(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .map_err(|e| SessionError::StorageError(e.to_string()))?
            .insert(key.to_string(), value.to_string());
        if let Ok(mut writes) = self.writes.lock() {
            *writes += 1;
        }
        Ok(())
    }
}
