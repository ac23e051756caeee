//! Persistent backing for the session record.
//!
//! The record is exactly two fields, `token` and `role`, mirroring the two keys the web
//! client kept in browser storage. `FileStorage` keeps it as a small JSON file so a
//! session survives process restarts; `MemoryStorage` is for tests and throwaway use.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::role::Role;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub role: Role,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("session storage I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session record is not valid JSON: {0}")]
    Format(#[from] serde_json::Error),
}

pub trait SessionStorage: Send + Sync {
    /// `Ok(None)` when nothing has been stored yet.
    fn load(&self) -> Result<Option<StoredSession>, StorageError>;
    fn save(&self, record: &StoredSession) -> Result<(), StorageError>;
    fn clear(&self) -> Result<(), StorageError>;
}

/// In-process storage. Clones share the same slot, so a test can keep a handle
/// and inspect what the store wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slot: Arc<Mutex<Option<StoredSession>>>,
}

impl MemoryStorage {
    pub fn new() -> Self { Self::default() }

    pub fn with_record(record: StoredSession) -> Self {
        Self { slot: Arc::new(Mutex::new(Some(record))) }
    }

    pub fn snapshot(&self) -> Option<StoredSession> { self.slot.lock().clone() }
}

impl SessionStorage for MemoryStorage {
    fn load(&self) -> Result<Option<StoredSession>, StorageError> { Ok(self.slot.lock().clone()) }

    fn save(&self, record: &StoredSession) -> Result<(), StorageError> {
        *self.slot.lock() = Some(record.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.slot.lock() = None;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

    pub fn path(&self) -> &Path { &self.path }

    fn io_err(&self, source: std::io::Error) -> StorageError {
        StorageError::Io { path: self.path.clone(), source }
    }
}

impl SessionStorage for FileStorage {
    fn load(&self) -> Result<Option<StoredSession>, StorageError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_err(e)),
        };
        if text.trim().is_empty() { return Ok(None); }
        Ok(Some(serde_json::from_str(&text)?))
    }

    fn save(&self, record: &StoredSession) -> Result<(), StorageError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir).map_err(|e| self.io_err(e))?;
            }
        }
        let body = serde_json::to_string_pretty(record)?;
        // write-then-rename so a crash never leaves a half-written record
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, body).map_err(|e| self.io_err(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.io_err(e))?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_err(e)),
        }
    }
}
