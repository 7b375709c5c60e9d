//! Durable storage for the session's three string entries.
//!
//! SYSTEM CONTEXT
//! ==============
//! The entries are always written together on login and removed together on
//! logout. Only `SessionStore` talks to a `SessionStorage`; nothing else in
//! the crate reads the backing file directly.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("session storage io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("session storage is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persisted key-value entries, keyed the way the browser client stored them.
///
/// Every field is optional so a partly written record can still be loaded and
/// rejected by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(rename = "userRole", default, skip_serializing_if = "Option::is_none")]
    pub user_role: Option<String>,
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

pub trait SessionStorage: Send + Sync {
    /// Load the stored entries, or `None` when nothing has been written.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store exists but cannot be read.
    fn load(&self) -> Result<Option<StoredSession>, StorageError>;

    /// Replace all entries at once.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn save(&self, stored: &StoredSession) -> Result<(), StorageError>;

    /// Remove all entries. Clearing an empty store is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store exists but cannot be removed.
    fn clear(&self) -> Result<(), StorageError>;
}

// =============================================================================
// FILE STORAGE
// =============================================================================

/// JSON file holding `{"token": .., "userRole": .., "userId": ..}`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStorage for FileStorage {
    fn load(&self) -> Result<Option<StoredSession>, StorageError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn save(&self, stored: &StoredSession) -> Result<(), StorageError> {
        let parent = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                std::fs::create_dir_all(parent)?;
                parent
            }
            None => Path::new("."),
        };
        let raw = serde_json::to_string_pretty(stored)?;
        // Unique temp file (mode 0600) in the same directory, then rename over
        // the target: readers see either the old record or the new one.
        let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
        tmp.write_all(raw.as_bytes())?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// =============================================================================
// MEMORY STORAGE
// =============================================================================

/// Process-local storage, used when nothing should outlive the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<Option<StoredSession>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with `stored`, as if a previous run had saved it.
    #[must_use]
    pub fn with_entries(stored: StoredSession) -> Self {
        Self { entries: Mutex::new(Some(stored)) }
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self) -> Result<Option<StoredSession>, StorageError> {
        Ok(self.entries.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn save(&self, stored: &StoredSession) -> Result<(), StorageError> {
        *self.entries.lock().unwrap_or_else(PoisonError::into_inner) = Some(stored.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.entries.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}
