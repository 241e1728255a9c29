//! Persistence layer
//!
//! All state lives in a handful of independently keyed JSON blobs (the
//! meeting collection, one version history per meeting, templates,
//! global settings). The backend is a deliberately tiny load/save
//! interface so the store can be run against a project directory or
//! entirely in memory.

mod store;

pub use store::{Store, SitzungUpdate};

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ProtokollError, Result};

pub const PROTOKOLL_DIR: &str = ".protokoll";

/// Keyed blob persistence. Implementations are not expected to validate
/// the payload; corruption is handled at load time by the store.
pub trait StorageBackend {
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn save(&self, key: &str, value: &str) -> Result<()>;
}

/// Directory-of-JSON-files backend rooted at `.protokoll/`. One file per
/// key.
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Initialize a new protokoll project
    pub fn init(root: &Path) -> Result<Self> {
        let dir = root.join(PROTOKOLL_DIR);

        if dir.exists() {
            return Err(ProtokollError::AlreadyInitialized);
        }

        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Open an existing protokoll project
    pub fn open(root: &Path) -> Result<Self> {
        let dir = root.join(PROTOKOLL_DIR);

        if !dir.exists() {
            return Err(ProtokollError::NotInitialized);
        }

        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl StorageBackend for FileBackend {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        fs::write(self.key_path(key), value)?;
        Ok(())
    }
}

/// In-memory backend for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryBackend {
    blobs: RefCell<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryBackend {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.blobs.borrow().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        self.blobs.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_backend_init_and_reopen() {
        let tmp = TempDir::new().unwrap();

        let backend = FileBackend::init(tmp.path()).unwrap();
        backend.save("sitzungen", "[]").unwrap();

        let reopened = FileBackend::open(tmp.path()).unwrap();
        assert_eq!(reopened.load("sitzungen").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_file_backend_init_twice_fails() {
        let tmp = TempDir::new().unwrap();
        FileBackend::init(tmp.path()).unwrap();
        assert!(matches!(
            FileBackend::init(tmp.path()),
            Err(ProtokollError::AlreadyInitialized)
        ));
    }

    #[test]
    fn test_file_backend_open_uninitialized_fails() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            FileBackend::open(tmp.path()),
            Err(ProtokollError::NotInitialized)
        ));
    }

    #[test]
    fn test_missing_key_loads_none() {
        let backend = MemoryBackend::new();
        assert!(backend.load("nope").unwrap().is_none());
    }
}
