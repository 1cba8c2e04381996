//! Durable key-value storage local to the client.
//!
//! # Design
//! The session store persists two small string values, so the storage seam
//! is a minimal synchronous trait rather than a database binding.
//! `FileStorage` keeps one file per key under a data directory, which makes
//! the persisted state inspectable with plain shell tools and atomic per
//! key. `MemoryStorage` backs tests and sessions that should not outlive
//! the process.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::error::Error;

/// Environment variable overriding the default data directory.
pub const DATA_DIR_ENV: &str = "TODO_SYNC_DATA_DIR";

/// Durable string-keyed storage for client-side state.
pub trait KeyValueStorage: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, Error>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), Error>;

    /// Remove the value stored under `key`. Removing an absent key is not
    /// an error.
    fn remove(&self, key: &str) -> Result<(), Error>;
}

/// File-per-key storage rooted at a data directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open storage rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, Error> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .map_err(|e| Error::Storage(format!("failed to create {}: {e}", dir.display())))?;
        Ok(Self { dir })
    }

    /// Open storage at the default location.
    ///
    /// Resolution order: `TODO_SYNC_DATA_DIR`, then `~/.todo-sync`.
    pub fn open_default() -> Result<Self, Error> {
        Self::new(Self::default_dir())
    }

    /// The directory [`open_default`](Self::open_default) resolves to.
    pub fn default_dir() -> PathBuf {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            return PathBuf::from(dir);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".todo-sync")
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        match fs::read_to_string(self.key_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::Storage(format!("failed to read {key}: {e}"))),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        fs::write(self.key_path(key), value)
            .map_err(|e| Error::Storage(format!("failed to write {key}: {e}")))
    }

    fn remove(&self, key: &str) -> Result<(), Error> {
        match fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Storage(format!("failed to remove {key}: {e}"))),
        }
    }
}

/// In-memory storage for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.values.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Error> {
        self.values.lock().remove(key);
        Ok(())
    }
}
