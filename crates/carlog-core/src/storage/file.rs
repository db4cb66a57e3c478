//! JSON-file store.
//!
//! The whole store is one JSON object of string keys to string values, loaded
//! on open and rewritten atomically after every mutation.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::traits::{usage, KeyValueStore, DEFAULT_CAPACITY_BYTES};
use crate::error::{CarlogError, Result};

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
    capacity: usize,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns `CarlogError::Storage` if the file exists but cannot be read or
    /// is not a JSON object of strings.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_capacity(path, DEFAULT_CAPACITY_BYTES)
    }

    pub fn open_with_capacity(path: &Path, capacity: usize) -> Result<Self> {
        let entries = match fs::read_to_string(path) {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => serde_json::from_str(&contents).map_err(|e| {
                CarlogError::Storage(format!("Unreadable store {}: {}", path.display(), e))
            })?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                return Err(CarlogError::Storage(format!(
                    "Failed to read store {}: {}",
                    path.display(),
                    err
                )))
            }
        };
        tracing::debug!(path = %path.display(), keys = entries.len(), "opened store");

        Ok(Self {
            path: path.to_path_buf(),
            entries,
            capacity,
        })
    }

    /// Write the store file even if nothing changed (used by `init`).
    pub fn create(path: &Path) -> Result<Self> {
        let store = Self::open(path)?;
        store.persist(&store.entries)?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bytes counted against the quota.
    pub fn used_bytes(&self) -> usize {
        usage(&self.entries)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let contents = serde_json::to_vec(entries)?;
        crate::fs::write_atomic(&self.path, &contents).map_err(|e| {
            CarlogError::Storage(format!("Failed to write store {}: {}", self.path.display(), e))
        })
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut next = self.entries.clone();
        next.insert(key.to_string(), value.to_string());

        let needed = usage(&next);
        if needed > self.capacity {
            return Err(CarlogError::QuotaExceeded {
                key: key.to_string(),
                needed,
                capacity: self.capacity,
            });
        }

        self.persist(&next)?;
        self.entries = next;
        tracing::debug!(key, bytes = value.len(), "store set");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if !self.entries.contains_key(key) {
            return Ok(());
        }
        let mut next = self.entries.clone();
        next.remove(key);
        self.persist(&next)?;
        self.entries = next;
        tracing::debug!(key, "store remove");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(&dir.path().join("store.json")).unwrap();
        assert_eq!(store.get("vehicles").unwrap(), None);
        assert_eq!(store.used_bytes(), 0);
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");

        let mut store = FileStore::open(&path).unwrap();
        store.set("vehicles", "[]").unwrap();
        store.set("other", "x").unwrap();
        store.remove("other").unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("vehicles").unwrap().as_deref(), Some("[]"));
        assert_eq!(reopened.get("other").unwrap(), None);
    }

    #[test]
    fn test_corrupt_file_is_storage_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "not json").unwrap();

        let err = FileStore::open(&path).unwrap_err();
        assert!(matches!(err, CarlogError::Storage(_)));
    }

    #[test]
    fn test_quota_failure_does_not_touch_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");

        let mut store = FileStore::open_with_capacity(&path, 16).unwrap();
        store.set("a", "small").unwrap();
        assert!(store.set("b", "far too large for the quota").is_err());

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("b").unwrap(), None);
        assert_eq!(reopened.get("a").unwrap().as_deref(), Some("small"));
    }

    #[test]
    fn test_create_writes_empty_object() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data").join("store.json");
        FileStore::create(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
    }
}
