//! Detection of state written by another process.
//!
//! Stands in for the browser's cross-tab `storage` event: the composition
//! layer polls a [`ChangeWatcher`] and calls
//! [`Store::reload`](crate::Store::reload) when the blob changed.

use tracing::{debug, instrument};

use crate::storage::{Storage, StorageError};

/// Remembers the last persisted blob seen under one key.
#[derive(Debug, Clone)]
pub struct ChangeWatcher {
    key: String,
    last_seen: Option<String>,
}

impl ChangeWatcher {
    /// Starts watching `key`, taking its current value as the baseline.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the current value cannot be read.
    #[instrument(skip(storage))]
    pub fn new(storage: &dyn Storage, key: &str) -> Result<Self, StorageError> {
        Ok(Self {
            key: key.to_string(),
            last_seen: storage.get_item(key)?,
        })
    }

    /// Watched key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns true if the stored value differs from the last one seen,
    /// and takes the new value as the baseline.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the value cannot be read; the baseline
    /// is kept.
    #[instrument(skip(self, storage), fields(key = %self.key))]
    pub fn poll(&mut self, storage: &dyn Storage) -> Result<bool, StorageError> {
        let current = storage.get_item(&self.key)?;
        if current == self.last_seen {
            return Ok(false);
        }
        debug!("Stored state changed");
        self.last_seen = current;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_poll_reports_each_change_once() {
        let storage = MemoryStorage::new();
        storage.set_item("k", "a").unwrap();
        let mut watcher = ChangeWatcher::new(&storage, "k").unwrap();

        assert!(!watcher.poll(&storage).unwrap());
        storage.set_item("k", "b").unwrap();
        assert!(watcher.poll(&storage).unwrap());
        assert!(!watcher.poll(&storage).unwrap());
    }

    #[test]
    fn test_removal_is_a_change() {
        let storage = MemoryStorage::new();
        storage.set_item("k", "a").unwrap();
        let mut watcher = ChangeWatcher::new(&storage, "k").unwrap();
        storage.remove_item("k").unwrap();
        assert!(watcher.poll(&storage).unwrap());
    }
}
