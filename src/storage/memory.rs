//! In-memory storage backend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{debug, instrument};

use super::{Storage, StorageError};

/// Shared in-memory key-value storage.
///
/// Clones are handles onto the same map, so two stores built from clones
/// behave like two browser tabs over one local storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    /// Creates an empty storage.
    #[instrument]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.entries
            .lock()
            .map_err(|e| StorageError::new(format!("Memory storage poisoned: {}", e)))
    }
}

impl Storage for MemoryStorage {
    #[instrument(skip(self))]
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = self.lock()?.get(key).cloned();
        debug!(found = value.is_some(), "Read key");
        Ok(value)
    }

    #[instrument(skip(self, value), fields(bytes = value.len()))]
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        debug!("Wrote key");
        Ok(())
    }

    #[instrument(skip(self))]
    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_entries() {
        let a = MemoryStorage::new();
        let b = a.clone();
        a.set_item("k", "v").unwrap();
        assert_eq!(b.get_item("k").unwrap().as_deref(), Some("v"));
        b.remove_item("k").unwrap();
        assert!(a.is_empty());
    }
}
