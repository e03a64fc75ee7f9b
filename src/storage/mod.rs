//! Durable key-value storage for persisted game state.
//!
//! The store writes one serialized blob per key and reads it back on load.
//! Backends only move strings; they know nothing about the game.

mod error;
mod file;
mod memory;
mod models;
mod schema; // Diesel generated schema - internal use only
mod sqlite;

pub use error::StorageError;
pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

/// A string key-value store.
///
/// Receivers are `&self`: backends that need mutation use interior
/// mutability or go through an external resource (files, a database).
pub trait Storage: std::fmt::Debug {
    /// Reads the value stored under `key`, `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot be written.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }
}
