//! SQLite storage backend.

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument};

use super::models::{KvEntry, NewKvEntry};
use super::{Storage, StorageError, schema};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Key-value storage in a SQLite database, one row per key.
///
/// A connection is established per call; the store writes rarely and
/// other processes may hold the same file open.
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    db_path: String,
}

impl SqliteStorage {
    /// Opens the database at `db_path`, creating it and applying pending
    /// migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the database cannot be opened or
    /// migrated.
    #[instrument(skip(db_path), fields(db_path = %db_path.as_ref()))]
    pub fn open(db_path: impl AsRef<str>) -> Result<Self, StorageError> {
        let storage = Self {
            db_path: db_path.as_ref().to_string(),
        };
        let mut conn = storage.connection()?;
        let applied = conn.run_pending_migrations(MIGRATIONS)?;
        info!(path = %storage.db_path, migrations = applied.len(), "Opened SQLite storage");
        Ok(storage)
    }

    /// Database path.
    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, StorageError> {
        debug!(path = %self.db_path, "Establishing connection");
        Ok(SqliteConnection::establish(&self.db_path)?)
    }
}

impl Storage for SqliteStorage {
    #[instrument(skip(self))]
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut conn = self.connection()?;

        let entry = schema::kv_entries::table
            .find(key)
            .select(KvEntry::as_select())
            .first(&mut conn)
            .optional()?;

        if let Some(ref e) = entry {
            debug!(key = %e.key(), updated_at = %e.updated_at(), "Key found");
        } else {
            debug!("Key not found");
        }

        Ok(entry.map(|e| e.value().clone()))
    }

    #[instrument(skip(self, value), fields(bytes = value.len()))]
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut conn = self.connection()?;

        let entry = NewKvEntry::new(
            key.to_string(),
            value.to_string(),
            chrono::Utc::now().naive_utc(),
        );

        diesel::replace_into(schema::kv_entries::table)
            .values(&entry)
            .execute(&mut conn)?;

        debug!("Wrote key");
        Ok(())
    }

    #[instrument(skip(self))]
    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut conn = self.connection()?;
        let removed = diesel::delete(schema::kv_entries::table.find(key)).execute(&mut conn)?;
        debug!(removed, "Removed key");
        Ok(())
    }
}
