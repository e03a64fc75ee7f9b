//! Directory-backed storage: one JSON file per key.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use super::{Storage, StorageError};

/// Stores each key as `<dir>/<key>.json`.
///
/// Writes land in a temporary sibling first and are renamed into place, so
/// a reader in another process never sees a half-written blob.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Opens (creating if needed) a storage directory.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the directory cannot be created.
    #[instrument(skip(dir), fields(dir = %dir.as_ref().display()))]
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| {
            StorageError::new(format!(
                "Failed to create storage directory '{}': {}",
                dir.display(),
                e
            ))
        })?;
        info!(dir = %dir.display(), "Opened file storage");
        Ok(Self { dir })
    }

    /// Storage directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the key could escape the directory or
    /// collide with temporary files.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        if key.is_empty()
            || key.starts_with('.')
            || key.contains(['/', '\\'])
            || key.contains('\0')
        {
            return Err(StorageError::new(format!("Invalid storage key '{}'", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl Storage for FileStorage {
    #[instrument(skip(self))]
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => {
                debug!(path = %path.display(), bytes = value.len(), "Read key");
                Ok(Some(value))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "Key not found");
                Ok(None)
            }
            Err(e) => Err(StorageError::new(format!(
                "Failed to read '{}': {}",
                path.display(),
                e
            ))),
        }
    }

    #[instrument(skip(self, value), fields(bytes = value.len()))]
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let tmp = self.dir.join(format!(".{}.json.tmp", key));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        debug!(path = %path.display(), "Wrote key");
        Ok(())
    }

    #[instrument(skip(self))]
    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
