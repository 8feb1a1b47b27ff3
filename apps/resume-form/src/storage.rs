//! Client-side key/value storage for the session.
//!
//! The session lives under four keys. `FileStorage` persists them as a small JSON
//! object so that separate invocations of the binary see the same login, the way
//! separate page loads see the same `localStorage`.

use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::errors::StorageError;

pub const ID_TOKEN_KEY: &str = "idToken";
pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
pub const USER_EMAIL_KEY: &str = "userEmail";

/// Every key a session writes, in write order.
pub const SESSION_KEYS: [&str; 4] = [
    ID_TOKEN_KEY,
    ACCESS_TOKEN_KEY,
    REFRESH_TOKEN_KEY,
    USER_EMAIL_KEY,
];

pub trait ClientStorage: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
    /// Removes every key, including ones this crate did not write.
    fn clear(&mut self) -> Result<(), StorageError>;
}

/// In-process storage. Nothing survives the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ClientStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.entries.clear();
        Ok(())
    }
}

/// JSON-file storage. The file is re-read on every access and replaced
/// atomically on every write.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read(&self.path) {
            Ok(bytes) if bytes.is_empty() => Ok(BTreeMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        serde_json::to_writer_pretty(&mut tmp, entries)?;
        tmp.flush()?;
        tmp.persist(&self.path)?;

        debug!("Wrote {} storage keys to {}", entries.len(), self.path.display());
        Ok(())
    }
}

impl ClientStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_set_get_clear() {
        let mut storage = MemoryStorage::new();
        storage.set(ID_TOKEN_KEY, "tok").unwrap();
        storage.set("unrelated", "x").unwrap();

        assert_eq!(storage.get(ID_TOKEN_KEY).unwrap().as_deref(), Some("tok"));
        storage.clear().unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn test_file_storage_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("session.json"));
        assert_eq!(storage.get(ID_TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_file_storage_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let mut first = FileStorage::new(&path);
        first.set(USER_EMAIL_KEY, "ada@example.com").unwrap();
        first.set(ID_TOKEN_KEY, "id-token").unwrap();

        let second = FileStorage::new(&path);
        assert_eq!(
            second.get(USER_EMAIL_KEY).unwrap().as_deref(),
            Some("ada@example.com")
        );
        assert_eq!(second.get(ID_TOKEN_KEY).unwrap().as_deref(), Some("id-token"));
    }

    #[test]
    fn test_file_storage_remove_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let mut storage = FileStorage::new(&path);

        storage.set(ID_TOKEN_KEY, "a").unwrap();
        storage.set(ACCESS_TOKEN_KEY, "b").unwrap();
        storage.remove(ID_TOKEN_KEY).unwrap();
        assert_eq!(storage.get(ID_TOKEN_KEY).unwrap(), None);
        assert_eq!(storage.get(ACCESS_TOKEN_KEY).unwrap().as_deref(), Some("b"));

        storage.clear().unwrap();
        assert!(!path.exists());
        // clearing twice is fine
        storage.clear().unwrap();
    }

    #[test]
    fn test_file_storage_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        let storage = FileStorage::new(&path);
        assert!(matches!(
            storage.get(ID_TOKEN_KEY),
            Err(StorageError::Json(_))
        ));
    }
}
