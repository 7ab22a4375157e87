// marketplace-client/src/platform/file_storage.rs
use super::KeyValueStorage;
use common::StorageError;
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Durable storage persisted as a flat JSON object.
/// Every mutation rewrites the file before returning.
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
    entries: DashMap<String, String>,
}

impl JsonFileStorage {
    /// Open the store at `path`, loading existing entries if the file exists
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let entries = DashMap::new();

        if path.exists() {
            let raw = fs::read_to_string(&path)?;
            if !raw.trim().is_empty() {
                let stored: BTreeMap<String, String> = serde_json::from_str(&raw)?;
                for (key, value) in stored {
                    entries.insert(key, value);
                }
            }
            tracing::debug!("Loaded {} storage entries from {}", entries.len(), path.display());
        }

        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StorageError> {
        let snapshot: BTreeMap<String, String> = self
            .entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string_pretty(&snapshot)?)?;
        Ok(())
    }
}

impl KeyValueStorage for JsonFileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        self.flush()
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.entries.clear();
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let storage = JsonFileStorage::open(&path).unwrap();
        storage.set("nftropoly-theme", "light").unwrap();
        drop(storage);

        let reopened = JsonFileStorage::open(&path).unwrap();
        assert_eq!(reopened.get("nftropoly-theme").as_deref(), Some("light"));

        reopened.clear().unwrap();
        let emptied = JsonFileStorage::open(&path).unwrap();
        assert!(emptied.get("nftropoly-theme").is_none());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(JsonFileStorage::open(&path), Err(StorageError::Encoding(_))));
    }
}
