//! JSON file backing for the storage slot.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use fs2::FileExt;
use tempfile::NamedTempFile;

use super::{decode, StorageAdapter, StorageError};
use crate::domain::ContentRecord;

/// Storage slot kept in a single JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Use the file at `path` as the slot
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Open the slot in the configured location (~/.gist/extracted-content.json)
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(crate::config::storage_path()?))
    }

    /// Path of the slot file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn slot_name(&self) -> String {
        self.path.display().to_string()
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".lock");
        PathBuf::from(name)
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// Hold the writer lock for the duration of `f`
    fn with_lock<T>(
        &self,
        f: impl FnOnce() -> Result<T, StorageError>,
    ) -> Result<T, StorageError> {
        fs::create_dir_all(self.parent_dir())?;

        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.lock_path())?;
        lock.lock_exclusive()?;

        let result = f();

        if let Err(err) = FileExt::unlock(&lock) {
            tracing::warn!(slot = %self.slot_name(), "Failed to release storage lock: {}", err);
        }
        result
    }
}

impl StorageAdapter for JsonFileStorage {
    fn load(&self) -> Vec<ContentRecord> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => decode(&self.slot_name(), &raw),
            Err(err) if err.kind() == ErrorKind::NotFound => Vec::new(),
            Err(err) => {
                tracing::warn!(slot = %self.slot_name(), "Failed to read stored content: {}", err);
                Vec::new()
            }
        }
    }

    fn save(&self, records: &[ContentRecord]) -> Result<(), StorageError> {
        let payload = serde_json::to_vec(records)?;

        self.with_lock(|| {
            // Write beside the slot, then rename over it
            let mut tmp = NamedTempFile::new_in(self.parent_dir())?;
            tmp.write_all(&payload)?;
            tmp.as_file().sync_all()?;
            tmp.persist(&self.path).map_err(|e| e.error)?;
            Ok(())
        })?;

        tracing::debug!(slot = %self.slot_name(), count = records.len(), "Saved content");
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.with_lock(|| match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        })?;

        tracing::debug!(slot = %self.slot_name(), "Cleared stored content");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    use crate::domain::ContentId;

    fn append(path: &Path, text: &str) {
        let mut file = OpenOptions::new().append(true).open(path).unwrap();
        file.write_all(text.as_bytes()).unwrap();
    }

    fn record(millis: i64, url: &str) -> ContentRecord {
        ContentRecord::new(
            ContentId::from_millis(millis),
            url,
            format!("summary of {}", url),
            vec!["point".to_string()],
            Utc.timestamp_millis_opt(millis).unwrap(),
        )
    }

    #[test]
    fn test_missing_slot_loads_empty() {
        let temp = TempDir::new().unwrap();
        let storage = JsonFileStorage::new(temp.path().join("nothing.json"));
        assert!(storage.load().is_empty());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let temp = TempDir::new().unwrap();
        let storage = JsonFileStorage::new(temp.path().join("nested").join("slot.json"));
        let records = vec![
            record(1_700_000_002_000, "https://b.com/2"),
            record(1_700_000_001_000, "https://a.com/1").with_title("First"),
        ];

        storage.save(&records).unwrap();

        assert_eq!(storage.load(), records);
    }

    #[test]
    fn test_save_overwrites() {
        let temp = TempDir::new().unwrap();
        let storage = JsonFileStorage::new(temp.path().join("slot.json"));

        storage
            .save(&[record(1, "https://a.com"), record(2, "https://b.com")])
            .unwrap();
        storage.save(&[record(3, "https://c.com")]).unwrap();

        let loaded = storage.load();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].domain, "c.com");
    }

    #[test]
    fn test_corrupt_slot_loads_empty() {
        let temp = TempDir::new().unwrap();
        let storage = JsonFileStorage::new(temp.path().join("slot.json"));

        storage.save(&[record(1, "https://a.com")]).unwrap();
        append(storage.path(), "garbage");

        assert!(storage.load().is_empty());
    }

    #[test]
    fn test_clear_removes_slot() {
        let temp = TempDir::new().unwrap();
        let storage = JsonFileStorage::new(temp.path().join("slot.json"));

        storage.save(&[record(1, "https://a.com")]).unwrap();
        storage.clear().unwrap();

        assert!(!storage.path().exists());
        assert!(storage.load().is_empty());

        // Clearing an empty slot is fine
        storage.clear().unwrap();
    }
}
