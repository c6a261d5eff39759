//! In-memory storage slot.
//!
//! Holds the serialized payload exactly as the file backend would, so
//! corrupt payloads behave the same. Clones share the slot.

use std::sync::{Arc, Mutex};

use super::{decode, StorageAdapter, StorageError};
use crate::domain::ContentRecord;

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryStorage {
    /// An empty slot
    pub fn new() -> Self {
        Self::default()
    }

    /// A slot pre-filled with a raw payload
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(raw.into()))),
        }
    }

    /// Raw stored payload, if any
    pub fn raw(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }

    fn put(&self, value: Option<String>) -> Result<(), StorageError> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| std::io::Error::new(std::io::ErrorKind::Other, "storage slot poisoned"))?;
        *slot = value;
        Ok(())
    }
}

impl StorageAdapter for MemoryStorage {
    fn load(&self) -> Vec<ContentRecord> {
        match self.raw() {
            Some(raw) => decode("memory", &raw),
            None => Vec::new(),
        }
    }

    fn save(&self, records: &[ContentRecord]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(records)?;
        self.put(Some(raw))
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.put(None)
    }
}
