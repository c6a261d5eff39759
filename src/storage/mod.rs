//! Single-slot persistence for the content library.
//!
//! The slot holds the whole record sequence, newest first, as one JSON
//! array. Reads never fail: a missing or corrupt slot loads as empty.
//!
//! # Storage Layout
//!
//! ```text
//! ~/.gist/
//! ├── extracted-content.json        # The slot (JSON array of records)
//! └── extracted-content.json.lock   # Writer lock
//! ```

pub mod file;
pub mod memory;

use thiserror::Error;

use crate::domain::ContentRecord;

pub use file::JsonFileStorage;
pub use memory::MemoryStorage;

/// Errors that can occur when writing the slot
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Synchronous key-value slot holding the record sequence
pub trait StorageAdapter: Send {
    /// Read the stored sequence; empty if nothing is stored or it is unreadable
    fn load(&self) -> Vec<ContentRecord>;

    /// Replace the stored sequence entirely
    fn save(&self, records: &[ContentRecord]) -> Result<(), StorageError>;

    /// Remove the slot
    fn clear(&self) -> Result<(), StorageError>;
}

/// Parse a slot payload, treating anything malformed as empty
pub(crate) fn decode(slot: &str, raw: &str) -> Vec<ContentRecord> {
    match serde_json::from_str(raw) {
        Ok(records) => records,
        Err(err) => {
            tracing::warn!(slot, "Failed to load stored content, starting empty: {}", err);
            Vec::new()
        }
    }
}
