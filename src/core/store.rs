//! The content store: the in-memory record sequence and its persistence.
//!
//! Every mutation builds the next sequence, saves exactly that sequence,
//! and only then makes it current. A failed save leaves the store as it
//! was, so memory and the storage slot never disagree.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::watch;

use crate::domain::{now_millis, ContentId, ContentRecord};
use crate::storage::{StorageAdapter, StorageError};

/// Failure to resolve a user-supplied ID or prefix
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("Content not found: {0}")]
    NotFound(String),

    #[error("Ambiguous ID prefix '{prefix}': {matches} matches")]
    Ambiguous { prefix: String, matches: usize },
}

/// Owner of the newest-first record sequence
pub struct ContentStore {
    storage: Box<dyn StorageAdapter>,
    records: Vec<ContentRecord>,
    revision: watch::Sender<u64>,
}

impl ContentStore {
    /// Open a store over `storage`, loading whatever it holds
    pub fn open(storage: impl StorageAdapter + 'static) -> Self {
        Self::from_boxed(Box::new(storage))
    }

    /// Open a store over an already boxed adapter
    pub fn from_boxed(storage: Box<dyn StorageAdapter>) -> Self {
        let records = storage.load();
        tracing::debug!(count = records.len(), "Loaded content store");
        let (revision, _) = watch::channel(0);
        Self {
            storage,
            records,
            revision,
        }
    }

    /// Current records, newest first
    pub fn snapshot(&self) -> &[ContentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Get a record by exact ID
    pub fn get(&self, id: &ContentId) -> Option<&ContentRecord> {
        self.records.iter().find(|r| &r.id == id)
    }

    /// Resolve an exact ID, or a prefix matching exactly one ID
    pub fn find_by_prefix(&self, prefix: &str) -> Result<&ContentRecord, LookupError> {
        if prefix.is_empty() {
            return Err(LookupError::NotFound(prefix.to_string()));
        }
        if let Some(record) = self.get(&ContentId::new(prefix)) {
            return Ok(record);
        }

        let mut candidates = self
            .records
            .iter()
            .filter(|r| r.id.as_str().starts_with(prefix));
        let first = candidates.next();
        match (first, candidates.count()) {
            (None, _) => Err(LookupError::NotFound(prefix.to_string())),
            (Some(record), 0) => Ok(record),
            (Some(_), rest) => Err(LookupError::Ambiguous {
                prefix: prefix.to_string(),
                matches: rest + 1,
            }),
        }
    }

    /// Receive the revision counter, bumped after every successful mutation
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Current revision
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    /// Record a successful extraction as the newest entry
    pub fn add_from_extraction(
        &mut self,
        url: &str,
        summary: &str,
        key_points: Vec<String>,
    ) -> Result<ContentRecord, StorageError> {
        self.add_from_extraction_at(url, summary, key_points, now_millis())
    }

    /// Same as `add_from_extraction` with an explicit creation time
    pub fn add_from_extraction_at(
        &mut self,
        url: &str,
        summary: &str,
        key_points: Vec<String>,
        extracted_at: DateTime<Utc>,
    ) -> Result<ContentRecord, StorageError> {
        let id = self.next_id(extracted_at);
        let record = ContentRecord::new(id, url, summary, key_points, extracted_at);

        let mut next = Vec::with_capacity(self.records.len() + 1);
        next.push(record.clone());
        next.extend(self.records.iter().cloned());
        self.commit(next)?;

        tracing::debug!(id = %record.id, domain = %record.domain, "Added content");
        Ok(record)
    }

    /// Remove the record with `id`; absent IDs are a no-op
    pub fn remove(&mut self, id: &ContentId) -> Result<(), StorageError> {
        if self.get(id).is_none() {
            return Ok(());
        }

        let next: Vec<ContentRecord> = self
            .records
            .iter()
            .filter(|r| &r.id != id)
            .cloned()
            .collect();
        self.commit(next)?;

        tracing::debug!(%id, "Removed content");
        Ok(())
    }

    /// Drop every record and the storage slot itself
    pub fn clear_all(&mut self) -> Result<(), StorageError> {
        self.storage.clear()?;
        self.records = Vec::new();
        self.bump();

        tracing::debug!("Cleared all content");
        Ok(())
    }

    /// Persist `next`, then make it current
    fn commit(&mut self, next: Vec<ContentRecord>) -> Result<(), StorageError> {
        self.storage.save(&next)?;
        self.records = next;
        self.bump();
        Ok(())
    }

    fn bump(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }

    /// Timestamp-based ID, nudged forward past any ID already held
    fn next_id(&self, at: DateTime<Utc>) -> ContentId {
        let mut millis = at.timestamp_millis();
        while self
            .records
            .iter()
            .any(|r| r.id.as_millis() == Some(millis))
        {
            millis += 1;
        }
        ContentId::from_millis(millis)
    }
}

impl std::fmt::Debug for ContentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentStore")
            .field("records", &self.records.len())
            .field("revision", &self.revision())
            .finish()
    }
}
