//! Core library logic.
//!
//! This module contains:
//! - ContentStore: The record sequence and its persistence
//! - Query: Filtering and sorting for display
//! - Extractor: Validate, summarize and record a URL
//! - Export: JSON export documents

pub mod export;
pub mod extractor;
pub mod query;
pub mod store;

// Re-export commonly used types
pub use export::{BulkExport, CopyPayload, ExportedRecord, RecordExport};
pub use extractor::{ExtractError, ExtractionHandle, Extractor};
pub use query::{apply, apply_at, available_domains, QueryView};
pub use store::{ContentStore, LookupError};
