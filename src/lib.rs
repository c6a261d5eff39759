//! gist - Summarize web pages and keep a searchable library of the results
//!
//! URLs are sent to a remote summarization API; each result becomes a
//! record in a local, single-slot JSON library that can be searched,
//! filtered, sorted and exported.
//!
//! # Architecture
//!
//! - Records are created once and never modified
//! - The library is stored newest-first as a single JSON array
//! - Every change is written through before it becomes visible
//!
//! # Modules
//!
//! - `adapters`: Summarization API client and URL helpers
//! - `core`: Content store, query engine, extractor, exports
//! - `domain`: Data structures (ContentRecord, FilterCriteria)
//! - `storage`: Storage slot backends
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Summarize a page
//! GIST_API_URL=https://summarizer.example.com gist extract https://example.com/article
//!
//! # Browse
//! gist list --search rust --range week --sort length --order asc
//!
//! # Export everything
//! gist export -o ./exports
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod storage;

// Re-export main types at crate root for convenience
pub use adapters::{domain_of, validate_url, Extraction, ExtractionClient, ExtractionError, Summarizer};
pub use core::{ContentStore, ExtractError, Extractor};
pub use domain::{ContentId, ContentRecord, DateRange, DomainFilter, FilterCriteria, SortBy, SortOrder};
pub use storage::{JsonFileStorage, MemoryStorage, StorageAdapter, StorageError};
