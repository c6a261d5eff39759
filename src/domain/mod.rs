//! Domain types for gist.
//!
//! - Content: extracted records and their IDs
//! - Filter: transient query criteria

pub mod content;
pub mod filter;

pub use content::{iso_millis, now_millis, ContentId, ContentRecord};
pub use filter::{DateRange, DomainFilter, FilterCriteria, ParseFilterError, SortBy, SortOrder};
