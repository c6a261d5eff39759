//! Filter criteria for browsing the content library.
//!
//! Criteria are transient: they are built per query and never persisted.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error for unrecognized filter values
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown {kind}: {value}")]
pub struct ParseFilterError {
    kind: &'static str,
    value: String,
}

impl ParseFilterError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Domain restriction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DomainFilter {
    /// No restriction
    #[default]
    All,

    /// Keep records whose domain equals this value exactly
    Exact(String),
}

impl DomainFilter {
    /// Build from a UI value, where `"all"` (or nothing) is the sentinel
    pub fn from_value(value: &str) -> Self {
        if value.is_empty() || value == "all" {
            DomainFilter::All
        } else {
            DomainFilter::Exact(value.to_string())
        }
    }
}

/// Relative time window measured against the current wall clock
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateRange {
    #[default]
    All,
    /// Since local midnight
    Today,
    /// Last 7 calendar days
    Week,
    /// Last calendar month
    Month,
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateRange::All => write!(f, "all"),
            DateRange::Today => write!(f, "today"),
            DateRange::Week => write!(f, "week"),
            DateRange::Month => write!(f, "month"),
        }
    }
}

impl std::str::FromStr for DateRange {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(DateRange::All),
            "today" => Ok(DateRange::Today),
            "week" => Ok(DateRange::Week),
            "month" => Ok(DateRange::Month),
            _ => Err(ParseFilterError::new("date range", s)),
        }
    }
}

/// Sort key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Date,
    Domain,
    /// Summary length in Unicode scalar values (`char`s), not UTF-16 units;
    /// text outside the Basic Multilingual Plane counts once per character
    Length,
}

impl std::fmt::Display for SortBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortBy::Date => write!(f, "date"),
            SortBy::Domain => write!(f, "domain"),
            SortBy::Length => write!(f, "length"),
        }
    }
}

impl std::str::FromStr for SortBy {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "date" => Ok(SortBy::Date),
            "domain" => Ok(SortBy::Domain),
            "length" => Ok(SortBy::Length),
            _ => Err(ParseFilterError::new("sort key", s)),
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    #[serde(rename = "asc")]
    Asc,
    #[default]
    #[serde(rename = "desc")]
    Desc,
}

impl SortOrder {
    /// The other direction (the sort toggle)
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "asc"),
            SortOrder::Desc => write!(f, "desc"),
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Asc),
            "desc" | "descending" => Ok(SortOrder::Desc),
            _ => Err(ParseFilterError::new("sort order", s)),
        }
    }
}

/// Which records to show and in what order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Case-insensitive substring; empty means no text filtering
    pub search: String,

    pub domain: DomainFilter,

    pub date_range: DateRange,

    pub sort_by: SortBy,

    pub sort_order: SortOrder,
}

impl FilterCriteria {
    /// Criteria matching everything, newest first
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_domain(mut self, domain: DomainFilter) -> Self {
        self.domain = domain;
        self
    }

    pub fn with_date_range(mut self, date_range: DateRange) -> Self {
        self.date_range = date_range;
        self
    }

    pub fn sorted(mut self, sort_by: SortBy, sort_order: SortOrder) -> Self {
        self.sort_by = sort_by;
        self.sort_order = sort_order;
        self
    }

    /// True when any filter (not just sorting) narrows the result
    pub fn is_filtered(&self) -> bool {
        !self.search.is_empty()
            || self.domain != DomainFilter::All
            || self.date_range != DateRange::All
    }
}
