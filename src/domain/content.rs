//! Extracted content records.
//!
//! A record is created once from a successful extraction and never changes
//! afterwards. The serialized shape (camelCase keys, millisecond ISO-8601
//! timestamps) is what the storage slot and the exports carry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::adapters::domain_of;

/// Content identifier (epoch milliseconds at creation, as a decimal string)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(String);

impl ContentId {
    /// Create an ID from a creation timestamp in epoch milliseconds
    pub fn from_millis(millis: i64) -> Self {
        Self(millis.to_string())
    }

    /// Wrap an existing ID string (e.g. one typed on the command line)
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Numeric value, if the ID was issued from a timestamp
    pub fn as_millis(&self) -> Option<i64> {
        self.0.parse().ok()
    }

    /// Get the raw string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One extracted-and-summarized URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    /// Unique within the store
    pub id: ContentId,

    /// Absolute http(s) URL that was summarized
    pub url: String,

    /// Summary text returned by the API
    pub summary: String,

    /// Key points in display order
    #[serde(default)]
    pub key_points: Vec<String>,

    /// When the record was created
    #[serde(with = "iso_millis")]
    pub extracted_at: DateTime<Utc>,

    /// Hostname of `url`, fixed at creation
    pub domain: String,

    /// Optional title (stored, never interpreted)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl ContentRecord {
    /// Create a record; the domain is derived from the URL here and nowhere else
    pub fn new(
        id: ContentId,
        url: impl Into<String>,
        summary: impl Into<String>,
        key_points: Vec<String>,
        extracted_at: DateTime<Utc>,
    ) -> Self {
        let url = url.into();
        let domain = domain_of(&url);
        Self {
            id,
            url,
            summary: summary.into(),
            key_points,
            extracted_at,
            domain,
            title: None,
        }
    }

    /// Attach a title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Summary length in `char`s (the `length` sort key)
    pub fn summary_len(&self) -> usize {
        self.summary.chars().count()
    }
}

/// Current time truncated to the millisecond precision records are stored with
pub fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

/// Serde adapter writing `2024-05-01T12:00:00.000Z` and reading any RFC 3339 timestamp
pub mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|at| at.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
