//! JSON export documents.
//!
//! - Bulk: `content-extraction-export-<YYYY-MM-DD>.json` holding every record
//!   without its ID, plus the export time and item count.
//! - Single: `content-<domain>-<epoch-ms>.json` holding one record's
//!   url, summary, key points and extraction time.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::domain::{iso_millis, ContentRecord};

/// A record as it appears in a bulk export (everything but the ID)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedRecord {
    pub url: String,
    pub summary: String,
    pub key_points: Vec<String>,
    #[serde(with = "iso_millis")]
    pub extracted_at: DateTime<Utc>,
    pub domain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl From<&ContentRecord> for ExportedRecord {
    fn from(record: &ContentRecord) -> Self {
        Self {
            url: record.url.clone(),
            summary: record.summary.clone(),
            key_points: record.key_points.clone(),
            extracted_at: record.extracted_at,
            domain: record.domain.clone(),
            title: record.title.clone(),
        }
    }
}

/// Whole-library export document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkExport {
    #[serde(with = "iso_millis")]
    pub exported_at: DateTime<Utc>,
    pub total_items: usize,
    pub contents: Vec<ExportedRecord>,
}

impl BulkExport {
    /// Export `records` in their current (newest-first) order
    pub fn new(records: &[ContentRecord], exported_at: DateTime<Utc>) -> Self {
        Self {
            exported_at,
            total_items: records.len(),
            contents: records.iter().map(ExportedRecord::from).collect(),
        }
    }

    /// `content-extraction-export-<YYYY-MM-DD>.json` (UTC date)
    pub fn file_name(&self) -> String {
        format!(
            "content-extraction-export-{}.json",
            self.exported_at.format("%Y-%m-%d")
        )
    }
}

/// Single-record export document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordExport {
    pub url: String,
    pub summary: String,
    pub key_points: Vec<String>,
    #[serde(with = "iso_millis")]
    pub extracted_at: DateTime<Utc>,
}

impl RecordExport {
    pub fn new(record: &ContentRecord) -> Self {
        Self {
            url: record.url.clone(),
            summary: record.summary.clone(),
            key_points: record.key_points.clone(),
            extracted_at: record.extracted_at,
        }
    }

    /// `content-<domain>-<epoch-ms>.json`, stamped with the export time
    pub fn file_name(domain: &str, exported_at: DateTime<Utc>) -> String {
        format!("content-{}-{}.json", domain, exported_at.timestamp_millis())
    }
}

/// Clipboard payload: summary and key points only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyPayload {
    pub summary: String,
    pub key_points: Vec<String>,
}

impl From<&ContentRecord> for CopyPayload {
    fn from(record: &ContentRecord) -> Self {
        Self {
            summary: record.summary.clone(),
            key_points: record.key_points.clone(),
        }
    }
}

/// Pretty-print `document` (2-space indent) as `dir/file_name`
pub async fn write_document<T: Serialize>(
    dir: &Path,
    file_name: &str,
    document: &T,
) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create export directory: {}", dir.display()))?;

    let path = dir.join(file_name);
    let content = serde_json::to_string_pretty(document).context("Failed to serialize export")?;
    fs::write(&path, content)
        .await
        .with_context(|| format!("Failed to write export: {}", path.display()))?;

    Ok(path)
}
