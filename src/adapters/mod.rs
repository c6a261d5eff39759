//! Adapter interfaces for external systems.
//!
//! The only external system is the remote summarization API. The
//! `Summarizer` trait is the seam the extractor talks to; `ExtractionClient`
//! is the HTTP implementation.

pub mod extraction;
pub mod urls;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use extraction::ExtractionClient;
pub use urls::{domain_of, validate_url, UNKNOWN_DOMAIN};

/// Message shown for every failed extraction, whatever the cause
pub const EXTRACTION_FAILED_MESSAGE: &str =
    "Failed to extract content. Please check the URL and try again.";

/// Errors surfaced by a summarizer
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Transport failure, non-2xx status or undecodable body (cause is logged)
    #[error("{}", EXTRACTION_FAILED_MESSAGE)]
    Failed,

    #[error("Extraction API URL is not configured (set GIST_API_URL or api.base_url)")]
    NotConfigured,
}

/// Successful response from the summarization API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extraction {
    pub summary: String,

    #[serde(default)]
    pub key_points: Vec<String>,
}

impl Extraction {
    pub fn new(summary: impl Into<String>, key_points: Vec<String>) -> Self {
        Self {
            summary: summary.into(),
            key_points,
        }
    }
}

/// Anything that can turn a URL into a summary
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Human-readable summarizer name
    fn name(&self) -> &str;

    /// Summarize the page at `url` with exactly one request
    async fn extract(&self, url: &str) -> Result<Extraction, ExtractionError>;
}
