//! HTTP client for the summarization API.
//!
//! Endpoint: POST {base_url}/extract
//! Body: {"url": "<string>"}
//! Response: {"summary": "<string>", "keyPoints": ["<string>", ...]}

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;

use super::{Extraction, ExtractionError, Summarizer};
use crate::config::ResolvedConfig;

/// Summarization API client
pub struct ExtractionClient {
    endpoint: String,
    client: reqwest::Client,
}

/// Request payload
#[derive(Debug, Serialize)]
struct ExtractRequest<'a> {
    url: &'a str,
}

impl ExtractionClient {
    /// Create a client for the API rooted at `base_url`
    pub fn new(base_url: &str) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Create a client that sends requests through `client`
    pub fn with_client(base_url: &str, client: reqwest::Client) -> Self {
        Self {
            endpoint: format!("{}/extract", base_url.trim_end_matches('/')),
            client,
        }
    }

    /// Create from resolved configuration
    pub fn from_config(config: &ResolvedConfig) -> Result<Self, ExtractionError> {
        config
            .api_url
            .as_deref()
            .map(Self::new)
            .ok_or(ExtractionError::NotConfigured)
    }

    /// Full URL requests are posted to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post(&self, url: &str) -> Result<Extraction> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&ExtractRequest { url })
            .send()
            .await
            .context("Failed to reach extraction API")?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("Extraction API error ({}): {}", status, text.trim())
        }

        response
            .json()
            .await
            .context("Failed to parse extraction response")
    }
}

#[async_trait]
impl Summarizer for ExtractionClient {
    fn name(&self) -> &str {
        "http"
    }

    async fn extract(&self, url: &str) -> Result<Extraction, ExtractionError> {
        tracing::debug!(endpoint = %self.endpoint, url, "Requesting extraction");

        self.post(url).await.map_err(|err| {
            tracing::error!(endpoint = %self.endpoint, url, "Content extraction failed: {:#}", err);
            ExtractionError::Failed
        })
    }
}
