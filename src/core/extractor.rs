//! Submit-a-URL flow: validate, summarize, record.
//!
//! Each request runs as its own tokio task behind an `ExtractionHandle`.
//! Only the most recently started request may add a record: starting a new
//! one aborts the previous task, and a handle from an older generation is
//! reported as superseded even if its response already arrived.

use std::sync::Arc;

use thiserror::Error;
use tokio::task::{AbortHandle, JoinHandle};

use crate::adapters::{validate_url, Extraction, ExtractionError, Summarizer};
use crate::core::store::ContentStore;
use crate::domain::ContentRecord;
use crate::storage::StorageError;

/// Errors from the submit-a-URL flow
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Rejected before any request was made
    #[error("Please enter a valid URL (must start with http:// or https://)")]
    InvalidUrl(String),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("Failed to save extracted content: {0}")]
    Storage(#[from] StorageError),

    /// A newer extraction was started before this one was recorded
    #[error("Extraction of {0} was superseded by a newer request")]
    Superseded(String),

    #[error("Extraction of {0} was cancelled")]
    Cancelled(String),
}

/// A started extraction request
#[derive(Debug)]
pub struct ExtractionHandle {
    url: String,
    generation: u64,
    task: JoinHandle<Result<Extraction, ExtractionError>>,
}

impl ExtractionHandle {
    /// URL being extracted
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Abort the request; completing the handle then yields `Cancelled`
    pub fn cancel(&self) {
        self.task.abort();
    }

    /// Whether the response (or failure) has arrived
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Drives extractions into a content store
pub struct Extractor {
    summarizer: Arc<dyn Summarizer>,
    store: ContentStore,
    generation: u64,
    in_flight: Option<AbortHandle>,
}

impl Extractor {
    pub fn new(summarizer: Arc<dyn Summarizer>, store: ContentStore) -> Self {
        Self {
            summarizer,
            store,
            generation: 0,
            in_flight: None,
        }
    }

    pub fn store(&self) -> &ContentStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ContentStore {
        &mut self.store
    }

    pub fn into_store(self) -> ContentStore {
        self.store
    }

    /// True while the current request has not finished
    pub fn is_loading(&self) -> bool {
        self.in_flight
            .as_ref()
            .map_or(false, |task| !task.is_finished())
    }

    /// Validate `url` and start the request, superseding any earlier one.
    ///
    /// Must be called from within a tokio runtime.
    pub fn begin(&mut self, url: &str) -> Result<ExtractionHandle, ExtractError> {
        if !validate_url(url) {
            return Err(ExtractError::InvalidUrl(url.to_string()));
        }

        if let Some(previous) = self.in_flight.take() {
            if !previous.is_finished() {
                tracing::info!("Cancelling in-flight extraction for a newer request");
            }
            previous.abort();
        }

        self.generation += 1;
        let summarizer = Arc::clone(&self.summarizer);
        let target = url.to_string();
        let task = tokio::spawn(async move { summarizer.extract(&target).await });
        self.in_flight = Some(task.abort_handle());

        tracing::info!(url, summarizer = self.summarizer.name(), "Extraction started");
        Ok(ExtractionHandle {
            url: url.to_string(),
            generation: self.generation,
            task,
        })
    }

    /// Wait for `handle` and record its result if it is still the current request
    pub async fn complete(
        &mut self,
        handle: ExtractionHandle,
    ) -> Result<ContentRecord, ExtractError> {
        let ExtractionHandle {
            url,
            generation,
            task,
        } = handle;

        let outcome = task.await;

        if generation != self.generation {
            tracing::info!(url = %url, "Discarding superseded extraction");
            return Err(ExtractError::Superseded(url));
        }
        self.in_flight = None;

        let extraction = match outcome {
            Ok(result) => result?,
            Err(err) if err.is_cancelled() => return Err(ExtractError::Cancelled(url)),
            Err(err) => {
                tracing::error!(url = %url, "Extraction task failed: {}", err);
                return Err(ExtractionError::Failed.into());
            }
        };

        let record =
            self.store
                .add_from_extraction(&url, &extraction.summary, extraction.key_points)?;
        tracing::info!(id = %record.id, domain = %record.domain, "Extraction recorded");
        Ok(record)
    }

    /// Start and complete one extraction
    pub async fn extract(&mut self, url: &str) -> Result<ContentRecord, ExtractError> {
        let handle = self.begin(url)?;
        self.complete(handle).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Summarizer answering from the URL, counting calls
    #[derive(Default)]
    struct EchoSummarizer {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Summarizer for EchoSummarizer {
        fn name(&self) -> &str {
            "echo"
        }

        async fn extract(&self, url: &str) -> Result<Extraction, ExtractionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if url.contains("fail") {
                return Err(ExtractionError::Failed);
            }
            Ok(Extraction::new(
                format!("summary of {}", url),
                vec!["one".to_string(), "two".to_string()],
            ))
        }
    }

    fn extractor() -> (Arc<EchoSummarizer>, Extractor) {
        let summarizer = Arc::new(EchoSummarizer::default());
        let store = ContentStore::open(MemoryStorage::new());
        (summarizer.clone(), Extractor::new(summarizer, store))
    }

    #[tokio::test]
    async fn test_invalid_url_makes_no_request() {
        let (summarizer, mut extractor) = extractor();

        let err = extractor.extract("ftp://a.com").await.unwrap_err();

        assert!(matches!(err, ExtractError::InvalidUrl(_)));
        assert_eq!(summarizer.calls.load(Ordering::SeqCst), 0);
        assert!(extractor.store().is_empty());
    }

    #[tokio::test]
    async fn test_success_records_newest_first() {
        let (_, mut extractor) = extractor();

        extractor.extract("https://a.com/1").await.unwrap();
        let record = extractor.extract("https://b.com/2").await.unwrap();

        assert_eq!(record.summary, "summary of https://b.com/2");
        assert_eq!(record.key_points, vec!["one", "two"]);
        assert_eq!(record.domain, "b.com");
        assert_eq!(extractor.store().snapshot()[0], record);
        assert!(!extractor.is_loading());
    }

    #[tokio::test]
    async fn test_failure_records_nothing() {
        let (_, mut extractor) = extractor();

        let err = extractor.extract("https://fail.example.com").await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "Failed to extract content. Please check the URL and try again."
        );
        assert!(extractor.store().is_empty());
    }

    #[tokio::test]
    async fn test_superseded_request_is_not_recorded() {
        let (_, mut extractor) = extractor();

        let stale = extractor.begin("https://old.com").unwrap();
        let current = extractor.begin("https://new.com").unwrap();

        let err = extractor.complete(stale).await.unwrap_err();
        assert!(matches!(err, ExtractError::Superseded(url) if url == "https://old.com"));

        let record = extractor.complete(current).await.unwrap();
        assert_eq!(record.domain, "new.com");
        assert_eq!(extractor.store().len(), 1);
    }

    #[tokio::test]
    async fn test_cancelled_request_is_not_recorded() {
        let (_, mut extractor) = extractor();

        let handle = extractor.begin("https://a.com").unwrap();
        handle.cancel();
        let result = extractor.complete(handle).await;

        // The task may have finished before the abort landed
        match result {
            Err(ExtractError::Cancelled(url)) => {
                assert_eq!(url, "https://a.com");
                assert!(extractor.store().is_empty());
            }
            Ok(record) => assert_eq!(extractor.store().snapshot()[0], record),
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
}
