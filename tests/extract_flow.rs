//! Extraction Flow Integration Tests
//!
//! Drives the extractor against a stub API and a file-backed library.

mod common;

use std::sync::Arc;

use gist::core::export::{write_document, BulkExport};
use gist::{ContentStore, ExtractError, ExtractionError, Extractor, JsonFileStorage, StorageAdapter};
use tempfile::TempDir;

fn extractor(base_url: &str, temp: &TempDir) -> (Extractor, JsonFileStorage) {
    let storage = JsonFileStorage::new(temp.path().join("extracted-content.json"));
    let store = ContentStore::open(storage.clone());
    let client = common::loopback_client(base_url);
    (Extractor::new(Arc::new(client), store), storage)
}

#[tokio::test]
async fn test_extract_records_and_persists() {
    let temp = TempDir::new().unwrap();
    let (base_url, _server) = common::serve_once(
        "200 OK",
        r#"{"summary":"Borrowing explained.","keyPoints":["* Shared refs","Mutable refs"]}"#,
    )
    .await;
    let (mut extractor, storage) = extractor(&base_url, &temp);

    let record = extractor
        .extract("https://doc.rust-lang.org/book/ch04-02.html")
        .await
        .unwrap();

    assert_eq!(record.domain, "doc.rust-lang.org");
    assert_eq!(record.summary, "Borrowing explained.");
    assert_eq!(record.key_points, vec!["* Shared refs", "Mutable refs"]);
    assert!(!extractor.is_loading());
    assert_eq!(extractor.store().snapshot(), &[record.clone()]);
    assert_eq!(storage.load(), vec![record]);
}

#[tokio::test]
async fn test_invalid_url_never_reaches_api() {
    let temp = TempDir::new().unwrap();
    let (mut extractor, storage) = extractor(&common::closed_port().await, &temp);

    let err = extractor.extract("ftp://example.com").await.unwrap_err();

    assert!(matches!(err, ExtractError::InvalidUrl(_)));
    assert_eq!(
        err.to_string(),
        "Please enter a valid URL (must start with http:// or https://)"
    );
    assert!(storage.load().is_empty());
}

#[tokio::test]
async fn test_api_failure_leaves_library_untouched() {
    let temp = TempDir::new().unwrap();
    let (base_url, _server) = common::serve_once("502 Bad Gateway", "upstream down").await;
    let (mut extractor, storage) = extractor(&base_url, &temp);

    let err = extractor.extract("https://example.com").await.unwrap_err();

    assert!(matches!(err, ExtractError::Extraction(ExtractionError::Failed)));
    assert!(extractor.store().is_empty());
    assert!(storage.load().is_empty());
}

#[tokio::test]
async fn test_bulk_export_of_extracted_library() {
    let temp = TempDir::new().unwrap();
    let (base_url, _server) =
        common::serve_once("200 OK", r#"{"summary":"S","keyPoints":["P"]}"#).await;
    let (mut extractor, _storage) = extractor(&base_url, &temp);
    extractor.extract("https://example.com/a").await.unwrap();

    let export = BulkExport::new(extractor.store().snapshot(), chrono::Utc::now());
    let out = temp.path().join("exports");
    let path = write_document(&out, &export.file_name(), &export).await.unwrap();

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(written["totalItems"], 1);
    assert_eq!(written["contents"][0]["domain"], "example.com");
    assert!(written["contents"][0].get("id").is_none());
}
