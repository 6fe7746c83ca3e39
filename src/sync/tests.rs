use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use super::*;
use crate::embedding::{Embedder, SentenceEmbedder};
use crate::hashing::{ContentAddress, derive_content_address};
use crate::index::SemanticIndex;
use crate::normalize::TextNormalizer;
use crate::vectordb::{IndexPoint, MockVectorIndex, SearchHit, VectorDbError, VectorIndex};

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

fn record(n: i64, url: &str, title: &str) -> SourceRecord {
    SourceRecord::new(
        url,
        title,
        Some(format!("Summary {} - PTI", n)),
        "The Hindu",
        base_time() + Duration::minutes(n),
    )
}

fn records(count: i64) -> Vec<SourceRecord> {
    (0..count)
        .map(|n| record(n, &format!("https://news.example/{}", n), &format!("Story {}", n)))
        .collect()
}

async fn index() -> SemanticIndex<MockVectorIndex> {
    let embedder: Arc<dyn Embedder> = Arc::new(SentenceEmbedder::stub().unwrap());
    let index = SemanticIndex::new(MockVectorIndex::new(), embedder, "news_facts");
    index.ensure_collection().await.unwrap();
    index
}

fn synchronizer(window: usize, chunk_size: usize) -> IncrementalSynchronizer {
    IncrementalSynchronizer::new(SyncConfig::new(window, chunk_size), TextNormalizer::default())
        .unwrap()
}

#[test]
fn test_config_rejects_zero_chunk() {
    let result = IncrementalSynchronizer::new(SyncConfig::new(10, 0), TextNormalizer::default());
    assert!(matches!(result, Err(SyncError::InvalidConfig { .. })));
}

#[test]
fn test_config_defaults() {
    let config = SyncConfig::default();
    assert_eq!(config.window, 5000);
    assert_eq!(config.chunk_size, 500);
    assert_eq!(config.with_window(7).window, 7);
}

#[test]
fn test_parse_timestamp_layouts() {
    let expected = base_time();
    assert_eq!(parse_timestamp("2024-05-01 12:00:00"), Some(expected));
    assert_eq!(parse_timestamp("2024-05-01T12:00:00Z"), Some(expected));
    assert_eq!(parse_timestamp("2024-05-01T12:00:00"), Some(expected));
    assert_eq!(
        parse_timestamp("2024-05-01 12:00:00.250000"),
        Some(expected + Duration::milliseconds(250))
    );
    assert_eq!(
        parse_timestamp("2024-05-01"),
        Some(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap())
    );
    assert_eq!(parse_timestamp("yesterday"), None);
}

#[test]
fn test_entry_for_normalizes_and_keys_by_url() {
    let sync = synchronizer(10, 10);
    let rec = SourceRecord::new(
        "https://news.example/quake",
        "Earthquake hits region - The Hindu",
        None,
        "The Hindu",
        base_time(),
    );

    let entry = sync.entry_for(&rec);
    assert_eq!(entry.id, derive_content_address("https://news.example/quake"));
    assert_eq!(entry.document_text, "Earthquake hits region | ");
    assert_eq!(entry.metadata.source, "The Hindu");
    assert_eq!(entry.metadata.date, "2024-05-01 12:00:00");
}

#[tokio::test]
async fn test_sync_inserts_new_records() {
    let index = index().await;
    let source = StaticRecordSource::new(records(7));

    let report = synchronizer(100, 3).sync(&index, &source).await.unwrap();

    assert_eq!(report.scanned, 7);
    assert_eq!(report.new_count, 7);
    assert_eq!(report.committed_chunks, 3);
    assert_eq!(report.total_count, 7);
    assert!(!report.is_partial());
    assert!(!report.source_unavailable);
}

#[tokio::test]
async fn test_sync_is_idempotent() {
    let index = index().await;
    let source = StaticRecordSource::new(records(5));
    let sync = synchronizer(100, 2);

    let first = sync.sync(&index, &source).await.unwrap();
    let calls_after_first = index.backend().upsert_calls();
    let second = sync.sync(&index, &source).await.unwrap();

    assert_eq!(first.new_count, 5);
    assert_eq!(second.new_count, 0);
    assert_eq!(second.skipped_existing, 5);
    assert_eq!(second.total_count, first.total_count);
    assert_eq!(index.backend().upsert_calls(), calls_after_first);
}

#[tokio::test]
async fn test_sync_respects_window_newest_first() {
    let index = index().await;
    let source = StaticRecordSource::new(records(10));

    let report = synchronizer(4, 10).sync(&index, &source).await.unwrap();

    assert_eq!(report.scanned, 4);
    assert_eq!(report.new_count, 4);
    let ids = index.existing_ids().await.unwrap();
    for n in 6..10 {
        assert!(ids.contains(&derive_content_address(&format!("https://news.example/{}", n))));
    }
    assert!(!ids.contains(&derive_content_address("https://news.example/0")));
}

#[tokio::test]
async fn test_sync_window_override() {
    let index = index().await;
    let source = StaticRecordSource::new(records(10));

    let report = synchronizer(4, 10)
        .sync_window(&index, &source, 2)
        .await
        .unwrap();
    assert_eq!(report.window, 2);
    assert_eq!(report.new_count, 2);
}

#[tokio::test]
async fn test_duplicate_url_first_in_window_wins() {
    let index = index().await;
    let url = "https://news.example/updated";
    let source = StaticRecordSource::new(vec![
        record(1, url, "Original headline"),
        record(5, url, "Updated headline"),
        record(3, "https://news.example/other", "Other story"),
    ]);

    let report = synchronizer(10, 10).sync(&index, &source).await.unwrap();

    assert_eq!(report.new_count, 2);
    assert_eq!(report.skipped_duplicate, 1);
    let stored = index
        .backend()
        .entry(index.collection(), &derive_content_address(url))
        .unwrap();
    assert!(stored.document_text.starts_with("Updated headline"));
}

#[tokio::test]
async fn test_first_indexed_version_is_never_overwritten() {
    let index = index().await;
    let url = "https://news.example/story";
    let sync = synchronizer(10, 10);

    sync.sync(&index, &StaticRecordSource::new(vec![record(1, url, "First version")]))
        .await
        .unwrap();
    let report = sync
        .sync(&index, &StaticRecordSource::new(vec![record(9, url, "Second version")]))
        .await
        .unwrap();

    assert_eq!(report.new_count, 0);
    assert_eq!(report.skipped_existing, 1);
    let stored = index
        .backend()
        .entry(index.collection(), &derive_content_address(url))
        .unwrap();
    assert!(stored.document_text.starts_with("First version"));
}

#[tokio::test]
async fn test_chunk_size_does_not_change_final_state() {
    let mut snapshots = Vec::new();
    for chunk_size in [1, 3, 500] {
        let index = index().await;
        let source = StaticRecordSource::new(records(8));
        let report = synchronizer(100, chunk_size)
            .sync(&index, &source)
            .await
            .unwrap();
        assert_eq!(report.new_count, 8);

        let mut ids: Vec<_> = index.existing_ids().await.unwrap().into_iter().collect();
        ids.sort();
        snapshots.push(ids);
    }
    assert!(snapshots.windows(2).all(|w| w[0] == w[1]));
}

#[tokio::test]
async fn test_failed_chunk_keeps_earlier_commits() {
    let index = index().await;
    index.backend().fail_upsert_call(1);
    let source = StaticRecordSource::new(records(6));

    let report = synchronizer(100, 2).sync(&index, &source).await.unwrap();

    assert!(report.is_partial());
    assert_eq!(report.committed_chunks, 2);
    assert_eq!(report.new_count, 4);
    assert_eq!(report.failed_chunks.len(), 1);
    assert_eq!(report.failed_chunks[0].chunk_index, 1);
    assert_eq!(report.failed_entries(), 2);
    assert_eq!(report.total_count, 4);
}

#[tokio::test]
async fn test_failed_chunk_is_retried_next_sync() {
    let index = index().await;
    index.backend().fail_upsert_call(0);
    let source = StaticRecordSource::new(records(3));
    let sync = synchronizer(100, 10);

    let first = sync.sync(&index, &source).await.unwrap();
    let second = sync.sync(&index, &source).await.unwrap();

    assert_eq!(first.new_count, 0);
    assert_eq!(second.new_count, 3);
    assert_eq!(second.total_count, 3);
}

#[tokio::test]
async fn test_unavailable_source_is_noop() {
    let index = index().await;
    let report = synchronizer(100, 10)
        .sync(&index, &StaticRecordSource::unavailable())
        .await
        .unwrap();

    assert!(report.source_unavailable);
    assert_eq!(report.new_count, 0);
    assert_eq!(report.total_count, 0);
    assert_eq!(index.backend().upsert_calls(), 0);
}

#[tokio::test]
async fn test_empty_source_is_noop() {
    let index = index().await;
    let report = synchronizer(100, 10)
        .sync(&index, &StaticRecordSource::default())
        .await
        .unwrap();

    assert!(!report.source_unavailable);
    assert_eq!(report.scanned, 0);
    assert_eq!(index.backend().upsert_calls(), 0);
}

#[tokio::test]
async fn test_unreachable_index_is_an_error() {
    let index = index().await;
    index.backend().set_unreachable(true);

    let result = synchronizer(100, 10)
        .sync(&index, &StaticRecordSource::new(records(2)))
        .await;
    assert!(matches!(result, Err(SyncError::Index(_))));
}

/// In-memory backend that stops answering after a number of upserts.
struct DropsAfterUpserts {
    inner: MockVectorIndex,
    healthy_upserts: usize,
}

impl VectorIndex for DropsAfterUpserts {
    async fn is_ready(&self) -> bool {
        self.inner.is_ready().await
    }

    async fn ensure_collection(&self, name: &str, vector_size: u64) -> Result<(), VectorDbError> {
        self.inner.ensure_collection(name, vector_size).await
    }

    async fn upsert_points(
        &self,
        collection: &str,
        points: Vec<IndexPoint>,
    ) -> Result<(), VectorDbError> {
        let result = self.inner.upsert_points(collection, points).await;
        if self.inner.upsert_calls() >= self.healthy_upserts {
            self.inner.set_unreachable(true);
        }
        result
    }

    async fn list_ids(&self, collection: &str) -> Result<HashSet<ContentAddress>, VectorDbError> {
        self.inner.list_ids(collection).await
    }

    async fn count(&self, collection: &str) -> Result<u64, VectorDbError> {
        self.inner.count(collection).await
    }

    async fn search(
        &self,
        collection: &str,
        query: Vec<f32>,
        limit: u64,
    ) -> Result<Vec<SearchHit>, VectorDbError> {
        self.inner.search(collection, query, limit).await
    }
}

#[tokio::test]
async fn test_backend_lost_mid_sync_keeps_partial_report() {
    let embedder: Arc<dyn Embedder> = Arc::new(SentenceEmbedder::stub().unwrap());
    let backend = DropsAfterUpserts {
        inner: MockVectorIndex::new(),
        healthy_upserts: 1,
    };
    let index = SemanticIndex::new(backend, embedder, "news_facts");
    index.ensure_collection().await.unwrap();

    let report = synchronizer(100, 2)
        .sync(&index, &StaticRecordSource::new(records(6)))
        .await
        .unwrap();

    assert!(report.is_partial());
    assert_eq!(report.new_count, 2);
    assert_eq!(report.committed_chunks, 1);
    assert_eq!(report.failed_chunks.len(), 2);
    assert_eq!(report.failed_entries(), 4);
    assert_eq!(report.total_count, 2);
    assert!(report.count_error.is_some());
    assert_eq!(
        index.backend().inner.point_count(index.collection()),
        Some(2)
    );
}

#[tokio::test]
async fn test_successful_sync_has_no_count_error() {
    let index = index().await;
    let report = synchronizer(100, 2)
        .sync(&index, &StaticRecordSource::new(records(3)))
        .await
        .unwrap();

    assert!(!report.is_partial());
    assert!(report.count_error.is_none());
    assert_eq!(report.total_count, 3);
}
