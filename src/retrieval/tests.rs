use std::sync::Arc;

use super::*;
use crate::embedding::{Embedder, SentenceEmbedder};
use crate::hashing::derive_content_address;
use crate::vectordb::MockVectorIndex;

async fn index_with(docs: &[(&str, &str, &str)]) -> SemanticIndex<MockVectorIndex> {
    let embedder: Arc<dyn Embedder> = Arc::new(SentenceEmbedder::stub().unwrap());
    let index = SemanticIndex::new(MockVectorIndex::new(), embedder, "news_facts");
    index.ensure_collection().await.unwrap();
    let entries = docs
        .iter()
        .map(|(url, text, source)| {
            IndexEntry::new(
                derive_content_address(url),
                text.to_string(),
                source.to_string(),
                "2024-05-01 12:00:00".to_string(),
            )
        })
        .collect();
    index.upsert_entries(entries).await.unwrap();
    index
}

#[tokio::test]
async fn test_empty_index_is_not_found() {
    let index = index_with(&[]).await;
    let result = Retriever::default().retrieve(&index, "anything").await.unwrap();
    assert_eq!(result, Retrieval::NotFound);
    assert!(result.evidence().is_none());
}

#[tokio::test]
async fn test_returns_single_best_match() {
    let index = index_with(&[
        ("https://a/1", "Earthquake hits region | agency reports damage", "PTI"),
        ("https://a/2", "Cricket final postponed due to rain | board", "ANI"),
        ("https://a/3", "Parliament passes budget bill | session", "The Hindu"),
    ])
    .await;

    let result = Retriever::default()
        .retrieve(&index, "cricket final postponed")
        .await
        .unwrap();

    let evidence = result.evidence().unwrap();
    assert!(result.is_found());
    assert_eq!(evidence.entry.id, derive_content_address("https://a/2"));
    assert_eq!(evidence.source(), "ANI");
    assert!(evidence.text().starts_with("Cricket final"));
}

#[tokio::test]
async fn test_backend_fault_is_surfaced() {
    let index = index_with(&[("https://a/1", "Earthquake hits region", "PTI")]).await;
    index.backend().set_unreachable(true);

    let result = Retriever::default().retrieve(&index, "earthquake").await;
    assert!(matches!(result, Err(RetrievalError::Index(_))));
}

#[tokio::test]
async fn test_attribution_in_claim_does_not_steer_retrieval() {
    let index = index_with(&[
        ("https://a/rain", "Rain in Delhi | ", "PTI"),
        ("https://a/weekly", "Hindu times of india weekly | ", "ANI"),
    ])
    .await;

    let result = Retriever::default()
        .retrieve(&index, "Rain in Delhi - The Hindu - Times of India | PTI ANI")
        .await
        .unwrap();

    let evidence = result.evidence().unwrap();
    assert_eq!(evidence.entry.id, derive_content_address("https://a/rain"));
}

#[tokio::test]
async fn test_boilerplate_only_claim_is_not_found() {
    let index = index_with(&[("https://a/1", "Earthquake hits region", "PTI")]).await;

    let result = Retriever::default()
        .retrieve(&index, " - The Hindu | PTI ")
        .await
        .unwrap();
    assert_eq!(result, Retrieval::NotFound);
}
