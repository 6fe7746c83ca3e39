use std::collections::HashSet;

use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    CountPointsBuilder, CreateCollectionBuilder, Distance, PayloadIncludeSelector, PointStruct,
    ScrollPointsBuilder, SearchPointsBuilder, UpsertPointsBuilder, VectorParamsBuilder,
};
use tracing::{debug, warn};

use super::error::VectorDbError;
use super::model::{IndexEntry, IndexPoint, PAYLOAD_CONTENT_ID, SearchHit};
use crate::hashing::ContentAddress;

/// Points fetched per scroll page when listing ids.
pub const SCROLL_PAGE_SIZE: u32 = 1024;

#[derive(Clone)]
/// Qdrant-backed vector index.
pub struct QdrantIndex {
    client: Qdrant,
    url: String,
}

impl QdrantIndex {
    /// Creates a client for `url`.
    pub async fn new(url: &str) -> Result<Self, VectorDbError> {
        let client =
            Qdrant::from_url(url)
                .build()
                .map_err(|e| VectorDbError::ConnectionFailed {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    /// Returns the configured URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Performs a basic health check request.
    pub async fn health_check(&self) -> Result<(), VectorDbError> {
        self.client
            .health_check()
            .await
            .map_err(|e| VectorDbError::ConnectionFailed {
                url: self.url.clone(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    /// Creates the collection with cosine distance if it is missing.
    pub async fn ensure_collection(
        &self,
        name: &str,
        vector_size: u64,
    ) -> Result<(), VectorDbError> {
        let create_failed = |message: String| VectorDbError::CreateCollectionFailed {
            collection: name.to_string(),
            message,
        };

        let exists = self
            .client
            .collection_exists(name)
            .await
            .map_err(|e| create_failed(e.to_string()))?;

        if exists {
            return Ok(());
        }

        self.client
            .create_collection(
                CreateCollectionBuilder::new(name)
                    .vectors_config(VectorParamsBuilder::new(vector_size, Distance::Cosine))
                    .on_disk_payload(true),
            )
            .await
            .map_err(|e| create_failed(e.to_string()))?;

        debug!(collection = name, vector_size, "Created collection");
        Ok(())
    }

    /// Upserts one batch of points in a single request and waits until it
    /// is searchable, so the next id listing sees it.
    pub async fn upsert_points(
        &self,
        collection: &str,
        points: Vec<IndexPoint>,
    ) -> Result<(), VectorDbError> {
        if points.is_empty() {
            return Ok(());
        }

        let qdrant_points: Vec<PointStruct> = points
            .into_iter()
            .map(|p| {
                PointStruct::new(
                    p.entry.id.point_uuid().to_string(),
                    p.vector,
                    p.entry.to_payload(),
                )
            })
            .collect();

        self.client
            .upsert_points(
                UpsertPointsBuilder::new(collection, qdrant_points).wait(true),
            )
            .await
            .map_err(|e| VectorDbError::UpsertFailed {
                collection: collection.to_string(),
                message: e.to_string(),
            })?;

        Ok(())
    }

    /// Scrolls the whole collection and collects the stored content addresses.
    pub async fn list_ids(&self, collection: &str) -> Result<HashSet<ContentAddress>, VectorDbError> {
        let mut ids = HashSet::new();
        let mut offset = None;

        loop {
            let mut request = ScrollPointsBuilder::new(collection)
                .limit(SCROLL_PAGE_SIZE)
                .with_payload(PayloadIncludeSelector::new(vec![
                    PAYLOAD_CONTENT_ID.to_string(),
                ]))
                .with_vectors(false);
            if let Some(point_id) = offset.take() {
                request = request.offset(point_id);
            }

            let page = self
                .client
                .scroll(request)
                .await
                .map_err(|e| VectorDbError::ReadFailed {
                    collection: collection.to_string(),
                    message: e.to_string(),
                })?;

            for point in page.result {
                match IndexEntry::content_id_from_payload(&point.payload) {
                    Some(id) => {
                        ids.insert(id);
                    }
                    None => warn!(collection, "Point without a content_id payload, ignoring"),
                }
            }

            match page.next_page_offset {
                Some(next) => offset = Some(next),
                None => break,
            }
        }

        Ok(ids)
    }

    /// Exact number of stored points.
    pub async fn count(&self, collection: &str) -> Result<u64, VectorDbError> {
        let response = self
            .client
            .count(CountPointsBuilder::new(collection).exact(true))
            .await
            .map_err(|e| VectorDbError::ReadFailed {
                collection: collection.to_string(),
                message: e.to_string(),
            })?;

        Ok(response.result.map(|r| r.count).unwrap_or(0))
    }

    /// Searches a collection by vector similarity.
    pub async fn search(
        &self,
        collection: &str,
        query: Vec<f32>,
        limit: u64,
    ) -> Result<Vec<SearchHit>, VectorDbError> {
        let response = self
            .client
            .search_points(SearchPointsBuilder::new(collection, query, limit).with_payload(true))
            .await
            .map_err(|e| VectorDbError::SearchFailed {
                collection: collection.to_string(),
                message: e.to_string(),
            })?;

        Ok(response
            .result
            .into_iter()
            .filter_map(|point| {
                IndexEntry::from_payload(&point.payload).map(|entry| SearchHit {
                    entry,
                    score: point.score,
                })
            })
            .collect())
    }
}

/// Minimal async interface the semantic index needs from a vector store.
pub trait VectorIndex: Send + Sync {
    /// Returns `true` if the backend answers requests.
    fn is_ready(&self) -> impl std::future::Future<Output = bool> + Send;

    /// Creates the collection if it doesn't exist.
    fn ensure_collection(
        &self,
        name: &str,
        vector_size: u64,
    ) -> impl std::future::Future<Output = Result<(), VectorDbError>> + Send;

    /// Upserts one batch. A batch is committed as a whole or not at all.
    fn upsert_points(
        &self,
        collection: &str,
        points: Vec<IndexPoint>,
    ) -> impl std::future::Future<Output = Result<(), VectorDbError>> + Send;

    /// All content addresses currently stored.
    fn list_ids(
        &self,
        collection: &str,
    ) -> impl std::future::Future<Output = Result<HashSet<ContentAddress>, VectorDbError>> + Send;

    /// Number of stored points.
    fn count(
        &self,
        collection: &str,
    ) -> impl std::future::Future<Output = Result<u64, VectorDbError>> + Send;

    /// Nearest neighbors of `query`, best first.
    fn search(
        &self,
        collection: &str,
        query: Vec<f32>,
        limit: u64,
    ) -> impl std::future::Future<Output = Result<Vec<SearchHit>, VectorDbError>> + Send;
}

impl VectorIndex for QdrantIndex {
    async fn is_ready(&self) -> bool {
        self.health_check().await.is_ok()
    }

    async fn ensure_collection(&self, name: &str, vector_size: u64) -> Result<(), VectorDbError> {
        self.ensure_collection(name, vector_size).await
    }

    async fn upsert_points(
        &self,
        collection: &str,
        points: Vec<IndexPoint>,
    ) -> Result<(), VectorDbError> {
        self.upsert_points(collection, points).await
    }

    async fn list_ids(&self, collection: &str) -> Result<HashSet<ContentAddress>, VectorDbError> {
        self.list_ids(collection).await
    }

    async fn count(&self, collection: &str) -> Result<u64, VectorDbError> {
        self.count(collection).await
    }

    async fn search(
        &self,
        collection: &str,
        query: Vec<f32>,
        limit: u64,
    ) -> Result<Vec<SearchHit>, VectorDbError> {
        self.search(collection, query, limit).await
    }
}
