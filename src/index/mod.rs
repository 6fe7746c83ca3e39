//! Semantic index: one embedder, one vector store, one collection.
//!
//! Documents and queries go through the same [`Embedder`], so the vector
//! space used at ingest time is the one searched at query time.

pub mod error;


pub use error::IndexError;

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::embedding::Embedder;
use crate::hashing::{ContentAddress, versioned_collection_name};
use crate::vectordb::{IndexEntry, IndexPoint, SearchHit, VectorIndex};

/// Couples an embedder with a vector store collection.
pub struct SemanticIndex<I: VectorIndex> {
    embedder: Arc<dyn Embedder>,
    backend: I,
    collection: String,
}

impl<I: VectorIndex> std::fmt::Debug for SemanticIndex<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticIndex")
            .field("collection", &self.collection)
            .field("embedder", &self.embedder)
            .finish()
    }
}

impl<I: VectorIndex> SemanticIndex<I> {
    /// Creates an index over `base_collection`, suffixed with the identity
    /// scheme version.
    pub fn new(backend: I, embedder: Arc<dyn Embedder>, base_collection: &str) -> Self {
        Self {
            embedder,
            backend,
            collection: versioned_collection_name(base_collection),
        }
    }

    /// Physical collection name.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn embedder(&self) -> &Arc<dyn Embedder> {
        &self.embedder
    }

    pub fn backend(&self) -> &I {
        &self.backend
    }

    pub fn vector_size(&self) -> u64 {
        self.embedder.dimension() as u64
    }

    pub async fn is_ready(&self) -> bool {
        self.backend.is_ready().await
    }

    pub async fn ensure_collection(&self) -> Result<(), IndexError> {
        self.backend
            .ensure_collection(&self.collection, self.vector_size())
            .await?;
        Ok(())
    }

    /// Every content address currently stored, fetched in one pass.
    pub async fn existing_ids(&self) -> Result<HashSet<ContentAddress>, IndexError> {
        Ok(self.backend.list_ids(&self.collection).await?)
    }

    pub async fn count(&self) -> Result<u64, IndexError> {
        Ok(self.backend.count(&self.collection).await?)
    }

    /// Embeds `entries` as one batch and upserts them in one request.
    ///
    /// Either the whole batch is committed or none of it is.
    #[instrument(skip(self, entries), fields(collection = %self.collection, entries = entries.len()))]
    pub async fn upsert_entries(&self, entries: Vec<IndexEntry>) -> Result<usize, IndexError> {
        if entries.is_empty() {
            return Ok(0);
        }

        let texts: Vec<&str> = entries.iter().map(|e| e.document_text.as_str()).collect();
        let vectors = self.embedder.embed_batch(&texts)?;
        if vectors.len() != entries.len() {
            return Err(IndexError::BatchSizeMismatch {
                texts: entries.len(),
                vectors: vectors.len(),
            });
        }

        let points: Vec<IndexPoint> = entries
            .into_iter()
            .zip(vectors)
            .map(|(entry, vector)| IndexPoint::new(entry, vector))
            .collect();
        let written = points.len();

        self.backend.upsert_points(&self.collection, points).await?;

        debug!(written, "Committed batch");
        Ok(written)
    }

    /// Nearest `limit` entries to `text`, best first.
    pub async fn query_text(&self, text: &str, limit: u64) -> Result<Vec<SearchHit>, IndexError> {
        let query = self.embedder.embed(text)?;
        Ok(self.backend.search(&self.collection, query, limit).await?)
    }
}
