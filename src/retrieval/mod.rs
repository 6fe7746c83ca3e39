//! Nearest-evidence lookup for a claim.
//!
//! Claims are normalized the same way indexed documents were before they
//! are embedded, so query and ingest share one vector space. An empty index
//! is [`Retrieval::NotFound`], not an error. Only embedding or store faults
//! surface as [`RetrievalError`].

pub mod error;

#[cfg(test)]
mod tests;

pub use error::RetrievalError;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::index::SemanticIndex;
use crate::normalize::TextNormalizer;
use crate::vectordb::{IndexEntry, VectorIndex};

/// Best-matching indexed document for a claim.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evidence {
    pub entry: IndexEntry,
    /// Similarity reported by the vector store.
    pub score: f32,
}

impl Evidence {
    pub fn text(&self) -> &str {
        &self.entry.document_text
    }

    pub fn source(&self) -> &str {
        &self.entry.metadata.source
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Retrieval {
    Found(Evidence),
    NotFound,
}

impl Retrieval {
    pub fn evidence(&self) -> Option<&Evidence> {
        match self {
            Retrieval::Found(evidence) => Some(evidence),
            Retrieval::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Retrieval::Found(_))
    }
}

/// Embeds the normalized claim with the index's own embedder and takes the
/// top hit.
#[derive(Debug, Clone, Default)]
pub struct Retriever {
    normalizer: TextNormalizer,
}

impl Retriever {
    /// `normalizer` must be the one documents went through at ingest.
    pub fn new(normalizer: TextNormalizer) -> Self {
        Self { normalizer }
    }

    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    #[instrument(skip(self, index, claim), fields(claim_len = claim.len()))]
    pub async fn retrieve<I: VectorIndex>(
        &self,
        index: &SemanticIndex<I>,
        claim: &str,
    ) -> Result<Retrieval, RetrievalError> {
        let query = self.normalizer.normalize(claim);
        if query.is_empty() {
            debug!("Claim is empty after normalization");
            return Ok(Retrieval::NotFound);
        }

        let mut hits = index.query_text(&query, 1).await?;

        if hits.is_empty() {
            debug!("No evidence in index");
            return Ok(Retrieval::NotFound);
        }

        let top = hits.swap_remove(0);
        debug!(score = top.score, source = %top.entry.metadata.source, "Top evidence");
        Ok(Retrieval::Found(Evidence {
            entry: top.entry,
            score: top.score,
        }))
    }
}
