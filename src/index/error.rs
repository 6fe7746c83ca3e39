use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::vectordb::VectorDbError;

#[derive(Debug, Error)]
/// Errors from the semantic index.
pub enum IndexError {
    /// Embedding the documents or the query failed.
    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    /// The vector store rejected the request.
    #[error("vector store error: {0}")]
    Backend(#[from] VectorDbError),

    /// The embedder returned a different number of vectors than texts.
    #[error("embedder returned {vectors} vectors for {texts} texts")]
    BatchSizeMismatch { texts: usize, vectors: usize },
}
