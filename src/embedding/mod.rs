//! Embedding + model utilities.
//!
//! - [`sentence`] embeds documents and claims into the shared vector space.
//! - [`nli`] provides the cross-encoder used by [`crate::scoring`].

/// BERT classifier wrapper used by the NLI cross-encoder.
pub mod bert;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
mod embedder;
mod error;
/// NLI cross-encoder.
pub mod nli;
/// Sentence embedder.
pub mod sentence;
/// Tokenizer/model loading helpers.
pub mod utils;

pub use embedder::{Embedder, l2_normalize};
pub use error::EmbeddingError;
pub use nli::{NliClassifier, NliConfig, NliError, NliLogits};
pub use sentence::{
    SENTENCE_EMBEDDING_DIM, SENTENCE_MAX_SEQ_LEN, SentenceEmbedder, SentenceEmbedderConfig,
};
