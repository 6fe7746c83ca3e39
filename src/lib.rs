//! Verity library crate (used by the server binary and integration tests).
//!
//! Verifies short news claims against an index of scraped articles.
//!
//! # Pipeline
//!
//! - [`sync`] pulls the newest records from the scraper's store, derives a
//!   stable [`ContentAddress`] per URL and commits only unseen records into
//!   the [`SemanticIndex`].
//! - [`retrieval`] embeds a claim and fetches the single closest record.
//! - [`scoring`] runs the NLI cross-encoder over (evidence, claim) and turns
//!   logits into an [`EntailmentDistribution`].
//! - [`calibration`] applies the lexical override and picks a [`Verdict`].
//! - [`engine`] wires these together behind [`FactChecker`]; [`gateway`]
//!   exposes it over HTTP.
//!
//! ## Test/Mock Support
//! [`MockVectorIndex`] is available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod calibration;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod engine;
pub mod gateway;
pub mod hashing;
pub mod index;
pub mod normalize;
pub mod retrieval;
pub mod scoring;
pub mod sync;
pub mod vectordb;

pub use calibration::{LexicalOverride, Verdict, VerdictCalibrator, VerificationResult};
pub use config::{Config, ConfigError};
pub use embedding::{
    Embedder, EmbeddingError, NliClassifier, NliConfig, SentenceEmbedder, SentenceEmbedderConfig,
};
pub use engine::{EngineError, FactChecker, FactCheckerHandle, SyncSummary, Verification};
pub use hashing::{ContentAddress, derive_content_address, versioned_collection_name};
pub use index::{IndexError, SemanticIndex};
pub use normalize::TextNormalizer;
pub use retrieval::{Evidence, Retrieval, Retriever};
pub use scoring::{EntailmentDistribution, EntailmentScorer, NliLabel, ScoringError};
pub use sync::{
    IncrementalSynchronizer, RecordSource, SourceRecord, SqliteRecordSource, SyncConfig,
    SyncReport,
};
#[cfg(any(test, feature = "mock"))]
pub use vectordb::MockVectorIndex;
pub use vectordb::{QdrantIndex, VectorDbError, VectorIndex};
