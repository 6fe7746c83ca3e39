//! The fact-checking engine.
//!
//! [`FactChecker`] is built once at startup and owns the semantic index,
//! the record source, the entailment scorer and the calibrator. Verification
//! is read-only and may run concurrently. Syncs are serialized by a
//! single-writer lock.

pub mod error;
pub mod types;


pub use error::EngineError;
pub use types::{EngineStatus, SyncSummary, Verification};

use std::ops::Deref;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use crate::calibration::{VerdictCalibrator, VerificationResult};
use crate::constants::EMPTY_CLAIM_PROMPT;
use crate::index::SemanticIndex;
use crate::retrieval::{Retrieval, Retriever};
use crate::scoring::EntailmentScorer;
use crate::sync::{IncrementalSynchronizer, RecordSource, SyncConfig, SyncReport};
use crate::vectordb::VectorIndex;

pub struct FactChecker<I: VectorIndex, S: RecordSource> {
    index: SemanticIndex<I>,
    source: S,
    retriever: Retriever,
    scorer: EntailmentScorer,
    calibrator: VerdictCalibrator,
    synchronizer: IncrementalSynchronizer,
    sync_lock: Mutex<()>,
}

impl<I: VectorIndex, S: RecordSource> std::fmt::Debug for FactChecker<I, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactChecker")
            .field("index", &self.index)
            .field("source", &self.source.name())
            .field("scorer", &self.scorer)
            .field("synchronizer", &self.synchronizer)
            .finish()
    }
}

impl<I: VectorIndex, S: RecordSource> FactChecker<I, S> {
    pub fn new(
        index: SemanticIndex<I>,
        source: S,
        scorer: EntailmentScorer,
        sync_config: SyncConfig,
    ) -> Result<Self, EngineError> {
        let calibrator = VerdictCalibrator::default();
        let normalizer = calibrator.normalizer().clone();
        let synchronizer = IncrementalSynchronizer::new(sync_config, normalizer.clone())?;

        Ok(Self {
            index,
            source,
            retriever: Retriever::new(normalizer),
            scorer,
            calibrator,
            synchronizer,
            sync_lock: Mutex::new(()),
        })
    }

    /// Replaces the calibrator. The synchronizer and the retriever keep the
    /// ingest normalizer.
    pub fn with_calibrator(mut self, calibrator: VerdictCalibrator) -> Self {
        self.calibrator = calibrator;
        self
    }

    pub fn index(&self) -> &SemanticIndex<I> {
        &self.index
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Creates the backing collection if needed.
    pub async fn prepare(&self) -> Result<(), EngineError> {
        self.index.ensure_collection().await?;
        info!(collection = self.index.collection(), "Index ready");
        Ok(())
    }

    pub async fn status(&self) -> EngineStatus {
        EngineStatus {
            index_ready: self.index.is_ready().await,
            collection: self.index.collection().to_string(),
            embedder_mode: self.index.embedder().mode(),
            nli_model_loaded: self.scorer.is_model_loaded(),
        }
    }

    /// Verifies one claim against the closest indexed evidence.
    #[instrument(skip(self, claim), fields(claim_len = claim.len()))]
    pub async fn verify(&self, claim: &str) -> Result<Verification, EngineError> {
        if claim.trim().is_empty() {
            debug!("Empty claim, asking for input");
            return Ok(Verification::NeedsInput {
                prompt: EMPTY_CLAIM_PROMPT.to_string(),
            });
        }

        let evidence = match self.retriever.retrieve(&self.index, claim).await? {
            Retrieval::Found(evidence) => evidence,
            Retrieval::NotFound => {
                return Ok(Verification::Completed(VerificationResult::no_evidence()));
            }
        };

        let normalizer = self.calibrator.normalizer();
        let distribution = self.scorer.score(
            &normalizer.normalize(evidence.text()),
            &normalizer.normalize(claim),
        )?;

        let result =
            self.calibrator
                .calibrate(evidence.text(), claim, evidence.source(), distribution);

        info!(
            verdict = %result.verdict,
            source = evidence.source(),
            similarity = evidence.score,
            "Claim verified"
        );

        Ok(Verification::Completed(result))
    }

    /// Syncs the configured window. Calls are serialized.
    pub async fn sync(&self) -> Result<SyncReport, EngineError> {
        self.sync_window(self.synchronizer.config().window).await
    }

    pub async fn sync_window(&self, window: usize) -> Result<SyncReport, EngineError> {
        let _guard = self.sync_lock.lock().await;
        Ok(self
            .synchronizer
            .sync_window(&self.index, &self.source, window)
            .await?)
    }

    pub fn default_window(&self) -> usize {
        self.synchronizer.config().window
    }
}

/// Cloneable shared handle to a [`FactChecker`].
pub struct FactCheckerHandle<I: VectorIndex, S: RecordSource> {
    inner: Arc<FactChecker<I, S>>,
}

impl<I: VectorIndex, S: RecordSource> FactCheckerHandle<I, S> {
    pub fn new(checker: FactChecker<I, S>) -> Self {
        Self {
            inner: Arc::new(checker),
        }
    }
}

impl<I: VectorIndex, S: RecordSource> Clone for FactCheckerHandle<I, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<I: VectorIndex, S: RecordSource> Deref for FactCheckerHandle<I, S> {
    type Target = FactChecker<I, S>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<I: VectorIndex, S: RecordSource> From<FactChecker<I, S>> for FactCheckerHandle<I, S> {
    fn from(checker: FactChecker<I, S>) -> Self {
        Self::new(checker)
    }
}
