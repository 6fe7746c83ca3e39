use thiserror::Error;

use crate::index::IndexError;
use crate::retrieval::RetrievalError;
use crate::scoring::ScoringError;
use crate::sync::SyncError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error(transparent)]
    Scoring(#[from] ScoringError),

    #[error(transparent)]
    Sync(#[from] SyncError),
}
