use thiserror::Error;

use crate::embedding::error::EmbeddingError;

#[derive(Debug, Error)]
pub enum NliError {
    #[error("failed to load NLI model: {reason}")]
    ModelLoadFailed { reason: String },

    #[error("NLI inference failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("tokenization failed: {reason}")]
    TokenizationFailed { reason: String },

    #[error("NLI head must expose contradiction, entailment and neutral; got {labels:?}")]
    UnsupportedLabels { labels: Vec<String> },

    #[error("invalid NLI configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl From<candle_core::Error> for NliError {
    fn from(err: candle_core::Error) -> Self {
        NliError::InferenceFailed {
            reason: err.to_string(),
        }
    }
}

impl From<EmbeddingError> for NliError {
    fn from(err: EmbeddingError) -> Self {
        match err {
            EmbeddingError::TokenizationFailed { reason } => {
                NliError::TokenizationFailed { reason }
            }
            other => NliError::ModelLoadFailed {
                reason: other.to_string(),
            },
        }
    }
}
