use thiserror::Error;

use crate::embedding::NliError;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("nli classifier error: {0}")]
    Classifier(#[from] NliError),

    #[error("classifier produced non-finite logits: {logits:?}")]
    NonFiniteLogits { logits: [f32; 3] },
}
