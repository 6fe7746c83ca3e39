use thiserror::Error;

use crate::index::IndexError;

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("index query failed: {0}")]
    Index(#[from] IndexError),
}
