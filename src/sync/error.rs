use thiserror::Error;

use crate::index::IndexError;

#[derive(Debug, Error)]
/// Failures reading from a record source.
pub enum SourceError {
    /// The source could not be reached (missing file, closed feed).
    #[error("record source unavailable: {reason}")]
    Unavailable { reason: String },

    /// The source answered but the query failed.
    #[error("record query failed: {0}")]
    Query(#[from] rusqlite::Error),
}

#[derive(Debug, Error)]
/// Sync failures that abort the whole call.
///
/// An unreachable source and individual chunk failures are not errors; they
/// are reported in [`SyncReport`](super::SyncReport).
pub enum SyncError {
    /// The index could not be listed, counted or prepared.
    #[error("index error: {0}")]
    Index(#[from] IndexError),

    #[error("invalid sync configuration: {reason}")]
    InvalidConfig { reason: String },
}
