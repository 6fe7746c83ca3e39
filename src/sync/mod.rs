//! Incremental synchronization of source records into the semantic index.

pub mod config;
pub mod error;
pub mod record;
pub mod report;
pub mod source;
pub mod synchronizer;

#[cfg(test)]
mod tests;

pub use config::SyncConfig;
pub use error::{SourceError, SyncError};
pub use record::{SourceRecord, parse_timestamp};
pub use report::{ChunkFailure, SyncReport};
pub use source::{RecordSource, SqliteRecordSource, StaticRecordSource};
pub use synchronizer::IncrementalSynchronizer;
