use serde::Serialize;

/// A chunk that failed to embed or commit. Earlier chunks stay committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkFailure {
    pub chunk_index: usize,
    pub entries: usize,
    pub error: String,
}

/// Outcome of one sync call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Window requested for this call.
    pub window: usize,
    /// Records read from the source.
    pub scanned: usize,
    /// Entries committed to the index.
    pub new_count: usize,
    /// Records whose id was already indexed before this call.
    pub skipped_existing: usize,
    /// Records repeating a URL seen earlier in the same window.
    pub skipped_duplicate: usize,
    pub committed_chunks: usize,
    pub failed_chunks: Vec<ChunkFailure>,
    /// Entries in the index after this call. When `count_error` is set this
    /// is the count before the call plus `new_count`.
    pub total_count: u64,
    /// Set when the final count could not be read from the index.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count_error: Option<String>,
    /// `true` when the source could not be read and the call was a no-op.
    pub source_unavailable: bool,
}

impl SyncReport {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            ..Default::default()
        }
    }

    /// Some chunks did not commit, or the final count is an estimate.
    pub fn is_partial(&self) -> bool {
        !self.failed_chunks.is_empty() || self.count_error.is_some()
    }

    /// Entries that were pending but not committed.
    pub fn failed_entries(&self) -> usize {
        self.failed_chunks.iter().map(|f| f.entries).sum()
    }
}
