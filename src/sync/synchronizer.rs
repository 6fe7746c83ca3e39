use std::collections::HashSet;

use tracing::{info, instrument, warn};

use super::config::SyncConfig;
use super::error::SyncError;
use super::record::SourceRecord;
use super::report::{ChunkFailure, SyncReport};
use super::source::RecordSource;
use crate::hashing::derive_content_address;
use crate::index::SemanticIndex;
use crate::normalize::TextNormalizer;
use crate::vectordb::{IndexEntry, VectorIndex};

/// Reconciles the newest source records against the index.
///
/// Only identities missing from the index are embedded. Existing ids are
/// fetched once per call. Within a window the first record for a URL wins.
#[derive(Debug, Clone, Default)]
pub struct IncrementalSynchronizer {
    config: SyncConfig,
    normalizer: TextNormalizer,
}

impl IncrementalSynchronizer {
    pub fn new(config: SyncConfig, normalizer: TextNormalizer) -> Result<Self, SyncError> {
        config
            .validate()
            .map_err(|reason| SyncError::InvalidConfig { reason })?;
        Ok(Self { config, normalizer })
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Builds the index entry for one record.
    pub fn entry_for(&self, record: &SourceRecord) -> IndexEntry {
        IndexEntry::new(
            derive_content_address(&record.url),
            self.normalizer
                .document_text(&record.title, record.summary.as_deref()),
            record.source.clone(),
            record.date_label(),
        )
    }

    /// Syncs using the configured window.
    pub async fn sync<I, S>(
        &self,
        index: &SemanticIndex<I>,
        source: &S,
    ) -> Result<SyncReport, SyncError>
    where
        I: VectorIndex,
        S: RecordSource,
    {
        self.sync_window(index, source, self.config.window).await
    }

    #[instrument(skip(self, index, source), fields(source = source.name(), collection = index.collection()))]
    pub async fn sync_window<I, S>(
        &self,
        index: &SemanticIndex<I>,
        source: &S,
        window: usize,
    ) -> Result<SyncReport, SyncError>
    where
        I: VectorIndex,
        S: RecordSource,
    {
        let mut report = SyncReport::new(window);

        let mut records = match source.latest(window).await {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "Record source unavailable, sync is a no-op");
                report.source_unavailable = true;
                report.total_count = index.count().await?;
                return Ok(report);
            }
        };

        // Sources promise newest-first; enforce it so the window and
        // first-wins dedup do not depend on that promise.
        records.sort_by(|a, b| b.scraped_at.cmp(&a.scraped_at));
        records.truncate(window);
        report.scanned = records.len();

        if records.is_empty() {
            warn!("Record source returned no records, sync is a no-op");
            report.total_count = index.count().await?;
            return Ok(report);
        }

        let existing = index.existing_ids().await?;
        let mut seen = HashSet::with_capacity(records.len());
        let mut pending = Vec::new();

        for record in &records {
            let id = derive_content_address(&record.url);
            if existing.contains(&id) {
                report.skipped_existing += 1;
            } else if !seen.insert(id) {
                report.skipped_duplicate += 1;
            } else {
                pending.push(self.entry_for(record));
            }
        }

        for (chunk_index, chunk) in pending.chunks(self.config.chunk_size).enumerate() {
            match index.upsert_entries(chunk.to_vec()).await {
                Ok(written) => {
                    report.new_count += written;
                    report.committed_chunks += 1;
                }
                Err(e) => {
                    warn!(chunk_index, entries = chunk.len(), error = %e, "Chunk failed, continuing");
                    report.failed_chunks.push(ChunkFailure {
                        chunk_index,
                        entries: chunk.len(),
                        error: e.to_string(),
                    });
                }
            }
        }

        // Chunks may already be committed, so a failed count must not discard
        // the report. Fall back to what this call knows was stored.
        report.total_count = match index.count().await {
            Ok(count) => count,
            Err(e) => {
                let known = (existing.len() + report.new_count) as u64;
                warn!(error = %e, known, "Index count failed after commits, reporting last known count");
                report.count_error = Some(e.to_string());
                known
            }
        };

        info!(
            scanned = report.scanned,
            new_count = report.new_count,
            skipped_existing = report.skipped_existing,
            skipped_duplicate = report.skipped_duplicate,
            failed_chunks = report.failed_chunks.len(),
            total_count = report.total_count,
            "Sync finished"
        );

        Ok(report)
    }
}
