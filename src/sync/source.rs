use std::future::Future;
use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags, params};
use tracing::{debug, warn};

use super::error::SourceError;
use super::record::{SourceRecord, parse_timestamp};

/// Supplies the newest records first.
pub trait RecordSource: Send + Sync {
    /// Up to `limit` records ordered by `scraped_at` descending.
    fn latest(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<SourceRecord>, SourceError>> + Send;

    /// Short label used in logs.
    fn name(&self) -> &str;
}

const LATEST_RECORDS_SQL: &str = "SELECT url, title, summary, source, scraped_at \
     FROM news ORDER BY scraped_at DESC LIMIT ?1";

/// Reads the scraper's `news` table.
#[derive(Debug, Clone)]
pub struct SqliteRecordSource {
    path: PathBuf,
}

impl SqliteRecordSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn query_latest(path: &Path, limit: usize) -> Result<Vec<SourceRecord>, SourceError> {
        if !path.exists() {
            return Err(SourceError::Unavailable {
                reason: format!("database not found at {}", path.display()),
            });
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| SourceError::Unavailable {
            reason: e.to_string(),
        })?;

        // LIMIT is a signed 64-bit integer; anything larger means every row.
        let sql_limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let mut stmt = conn.prepare(LATEST_RECORDS_SQL)?;
        let rows = stmt.query_map(params![sql_limit], |row| {
            Ok((
                row.get::<_, Option<String>>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, Option<String>>(4)?,
            ))
        })?;

        let mut records = Vec::new();
        let mut rejected = 0usize;
        for row in rows {
            let (url, title, summary, source, scraped_at) = row?;
            let (Some(url), Some(scraped_at)) = (url, scraped_at.as_deref().and_then(parse_timestamp))
            else {
                rejected += 1;
                continue;
            };
            records.push(SourceRecord::new(
                url,
                title.unwrap_or_default(),
                summary,
                source.unwrap_or_default(),
                scraped_at,
            ));
        }

        if rejected > 0 {
            warn!(rejected, "Skipped rows without url or readable scraped_at");
        }
        debug!(rows = records.len(), limit, "Read latest records");
        Ok(records)
    }
}

impl RecordSource for SqliteRecordSource {
    async fn latest(&self, limit: usize) -> Result<Vec<SourceRecord>, SourceError> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || Self::query_latest(&path, limit))
            .await
            .map_err(|e| SourceError::Unavailable {
                reason: format!("reader task failed: {}", e),
            })?
    }

    fn name(&self) -> &str {
        "sqlite"
    }
}

/// In-memory records, kept newest first.
#[derive(Debug, Clone, Default)]
pub struct StaticRecordSource {
    records: Vec<SourceRecord>,
    unavailable: bool,
}

impl StaticRecordSource {
    pub fn new(mut records: Vec<SourceRecord>) -> Self {
        records.sort_by(|a, b| b.scraped_at.cmp(&a.scraped_at));
        Self {
            records,
            unavailable: false,
        }
    }

    /// A source whose every read fails as unreachable.
    pub fn unavailable() -> Self {
        Self {
            records: Vec::new(),
            unavailable: true,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordSource for StaticRecordSource {
    async fn latest(&self, limit: usize) -> Result<Vec<SourceRecord>, SourceError> {
        if self.unavailable {
            return Err(SourceError::Unavailable {
                reason: "static source marked unavailable".to_string(),
            });
        }
        Ok(self.records.iter().take(limit).cloned().collect())
    }

    fn name(&self) -> &str {
        "static"
    }
}
