//! Test fixtures for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rusqlite::{Connection, params};
use tempfile::TempDir;

use verity::embedding::{Embedder, SentenceEmbedder};
use verity::engine::FactChecker;
use verity::index::SemanticIndex;
use verity::scoring::EntailmentScorer;
use verity::sync::{RecordSource, SyncConfig};
use verity::vectordb::MockVectorIndex;

pub const TEST_COLLECTION: &str = "integration_news";

/// One row of the scraper's `news` table, with optional columns left null.
#[derive(Debug, Clone)]
pub struct NewsRow {
    pub url: Option<String>,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub source: Option<String>,
    pub scraped_at: Option<String>,
}

impl NewsRow {
    pub fn new(url: &str, title: &str, source: &str, scraped_at: &str) -> Self {
        Self {
            url: Some(url.to_string()),
            title: Some(title.to_string()),
            summary: None,
            source: Some(source.to_string()),
            scraped_at: Some(scraped_at.to_string()),
        }
    }

    pub fn summary(mut self, summary: &str) -> Self {
        self.summary = Some(summary.to_string());
        self
    }

    pub fn without_url(mut self) -> Self {
        self.url = None;
        self
    }

    pub fn scraped_at(mut self, raw: &str) -> Self {
        self.scraped_at = Some(raw.to_string());
        self
    }
}

/// The rows a scraper run typically leaves behind.
pub fn newsroom_rows() -> Vec<NewsRow> {
    vec![
        NewsRow::new(
            "https://news.example/quake",
            "Earthquake hits region, says agency",
            "PTI",
            "2024-05-01 08:01:00.482113",
        ),
        NewsRow::new(
            "https://news.example/schools",
            "Officials deny reports that schools will close next week across the state",
            "The Hindu",
            "2024-05-01 08:02:00.105522",
        ),
        NewsRow::new(
            "https://news.example/monsoon",
            "Monsoon rainfall above normal in Kerala",
            "ANI",
            "2024-05-01 08:03:00.991004",
        )
        .summary("IMD says June was wetter than usual"),
    ]
}

/// Creates `news.db` in `dir` with the scraper schema and `rows`.
pub fn create_news_db(dir: &Path, rows: &[NewsRow]) -> PathBuf {
    let path = dir.join("news.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE news (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            url TEXT,
            title TEXT,
            summary TEXT,
            source TEXT,
            scraped_at TEXT
        );",
    )
    .unwrap();
    insert_rows(&path, rows);
    path
}

pub fn insert_rows(path: &Path, rows: &[NewsRow]) {
    let conn = Connection::open(path).unwrap();
    for row in rows {
        conn.execute(
            "INSERT INTO news (url, title, summary, source, scraped_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![row.url, row.title, row.summary, row.source, row.scraped_at],
        )
        .unwrap();
    }
}

pub fn temp_dir() -> TempDir {
    TempDir::new().unwrap()
}

pub fn stub_embedder() -> Arc<dyn Embedder> {
    Arc::new(SentenceEmbedder::stub().unwrap())
}

/// A prepared checker over an in-memory index and `source`.
pub async fn mock_checker<S: RecordSource>(
    source: S,
    sync_config: SyncConfig,
) -> FactChecker<MockVectorIndex, S> {
    let index = SemanticIndex::new(MockVectorIndex::new(), stub_embedder(), TEST_COLLECTION);
    let checker = FactChecker::new(
        index,
        source,
        EntailmentScorer::stub().unwrap(),
        sync_config,
    )
    .unwrap();
    checker.prepare().await.unwrap();
    checker
}
