use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Layouts accepted for stored timestamps, tried in order after RFC 3339.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

/// One scraped article as supplied by a record source. Read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub url: String,
    pub title: String,
    pub summary: Option<String>,
    pub source: String,
    pub scraped_at: DateTime<Utc>,
}

impl SourceRecord {
    pub fn new(
        url: impl Into<String>,
        title: impl Into<String>,
        summary: Option<String>,
        source: impl Into<String>,
        scraped_at: DateTime<Utc>,
    ) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            summary,
            source: source.into(),
            scraped_at,
        }
    }

    /// Date string stored in index metadata.
    pub fn date_label(&self) -> String {
        self.scraped_at.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Parses the timestamp layouts scrapers commonly write into SQLite.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}
