use std::collections::HashMap;

use qdrant_client::qdrant::Value;
use serde::Serialize;

use crate::hashing::ContentAddress;

pub const PAYLOAD_CONTENT_ID: &str = "content_id";
pub const PAYLOAD_DOCUMENT: &str = "document";
pub const PAYLOAD_SOURCE: &str = "source";
pub const PAYLOAD_DATE: &str = "date";

/// Provenance stored with each indexed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryMetadata {
    pub source: String,
    pub date: String,
}

/// A document in the semantic index, keyed by the content address of its URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexEntry {
    pub id: ContentAddress,
    pub document_text: String,
    pub metadata: EntryMetadata,
}

impl IndexEntry {
    pub fn new(id: ContentAddress, document_text: String, source: String, date: String) -> Self {
        Self {
            id,
            document_text,
            metadata: EntryMetadata { source, date },
        }
    }

    pub(crate) fn to_payload(&self) -> HashMap<String, Value> {
        let mut payload: HashMap<String, Value> = HashMap::new();
        payload.insert(PAYLOAD_CONTENT_ID.to_string(), self.id.to_hex().into());
        payload.insert(PAYLOAD_DOCUMENT.to_string(), self.document_text.clone().into());
        payload.insert(PAYLOAD_SOURCE.to_string(), self.metadata.source.clone().into());
        payload.insert(PAYLOAD_DATE.to_string(), self.metadata.date.clone().into());
        payload
    }

    /// Reads only the content address. Id listings fetch nothing else.
    pub(crate) fn content_id_from_payload(
        payload: &HashMap<String, Value>,
    ) -> Option<ContentAddress> {
        payload
            .get(PAYLOAD_CONTENT_ID)
            .and_then(|v| v.as_str())
            .and_then(|s| s.parse().ok())
    }

    pub(crate) fn from_payload(payload: &HashMap<String, Value>) -> Option<Self> {
        let text = |key: &str| {
            payload
                .get(key)
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
        };

        let id = Self::content_id_from_payload(payload)?;

        Some(Self::new(
            id,
            text(PAYLOAD_DOCUMENT).unwrap_or_default(),
            text(PAYLOAD_SOURCE).unwrap_or_default(),
            text(PAYLOAD_DATE).unwrap_or_default(),
        ))
    }
}

/// An entry together with its embedding, ready for upsert.
#[derive(Debug, Clone)]
pub struct IndexPoint {
    pub entry: IndexEntry,
    pub vector: Vec<f32>,
}

impl IndexPoint {
    pub fn new(entry: IndexEntry, vector: Vec<f32>) -> Self {
        Self { entry, vector }
    }
}

/// A nearest-neighbor match, best first.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub entry: IndexEntry,
    pub score: f32,
}
