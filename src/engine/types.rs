use serde::Serialize;

use crate::calibration::VerificationResult;
use crate::sync::{ChunkFailure, SyncReport};

/// Outcome of [`FactChecker::verify`](super::FactChecker::verify).
#[derive(Debug, Clone, PartialEq)]
pub enum Verification {
    Completed(VerificationResult),
    /// The claim was empty. Nothing was retrieved or scored.
    NeedsInput { prompt: String },
}

impl Verification {
    pub fn result(&self) -> Option<&VerificationResult> {
        match self {
            Verification::Completed(result) => Some(result),
            Verification::NeedsInput { .. } => None,
        }
    }

    pub fn into_result(self) -> Option<VerificationResult> {
        match self {
            Verification::Completed(result) => Some(result),
            Verification::NeedsInput { .. } => None,
        }
    }
}

/// What callers of a sync need to know.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    pub new_count: usize,
    pub total_count: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed_chunks: Vec<ChunkFailure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count_error: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub source_unavailable: bool,
}

impl From<&SyncReport> for SyncSummary {
    fn from(report: &SyncReport) -> Self {
        Self {
            new_count: report.new_count,
            total_count: report.total_count,
            failed_chunks: report.failed_chunks.clone(),
            count_error: report.count_error.clone(),
            source_unavailable: report.source_unavailable,
        }
    }
}

/// Readiness snapshot for health endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineStatus {
    pub index_ready: bool,
    pub collection: String,
    pub embedder_mode: &'static str,
    pub nli_model_loaded: bool,
}
