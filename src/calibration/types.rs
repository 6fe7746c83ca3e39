use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::NO_EVIDENCE;
use crate::scoring::NliLabel;

pub const NO_MATCH_RATIONALE: &str = "No matching records found.";
pub const INSUFFICIENT_RATIONALE: &str = "Details are insufficient for a clear verdict.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    True,
    False,
    Unverifiable,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::True => "True",
            Verdict::False => "False",
            Verdict::Unverifiable => "Unverifiable",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lexical evidence gathered during calibration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LexicalSignals {
    pub literal_match: bool,
    pub fuzzy_similarity: f64,
    pub override_applied: bool,
}

/// Final answer for one claim.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationResult {
    pub verdict: Verdict,
    /// Probability per label. Sums to 1.
    pub confidence: BTreeMap<NliLabel, f64>,
    pub rationale: String,
    /// Raw text of the evidence used, or `"N/A"`.
    pub evidence_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signals: Option<LexicalSignals>,
}

impl VerificationResult {
    /// Result when retrieval found nothing to compare against.
    pub fn no_evidence() -> Self {
        Self {
            verdict: Verdict::Unverifiable,
            confidence: BTreeMap::from([(NliLabel::Neutral, 1.0)]),
            rationale: NO_MATCH_RATIONALE.to_string(),
            evidence_text: NO_EVIDENCE.to_string(),
            evidence_source: None,
            signals: None,
        }
    }

    pub fn probability(&self, label: NliLabel) -> f64 {
        self.confidence.get(&label).copied().unwrap_or(0.0)
    }

    pub fn has_evidence(&self) -> bool {
        self.evidence_source.is_some()
    }
}
