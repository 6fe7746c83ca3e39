use tracing::debug;

use super::lexical::{is_literal_match, sequence_ratio};
use super::override_rule::LexicalOverride;
use super::types::{INSUFFICIENT_RATIONALE, LexicalSignals, Verdict, VerificationResult};
use crate::constants::VERDICT_DECISION_THRESHOLD;
use crate::normalize::TextNormalizer;
use crate::scoring::EntailmentDistribution;

/// Turns a raw classifier distribution into a verdict.
///
/// Both texts are normalized before the lexical checks. A verdict needs a
/// probability strictly above the decision threshold; entailment is checked
/// before contradiction.
#[derive(Debug, Clone)]
pub struct VerdictCalibrator {
    normalizer: TextNormalizer,
    lexical_override: LexicalOverride,
    decision_threshold: f64,
}

impl Default for VerdictCalibrator {
    fn default() -> Self {
        Self::new(TextNormalizer::default(), LexicalOverride::default())
    }
}

impl VerdictCalibrator {
    pub fn new(normalizer: TextNormalizer, lexical_override: LexicalOverride) -> Self {
        Self {
            normalizer,
            lexical_override,
            decision_threshold: VERDICT_DECISION_THRESHOLD,
        }
    }

    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    /// Literal and fuzzy overlap of the normalized texts.
    pub fn signals(&self, evidence: &str, claim: &str) -> LexicalSignals {
        let evidence = self.normalizer.normalize(evidence);
        let claim = self.normalizer.normalize(claim);

        let literal_match = is_literal_match(&evidence, &claim);
        let fuzzy_similarity = sequence_ratio(&evidence, &claim);

        LexicalSignals {
            literal_match,
            fuzzy_similarity,
            override_applied: self.lexical_override.triggers(literal_match, fuzzy_similarity),
        }
    }

    pub fn calibrate(
        &self,
        evidence: &str,
        claim: &str,
        source: &str,
        distribution: EntailmentDistribution,
    ) -> VerificationResult {
        let signals = self.signals(evidence, claim);
        let calibrated = if signals.override_applied {
            self.lexical_override.apply(distribution)
        } else {
            distribution
        };

        let (verdict, rationale) = self.select(&calibrated, source);

        debug!(
            %verdict,
            literal_match = signals.literal_match,
            fuzzy_similarity = signals.fuzzy_similarity,
            override_applied = signals.override_applied,
            entailment = calibrated.entailment,
            contradiction = calibrated.contradiction,
            "Calibrated verdict"
        );

        VerificationResult {
            verdict,
            confidence: calibrated.to_map(),
            rationale,
            evidence_text: evidence.to_string(),
            evidence_source: Some(source.to_string()),
            signals: Some(signals),
        }
    }

    fn select(&self, dist: &EntailmentDistribution, source: &str) -> (Verdict, String) {
        if dist.entailment > self.decision_threshold {
            (
                Verdict::True,
                format!("Confirmed by {}. Direct match found.", source),
            )
        } else if dist.contradiction > self.decision_threshold {
            (
                Verdict::False,
                format!("Contradicted by reporting from {}.", source),
            )
        } else {
            (Verdict::Unverifiable, INSUFFICIENT_RATIONALE.to_string())
        }
    }
}
