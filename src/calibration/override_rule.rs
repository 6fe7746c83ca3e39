use crate::constants::{
    FUZZY_OVERRIDE_THRESHOLD, OVERRIDE_CONTRADICTION_CEILING, OVERRIDE_ENTAILMENT_FLOOR,
};
use crate::scoring::EntailmentDistribution;

/// Trusts near-verbatim overlap over the classifier.
///
/// Fires when the claim appears literally in the evidence or the fuzzy ratio
/// exceeds `fuzzy_threshold`. Post-conditions: entailment never decreases,
/// contradiction never increases, neutral takes the remainder (floored at
/// 0), and the result still sums to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LexicalOverride {
    pub fuzzy_threshold: f64,
    pub entailment_floor: f64,
    pub contradiction_ceiling: f64,
}

impl Default for LexicalOverride {
    fn default() -> Self {
        Self {
            fuzzy_threshold: FUZZY_OVERRIDE_THRESHOLD,
            entailment_floor: OVERRIDE_ENTAILMENT_FLOOR,
            contradiction_ceiling: OVERRIDE_CONTRADICTION_CEILING,
        }
    }
}

impl LexicalOverride {
    pub fn triggers(&self, literal_match: bool, fuzzy_similarity: f64) -> bool {
        literal_match || fuzzy_similarity > self.fuzzy_threshold
    }

    /// Raises the entailment floor and lowers the contradiction ceiling.
    pub fn apply(&self, raw: EntailmentDistribution) -> EntailmentDistribution {
        let entailment = raw.entailment.max(self.entailment_floor);
        let contradiction = raw.contradiction.min(self.contradiction_ceiling);
        let neutral = (1.0 - entailment - contradiction).max(0.0);
        EntailmentDistribution::new(contradiction, entailment, neutral)
    }
}
