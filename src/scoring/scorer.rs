use tracing::debug;

use crate::embedding::{NliClassifier, NliConfig, NliLogits};

use super::error::ScoringError;
use super::types::EntailmentDistribution;

/// Numerically stable softmax: the max logit is subtracted before `exp`.
pub fn softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|&l| (l - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

impl TryFrom<NliLogits> for EntailmentDistribution {
    type Error = ScoringError;

    fn try_from(logits: NliLogits) -> Result<Self, Self::Error> {
        let raw = [logits.contradiction, logits.entailment, logits.neutral];
        if raw.iter().any(|l| !l.is_finite()) {
            return Err(ScoringError::NonFiniteLogits { logits: raw });
        }

        let probs = softmax(&raw.map(f64::from));
        Ok(EntailmentDistribution::new(probs[0], probs[1], probs[2]))
    }
}

/// Scores an (evidence, claim) pair into an [`EntailmentDistribution`].
pub struct EntailmentScorer {
    classifier: NliClassifier,
}

impl std::fmt::Debug for EntailmentScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntailmentScorer")
            .field("classifier", &self.classifier)
            .finish()
    }
}

impl EntailmentScorer {
    pub fn new(config: NliConfig) -> Result<Self, ScoringError> {
        Ok(Self {
            classifier: NliClassifier::load(config)?,
        })
    }

    pub fn stub() -> Result<Self, ScoringError> {
        Ok(Self {
            classifier: NliClassifier::stub()?,
        })
    }

    pub fn from_classifier(classifier: NliClassifier) -> Self {
        Self { classifier }
    }

    pub fn is_model_loaded(&self) -> bool {
        self.classifier.is_model_loaded()
    }

    pub fn classifier(&self) -> &NliClassifier {
        &self.classifier
    }

    /// `evidence` is the premise, `claim` the hypothesis.
    pub fn score(&self, evidence: &str, claim: &str) -> Result<EntailmentDistribution, ScoringError> {
        let logits = self.classifier.predict(evidence, claim)?;
        let distribution = EntailmentDistribution::try_from(logits)?;

        debug!(
            entailment = distribution.entailment,
            contradiction = distribution.contradiction,
            neutral = distribution.neutral,
            "Scored pair"
        );

        Ok(distribution)
    }
}
