use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The three NLI relationships between evidence and claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NliLabel {
    Contradiction,
    Entailment,
    Neutral,
}

impl NliLabel {
    pub const ALL: [NliLabel; 3] = [
        NliLabel::Contradiction,
        NliLabel::Entailment,
        NliLabel::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NliLabel::Contradiction => "contradiction",
            NliLabel::Entailment => "entailment",
            NliLabel::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for NliLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Probability distribution over [`NliLabel`]. Non-negative, sums to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EntailmentDistribution {
    pub contradiction: f64,
    pub entailment: f64,
    pub neutral: f64,
}

impl EntailmentDistribution {
    pub const SUM_TOLERANCE: f64 = 1e-9;

    pub fn new(contradiction: f64, entailment: f64, neutral: f64) -> Self {
        Self {
            contradiction,
            entailment,
            neutral,
        }
    }

    pub fn get(&self, label: NliLabel) -> f64 {
        match label {
            NliLabel::Contradiction => self.contradiction,
            NliLabel::Entailment => self.entailment,
            NliLabel::Neutral => self.neutral,
        }
    }

    pub fn sum(&self) -> f64 {
        self.contradiction + self.entailment + self.neutral
    }

    /// All components in [0, 1] and summing to 1 within tolerance.
    pub fn is_valid(&self) -> bool {
        let in_range = NliLabel::ALL
            .iter()
            .all(|&l| (0.0..=1.0).contains(&self.get(l)));
        in_range && (self.sum() - 1.0).abs() <= Self::SUM_TOLERANCE
    }

    /// Most probable label. Ties resolve in [`NliLabel::ALL`] order.
    pub fn argmax(&self) -> NliLabel {
        NliLabel::ALL
            .into_iter()
            .fold(NliLabel::Contradiction, |best, l| {
                if self.get(l) > self.get(best) { l } else { best }
            })
    }

    pub fn to_map(&self) -> BTreeMap<NliLabel, f64> {
        NliLabel::ALL.iter().map(|&l| (l, self.get(l))).collect()
    }
}
