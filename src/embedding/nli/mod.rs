//! Natural-language-inference cross-encoder.
//!
//! Scores an ordered (premise, hypothesis) pair and returns raw logits for
//! contradiction, entailment and neutral. Probability conversion lives in
//! [`crate::scoring`].

pub mod config;
pub mod error;


pub use config::{DEFAULT_LABEL_ORDER, MAX_SEQ_LEN, NliConfig};
pub use error::NliError;

use std::collections::HashSet;

use candle_core::Tensor;
use tokenizers::Tokenizer;
use tracing::{debug, info};

use crate::embedding::bert::BertClassifier;
use crate::embedding::device::select_device;
use crate::embedding::utils::{load_pair_tokenizer, resolve_model_files};
use crate::normalize::word_tokens;

/// Unnormalized classifier outputs for one pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NliLogits {
    pub contradiction: f32,
    pub entailment: f32,
    pub neutral: f32,
}

impl NliLogits {
    pub fn new(contradiction: f32, entailment: f32, neutral: f32) -> Self {
        Self {
            contradiction,
            entailment,
            neutral,
        }
    }
}

/// Logit positions of the three labels inside the classifier head.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LabelLayout {
    contradiction: usize,
    entailment: usize,
    neutral: usize,
}

impl LabelLayout {
    fn from_labels(labels: &[String]) -> Result<Self, NliError> {
        let find = |name: &str| {
            labels
                .iter()
                .position(|l| l.to_lowercase().starts_with(name))
        };

        match (find("contradiction"), find("entailment"), find("neutral")) {
            (Some(contradiction), Some(entailment), Some(neutral)) if labels.len() == 3 => {
                Ok(Self {
                    contradiction,
                    entailment,
                    neutral,
                })
            }
            _ => Err(NliError::UnsupportedLabels {
                labels: labels.to_vec(),
            }),
        }
    }
}

struct LoadedModel {
    model: BertClassifier,
    tokenizer: Tokenizer,
    layout: LabelLayout,
    device: candle_core::Device,
}

pub struct NliClassifier {
    config: NliConfig,
    model: Option<LoadedModel>,
}

impl std::fmt::Debug for NliClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NliClassifier")
            .field("config", &self.config)
            .field("model_loaded", &self.is_model_loaded())
            .field(
                "device",
                &self.model.as_ref().map(|m| format!("{:?}", m.device)),
            )
            .finish()
    }
}

impl NliClassifier {
    pub fn load(config: NliConfig) -> Result<Self, NliError> {
        if let Err(reason) = config.validate() {
            return Err(NliError::InvalidConfig { reason });
        }

        let Some(model_dir) = config.model_dir.clone() else {
            info!("No NLI model configured, operating in stub mode");
            return Ok(Self {
                config,
                model: None,
            });
        };

        let files = resolve_model_files(&model_dir)?;
        let device = select_device()?;
        debug!(?device, "Selected compute device for NLI classifier");

        info!(model_dir = %model_dir.display(), "Loading NLI classifier");

        let model = BertClassifier::load(&files.config, &files.weights, &DEFAULT_LABEL_ORDER, &device)
            .map_err(|e| NliError::ModelLoadFailed {
                reason: format!("Failed to load BERT classifier: {}", e),
            })?;
        let layout = LabelLayout::from_labels(model.labels())?;
        let tokenizer = load_pair_tokenizer(&files.tokenizer, config.max_seq_len)?;

        info!(labels = ?model.labels(), "NLI classifier loaded successfully");

        Ok(Self {
            config,
            model: Some(LoadedModel {
                model,
                tokenizer,
                layout,
                device,
            }),
        })
    }

    pub fn stub() -> Result<Self, NliError> {
        Self::load(NliConfig::stub())
    }

    pub fn is_model_loaded(&self) -> bool {
        self.model.is_some()
    }

    pub fn config(&self) -> &NliConfig {
        &self.config
    }

    /// Scores `premise` (evidence) against `hypothesis` (claim).
    pub fn predict(&self, premise: &str, hypothesis: &str) -> Result<NliLogits, NliError> {
        debug!(
            premise_len = premise.len(),
            hypothesis_len = hypothesis.len(),
            model_loaded = self.is_model_loaded(),
            "Classifying premise-hypothesis pair"
        );

        match &self.model {
            Some(loaded) => Self::predict_with_model(loaded, premise, hypothesis),
            None => Ok(lexical_logits(premise, hypothesis)),
        }
    }

    fn predict_with_model(
        loaded: &LoadedModel,
        premise: &str,
        hypothesis: &str,
    ) -> Result<NliLogits, NliError> {
        let tokens = loaded
            .tokenizer
            .encode((premise, hypothesis), true)
            .map_err(|e| NliError::TokenizationFailed {
                reason: e.to_string(),
            })?;

        let row = |data: &[u32]| -> Result<Tensor, NliError> {
            Ok(Tensor::new(data, &loaded.device)?.unsqueeze(0)?)
        };

        let token_ids = row(tokens.get_ids())?;
        let type_ids = row(tokens.get_type_ids())?;
        let attention_mask = row(tokens.get_attention_mask())?;

        let logits = loaded
            .model
            .forward(&token_ids, &type_ids, Some(&attention_mask))
            .map_err(|e| NliError::InferenceFailed {
                reason: e.to_string(),
            })?
            .flatten_all()?
            .to_vec1::<f32>()?;

        let at = |idx: usize| {
            logits
                .get(idx)
                .copied()
                .ok_or_else(|| NliError::InferenceFailed {
                    reason: format!("classifier returned {} logits", logits.len()),
                })
        };

        let layout = loaded.layout;
        Ok(NliLogits::new(
            at(layout.contradiction)?,
            at(layout.entailment)?,
            at(layout.neutral)?,
        ))
    }
}

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "none", "nobody", "nothing", "neither", "nor", "denies", "denied",
    "deny", "false", "fake", "hoax", "without", "cannot",
];

const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had",
    "do", "does", "did", "will", "would", "could", "should", "may", "might", "must", "can", "to",
    "of", "in", "for", "on", "with", "at", "by", "from", "as", "into", "and", "but", "if", "or",
    "so", "than", "too", "very", "just", "this", "that", "these", "those", "it", "its", "says",
    "said",
];

/// Stub logits from word overlap: recall of hypothesis words in the premise
/// drives entailment vs. neutral, and a one-sided negation flips strong
/// overlap toward contradiction.
fn lexical_logits(premise: &str, hypothesis: &str) -> NliLogits {
    let stop: HashSet<&str> = STOP_WORDS.iter().copied().collect();
    let negations: HashSet<&str> = NEGATIONS.iter().copied().collect();

    let premise_words: Vec<String> = word_tokens(premise).collect();
    let hypothesis_words: Vec<String> = word_tokens(hypothesis).collect();

    let negated = |words: &[String]| words.iter().any(|w| negations.contains(w.as_str()));
    let content = |words: &[String]| -> HashSet<String> {
        words
            .iter()
            .filter(|w| !stop.contains(w.as_str()) && !negations.contains(w.as_str()))
            .cloned()
            .collect()
    };

    let premise_content = content(&premise_words);
    let hypothesis_content = content(&hypothesis_words);

    if hypothesis_content.is_empty() {
        return NliLogits::new(-2.0, -2.0, 3.0);
    }

    let matched = hypothesis_content.intersection(&premise_content).count();
    let recall = matched as f32 / hypothesis_content.len() as f32;

    let polarity_flip = negated(&premise_words) != negated(&hypothesis_words);

    if polarity_flip && recall >= 0.5 {
        NliLogits::new(6.0 * recall - 2.0, -3.0, 2.0 - 4.0 * recall)
    } else {
        NliLogits::new(-2.0, 6.0 * recall - 3.0, 3.0 - 6.0 * recall)
    }
}
