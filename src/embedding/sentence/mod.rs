//! Sentence embedder (BERT encoder + mean pooling).
//!
//! Use [`SentenceEmbedderConfig::stub`] for tests without model files.

/// Sentence embedder configuration.
pub mod config;

#[cfg(test)]
mod tests;

pub use config::{
    DEFAULT_EMBED_BATCH_SIZE, SENTENCE_EMBEDDING_DIM, SENTENCE_MAX_SEQ_LEN,
    SentenceEmbedderConfig,
};

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig, DTYPE};
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use crate::embedding::device::select_device;
use crate::embedding::embedder::{Embedder, l2_normalize};
use crate::embedding::error::EmbeddingError;
use crate::embedding::utils::{load_batch_tokenizer, resolve_model_files};
use crate::normalize::word_tokens;

enum SentenceBackend {
    Model {
        model: BertModel,
        tokenizer: Tokenizer,
        device: Device,
    },
    Stub,
}

/// Embeds text with a sentence-transformer checkpoint (or a hashed bag-of-words stub).
pub struct SentenceEmbedder {
    backend: SentenceBackend,
    config: SentenceEmbedderConfig,
    dimension: usize,
}

impl std::fmt::Debug for SentenceEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentenceEmbedder")
            .field(
                "backend",
                &match &self.backend {
                    SentenceBackend::Model { device, .. } => format!("Model({:?})", device),
                    SentenceBackend::Stub => "Stub".to_string(),
                },
            )
            .field("dimension", &self.dimension)
            .field("max_seq_len", &self.config.max_seq_len)
            .finish()
    }
}

impl SentenceEmbedder {
    pub fn load(config: SentenceEmbedderConfig) -> Result<Self, EmbeddingError> {
        config.validate()?;

        let Some(model_dir) = config.model_dir.clone() else {
            warn!(
                dimension = config.stub_dimension,
                "Sentence embedder running in STUB mode"
            );
            return Ok(Self {
                backend: SentenceBackend::Stub,
                dimension: config.stub_dimension,
                config,
            });
        };

        let files = resolve_model_files(&model_dir)?;
        let device = select_device()?;
        debug!(?device, "Selected compute device for sentence embedder");

        let bert_config: BertConfig =
            serde_json::from_str(&std::fs::read_to_string(&files.config)?).map_err(|e| {
                EmbeddingError::ModelLoadFailed {
                    reason: format!("failed to parse {}: {}", files.config.display(), e),
                }
            })?;

        // SAFETY: the weights file is not modified while the process holds the mapping.
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[&files.weights], DTYPE, &device)? };
        let vb = if vb.contains_tensor("bert.embeddings.word_embeddings.weight") {
            vb.pp("bert")
        } else {
            vb
        };
        let model = BertModel::load(vb, &bert_config).map_err(|e| {
            EmbeddingError::ModelLoadFailed {
                reason: format!("failed to load BERT encoder: {}", e),
            }
        })?;

        let tokenizer = load_batch_tokenizer(&files.tokenizer, config.max_seq_len)?;

        info!(
            model_dir = %model_dir.display(),
            dimension = bert_config.hidden_size,
            max_seq_len = config.max_seq_len,
            "Sentence embedder loaded"
        );

        Ok(Self {
            backend: SentenceBackend::Model {
                model,
                tokenizer,
                device,
            },
            dimension: bert_config.hidden_size,
            config,
        })
    }

    pub fn stub() -> Result<Self, EmbeddingError> {
        Self::load(SentenceEmbedderConfig::stub())
    }

    pub fn is_stub(&self) -> bool {
        matches!(self.backend, SentenceBackend::Stub)
    }

    pub fn config(&self) -> &SentenceEmbedderConfig {
        &self.config
    }

    fn embed_with_model(
        &self,
        texts: &[&str],
        model: &BertModel,
        tokenizer: &Tokenizer,
        device: &Device,
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let encodings = tokenizer.encode_batch(texts.to_vec(), true).map_err(|e| {
            EmbeddingError::TokenizationFailed {
                reason: e.to_string(),
            }
        })?;

        let stack = |field: fn(&tokenizers::Encoding) -> &[u32]| -> Result<Tensor, EmbeddingError> {
            let rows = encodings
                .iter()
                .map(|encoding| Tensor::new(field(encoding), device))
                .collect::<candle_core::Result<Vec<_>>>()?;
            Ok(Tensor::stack(&rows, 0)?)
        };

        let input_ids = stack(tokenizers::Encoding::get_ids)?;
        let type_ids = stack(tokenizers::Encoding::get_type_ids)?;
        let attention_mask = stack(tokenizers::Encoding::get_attention_mask)?;

        debug!(
            batch = texts.len(),
            seq_len = input_ids.dim(1)?,
            "Sentence embedder forward pass"
        );

        // hidden: [batch, seq, hidden]
        let hidden = model.forward(&input_ids, &type_ids, Some(&attention_mask))?;

        // Mean pooling over real (unpadded) tokens.
        let mask = attention_mask.to_dtype(DType::F32)?.unsqueeze(2)?;
        let summed = hidden.broadcast_mul(&mask)?.sum(1)?;
        let counts = mask.sum(1)?.clamp(1e-9f32, f32::MAX)?;
        let pooled = summed.broadcast_div(&counts)?;

        let mut vectors = pooled.to_vec2::<f32>()?;
        for vector in &mut vectors {
            l2_normalize(vector);
        }
        Ok(vectors)
    }

    /// Feature-hashed bag of words: each lowercase word adds ±1 to a BLAKE3-chosen slot.
    fn embed_stub(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        for word in word_tokens(text) {
            let hash = blake3::hash(word.as_bytes());
            let bytes = hash.as_bytes();
            let slot = u64::from_le_bytes([
                bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
            ]) % self.dimension as u64;
            let sign = if bytes[8] & 1 == 0 { 1.0 } else { -1.0 };
            vector[slot as usize] += sign;
        }
        l2_normalize(&mut vector);
        vector
    }
}

impl Embedder for SentenceEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut batch = self.embed_batch(&[text])?;
        batch.pop().ok_or_else(|| EmbeddingError::InferenceFailed {
            reason: "empty embedding batch".to_string(),
        })
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        match &self.backend {
            SentenceBackend::Model {
                model,
                tokenizer,
                device,
            } => {
                let mut vectors = Vec::with_capacity(texts.len());
                for chunk in texts.chunks(self.config.batch_size) {
                    vectors.extend(self.embed_with_model(chunk, model, tokenizer, device)?);
                }
                Ok(vectors)
            }
            SentenceBackend::Stub => Ok(texts.iter().map(|text| self.embed_stub(text)).collect()),
        }
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn mode(&self) -> &'static str {
        if self.is_stub() { "stub" } else { "model" }
    }
}
