use std::path::PathBuf;

use crate::embedding::error::EmbeddingError;

/// Default output dimension (MiniLM-L6 sentence embeddings).
pub const SENTENCE_EMBEDDING_DIM: usize = crate::constants::DEFAULT_EMBEDDING_DIM;

/// Default max sequence length.
pub const SENTENCE_MAX_SEQ_LEN: usize = crate::constants::DEFAULT_EMBEDDER_MAX_SEQ_LEN;

/// Texts per forward pass.
pub const DEFAULT_EMBED_BATCH_SIZE: usize = 32;

#[derive(Debug, Clone)]
/// Configuration for [`SentenceEmbedder`](super::SentenceEmbedder).
pub struct SentenceEmbedderConfig {
    /// Directory with `config.json`, `model.safetensors` and `tokenizer.json`.
    /// `None` selects the deterministic stub.
    pub model_dir: Option<PathBuf>,
    pub max_seq_len: usize,
    pub batch_size: usize,
    /// Vector size produced in stub mode.
    pub stub_dimension: usize,
}

impl Default for SentenceEmbedderConfig {
    fn default() -> Self {
        Self {
            model_dir: None,
            max_seq_len: SENTENCE_MAX_SEQ_LEN,
            batch_size: DEFAULT_EMBED_BATCH_SIZE,
            stub_dimension: SENTENCE_EMBEDDING_DIM,
        }
    }
}

impl SentenceEmbedderConfig {
    pub const ENV_MODEL_DIR: &'static str = "VERITY_EMBEDDER_PATH";

    pub fn new<P: Into<PathBuf>>(model_dir: P) -> Self {
        Self {
            model_dir: Some(model_dir.into()),
            ..Default::default()
        }
    }

    pub fn stub() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let model_dir = std::env::var(Self::ENV_MODEL_DIR)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Self {
            model_dir,
            ..Default::default()
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_stub_dimension(mut self, dimension: usize) -> Self {
        self.stub_dimension = dimension;
        self
    }

    pub fn is_stub(&self) -> bool {
        self.model_dir.is_none()
    }

    pub fn validate(&self) -> Result<(), EmbeddingError> {
        if self.batch_size == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "batch_size must be > 0".to_string(),
            });
        }
        if self.max_seq_len == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "max_seq_len must be > 0".to_string(),
            });
        }
        if self.is_stub() && self.stub_dimension == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "stub_dimension must be > 0".to_string(),
            });
        }
        if let Some(ref dir) = self.model_dir
            && dir.as_os_str().is_empty()
        {
            return Err(EmbeddingError::InvalidConfig {
                reason: "model_dir cannot be empty when provided".to_string(),
            });
        }
        Ok(())
    }
}
