use std::path::{Path, PathBuf};

use tokenizers::{
    PaddingParams, PaddingStrategy, Tokenizer, TruncationParams, TruncationStrategy,
};

use super::error::EmbeddingError;

pub const CONFIG_FILE: &str = "config.json";
pub const WEIGHTS_FILE: &str = "model.safetensors";
pub const TOKENIZER_FILE: &str = "tokenizer.json";

/// Resolved file set of a Hugging Face style model directory.
#[derive(Debug, Clone)]
pub struct ModelFiles {
    pub config: PathBuf,
    pub weights: PathBuf,
    pub tokenizer: PathBuf,
}

/// Checks that `dir` holds `config.json`, `model.safetensors` and `tokenizer.json`.
pub fn resolve_model_files(dir: &Path) -> Result<ModelFiles, EmbeddingError> {
    if !dir.is_dir() {
        return Err(EmbeddingError::ModelNotFound {
            path: dir.to_path_buf(),
        });
    }

    let require = |file: &'static str| {
        let path = dir.join(file);
        if path.is_file() {
            Ok(path)
        } else {
            Err(EmbeddingError::MissingModelFile {
                dir: dir.to_path_buf(),
                file,
            })
        }
    };

    Ok(ModelFiles {
        config: require(CONFIG_FILE)?,
        weights: require(WEIGHTS_FILE)?,
        tokenizer: require(TOKENIZER_FILE)?,
    })
}

fn load_tokenizer(path: &Path) -> Result<Tokenizer, EmbeddingError> {
    Tokenizer::from_file(path).map_err(|e| EmbeddingError::TokenizationFailed {
        reason: format!("failed to load {}: {}", path.display(), e),
    })
}

fn truncation(max_len: usize, strategy: TruncationStrategy) -> TruncationParams {
    TruncationParams {
        max_length: max_len,
        strategy,
        ..Default::default()
    }
}

/// Tokenizer for batched single-sequence inputs: truncates to `max_len` and
/// pads each batch to its longest member.
pub fn load_batch_tokenizer(path: &Path, max_len: usize) -> Result<Tokenizer, EmbeddingError> {
    let mut tokenizer = load_tokenizer(path)?;

    tokenizer
        .with_truncation(Some(truncation(max_len, TruncationStrategy::LongestFirst)))
        .map_err(|e| EmbeddingError::TokenizationFailed {
            reason: format!("failed to configure truncation: {}", e),
        })?;

    tokenizer.with_padding(Some(PaddingParams {
        strategy: PaddingStrategy::BatchLongest,
        ..Default::default()
    }));

    Ok(tokenizer)
}

/// Tokenizer for (premise, hypothesis) pairs. Truncation trims the longer side first,
/// so a long article never pushes the claim out of the window.
pub fn load_pair_tokenizer(path: &Path, max_len: usize) -> Result<Tokenizer, EmbeddingError> {
    let mut tokenizer = load_tokenizer(path)?;

    tokenizer
        .with_truncation(Some(truncation(max_len, TruncationStrategy::LongestFirst)))
        .map_err(|e| EmbeddingError::TokenizationFailed {
            reason: format!("failed to configure truncation: {}", e),
        })?;

    Ok(tokenizer)
}
