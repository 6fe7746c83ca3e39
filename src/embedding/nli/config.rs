use std::path::PathBuf;

/// Max tokens for a (premise, hypothesis) pair.
pub const MAX_SEQ_LEN: usize = crate::constants::DEFAULT_NLI_MAX_SEQ_LEN;

/// Logit order assumed when `config.json` has no `id2label` table
/// (the `cross-encoder/nli-*` convention).
pub const DEFAULT_LABEL_ORDER: [&str; 3] = ["contradiction", "entailment", "neutral"];

#[derive(Debug, Clone)]
pub struct NliConfig {
    /// Model directory; `None` runs the lexical stub.
    pub model_dir: Option<PathBuf>,

    pub max_seq_len: usize,
}

impl Default for NliConfig {
    fn default() -> Self {
        Self {
            model_dir: None,
            max_seq_len: MAX_SEQ_LEN,
        }
    }
}

impl NliConfig {
    pub const ENV_MODEL_DIR: &'static str = "VERITY_NLI_PATH";

    pub fn new<P: Into<PathBuf>>(model_dir: P) -> Self {
        Self {
            model_dir: Some(model_dir.into()),
            ..Default::default()
        }
    }

    pub fn stub() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_seq_len < 8 {
            return Err(format!(
                "max_seq_len must be at least 8, got {}",
                self.max_seq_len
            ));
        }

        if let Some(ref path) = self.model_dir
            && path.as_os_str().is_empty()
        {
            return Err("model_dir cannot be empty when provided".to_string());
        }

        Ok(())
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
}
