use super::*;
use std::path::PathBuf;

use crate::vectordb::cosine_similarity;

mod config_tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    #[test]
    fn test_config_default_is_stub() {
        let config = SentenceEmbedderConfig::default();
        assert!(config.is_stub());
        assert_eq!(config.stub_dimension, SENTENCE_EMBEDDING_DIM);
        assert_eq!(config.max_seq_len, SENTENCE_MAX_SEQ_LEN);
        assert_eq!(config.batch_size, DEFAULT_EMBED_BATCH_SIZE);
    }

    #[test]
    fn test_config_new() {
        let config = SentenceEmbedderConfig::new("/models/all-MiniLM-L6-v2");
        assert_eq!(
            config.model_dir,
            Some(PathBuf::from("/models/all-MiniLM-L6-v2"))
        );
        assert!(!config.is_stub());
    }

    #[test]
    fn test_config_validate_rejects_zero_batch() {
        let config = SentenceEmbedderConfig::stub().with_batch_size(0);
        assert!(matches!(
            config.validate(),
            Err(EmbeddingError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_config_validate_rejects_empty_dir() {
        let config = SentenceEmbedderConfig {
            model_dir: Some(PathBuf::new()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_config_from_env() {
        // SAFETY: serialized test, no concurrent env access.
        unsafe { env::set_var(SentenceEmbedderConfig::ENV_MODEL_DIR, " /models/minilm ") };
        let config = SentenceEmbedderConfig::from_env();
        unsafe { env::remove_var(SentenceEmbedderConfig::ENV_MODEL_DIR) };

        assert_eq!(config.model_dir, Some(PathBuf::from("/models/minilm")));
    }

    #[test]
    #[serial]
    fn test_config_from_env_blank_is_stub() {
        // SAFETY: serialized test, no concurrent env access.
        unsafe { env::set_var(SentenceEmbedderConfig::ENV_MODEL_DIR, "   ") };
        let config = SentenceEmbedderConfig::from_env();
        unsafe { env::remove_var(SentenceEmbedderConfig::ENV_MODEL_DIR) };

        assert!(config.is_stub());
    }
}

#[test]
fn test_load_missing_model_dir() {
    let result = SentenceEmbedder::load(SentenceEmbedderConfig::new("/nonexistent/minilm"));
    assert!(matches!(
        result.unwrap_err(),
        EmbeddingError::ModelNotFound { .. }
    ));
}

#[test]
fn test_load_dir_without_weights() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.json"), "{}").unwrap();

    let result = SentenceEmbedder::load(SentenceEmbedderConfig::new(dir.path()));
    assert!(matches!(
        result.unwrap_err(),
        EmbeddingError::MissingModelFile {
            file: "model.safetensors",
            ..
        }
    ));
}

#[test]
fn test_stub_dimension_and_unit_norm() {
    let embedder = SentenceEmbedder::stub().unwrap();
    assert!(embedder.is_stub());
    assert_eq!(embedder.mode(), "stub");

    let v = embedder.embed("Flood waters recede in Assam").unwrap();
    assert_eq!(v.len(), SENTENCE_EMBEDDING_DIM);

    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() < 1e-5);
}

#[test]
fn test_stub_is_deterministic_across_instances() {
    let a = SentenceEmbedder::stub().unwrap();
    let b = SentenceEmbedder::stub().unwrap();
    assert_eq!(
        a.embed("Parliament passes bill").unwrap(),
        b.embed("Parliament passes bill").unwrap()
    );
}

#[test]
fn test_stub_similarity_tracks_word_overlap() {
    let embedder = SentenceEmbedder::stub().unwrap();
    let doc = embedder
        .embed("Earthquake hits region, says agency")
        .unwrap();
    let related = embedder.embed("earthquake hits region").unwrap();
    let unrelated = embedder.embed("cricket team wins final").unwrap();

    assert!(cosine_similarity(&doc, &related) > cosine_similarity(&doc, &unrelated));
    assert!(cosine_similarity(&doc, &related) > 0.5);
}

#[test]
fn test_stub_empty_text_is_zero_vector() {
    let embedder = SentenceEmbedder::stub().unwrap();
    let v = embedder.embed("").unwrap();
    assert!(v.iter().all(|x| *x == 0.0));
}

#[test]
fn test_batch_matches_single() {
    let embedder = SentenceEmbedder::stub().unwrap();
    let texts = ["one headline", "another headline", "third"];
    let batch = embedder.embed_batch(&texts).unwrap();

    assert_eq!(batch.len(), texts.len());
    for (text, vector) in texts.iter().zip(&batch) {
        assert_eq!(&embedder.embed(text).unwrap(), vector);
    }
    assert!(embedder.embed_batch(&[]).unwrap().is_empty());
}

#[test]
fn test_custom_stub_dimension() {
    let embedder =
        SentenceEmbedder::load(SentenceEmbedderConfig::stub().with_stub_dimension(16)).unwrap();
    assert_eq!(embedder.dimension(), 16);
    assert_eq!(embedder.embed("a b c").unwrap().len(), 16);
}
