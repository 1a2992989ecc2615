use super::*;
use crate::embedding::cosine_similarity;
use std::path::PathBuf;

fn stub() -> SentenceEmbedder {
    SentenceEmbedder::load(SentenceEmbedderConfig::stub()).expect("stub loads")
}

#[test]
fn test_config_default() {
    let config = SentenceEmbedderConfig::default();

    assert!(config.model_dir.as_os_str().is_empty());
    assert_eq!(config.embedding_dim, DEFAULT_EMBEDDING_DIM);
    assert_eq!(config.max_seq_len, DEFAULT_MAX_SEQ_LEN);
    assert!(!config.testing_stub);
}

#[test]
fn test_config_new() {
    let config = SentenceEmbedderConfig::new("/models/minilm");
    assert_eq!(config.model_dir, PathBuf::from("/models/minilm"));
}

#[test]
fn test_validate_requires_model_dir() {
    let result = SentenceEmbedderConfig::default().validate();
    assert!(matches!(
        result,
        Err(EmbeddingError::InvalidSetting {
            setting: "model_dir",
            ..
        })
    ));
}

#[test]
fn test_validate_missing_files() {
    let dir = tempfile::TempDir::new().expect("temp dir");
    let result = SentenceEmbedderConfig::new(dir.path()).validate();
    assert!(matches!(result, Err(EmbeddingError::ModelFileMissing { .. })));
}

#[test]
fn test_validate_zero_dim() {
    let result = SentenceEmbedderConfig::stub().with_embedding_dim(0).validate();
    let err = result.expect_err("zero dimension is rejected");

    assert!(matches!(
        err,
        EmbeddingError::InvalidSetting {
            setting: "embedding_dim",
            ..
        }
    ));
    assert_eq!(
        err.to_string(),
        "invalid embedder setting `embedding_dim`: must be greater than zero"
    );
}

#[test]
fn test_load_with_missing_model() {
    let result = SentenceEmbedder::load(SentenceEmbedderConfig::new("/nonexistent/model"));
    assert!(matches!(result, Err(EmbeddingError::ModelFileMissing { .. })));
}

#[test]
fn test_stub_mode() {
    let embedder = stub();
    assert!(embedder.is_stub());
    assert_eq!(embedder.dimension(), DEFAULT_EMBEDDING_DIM);
}

#[test]
fn test_stub_dimension_and_norm() {
    let embedder = stub();
    let v = embedder.embed("The vendor shall encrypt data").unwrap();

    assert_eq!(v.len(), DEFAULT_EMBEDDING_DIM);
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() < 1e-5);
}

#[test]
fn test_stub_determinism() {
    let embedder = stub();
    let a = embedder.embed("Access reviews happen quarterly").unwrap();
    let b = embedder.embed("Access reviews happen quarterly").unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_stub_case_insensitive_tokens() {
    let embedder = stub();
    let a = embedder.embed("ENCRYPT DATA").unwrap();
    let b = embedder.embed("encrypt data").unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_stub_shared_vocabulary_is_closer() {
    let embedder = stub();
    let query = embedder.embed("encrypt customer data at rest").unwrap();
    let near = embedder.embed("customer data at rest is encrypted").unwrap();
    let far = embedder.embed("badges are issued at reception").unwrap();

    assert!(cosine_similarity(&query, &near) > cosine_similarity(&query, &far));
}

#[test]
fn test_stub_empty_text_is_zero_vector() {
    let embedder = stub();
    let v = embedder.embed("   ").unwrap();
    assert!(v.iter().all(|x| *x == 0.0));
}

#[test]
fn test_embed_batch_preserves_order() {
    let embedder = stub();
    let batch = embedder.embed_batch(&["alpha", "beta"]).unwrap();

    assert_eq!(batch.len(), 2);
    assert_eq!(batch[0], embedder.embed("alpha").unwrap());
    assert_eq!(batch[1], embedder.embed("beta").unwrap());
}

#[test]
fn test_debug_output() {
    let debug = format!("{:?}", stub());
    assert!(debug.contains("Stub"));
    assert!(debug.contains("embedding_dim"));
}
