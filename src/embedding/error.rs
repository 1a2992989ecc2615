//! Failures of the sentence embedding backends.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// One of `config.json`, `model.safetensors` or `tokenizer.json` is absent.
    #[error("sentence model file missing: {path}")]
    ModelFileMissing { path: PathBuf },

    #[error("failed to load sentence model from {model_dir}: {reason}")]
    ModelLoadFailed { model_dir: PathBuf, reason: String },

    #[error("failed to load tokenizer from {model_dir}: {reason}")]
    TokenizerLoadFailed { model_dir: PathBuf, reason: String },

    #[error("failed to tokenize text ({chars} chars): {reason}")]
    TokenizationFailed { chars: usize, reason: String },

    #[error("sentence embedding failed: {reason}")]
    InferenceFailed { reason: String },

    /// A [`SentenceEmbedderConfig`](super::SentenceEmbedderConfig) field is unusable.
    #[error("invalid embedder setting `{setting}`: {reason}")]
    InvalidSetting {
        setting: &'static str,
        reason: String,
    },

    /// The configured dimension disagrees with the loaded model's hidden size.
    #[error("embedding_dim is {configured} but the model produces {model}-dimensional vectors")]
    DimensionMismatch { configured: usize, model: usize },
}

impl From<candle_core::Error> for EmbeddingError {
    fn from(err: candle_core::Error) -> Self {
        EmbeddingError::InferenceFailed {
            reason: err.to_string(),
        }
    }
}
