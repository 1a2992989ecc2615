use thiserror::Error;

use crate::embedding::EmbeddingError;

#[derive(Debug, Error)]
/// Errors returned while building a [`VectorIndex`](super::VectorIndex).
pub enum IndexError {
    /// Corpus embedding failed.
    #[error("failed to embed corpus: {0}")]
    Embedding(#[from] EmbeddingError),

    /// Embedder returned a vector of the wrong length.
    #[error("invalid vector dimension for unit '{unit_id}': expected {expected}, got {actual}")]
    InvalidDimension {
        /// Offending unit.
        unit_id: String,
        /// Embedder dimension.
        expected: usize,
        /// Observed length.
        actual: usize,
    },
}
