//! Embedding generation.
//!
//! - [`Embedder`] is the seam the vector index and the domain classifier depend on.
//! - [`sentence`] provides the candle-backed sentence embedder (with a stub mode).

/// BERT encoder with mean pooling.
pub mod bert;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
mod error;
#[cfg(any(test, feature = "mock"))]
/// Table-driven embedder for tests.
pub mod mock;
/// Sentence embedder used for retrieval and classification.
pub mod sentence;
/// Tokenizer loading helpers.
pub mod utils;

pub use error::EmbeddingError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockEmbedder;
pub use sentence::{
    DEFAULT_EMBEDDING_DIM, DEFAULT_MAX_SEQ_LEN, SentenceEmbedder, SentenceEmbedderConfig,
};

/// Turns text into a dense vector. Must be deterministic for a fixed input and model.
pub trait Embedder: Send + Sync {
    /// Embeds a single text.
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Embeds several texts, preserving order.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        texts.iter().map(|text| self.embed(text)).collect()
    }

    /// Output dimension.
    fn dimension(&self) -> usize;
}

/// Scales `v` to unit length in place (zero vectors are left alone).
pub fn l2_normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

/// Cosine similarity; `0.0` on length mismatch or zero vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}
