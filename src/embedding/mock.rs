use std::collections::HashMap;

use parking_lot::Mutex;

use super::{Embedder, EmbeddingError};

/// Table-driven embedder for tests.
///
/// Known texts return their registered vector; unknown texts return `fallback`
/// (a zero vector by default) or fail when built with [`MockEmbedder::strict`].
pub struct MockEmbedder {
    dimension: usize,
    vectors: HashMap<String, Vec<f32>>,
    fallback: Option<Vec<f32>>,
    calls: Mutex<Vec<String>>,
}

impl MockEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            vectors: HashMap::new(),
            fallback: Some(vec![0.0; dimension]),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Unknown texts produce an inference error.
    pub fn strict(dimension: usize) -> Self {
        Self {
            fallback: None,
            ..Self::new(dimension)
        }
    }

    pub fn with_vector(mut self, text: impl Into<String>, vector: Vec<f32>) -> Self {
        self.vectors.insert(text.into(), vector);
        self
    }

    pub fn with_fallback(mut self, vector: Vec<f32>) -> Self {
        self.fallback = Some(vector);
        self
    }

    /// Texts embedded so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

impl Embedder for MockEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.lock().push(text.to_string());

        match self.vectors.get(text).or(self.fallback.as_ref()) {
            Some(v) => Ok(v.clone()),
            None => Err(EmbeddingError::InferenceFailed {
                reason: format!("no mock vector for '{}'", text),
            }),
        }
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
