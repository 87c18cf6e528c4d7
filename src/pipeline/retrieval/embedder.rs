use super::types::EmbeddingModel;
use super::RetrievalError;
use crate::pipeline::classify::OllamaClient;

/// Embedding model served by a local Ollama instance (e.g. `all-minilm`).
pub struct OllamaEmbedder {
    client: OllamaClient,
    model: String,
}

impl OllamaEmbedder {
    pub fn new(client: OllamaClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// The model name being used.
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl EmbeddingModel for OllamaEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, RetrievalError> {
        let vector = self
            .client
            .embed(&self.model, text)
            .map_err(|e| RetrievalError::EmbeddingFailed(e.to_string()))?;

        if vector.is_empty() {
            return Err(RetrievalError::EmbeddingFailed(format!(
                "model {} returned an empty embedding",
                self.model
            )));
        }
        Ok(vector)
    }
}

/// Deterministic hash-based embedder for tests and offline demos.
pub struct MockEmbedder {
    dimension: usize,
}

impl MockEmbedder {
    pub fn new() -> Self {
        Self { dimension: 384 }
    }

    pub fn with_dimension(dimension: usize) -> Self {
        Self { dimension }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl EmbeddingModel for MockEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, RetrievalError> {
        Ok(deterministic_vector(text, self.dimension))
    }
}

/// Generate a deterministic unit vector from text.
pub fn deterministic_vector(text: &str, dim: usize) -> Vec<f32> {
    let mut vec = vec![0.0f32; dim];
    let bytes = text.as_bytes();

    for (i, slot) in vec.iter_mut().enumerate() {
        let byte_idx = i % bytes.len().max(1);
        *slot = (bytes.get(byte_idx).copied().unwrap_or(0) as f32 + i as f32) / 255.0;
    }

    // L2 normalize
    let norm: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for val in &mut vec {
            *val /= norm;
        }
    }

    vec
}
