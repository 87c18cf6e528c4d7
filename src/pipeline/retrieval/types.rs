use serde::{Deserialize, Serialize};

use super::RetrievalError;

/// A passage of the reference corpus with its relevance score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passage {
    pub id: String,
    pub content: String,
    pub source: Option<String>,
    pub page: Option<u32>,
    pub score: f32,
}

/// Returns the top-k passages for a topic, most relevant first.
pub trait RuleRetriever: Send + Sync {
    fn retrieve(&self, topic: &str, k: usize) -> Result<Vec<Passage>, RetrievalError>;
}

/// Embedding model abstraction
pub trait EmbeddingModel: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>, RetrievalError>;
}

/// Vector store search over precomputed embeddings.
pub trait VectorSearch: Send + Sync {
    fn search(&self, query_embedding: &[f32], top_k: usize) -> Result<Vec<Passage>, RetrievalError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traits_are_object_safe() {
        fn _assert_retriever(_: &dyn RuleRetriever) {}
        fn _assert_embedder(_: &dyn EmbeddingModel) {}
        fn _assert_search(_: &dyn VectorSearch) {}
    }
}
