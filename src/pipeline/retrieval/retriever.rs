use super::types::{EmbeddingModel, Passage, RuleRetriever, VectorSearch};
use super::RetrievalError;

/// Embeds the topic and searches the rule index with it.
pub struct VectorRuleRetriever<E: EmbeddingModel, V: VectorSearch> {
    embedder: E,
    index: V,
}

impl<E: EmbeddingModel, V: VectorSearch> VectorRuleRetriever<E, V> {
    pub fn new(embedder: E, index: V) -> Self {
        Self { embedder, index }
    }
}

impl<E: EmbeddingModel, V: VectorSearch> RuleRetriever for VectorRuleRetriever<E, V> {
    fn retrieve(&self, topic: &str, k: usize) -> Result<Vec<Passage>, RetrievalError> {
        let query_embedding = self.embedder.embed(topic)?;
        let passages = self.index.search(&query_embedding, k)?;

        tracing::debug!(
            topic,
            k,
            returned = passages.len(),
            best_score = ?passages.first().map(|p| p.score),
            "Rule retrieval complete"
        );

        Ok(passages)
    }
}
