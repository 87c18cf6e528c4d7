use std::path::Path;

use serde::{Deserialize, Serialize};

use super::types::{Passage, VectorSearch};
use super::RetrievalError;

/// On-disk JSON snapshot of a prebuilt rule index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexSnapshot {
    pub dimension: usize,
    pub passages: Vec<IndexedPassage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedPassage {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
    pub embedding: Vec<f32>,
}

/// In-memory cosine-similarity search over an index snapshot.
pub struct InMemoryVectorSearch {
    dimension: usize,
    entries: Vec<IndexedPassage>,
}

impl InMemoryVectorSearch {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            entries: Vec::new(),
        }
    }

    /// Load and validate a snapshot file.
    pub fn load(path: &Path) -> Result<Self, RetrievalError> {
        if !path.exists() {
            return Err(RetrievalError::IndexNotFound(path.to_path_buf()));
        }

        let raw = std::fs::read_to_string(path)?;
        let snapshot: IndexSnapshot = serde_json::from_str(&raw)
            .map_err(|e| RetrievalError::IndexFormat(e.to_string()))?;

        let index = Self::from_snapshot(snapshot)?;
        tracing::info!(
            path = %path.display(),
            passages = index.len(),
            dimension = index.dimension,
            "Rule index loaded"
        );
        Ok(index)
    }

    pub fn from_snapshot(snapshot: IndexSnapshot) -> Result<Self, RetrievalError> {
        if snapshot.dimension == 0 {
            return Err(RetrievalError::IndexFormat("dimension must be positive".into()));
        }

        let mut index = Self::new(snapshot.dimension);
        for passage in snapshot.passages {
            index.insert(passage)?;
        }
        Ok(index)
    }

    pub fn insert(&mut self, passage: IndexedPassage) -> Result<(), RetrievalError> {
        if passage.embedding.len() != self.dimension {
            return Err(RetrievalError::DimensionMismatch {
                expected: self.dimension,
                actual: passage.embedding.len(),
            });
        }
        self.entries.push(passage);
        Ok(())
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl VectorSearch for InMemoryVectorSearch {
    fn search(&self, query_embedding: &[f32], top_k: usize) -> Result<Vec<Passage>, RetrievalError> {
        if query_embedding.len() != self.dimension {
            return Err(RetrievalError::DimensionMismatch {
                expected: self.dimension,
                actual: query_embedding.len(),
            });
        }

        // NaN scores (overflowing norms) have no rank and are left out.
        let mut scored: Vec<(f32, &IndexedPassage)> = self
            .entries
            .iter()
            .map(|entry| (cosine_similarity(query_embedding, &entry.embedding), entry))
            .filter(|(score, _)| !score.is_nan())
            .collect();

        // Stable sort keeps snapshot order among equal scores.
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        Ok(scored
            .into_iter()
            .take(top_k)
            .map(|(score, entry)| Passage {
                id: entry.id.clone(),
                content: entry.content.clone(),
                source: entry.source.clone(),
                page: entry.page,
                score,
            })
            .collect())
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}
