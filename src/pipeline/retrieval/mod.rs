//! Rule retrieval: finds the reference-standard passages most relevant to an
//! audit topic.
//!
//! The retriever embeds the topic, searches a prebuilt vector index snapshot
//! by cosine similarity, and returns passages best-first. Building the index
//! happens outside this crate.

pub mod types;
pub mod embedder;
pub mod index;
pub mod retriever;

pub use types::*;
pub use embedder::{deterministic_vector, MockEmbedder, OllamaEmbedder};
pub use index::{IndexSnapshot, IndexedPassage, InMemoryVectorSearch};
pub use retriever::VectorRuleRetriever;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Embedding generation failed: {0}")]
    EmbeddingFailed(String),

    #[error("Vector search failed: {0}")]
    VectorSearch(String),

    #[error("Vector index not found at {0}")]
    IndexNotFound(PathBuf),

    #[error("Vector index is malformed: {0}")]
    IndexFormat(String),

    #[error("Embedding dimension mismatch: index has {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}
