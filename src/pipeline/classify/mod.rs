//! Compliance classification through a local LLM.
//!
//! The classifier turns `(requirement passage, report text)` into a strictly
//! typed `ComplianceAssessment`. Any response that does not carry all three
//! fields is a `ClassificationError`, never a partially filled result.

pub mod types;
pub mod prompt;
pub mod sanitize;
pub mod parser;
pub mod ollama;
pub mod classifier;

pub use types::*;
pub use prompt::*;
pub use sanitize::*;
pub use parser::*;
pub use ollama::*;
pub use classifier::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClassificationError {
    #[error("Ollama is not running at {0}")]
    OllamaConnection(String),

    #[error("Ollama returned error (status {status}): {body}")]
    OllamaError { status: u16, body: String },

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("Malformed classifier response: {0}")]
    MalformedResponse(String),

    #[error("JSON parsing error: {0}")]
    JsonParsing(String),

    #[error("Classifier response missing field `{0}`")]
    MissingField(&'static str),

    #[error("Classifier field `{field}` must be {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },

    #[error("Unknown compliance status: {0:?}")]
    InvalidStatus(String),
}
