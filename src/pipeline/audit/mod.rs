//! Audit orchestration.
//!
//! A report is audited topic by topic over a FIFO worklist:
//! ```text
//! START ──(topics empty?)──> END
//!   │
//!   └──> PROCESS ──(topics empty after dequeue?)──> END
//!          ^  │
//!          └──┘
//! ```
//! Each PROCESS step retrieves the top requirement passage for one topic,
//! classifies the report against it, and appends exactly one finding. A
//! failing topic becomes an Error finding and the loop moves on.

pub mod state;
pub mod finding;
pub mod orchestrator;

pub use state::{AuditState, Worklist};
pub use finding::{FailureKind, Finding, FindingOutcome, ERROR_REASONING};
pub use orchestrator::*;

use thiserror::Error;

use crate::pipeline::classify::ClassificationError;
use crate::pipeline::extraction::ExtractionError;
use crate::pipeline::retrieval::RetrievalError;

/// Failure confined to one topic; recorded as an Error finding.
#[derive(Error, Debug)]
pub enum TopicError {
    #[error("Rule retrieval failed: {0}")]
    Retrieval(#[from] RetrievalError),

    #[error("No reference passages found for topic '{topic}'")]
    NoPassages { topic: String },

    #[error("Classification failed: {0}")]
    Classification(#[from] ClassificationError),

    #[error("{stage} panicked: {message}")]
    Panicked { stage: FailureKind, message: String },
}

impl TopicError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Retrieval(_) | Self::NoPassages { .. } => FailureKind::Retrieval,
            Self::Classification(_) => FailureKind::Classification,
            Self::Panicked { stage, .. } => *stage,
        }
    }
}

/// Failure of a whole audit; surfaces through `AuditOutcome::error`.
#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Audit aborted: Could not extract report text: {0}")]
    Extraction(#[from] ExtractionError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_error_kinds() {
        assert_eq!(
            TopicError::NoPassages { topic: "Water".into() }.kind(),
            FailureKind::Retrieval
        );
        assert_eq!(
            TopicError::from(RetrievalError::EmbeddingFailed("x".into())).kind(),
            FailureKind::Retrieval
        );
        assert_eq!(
            TopicError::from(ClassificationError::MissingField("summary")).kind(),
            FailureKind::Classification
        );
        assert_eq!(
            TopicError::Panicked {
                stage: FailureKind::Retrieval,
                message: "x".into()
            }
            .kind(),
            FailureKind::Retrieval
        );
    }

    #[test]
    fn no_passages_message_names_topic() {
        let err = TopicError::NoPassages { topic: "Labor Practices".into() };
        assert_eq!(
            err.to_string(),
            "No reference passages found for topic 'Labor Practices'"
        );
    }

    #[test]
    fn panicked_message_names_stage() {
        let err = TopicError::Panicked {
            stage: FailureKind::Classification,
            message: "boom".into(),
        };
        assert_eq!(err.to_string(), "classification panicked: boom");
    }

    #[test]
    fn extraction_failure_aborts_audit() {
        let err = AuditError::from(ExtractionError::UnsupportedFormat);
        assert_eq!(
            err.to_string(),
            "Audit aborted: Could not extract report text: Unsupported format for extraction"
        );
    }
}
