use std::fmt;

use serde::{Serialize, Serializer};

use crate::pipeline::classify::ComplianceAssessment;

/// Reasoning shown for every failed topic, whatever the cause.
pub const ERROR_REASONING: &str = "Failed to get a valid structured response from the language model.";

/// Which per-topic stage failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Retrieval,
    Classification,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Retrieval => "retrieval",
            Self::Classification => "classification",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FindingOutcome {
    Assessed {
        requirement: String,
        assessment: ComplianceAssessment,
    },
    Failed {
        kind: FailureKind,
        /// Diagnostic only; never rendered into the finding text.
        detail: String,
    },
}

/// Outcome of auditing one topic.
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    pub topic: String,
    pub outcome: FindingOutcome,
}

impl Finding {
    pub fn assessed(
        topic: impl Into<String>,
        requirement: impl Into<String>,
        assessment: ComplianceAssessment,
    ) -> Self {
        Self {
            topic: topic.into(),
            outcome: FindingOutcome::Assessed {
                requirement: requirement.into(),
                assessment,
            },
        }
    }

    pub fn failed(topic: impl Into<String>, kind: FailureKind, detail: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            outcome: FindingOutcome::Failed {
                kind,
                detail: detail.into(),
            },
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.outcome, FindingOutcome::Failed { .. })
    }

    /// Compliance status label, or `"Error"` for a failed topic.
    pub fn status_label(&self) -> &'static str {
        match &self.outcome {
            FindingOutcome::Assessed { assessment, .. } => assessment.compliance_status.as_str(),
            FindingOutcome::Failed { .. } => "Error",
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            FindingOutcome::Assessed {
                requirement,
                assessment,
            } => write!(
                f,
                "**Topic:** '{}'\n\n**Status:** {}\n\n**Reasoning:** {}\n\n\
                 **Requirement:**\n{}\n\n**General Summary of Report:**\n{}",
                self.topic,
                assessment.compliance_status,
                assessment.reasoning,
                requirement,
                assessment.summary
            ),
            FindingOutcome::Failed { .. } => write!(
                f,
                "Topic: '{}' | Status: Error | Reasoning: {}",
                self.topic, ERROR_REASONING
            ),
        }
    }
}

/// Flat JSON view: structured fields plus the rendered `text`.
#[derive(Serialize)]
struct FindingView<'a> {
    topic: &'a str,
    status: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    requirement: Option<&'a str>,
    reasoning: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_kind: Option<FailureKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_detail: Option<&'a str>,
    text: String,
}

impl Serialize for Finding {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let view = match &self.outcome {
            FindingOutcome::Assessed {
                requirement,
                assessment,
            } => FindingView {
                topic: &self.topic,
                status: self.status_label(),
                requirement: Some(requirement),
                reasoning: &assessment.reasoning,
                summary: Some(&assessment.summary),
                error_kind: None,
                error_detail: None,
                text: self.to_string(),
            },
            FindingOutcome::Failed { kind, detail } => FindingView {
                topic: &self.topic,
                status: self.status_label(),
                requirement: None,
                reasoning: ERROR_REASONING,
                summary: None,
                error_kind: Some(*kind),
                error_detail: Some(detail),
                text: self.to_string(),
            },
        };
        view.serialize(serializer)
    }
}
