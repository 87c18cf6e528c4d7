use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ClassificationError;

/// How well a report satisfies one requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum ComplianceStatus {
    #[serde(rename = "Met")]
    Met,
    #[serde(rename = "Partially Met")]
    PartiallyMet,
    #[serde(rename = "Not Met")]
    NotMet,
    #[serde(rename = "Uncertain")]
    Uncertain,
}

impl ComplianceStatus {
    pub const ALL: [ComplianceStatus; 4] = [
        Self::Met,
        Self::PartiallyMet,
        Self::NotMet,
        Self::Uncertain,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Met => "Met",
            Self::PartiallyMet => "Partially Met",
            Self::NotMet => "Not Met",
            Self::Uncertain => "Uncertain",
        }
    }
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts the canonical labels plus case and separator variants
/// (`"partially met"`, `"PARTIALLY_MET"`, `"Not-Met"`).
impl FromStr for ComplianceStatus {
    type Err = ClassificationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .replace(['_', '-'], " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        match normalized.as_str() {
            "met" => Ok(Self::Met),
            "partially met" => Ok(Self::PartiallyMet),
            "not met" => Ok(Self::NotMet),
            "uncertain" => Ok(Self::Uncertain),
            _ => Err(ClassificationError::InvalidStatus(s.to_string())),
        }
    }
}

impl TryFrom<String> for ComplianceStatus {
    type Error = ClassificationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Structured judgment returned by a classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceAssessment {
    pub compliance_status: ComplianceStatus,
    /// A brief justification for the status.
    pub reasoning: String,
    /// A general summary of the report.
    pub summary: String,
}

/// Judges a report against one requirement.
pub trait ComplianceClassifier: Send + Sync {
    fn classify(
        &self,
        rule: &str,
        excerpt: &str,
    ) -> Result<ComplianceAssessment, ClassificationError>;
}

/// Ollama LLM client abstraction (allows mocking)
pub trait LlmClient: Send + Sync {
    fn generate(
        &self,
        model: &str,
        prompt: &str,
        system: &str,
    ) -> Result<String, ClassificationError>;

    fn is_model_available(&self, model: &str) -> Result<bool, ClassificationError>;

    fn list_models(&self) -> Result<Vec<String>, ClassificationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_labels_round_trip_through_display() {
        for status in ComplianceStatus::ALL {
            assert_eq!(status.as_str().parse::<ComplianceStatus>().unwrap(), status);
            assert_eq!(status.to_string(), status.as_str());
        }
    }

    #[test]
    fn case_and_separator_variants_accepted() {
        assert_eq!(
            "partially met".parse::<ComplianceStatus>().unwrap(),
            ComplianceStatus::PartiallyMet
        );
        assert_eq!(
            "PARTIALLY_MET".parse::<ComplianceStatus>().unwrap(),
            ComplianceStatus::PartiallyMet
        );
        assert_eq!(
            " Not-Met ".parse::<ComplianceStatus>().unwrap(),
            ComplianceStatus::NotMet
        );
    }

    #[test]
    fn unknown_status_rejected() {
        let err = "Mostly compliant".parse::<ComplianceStatus>().unwrap_err();
        assert!(matches!(err, ClassificationError::InvalidStatus(s) if s == "Mostly compliant"));
    }

    #[test]
    fn serializes_with_spaces() {
        let json = serde_json::to_string(&ComplianceStatus::PartiallyMet).unwrap();
        assert_eq!(json, "\"Partially Met\"");
    }

    #[test]
    fn deserializes_lenient_labels() {
        let status: ComplianceStatus = serde_json::from_str("\"not met\"").unwrap();
        assert_eq!(status, ComplianceStatus::NotMet);
        assert!(serde_json::from_str::<ComplianceStatus>("\"Compliant\"").is_err());
    }

    #[test]
    fn traits_are_object_safe() {
        fn _assert_classifier(_: &dyn ComplianceClassifier) {}
        fn _assert_llm(_: &dyn LlmClient) {}
    }
}
