use super::parser::parse_classification_response;
use super::prompt::{build_classification_prompt, CLASSIFIER_SYSTEM_PROMPT};
use super::sanitize::sanitize_llm_output;
use super::types::{ComplianceAssessment, ComplianceClassifier, LlmClient};
use super::ClassificationError;

/// Classifier backed by a chat LLM answering in JSON.
pub struct LlmComplianceClassifier<L: LlmClient> {
    llm: L,
    model: String,
}

impl<L: LlmClient> LlmComplianceClassifier<L> {
    pub fn new(llm: L, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
        }
    }

    /// The model name being used.
    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn llm(&self) -> &L {
        &self.llm
    }
}

impl<L: LlmClient> ComplianceClassifier for LlmComplianceClassifier<L> {
    fn classify(
        &self,
        rule: &str,
        excerpt: &str,
    ) -> Result<ComplianceAssessment, ClassificationError> {
        let prompt = build_classification_prompt(rule, excerpt);

        tracing::debug!(
            model = %self.model,
            prompt_chars = prompt.len(),
            "Invoking compliance classifier"
        );

        let raw_response = self.llm.generate(&self.model, &prompt, CLASSIFIER_SYSTEM_PROMPT)?;
        let response = sanitize_llm_output(&raw_response);

        parse_classification_response(&response)
    }
}
