/// System prompt for the compliance classifier.
pub const CLASSIFIER_SYSTEM_PROMPT: &str = "You are an expert ESG compliance auditor. \
Your task is to compare an excerpt from a company's report against a specific ESG disclosure requirement. \
First, provide a general summary of the company's report. Then, determine the compliance status. \
Respond with a JSON object containing the compliance status, a brief reasoning, and the general summary.";

/// JSON shape the model must answer with.
pub const FORMAT_INSTRUCTIONS: &str = r#"Respond with a single JSON object and nothing else, using exactly these keys:
{
  "compliance_status": one of "Met", "Partially Met", "Not Met", "Uncertain",
  "reasoning": a brief, one-sentence justification for the compliance status,
  "summary": a general summary of the company report excerpt, approximately 100-150 words
}"#;

/// Build the user prompt pairing one requirement with the report text.
pub fn build_classification_prompt(rule: &str, excerpt: &str) -> String {
    format!(
        "Please analyze the following texts:\n\n\
         **Official ESG Requirement:**\n---\n{rule}\n---\n\n\
         **Company Report Excerpt:**\n---\n{excerpt}\n---\n\n\
         {FORMAT_INSTRUCTIONS}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_contains_rule_and_excerpt() {
        let prompt = build_classification_prompt(
            "Disclose Scope 1 emissions.",
            "We emitted 150,000 tCO2e.",
        );
        assert!(prompt.contains("Disclose Scope 1 emissions."));
        assert!(prompt.contains("We emitted 150,000 tCO2e."));
        assert!(prompt.find("Official ESG Requirement") < prompt.find("Company Report Excerpt"));
    }

    #[test]
    fn prompt_lists_every_status() {
        let prompt = build_classification_prompt("r", "e");
        for label in ["\"Met\"", "\"Partially Met\"", "\"Not Met\"", "\"Uncertain\""] {
            assert!(prompt.contains(label), "missing {label}");
        }
        assert!(prompt.contains("\"compliance_status\""));
        assert!(prompt.contains("\"reasoning\""));
        assert!(prompt.contains("\"summary\""));
    }

    #[test]
    fn empty_excerpt_still_builds() {
        let prompt = build_classification_prompt("Disclose water use.", "");
        assert!(prompt.contains("**Company Report Excerpt:**\n---\n\n---"));
    }
}
