use serde_json::{Map, Value};

use super::types::{ComplianceAssessment, ComplianceStatus};
use super::ClassificationError;

/// Parse a classifier response into a typed assessment.
///
/// Accepts a bare JSON object, one wrapped in a ```json fence, or one
/// surrounded by prose. All three fields are required; extra keys are ignored.
pub fn parse_classification_response(
    response: &str,
) -> Result<ComplianceAssessment, ClassificationError> {
    let json_str = extract_json_object(response)?;

    let value: Value = serde_json::from_str(json_str)
        .map_err(|e| ClassificationError::JsonParsing(e.to_string()))?;

    let object = value.as_object().ok_or_else(|| {
        ClassificationError::MalformedResponse("top-level JSON value is not an object".into())
    })?;

    let status_raw = required_str(object, "compliance_status")?;
    let compliance_status: ComplianceStatus = status_raw.parse()?;

    Ok(ComplianceAssessment {
        compliance_status,
        reasoning: required_str(object, "reasoning")?.trim().to_string(),
        summary: required_str(object, "summary")?.trim().to_string(),
    })
}

/// Locate the JSON object inside a response.
fn extract_json_object(response: &str) -> Result<&str, ClassificationError> {
    if let Some(fence_start) = response.find("```json") {
        let content_start = fence_start + "```json".len();
        let fence_len = response[content_start..]
            .find("```")
            .ok_or_else(|| ClassificationError::MalformedResponse("Unclosed JSON block".into()))?;
        return Ok(response[content_start..content_start + fence_len].trim());
    }

    let start = response.find('{');
    let end = response.rfind('}');
    match (start, end) {
        (Some(s), Some(e)) if s < e => Ok(&response[s..=e]),
        _ => Err(ClassificationError::MalformedResponse(
            "No JSON object found".into(),
        )),
    }
}

fn required_str<'a>(
    object: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a str, ClassificationError> {
    match object.get(field) {
        None | Some(Value::Null) => Err(ClassificationError::MissingField(field)),
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(_) => Err(ClassificationError::InvalidField {
            field,
            expected: "a string",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{"compliance_status": "Partially Met", "reasoning": "Only Scope 1 reported.", "summary": "Report discusses emissions but omits Scope 2."}"#;

    #[test]
    fn parses_bare_object() {
        let result = parse_classification_response(VALID).unwrap();
        assert_eq!(result.compliance_status, ComplianceStatus::PartiallyMet);
        assert_eq!(result.reasoning, "Only Scope 1 reported.");
        assert_eq!(result.summary, "Report discusses emissions but omits Scope 2.");
    }

    #[test]
    fn parses_fenced_object() {
        let response = format!("Here is my assessment:\n\n```json\n{VALID}\n```\nThanks.");
        let result = parse_classification_response(&response).unwrap();
        assert_eq!(result.compliance_status, ComplianceStatus::PartiallyMet);
    }

    #[test]
    fn parses_object_surrounded_by_prose() {
        let response = format!("Sure! {VALID} Let me know if you need more.");
        assert!(parse_classification_response(&response).is_ok());
    }

    #[test]
    fn extra_keys_ignored() {
        let response = r#"{"compliance_status": "Met", "reasoning": "ok", "summary": "s", "confidence": 0.9}"#;
        let result = parse_classification_response(response).unwrap();
        assert_eq!(result.compliance_status, ComplianceStatus::Met);
    }

    #[test]
    fn missing_status_is_missing_field() {
        let response = r#"{"reasoning": "ok", "summary": "s"}"#;
        let err = parse_classification_response(response).unwrap_err();
        assert!(matches!(err, ClassificationError::MissingField("compliance_status")));
    }

    #[test]
    fn null_summary_is_missing_field() {
        let response = r#"{"compliance_status": "Met", "reasoning": "ok", "summary": null}"#;
        let err = parse_classification_response(response).unwrap_err();
        assert!(matches!(err, ClassificationError::MissingField("summary")));
    }

    #[test]
    fn non_string_reasoning_rejected() {
        let response = r#"{"compliance_status": "Met", "reasoning": ["a", "b"], "summary": "s"}"#;
        let err = parse_classification_response(response).unwrap_err();
        assert!(matches!(err, ClassificationError::InvalidField { field: "reasoning", .. }));
    }

    #[test]
    fn unknown_status_rejected() {
        let response = r#"{"compliance_status": "Compliant", "reasoning": "ok", "summary": "s"}"#;
        let err = parse_classification_response(response).unwrap_err();
        assert!(matches!(err, ClassificationError::InvalidStatus(_)));
    }

    #[test]
    fn prose_without_json_is_malformed() {
        let err = parse_classification_response("The report is compliant.").unwrap_err();
        assert!(matches!(err, ClassificationError::MalformedResponse(_)));
    }

    #[test]
    fn broken_json_is_parse_error() {
        let err = parse_classification_response(r#"{"compliance_status": "Met", }"#).unwrap_err();
        assert!(matches!(err, ClassificationError::JsonParsing(_)));
    }

    #[test]
    fn unclosed_fence_is_malformed() {
        let err = parse_classification_response("```json\n{\"a\": 1}").unwrap_err();
        assert!(matches!(err, ClassificationError::MalformedResponse(_)));
    }
}
