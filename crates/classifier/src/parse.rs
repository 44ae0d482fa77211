//! Reply parsing.
//!
//! Models asked for JSON-only output still wrap it in a markdown code fence
//! often enough that the parser strips one before parsing. Anything that
//! remains must be a JSON object whose `intent` matches one of the three
//! known values, case-insensitively.

use serde::Deserialize;
use thiserror::Error;

use crate::types::{ExtractedFields, Intent, IntentDecision};

/// Ways a model reply can fail to yield a decision.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The reply body is not valid JSON.
    #[error("Reply is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The `intent` field is none of create/update/escalate.
    #[error("Unrecognized intent '{0}'")]
    InvalidIntent(String),
}

/// Strip one leading/trailing fenced code block, if present.
///
/// Handles an info string on the opening fence (```` ```json ````). A reply
/// without a fence is returned trimmed and otherwise untouched.
pub fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(newline) = rest.find('\n') else {
        return trimmed;
    };
    let body = rest[newline + 1..].trim_end();
    let body = body.strip_suffix("```").unwrap_or(body);
    body.trim()
}

/// Reply shape as the model produces it: intent arrives as a raw string.
#[derive(Debug, Deserialize)]
struct RawDecision {
    intent: String,
    #[serde(default)]
    reasoning: String,
    #[serde(default)]
    extracted_data: ExtractedFields,
}

/// Parse a model reply into a structured decision.
pub fn parse_decision(reply: &str) -> Result<IntentDecision, ParseError> {
    let body = strip_code_fence(reply);
    let raw: RawDecision = serde_json::from_str(body)?;

    let intent = raw
        .intent
        .parse::<Intent>()
        .map_err(|_| ParseError::InvalidIntent(raw.intent.clone()))?;

    Ok(IntentDecision {
        intent,
        reasoning: raw.reasoning,
        extracted_data: raw.extracted_data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_a_plain_reply() {
        let reply = r#"{
            "intent": "CREATE",
            "reasoning": "New task requested",
            "extracted_data": {"title": "Review reports", "priority": "high"}
        }"#;

        let decision = parse_decision(reply).unwrap();
        assert_eq!(decision.intent, Intent::Create);
        assert_eq!(decision.reasoning, "New task requested");
        assert_eq!(decision.extracted_data.title.as_deref(), Some("Review reports"));
    }

    #[test]
    fn test_strips_a_json_code_fence() {
        let reply = "```json\n{\"intent\": \"update\", \"extracted_data\": {\"task_id\": \"TASK-0001\"}}\n```";
        let decision = parse_decision(reply).unwrap();
        assert_eq!(decision.intent, Intent::Update);
        assert_eq!(
            decision.extracted_data.task_id.as_deref(),
            Some("TASK-0001")
        );
    }

    #[test]
    fn test_strips_a_bare_code_fence() {
        let reply = "```\n{\"intent\": \"escalate\"}\n```";
        assert_eq!(parse_decision(reply).unwrap().intent, Intent::Escalate);
    }

    #[test]
    fn test_intent_match_is_case_insensitive() {
        let decision = parse_decision(r#"{"intent": "Escalate"}"#).unwrap();
        assert_eq!(decision.intent, Intent::Escalate);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let err = parse_decision("I think you should create a task").unwrap_err();
        assert!(matches!(err, ParseError::Json(_)));
    }

    #[test]
    fn test_unknown_intent_is_an_error() {
        let err = parse_decision(r#"{"intent": "delete"}"#).unwrap_err();
        assert!(matches!(err, ParseError::InvalidIntent(_)));
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let decision = parse_decision(r#"{"intent": "create"}"#).unwrap();
        assert_eq!(decision.reasoning, "");
        assert_eq!(decision.extracted_data, ExtractedFields::default());
    }

    #[test]
    fn test_unfenced_reply_is_only_trimmed() {
        assert_eq!(strip_code_fence("  {\"a\": 1}  "), "{\"a\": 1}");
    }
}
