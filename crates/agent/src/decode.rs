//! Tolerant decoding of reasoner responses.
//!
//! Models wrap their structured output in code fences, prepend prose, or
//! drop fields. Decoding here is deliberately forgiving: wrapper noise is
//! stripped, missing fields take defined defaults, and anything that
//! cannot be coerced into a JSON object yields `None` so the caller can
//! apply its deterministic fallback. Parse failures never cross a
//! component boundary as errors.

use serde_json::Value;
use sift_core::{BackendKind, Decision, DecisionAction, Strategy};
use std::collections::BTreeMap;

/// Strip code fences and surrounding prose, keeping the JSON object.
fn clean_payload(raw: &str) -> String {
    let stripped = raw.replace("```json", "").replace("```", "");
    let trimmed = stripped.trim();

    // If there is leading/trailing prose, cut down to the outermost braces.
    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => trimmed[start..=end].to_string(),
        _ => trimmed.to_string(),
    }
}

/// Parse the payload into a JSON object. `None` for anything else.
fn decode_object(raw: &str) -> Option<serde_json::Map<String, Value>> {
    match serde_json::from_str::<Value>(&clean_payload(raw)) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

fn field_str(map: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    map.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Interpret a backend tag. Unknown tags are dropped rather than guessed.
fn parse_backend(tag: &str) -> Option<BackendKind> {
    match tag.trim().to_lowercase().as_str() {
        "structured" => Some(BackendKind::Structured),
        "exploratory" => Some(BackendKind::Exploratory),
        _ => None,
    }
}

/// Decode a Strategy Selector response: `{search_type, search_query, reason}`.
///
/// Missing `search_type` defaults to structured, missing `search_query`
/// to the original query. A payload that is not an object yields `None`.
pub fn decode_strategy(raw: &str, original_query: &str) -> Option<Strategy> {
    let map = decode_object(raw)?;

    let backend = field_str(&map, "search_type")
        .and_then(|t| parse_backend(&t))
        .unwrap_or(BackendKind::Structured);
    let query = field_str(&map, "search_query").unwrap_or_else(|| original_query.to_string());

    Some(Strategy { backend, query })
}

/// Decode a Confidence Evaluator response.
///
/// Field set: `{summary, confidence, action, reason, suggested_search_type,
/// key_points, found_information, next_query}` — every field optional with
/// a per-field default; a missing `action` defaults to continuing the
/// search. A payload that is not an object yields `None`.
pub fn decode_decision(raw: &str) -> Option<Decision> {
    let map = decode_object(raw)?;

    let confidence = map
        .get("confidence")
        .and_then(Value::as_f64)
        .unwrap_or(0.0)
        .clamp(0.0, 1.0) as f32;

    let action = match field_str(&map, "action").as_deref() {
        Some("answer") => DecisionAction::Answer,
        _ => DecisionAction::Search,
    };

    let key_points = map
        .get("key_points")
        .and_then(Value::as_array)
        .map(|points| {
            points
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let new_findings = map
        .get("found_information")
        .and_then(Value::as_object)
        .map(|obj| {
            obj.iter()
                .filter_map(|(k, v)| scalar_to_string(v).map(|s| (k.clone(), s)))
                .collect::<BTreeMap<String, String>>()
        })
        .unwrap_or_default();

    Some(Decision {
        summary: field_str(&map, "summary").unwrap_or_default(),
        confidence,
        action,
        reason: field_str(&map, "reason").unwrap_or_default(),
        suggested_backend: field_str(&map, "suggested_search_type")
            .and_then(|t| parse_backend(&t)),
        key_points,
        new_findings,
        next_query: field_str(&map, "next_query"),
    })
}

/// Findings values should be facts, not structures. Scalars are kept
/// (numbers and bools stringified); nested arrays/objects are dropped.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_plain_json() {
        let strategy = decode_strategy(
            r#"{"search_type": "exploratory", "search_query": "Paris capital", "reason": "broad"}"#,
            "original",
        )
        .unwrap();
        assert_eq!(strategy.backend, BackendKind::Exploratory);
        assert_eq!(strategy.query, "Paris capital");
    }

    #[test]
    fn strategy_strips_fences_and_prose() {
        let raw = "Here is my decision:\n```json\n{\"search_type\": \"structured\", \"search_query\": \"q2\"}\n```\nHope that helps!";
        let strategy = decode_strategy(raw, "original").unwrap();
        assert_eq!(strategy.backend, BackendKind::Structured);
        assert_eq!(strategy.query, "q2");
    }

    #[test]
    fn strategy_defaults_missing_fields() {
        let strategy = decode_strategy(r#"{"reason": "no idea"}"#, "capital of France").unwrap();
        assert_eq!(strategy.backend, BackendKind::Structured);
        assert_eq!(strategy.query, "capital of France");
    }

    #[test]
    fn strategy_unknown_backend_tag_defaults_to_structured() {
        let strategy =
            decode_strategy(r#"{"search_type": "quantum", "search_query": "q"}"#, "o").unwrap();
        assert_eq!(strategy.backend, BackendKind::Structured);
    }

    #[test]
    fn strategy_non_object_is_none() {
        assert!(decode_strategy("I could not decide, sorry.", "q").is_none());
        assert!(decode_strategy("[1, 2, 3]", "q").is_none());
        assert!(decode_strategy("", "q").is_none());
    }

    #[test]
    fn decision_full_payload() {
        let decision = decode_decision(
            r#"{
                "summary": "Found the capital",
                "confidence": 0.9,
                "action": "answer",
                "reason": "complete",
                "suggested_search_type": "exploratory",
                "key_points": ["Paris is the capital"],
                "found_information": {"capital": "Paris", "population": 2100000},
                "next_query": "Paris population"
            }"#,
        )
        .unwrap();
        assert_eq!(decision.action, DecisionAction::Answer);
        assert!((decision.confidence - 0.9).abs() < 1e-6);
        assert_eq!(decision.new_findings["capital"], "Paris");
        // Numeric facts are stringified.
        assert_eq!(decision.new_findings["population"], "2100000");
        assert_eq!(decision.suggested_backend, Some(BackendKind::Exploratory));
        assert_eq!(decision.next_query.as_deref(), Some("Paris population"));
    }

    #[test]
    fn decision_defaults_everything_but_keeps_searching() {
        let decision = decode_decision("{}").unwrap();
        assert_eq!(decision.action, DecisionAction::Search);
        assert_eq!(decision.confidence, 0.0);
        assert!(decision.new_findings.is_empty());
        assert!(decision.suggested_backend.is_none());
        assert!(decision.next_query.is_none());
    }

    #[test]
    fn decision_clamps_confidence() {
        let decision = decode_decision(r#"{"confidence": 3.5, "action": "search"}"#).unwrap();
        assert_eq!(decision.confidence, 1.0);
        let decision = decode_decision(r#"{"confidence": -1.0, "action": "search"}"#).unwrap();
        assert_eq!(decision.confidence, 0.0);
    }

    #[test]
    fn decision_drops_structured_findings_values() {
        let decision = decode_decision(
            r#"{"action": "search", "found_information": {"ok": "yes", "bad": {"nested": 1}, "gone": null}}"#,
        )
        .unwrap();
        assert_eq!(decision.new_findings.len(), 1);
        assert_eq!(decision.new_findings["ok"], "yes");
    }

    #[test]
    fn decision_malformed_is_none() {
        assert!(decode_decision("definitely not json").is_none());
        assert!(decode_decision("```json\n42\n```").is_none());
    }

    #[test]
    fn fenced_decision_with_trailing_noise() {
        let raw = "```json\n{\"action\": \"answer\", \"confidence\": 0.7}\n``` \nLet me know if you need more.";
        let decision = decode_decision(raw).unwrap();
        assert_eq!(decision.action, DecisionAction::Answer);
    }
}
