//! Confidence Evaluator — decides whether findings answer the query.
//!
//! The raw judgment comes from the reasoner, but the returned Decision is
//! only trusted after deterministic post-processing:
//!
//! 1. confidence sanitation — zero findings means zero confidence;
//! 2. forced answer on diversity — both backends tried and confidence at
//!    or above the threshold;
//! 3. forced answer on exhaustion — attempt budget spent with confidence
//!    below the threshold;
//! 4. suggested-backend handling — only a backend not yet tried may
//!    replace the current one;
//! 5. reasoner failure — a synthetic Decision that toggles to the other
//!    backend and retries the same query, so a persistently failing
//!    reasoner still alternates strategies instead of thrashing.
//!
//! Rules 2 and 3 are mutually exclusive by construction: 2 requires
//! confidence ≥ threshold, 3 requires confidence < threshold.

use async_trait::async_trait;
use sift_core::{Decision, DecisionAction, Reasoner, ResultRecord, SearchSession};
use sift_config::AgentConfig;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::decode;

/// The loop's per-iteration judgment stage. Implemented by
/// [`ConfidenceEvaluator`] in production and by scripted mocks in tests.
#[async_trait]
pub trait DecisionEngine: Send + Sync {
    /// Evaluate the session and return a Decision. May mutate session
    /// tracking state (`backends_tried`, `queries_tried`,
    /// `current_backend`, `current_query`) but never `findings` — the
    /// loop owns aggregation.
    async fn evaluate(&self, session: &mut SearchSession) -> Decision;
}

/// Production evaluator backed by the reasoner.
pub struct ConfidenceEvaluator {
    reasoner: Arc<dyn Reasoner>,
    config: AgentConfig,
}

impl ConfidenceEvaluator {
    pub fn new(reasoner: Arc<dyn Reasoner>, config: AgentConfig) -> Self {
        Self { reasoner, config }
    }

    /// The deterministic degraded Decision for a failed or unparseable
    /// reasoner response. Toggles the session to the other backend and
    /// keeps the same query; the attempt still counts.
    fn error_decision(&self, session: &mut SearchSession, detail: &str) -> Decision {
        let alternative = session.current_backend.other();
        warn!(
            error = detail,
            next_backend = %alternative,
            "Evaluator degraded; trying alternative search approach"
        );
        session.current_backend = alternative;

        Decision {
            summary: "Failed to analyze search results".into(),
            confidence: 0.0,
            action: DecisionAction::Search,
            reason: format!("Error occurred: {detail}. Attempting alternative search approach."),
            suggested_backend: Some(alternative),
            key_points: Vec::new(),
            new_findings: Default::default(),
            next_query: Some(session.current_query.clone()),
        }
    }

    /// Apply sanitation and the forced-answer rules to a raw Decision.
    fn post_process(&self, session: &mut SearchSession, mut decision: Decision) -> Decision {
        // 1. Confidence sanitation: the findings map as it will stand
        //    after aggregation is empty iff both parts are empty.
        let findings_empty = session.findings.is_empty() && decision.new_findings.is_empty();
        if findings_empty {
            if decision.confidence > 0.0 {
                decision.reason = "No relevant information found, confidence adjusted to 0.0".into();
            }
            decision.confidence = 0.0;
        }

        let all_backends_tried = session.all_backends_tried();
        let exhausted = session.attempt_count >= self.config.exhaustion_threshold();
        let confident = decision.confidence >= self.config.min_confidence;

        // 2 & 3. Forced-answer rules. Mutually exclusive: one needs
        // confidence ≥ threshold, the other < threshold.
        if all_backends_tried && confident {
            decision.action = DecisionAction::Answer;
            decision.reason = "Found sufficient information to answer query".into();
        } else if exhausted && !confident {
            decision.action = DecisionAction::Answer;
            decision.reason =
                "Exhausted search options without finding sufficient information".into();
        } else if decision.action == DecisionAction::Search {
            // 4. A suggested backend only sticks if it hasn't been tried.
            if let Some(suggested) = decision.suggested_backend
                && !session.backends_tried.contains(&suggested)
            {
                debug!(backend = %suggested, "Switching to suggested backend");
                session.current_backend = suggested;
            }
            if let Some(next_query) = decision.next_query.as_deref()
                && !next_query.trim().is_empty()
            {
                session.current_query = next_query.to_string();
            }
        }

        decision
    }
}

#[async_trait]
impl DecisionEngine for ConfidenceEvaluator {
    async fn evaluate(&self, session: &mut SearchSession) -> Decision {
        // Tracking side effects happen unconditionally, before judgment.
        session.note_backend_tried();
        session.note_query_tried();

        let prompt = analysis_prompt(session);

        let raw = match self.reasoner.complete(&prompt).await {
            Ok(raw) => raw,
            Err(e) => return self.error_decision(session, &e.to_string()),
        };

        let Some(decision) = decode::decode_decision(&raw) else {
            return self.error_decision(session, "response was not a structured mapping");
        };

        debug!(
            confidence = decision.confidence,
            action = ?decision.action,
            summary = %decision.summary,
            "Raw evaluator decision"
        );

        self.post_process(session, decision)
    }
}

fn format_results(results: &[ResultRecord]) -> String {
    if results.is_empty() {
        return "(no results)".into();
    }
    results
        .iter()
        .enumerate()
        .map(|(i, r)| {
            format!(
                "[{}] title: {}\n    link: {}\n    snippet: {}",
                i + 1,
                r.title,
                r.link,
                r.snippet
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn analysis_prompt(session: &SearchSession) -> String {
    let backends_tried: Vec<&str> = session
        .backends_tried
        .iter()
        .map(|b| b.as_str())
        .collect();
    let findings = session
        .findings
        .iter()
        .map(|(k, v)| format!("- {k}: {v}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"Analyze these search results and determine next steps.

Query: {query}
Search attempts so far: {attempts}
Queries tried: {queries:?}
Search types tried: {backends:?}
Information found so far:
{findings}

Consider:
1. Have we found new relevant information not already in the findings?
2. Are we getting similar results to previous searches?
3. If stuck, consider trying the other search type, broadening the query,
   or breaking it into smaller parts.
4. Zero results can mean the backend was unavailable; never treat it as
   confirmed absence of information.

Confidence scale: 0.0 nothing relevant, 0.3 indirect information,
0.5 partial answer, 0.7 mostly answered, 1.0 complete and verified.

Respond with a single JSON object and nothing else:
{{"summary": "<one sentence>", "confidence": <0.0-1.0>, "action": "search" or "answer",
"reason": "<one sentence>", "suggested_search_type": "structured" or "exploratory",
"key_points": ["<point>"], "found_information": {{"<key>": "<value>"}},
"next_query": "<query if action is search>"}}

Results to analyze:
{results}"#,
        query = session.query,
        attempts = session.attempt_count,
        queries = session.queries_tried,
        backends = backends_tried,
        findings = if findings.is_empty() { "(none)".to_string() } else { findings },
        results = format_results(&session.last_results),
    )
}
