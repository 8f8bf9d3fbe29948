//! The control loop: select a strategy once, then search → evaluate →
//! aggregate until a terminal decision or the iteration ceiling.
//!
//! The loop itself is infallible. Backends degrade to empty result lists,
//! the evaluator degrades to a retry-with-the-other-backend decision, and
//! synthesis is a pure rendering of whatever findings exist. Every session
//! therefore ends with a terminal answer, whatever the outside world did.

use sift_config::AgentConfig;
use sift_core::backend::DEFAULT_NUM_RESULTS;
use sift_core::{Answer, BackendSet, Reasoner, SearchSession};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::evaluator::{ConfidenceEvaluator, DecisionEngine};
use crate::selector::StrategySelector;
use crate::{findings, synthesizer};

/// Orchestrates one query-answering run end to end.
pub struct SearchLoop {
    backends: BackendSet,
    selector: StrategySelector,
    evaluator: Arc<dyn DecisionEngine>,
    config: AgentConfig,
    num_results: usize,
}

impl SearchLoop {
    pub fn new(backends: BackendSet, reasoner: Arc<dyn Reasoner>, config: AgentConfig) -> Self {
        Self {
            backends,
            selector: StrategySelector::new(reasoner.clone()),
            evaluator: Arc::new(ConfidenceEvaluator::new(reasoner, config.clone())),
            config,
            num_results: DEFAULT_NUM_RESULTS,
        }
    }

    /// Replace the evaluation stage. Used by tests to script decisions.
    pub fn with_evaluator(mut self, evaluator: Arc<dyn DecisionEngine>) -> Self {
        self.evaluator = evaluator;
        self
    }

    pub fn with_num_results(mut self, num_results: usize) -> Self {
        self.num_results = num_results;
        self
    }

    /// Run a full session and return it in its finished state.
    pub async fn run_session(&self, query: &str, context: &str) -> SearchSession {
        let mut session = SearchSession::new(query, context);
        info!(session_id = %session.id, query = %session.query, "Starting search session");

        // One-shot strategy selection; later refinement belongs to the
        // evaluator.
        let strategy = self.selector.select(&session.query, &session.context).await;
        session.current_backend = strategy.backend;
        session.current_query = strategy.query;

        loop {
            session.attempt_count += 1;
            debug!(
                attempt = session.attempt_count,
                backend = %session.current_backend,
                query = %session.current_query,
                "Loop iteration"
            );

            session.last_results = self
                .backends
                .execute(session.current_backend, &session.current_query, self.num_results)
                .await;

            let decision = self.evaluator.evaluate(&mut session).await;

            // The single aggregation point. Findings only ever grow.
            findings::merge(&mut session.findings, &decision.new_findings);

            if decision.is_answer() {
                info!(
                    session_id = %session.id,
                    attempts = session.attempt_count,
                    confidence = decision.confidence,
                    reason = %decision.reason,
                    "Session concluded"
                );
                session.finish(synthesizer::synthesize(&session));
                break;
            }

            if session.attempt_count >= self.config.max_iterations {
                warn!(
                    session_id = %session.id,
                    attempts = session.attempt_count,
                    "Iteration ceiling reached, answering with what we have"
                );
                session.finish(synthesizer::synthesize(&session));
                break;
            }
        }

        session
    }

    /// Run a session and return just the answer.
    pub async fn run(&self, query: &str, context: &str) -> Answer {
        let mut session = self.run_session(query, context).await;
        match session.terminal_answer.take() {
            Some(answer) => answer,
            // Unreachable: every loop exit calls finish(). Kept total so
            // the public API stays infallible.
            None => synthesizer::synthesize(&session),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{record, ScriptedEngine, ScriptedReasoner, StaticBackend};
    use sift_core::{BackendKind, Decision, DecisionAction};
    use std::collections::BTreeMap;

    fn backends(structured: StaticBackend, exploratory: StaticBackend) -> BackendSet {
        BackendSet::new(Arc::new(structured), Arc::new(exploratory))
    }

    fn paris_backends() -> BackendSet {
        backends(
            StaticBackend::new(
                BackendKind::Structured,
                vec![record(
                    "Paris - Wikipedia",
                    "Paris is the capital of France",
                    "https://en.wikipedia.org/wiki/Paris",
                )],
            ),
            StaticBackend::empty(BackendKind::Exploratory),
        )
    }

    fn search_decision(confidence: f32) -> Decision {
        Decision {
            summary: String::new(),
            confidence,
            action: DecisionAction::Search,
            reason: String::new(),
            suggested_backend: None,
            key_points: Vec::new(),
            new_findings: BTreeMap::new(),
            next_query: None,
        }
    }

    fn answer_decision(confidence: f32, findings: &[(&str, &str)]) -> Decision {
        Decision {
            new_findings: findings
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            action: DecisionAction::Answer,
            ..search_decision(confidence)
        }
    }

    #[tokio::test]
    async fn confident_first_result_answers_in_one_iteration() {
        let selector_and_eval = ScriptedReasoner::replies(vec![
            // Strategy selection.
            r#"{"search_type": "structured", "search_query": "capital of France"}"#,
            // Evaluation: confident answer with a finding.
            r#"{"action": "answer", "confidence": 0.9, "found_information": {"capital": "Paris"}}"#,
        ]);
        let agent = SearchLoop::new(
            paris_backends(),
            Arc::new(selector_and_eval),
            AgentConfig::default(),
        );

        let session = agent.run_session("capital of France", "").await;
        assert_eq!(session.attempt_count, 1);
        let answer = session.terminal_answer.as_ref().unwrap();
        assert!(answer.text.contains("- capital: Paris"));
        assert_eq!(answer.sources.len(), 1);
        assert_eq!(answer.sources[0].url, "https://en.wikipedia.org/wiki/Paris");
    }

    #[tokio::test]
    async fn always_search_engine_stops_at_ceiling_with_no_info_text() {
        // An evaluation stage that never concludes and never reports
        // findings: only the absolute ceiling can stop the loop.
        let engine = Arc::new(ScriptedEngine::new(vec![search_decision(0.0)]));
        let reasoner = ScriptedReasoner::replies(vec![
            r#"{"search_type": "structured", "search_query": "q"}"#,
        ]);
        let agent = SearchLoop::new(
            backends(
                StaticBackend::empty(BackendKind::Structured),
                StaticBackend::empty(BackendKind::Exploratory),
            ),
            Arc::new(reasoner),
            AgentConfig::default(),
        )
        .with_evaluator(engine);

        let session = agent.run_session("q", "").await;
        assert_eq!(session.attempt_count, 10);
        assert!(session.findings.is_empty());
        assert_eq!(
            session.terminal_answer.as_ref().unwrap().text,
            "No relevant information was found for your query."
        );
    }

    #[tokio::test]
    async fn reasoner_failure_everywhere_still_produces_answer() {
        // Selection falls back to structured + raw query; every evaluation
        // degrades to retry-other-backend; ceiling terminates.
        let agent = SearchLoop::new(
            backends(
                StaticBackend::empty(BackendKind::Structured),
                StaticBackend::empty(BackendKind::Exploratory),
            ),
            Arc::new(ScriptedReasoner::always_failing()),
            AgentConfig::default(),
        );

        let session = agent.run_session("anything", "").await;
        assert_eq!(session.attempt_count, 10);
        assert!(session.is_finished());
        // Alternation touched both backends along the way.
        assert!(session.all_backends_tried());
    }

    #[tokio::test]
    async fn diversity_forces_answer_on_second_iteration() {
        let reasoner = ScriptedReasoner::replies(vec![
            // Selection picks structured.
            r#"{"search_type": "structured", "search_query": "q"}"#,
            // Iteration 1: keep searching, switch to exploratory.
            r#"{"action": "search", "confidence": 0.2, "suggested_search_type": "exploratory", "found_information": {"hint": "partial"}}"#,
            // Iteration 2: both backends now tried, confidence above
            // threshold; the forced rule must override "search".
            r#"{"action": "search", "confidence": 0.5, "found_information": {"detail": "more"}}"#,
        ]);
        let agent = SearchLoop::new(
            backends(
                StaticBackend::empty(BackendKind::Structured),
                StaticBackend::empty(BackendKind::Exploratory),
            ),
            Arc::new(reasoner),
            AgentConfig::default(),
        );

        let session = agent.run_session("q", "").await;
        assert_eq!(session.attempt_count, 2);
        assert!(session.all_backends_tried());
        let answer = session.terminal_answer.as_ref().unwrap();
        assert!(answer.text.contains("- hint: partial"));
        assert!(answer.text.contains("- detail: more"));
    }

    #[tokio::test]
    async fn exhaustion_forces_answer_at_six_attempts() {
        // Evaluator keeps reporting weak findings on the same backend; the
        // exhaustion rule fires once attempt_count reaches 6.
        let mut replies = vec![r#"{"search_type": "structured", "search_query": "q"}"#];
        for _ in 0..6 {
            replies.push(
                r#"{"action": "search", "confidence": 0.1, "found_information": {"hint": "weak"}}"#,
            );
        }
        let agent = SearchLoop::new(
            backends(
                StaticBackend::empty(BackendKind::Structured),
                StaticBackend::empty(BackendKind::Exploratory),
            ),
            Arc::new(ScriptedReasoner::replies(replies)),
            AgentConfig::default(),
        );

        let session = agent.run_session("q", "").await;
        assert_eq!(session.attempt_count, 6);
        assert!(session.is_finished());
        assert!(session
            .terminal_answer
            .as_ref()
            .unwrap()
            .text
            .contains("- hint: weak"));
    }

    #[tokio::test]
    async fn findings_only_grow_across_iterations() {
        let engine = Arc::new(ScriptedEngine::new(vec![
            Decision {
                new_findings: [("a".to_string(), "1".to_string())].into_iter().collect(),
                ..search_decision(0.1)
            },
            Decision {
                new_findings: [("b".to_string(), "2".to_string())].into_iter().collect(),
                ..search_decision(0.1)
            },
            answer_decision(0.9, &[("a", "updated")]),
        ]));
        let reasoner =
            ScriptedReasoner::replies(vec![r#"{"search_type": "structured", "search_query": "q"}"#]);
        let agent = SearchLoop::new(
            backends(
                StaticBackend::empty(BackendKind::Structured),
                StaticBackend::empty(BackendKind::Exploratory),
            ),
            Arc::new(reasoner),
            AgentConfig::default(),
        )
        .with_evaluator(engine);

        let session = agent.run_session("q", "").await;
        assert_eq!(session.attempt_count, 3);
        // Both keys survive; the overwrite replaced only the value.
        assert_eq!(session.findings.get("a").map(String::as_str), Some("updated"));
        assert_eq!(session.findings.get("b").map(String::as_str), Some("2"));
    }

    #[tokio::test]
    async fn run_returns_the_terminal_answer() {
        let reasoner = ScriptedReasoner::replies(vec![
            r#"{"search_type": "structured", "search_query": "capital of France"}"#,
            r#"{"action": "answer", "confidence": 0.9, "found_information": {"capital": "Paris"}}"#,
        ]);
        let agent = SearchLoop::new(paris_backends(), Arc::new(reasoner), AgentConfig::default());

        let answer = agent.run("capital of France", "").await;
        assert!(answer.text.contains("Paris"));
    }

    #[tokio::test]
    async fn selection_failure_falls_back_to_structured_raw_query() {
        let structured = Arc::new(StaticBackend::empty(BackendKind::Structured));
        let exploratory = Arc::new(StaticBackend::empty(BackendKind::Exploratory));
        let set = BackendSet::new(structured.clone(), exploratory.clone());

        let engine = Arc::new(ScriptedEngine::new(vec![answer_decision(0.0, &[])]));
        let agent = SearchLoop::new(
            set,
            Arc::new(ScriptedReasoner::replies(vec!["not a mapping"])),
            AgentConfig::default(),
        )
        .with_evaluator(engine);

        let session = agent.run_session("raw query", "").await;
        assert_eq!(session.attempt_count, 1);
        assert_eq!(session.queries_tried, vec!["raw query".to_string()]);
        assert_eq!(structured.calls(), 1);
        assert_eq!(exploratory.calls(), 0);
    }
}
