//! Decision and answer types — the outputs of the reasoning stages.

use crate::session::BackendKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The Strategy Selector's output: which backend to use next, and with
/// what refined query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strategy {
    pub backend: BackendKind,
    pub query: String,
}

/// What the Confidence Evaluator wants the loop to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionAction {
    /// Keep searching, possibly with a new backend or query.
    Search,
    /// Stop and synthesize the final answer.
    Answer,
}

/// The Confidence Evaluator's per-iteration verdict, after post-processing
/// (sanitation, forced-answer rules).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    /// One-sentence summary of new findings.
    #[serde(default)]
    pub summary: String,

    /// Confidence in the accumulated findings, in `[0, 1]`.
    #[serde(default)]
    pub confidence: f32,

    /// Continue searching or answer now.
    pub action: DecisionAction,

    /// One-sentence explanation for the action.
    #[serde(default)]
    pub reason: String,

    /// Backend to try next, if the evaluator recommends switching.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_backend: Option<BackendKind>,

    /// Key points extracted from the latest results.
    #[serde(default)]
    pub key_points: Vec<String>,

    /// New key→value facts to merge into the session findings.
    #[serde(default)]
    pub new_findings: BTreeMap<String, String>,

    /// Refined query for the next search, if continuing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_query: Option<String>,
}

impl Decision {
    pub fn is_answer(&self) -> bool {
        self.action == DecisionAction::Answer
    }
}

/// One cited source in the final answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub url: String,
}

/// The final answer produced for a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    /// Rendered answer text.
    pub text: String,

    /// Sources backing the answer, in first-occurrence order.
    pub sources: Vec<Source>,
}
