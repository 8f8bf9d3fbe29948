//! Search session state — the single mutable value threaded through every
//! stage of the control loop.
//!
//! The session is owned exclusively by the loop for its lifetime. Each
//! component receives the slice of state it needs and applies an explicit
//! delta; there is no shared or global state anywhere in the pipeline.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

/// Unique identifier for one query-answering run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The two search strategies. A closed set: the diversity-based
/// forced-answer rule depends on there being exactly two members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// API-backed search — precise, structured results.
    Structured,
    /// Scraping-backed search — broader, exploratory results.
    Exploratory,
}

impl BackendKind {
    /// The opposite backend. Used to alternate strategies when the
    /// reasoner fails, so a session never loops on one failing backend.
    pub fn other(self) -> Self {
        match self {
            BackendKind::Structured => BackendKind::Exploratory,
            BackendKind::Exploratory => BackendKind::Structured,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BackendKind::Structured => "structured",
            BackendKind::Exploratory => "exploratory",
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized external search hit. All fields may be empty — backends
/// fill in whatever their native schema provides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub link: String,
}

/// The complete mutable state of one query-answering run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSession {
    /// Session identifier (log correlation).
    pub id: SessionId,

    /// Original user query. Immutable after session start.
    pub query: String,

    /// Optional free-text hint. Immutable.
    pub context: String,

    /// Incremented once per loop iteration.
    pub attempt_count: u32,

    /// Every backend used so far. Never shrinks; at most two members.
    pub backends_tried: BTreeSet<BackendKind>,

    /// Every distinct refined query issued, in first-seen order.
    pub queries_tried: Vec<String>,

    /// Accumulated facts. Later values overwrite earlier ones for the same
    /// key; entries are never removed mid-session.
    pub findings: BTreeMap<String, String>,

    /// Backend selected for the *next* search call.
    pub current_backend: BackendKind,

    /// Refined query for the next search call.
    pub current_query: String,

    /// Results from the most recent search call only.
    pub last_results: Vec<ResultRecord>,

    /// Set exactly once, when the loop concludes.
    pub terminal_answer: Option<crate::decision::Answer>,

    /// When the session started.
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl SearchSession {
    /// Create a fresh session. The initial strategy defaults to the
    /// structured backend with the raw query; the Strategy Selector
    /// refines both before the first search.
    pub fn new(query: impl Into<String>, context: impl Into<String>) -> Self {
        let query = query.into();
        Self {
            id: SessionId::new(),
            current_query: query.clone(),
            query,
            context: context.into(),
            attempt_count: 0,
            backends_tried: BTreeSet::new(),
            queries_tried: Vec::new(),
            findings: BTreeMap::new(),
            current_backend: BackendKind::Structured,
            last_results: Vec::new(),
            terminal_answer: None,
            started_at: chrono::Utc::now(),
        }
    }

    /// Record that the current backend is about to be used.
    pub fn note_backend_tried(&mut self) {
        self.backends_tried.insert(self.current_backend);
    }

    /// Record the current refined query, skipping exact duplicates.
    pub fn note_query_tried(&mut self) {
        if !self.queries_tried.contains(&self.current_query) {
            self.queries_tried.push(self.current_query.clone());
        }
    }

    /// True once both members of the closed backend set have been used.
    pub fn all_backends_tried(&self) -> bool {
        self.backends_tried.len() >= 2
    }

    /// Store the terminal answer. Write-once: a second call is ignored,
    /// preserving the first answer.
    pub fn finish(&mut self, answer: crate::decision::Answer) {
        if self.terminal_answer.is_none() {
            self.terminal_answer = Some(answer);
        }
    }

    pub fn is_finished(&self) -> bool {
        self.terminal_answer.is_some()
    }
}
