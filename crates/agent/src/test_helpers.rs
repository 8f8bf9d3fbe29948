//! Scripted doubles shared by the agent crate's tests.

use async_trait::async_trait;
use sift_core::{
    BackendKind, Decision, Reasoner, ReasonerError, ResultRecord, SearchBackend, SearchSession,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::evaluator::DecisionEngine;

/// A reasoner that replays a fixed queue of replies and records every
/// prompt it was given. Once the queue is drained it fails with a
/// network error, so a test that under-scripts fails loudly.
#[derive(Clone)]
pub(crate) struct ScriptedReasoner {
    replies: Arc<Mutex<VecDeque<Result<String, ReasonerError>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    fail_all: bool,
}

impl ScriptedReasoner {
    pub(crate) fn replies(replies: Vec<&str>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(
                replies.into_iter().map(|r| Ok(r.to_string())).collect(),
            )),
            prompts: Arc::new(Mutex::new(Vec::new())),
            fail_all: false,
        }
    }

    pub(crate) fn always_failing() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            fail_all: true,
        }
    }

    pub(crate) fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Reasoner for ScriptedReasoner {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, prompt: &str) -> Result<String, ReasonerError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.fail_all {
            return Err(ReasonerError::Network("scripted failure".into()));
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ReasonerError::Network("script exhausted".into())))
    }

    async fn health_check(&self) -> Result<bool, ReasonerError> {
        Ok(true)
    }
}

/// A backend that returns the same results on every call and counts
/// invocations.
pub(crate) struct StaticBackend {
    kind: BackendKind,
    results: Vec<ResultRecord>,
    calls: AtomicUsize,
}

impl StaticBackend {
    pub(crate) fn new(kind: BackendKind, results: Vec<ResultRecord>) -> Self {
        Self {
            kind,
            results,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn empty(kind: BackendKind) -> Self {
        Self::new(kind, Vec::new())
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchBackend for StaticBackend {
    fn kind(&self) -> BackendKind {
        self.kind
    }

    fn name(&self) -> &str {
        "static"
    }

    async fn search(&self, _query: &str, _num_results: usize) -> Vec<ResultRecord> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.results.clone()
    }
}

/// A decision engine that replays a fixed queue of decisions; the last
/// one repeats forever. Mirrors the session-tracking side effects of the
/// production evaluator so loop tests see realistic state.
pub(crate) struct ScriptedEngine {
    decisions: Mutex<VecDeque<Decision>>,
    last: Mutex<Option<Decision>>,
}

impl ScriptedEngine {
    pub(crate) fn new(decisions: Vec<Decision>) -> Self {
        Self {
            decisions: Mutex::new(decisions.into_iter().collect()),
            last: Mutex::new(None),
        }
    }
}

#[async_trait]
impl DecisionEngine for ScriptedEngine {
    async fn evaluate(&self, session: &mut SearchSession) -> Decision {
        session.note_backend_tried();
        session.note_query_tried();
        if let Some(next) = self.decisions.lock().unwrap().pop_front() {
            *self.last.lock().unwrap() = Some(next.clone());
            next
        } else {
            self.last
                .lock()
                .unwrap()
                .clone()
                .expect("scripted engine needs at least one decision")
        }
    }
}

pub(crate) fn record(title: &str, snippet: &str, link: &str) -> ResultRecord {
    ResultRecord {
        title: title.into(),
        snippet: snippet.into(),
        link: link.into(),
    }
}
