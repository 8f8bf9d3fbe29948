//! SearchBackend trait — the abstraction over search strategies.
//!
//! A backend takes a query and returns normalized [`ResultRecord`]s. The
//! contract is deliberately lossy: backends never raise to the caller.
//! HTTP failures, API errors, and empty bodies all degrade to an empty
//! result list, so "zero results" is indistinguishable from "backend
//! unavailable" from the control loop's point of view. The evaluator must
//! tolerate this and never treat zero results as confirmed absence.

use crate::session::{BackendKind, ResultRecord};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Default number of results requested per search call.
pub const DEFAULT_NUM_RESULTS: usize = 5;

/// A search strategy implementation.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Which member of the closed backend set this is.
    fn kind(&self) -> BackendKind;

    /// A human-readable name for logging (e.g. "google_custom_search").
    fn name(&self) -> &str;

    /// Run a search. Never fails: implementations catch their own errors
    /// and return an empty list instead.
    async fn search(&self, query: &str, num_results: usize) -> Vec<ResultRecord>;
}

/// The executor's dispatch table: exactly one backend per [`BackendKind`].
#[derive(Clone)]
pub struct BackendSet {
    structured: Arc<dyn SearchBackend>,
    exploratory: Arc<dyn SearchBackend>,
}

impl BackendSet {
    pub fn new(structured: Arc<dyn SearchBackend>, exploratory: Arc<dyn SearchBackend>) -> Self {
        Self {
            structured,
            exploratory,
        }
    }

    /// Look up the backend for a kind.
    pub fn get(&self, kind: BackendKind) -> &dyn SearchBackend {
        match kind {
            BackendKind::Structured => self.structured.as_ref(),
            BackendKind::Exploratory => self.exploratory.as_ref(),
        }
    }

    /// Dispatch a search to the chosen backend.
    ///
    /// An empty or whitespace-only query short-circuits to an empty result
    /// list without invoking the backend at all.
    pub async fn execute(
        &self,
        kind: BackendKind,
        query: &str,
        num_results: usize,
    ) -> Vec<ResultRecord> {
        if query.trim().is_empty() {
            debug!(backend = %kind, "Skipping search for empty query");
            return Vec::new();
        }

        let backend = self.get(kind);
        debug!(backend = backend.name(), %query, num_results, "Executing search");
        backend.search(query, num_results).await
    }
}
