//! Strategy Selector — chooses the opening backend and refined query.
//!
//! Delegates the judgment to the reasoner via a structured prompt. The
//! fallback is part of the contract, not an error path: any transport or
//! decode failure deterministically yields the structured backend with the
//! query unrefined. Subsequent backend changes belong to the Confidence
//! Evaluator; the Selector runs exactly once, at session start.

use sift_core::{BackendKind, Reasoner, Strategy};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::decode;

pub struct StrategySelector {
    reasoner: Arc<dyn Reasoner>,
}

impl StrategySelector {
    pub fn new(reasoner: Arc<dyn Reasoner>) -> Self {
        Self { reasoner }
    }

    /// Pick the opening strategy for a query.
    pub async fn select(&self, query: &str, context: &str) -> Strategy {
        let prompt = selection_prompt(query, context);

        let raw = match self.reasoner.complete(&prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Selector reasoner call failed; defaulting to structured search");
                return fallback(query);
            }
        };

        match decode::decode_strategy(&raw, query) {
            Some(strategy) => {
                debug!(backend = %strategy.backend, query = %strategy.query, "Strategy selected");
                strategy
            }
            None => {
                warn!("Selector response was not a structured mapping; defaulting to structured search");
                fallback(query)
            }
        }
    }
}

fn fallback(query: &str) -> Strategy {
    Strategy {
        backend: BackendKind::Structured,
        query: query.to_string(),
    }
}

fn selection_prompt(query: &str, context: &str) -> String {
    format!(
        r#"Analyze this search query and decide which search strategy to use.

Query: {query}
Context: {context}

Consider:
- Structured search (API-backed) is better for:
  * Specific, factual queries
  * Recent information
  * Well-known topics
- Exploratory search (web scraping) is better for:
  * Exploratory research
  * Less common topics
  * Multiple perspectives

Respond with a single JSON object and nothing else:
{{"search_type": "structured" or "exploratory", "search_query": "<refined search query>", "reason": "<why>"}}"#
    )
}
