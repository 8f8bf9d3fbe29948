//! Reasoner trait — the abstraction over the reasoning model.
//!
//! The Strategy Selector and Confidence Evaluator both delegate their
//! judgment to a reasoner via structured prompts. The trait is a single
//! prompt-in/text-out call; decoding the structured payload (and surviving
//! a malformed one) is the caller's concern, never the reasoner's.

use crate::error::ReasonerError;
use async_trait::async_trait;

/// A text-completion reasoning model.
#[async_trait]
pub trait Reasoner: Send + Sync {
    /// A human-readable name for this reasoner (e.g., "gemini").
    fn name(&self) -> &str;

    /// Send a prompt and get the raw response text.
    ///
    /// The returned string is expected — but not guaranteed — to contain a
    /// structured JSON payload, possibly wrapped in code fences or prose.
    async fn complete(&self, prompt: &str) -> std::result::Result<String, ReasonerError>;

    /// Health check — can we reach the reasoner?
    async fn health_check(&self) -> std::result::Result<bool, ReasonerError> {
        Ok(true)
    }
}
