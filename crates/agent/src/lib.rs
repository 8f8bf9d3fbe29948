//! # Sift Agent
//!
//! The control loop and its decision components:
//!
//! - [`StrategySelector`] — picks the initial backend and refined query.
//! - [`findings`] — the monotonic findings merge.
//! - [`ConfidenceEvaluator`] — judges accumulated findings, applies
//!   confidence sanitation and the forced-answer rules.
//! - [`synthesizer`] — renders the findings map into the final answer.
//! - [`SearchLoop`] — owns the iteration and the absolute ceiling.
//!
//! The loop never returns an error: backend failures look like empty
//! results, reasoner failures become deterministic fallback decisions, and
//! persistent failure degrades to a low-confidence answer.

pub mod decode;
pub mod evaluator;
pub mod findings;
pub mod loop_runner;
pub mod selector;
pub mod synthesizer;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use evaluator::{ConfidenceEvaluator, DecisionEngine};
pub use loop_runner::SearchLoop;
pub use selector::StrategySelector;
