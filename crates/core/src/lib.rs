//! # Sift Core
//!
//! Domain types, traits, and error definitions for the Sift search agent.
//! This crate has **zero framework dependencies** — it defines the domain
//! model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! The two external collaborators — search backends and the reasoning
//! model — are defined as traits here. Implementations live in their
//! respective crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with scripted mock implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod backend;
pub mod decision;
pub mod error;
pub mod reasoner;
pub mod session;

// Re-export key types at crate root for ergonomics
pub use backend::{BackendSet, SearchBackend};
pub use decision::{Answer, Decision, DecisionAction, Source, Strategy};
pub use error::{BackendError, ConfigError, Error, ReasonerError, Result};
pub use reasoner::Reasoner;
pub use session::{BackendKind, ResultRecord, SearchSession, SessionId};
