//! Reasoning-model adapters for Sift.
//!
//! One implementation today: Gemini's `generateContent` API. The agent
//! crate only ever sees the [`sift_core::Reasoner`] trait.

mod gemini;

pub use gemini::GeminiReasoner;
