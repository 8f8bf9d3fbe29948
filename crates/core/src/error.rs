//! Error types for the Sift domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.
//!
//! Nothing in this taxonomy ever crosses the control loop's boundary: the
//! loop recovers backend errors as empty result lists and reasoner errors
//! as fallback decisions, and always produces an answer. These types exist
//! for the adapters, the config layer, and the CLI startup path.

use thiserror::Error;

/// The top-level error type for all Sift operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Reasoner errors ---
    #[error("Reasoner error: {0}")]
    Reasoner(#[from] ReasonerError),

    // --- Search backend errors ---
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    // --- Configuration errors ---
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures from the reasoning-model collaborator.
#[derive(Debug, Clone, Error)]
pub enum ReasonerError {
    #[error("API request failed: {message} (status: {status_code})")]
    Api { status_code: u16, message: String },

    #[error("Rate limited by reasoner, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Reasoner not configured: {0}")]
    NotConfigured(String),

    #[error("Empty response from reasoner")]
    EmptyResponse,

    #[error("Network error: {0}")]
    Network(String),
}

/// Failures from a search backend. The executor never propagates these;
/// they degrade to an empty result list.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    #[error("API request failed: {message} (status: {status_code})")]
    Api { status_code: u16, message: String },

    #[error("Backend not configured: {0}")]
    NotConfigured(String),

    #[error("Failed to parse backend response: {0}")]
    Parse(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to write config file {path}: {reason}")]
    Write { path: String, reason: String },
}
