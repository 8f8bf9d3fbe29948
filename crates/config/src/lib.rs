//! Configuration loading, validation, and management for Sift.
//!
//! Loads configuration from `~/.sift/config.toml` with environment
//! variable overrides for secrets. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use sift_core::error::ConfigError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The root configuration structure.
///
/// Maps directly to `~/.sift/config.toml`.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct SiftConfig {
    /// Reasoning model settings.
    #[serde(default)]
    pub reasoner: ReasonerConfig,

    /// Search backend settings.
    #[serde(default)]
    pub search: SearchConfig,

    /// Control loop settings.
    #[serde(default)]
    pub agent: AgentConfig,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ReasonerConfig {
    /// Gemini API key. Overridable via `GEMINI_API_KEY`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model name.
    #[serde(default = "default_model")]
    pub model: String,

    /// Override the API base URL (testing / proxies).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_reasoner_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_model() -> String {
    "gemini-2.0-flash".into()
}
fn default_reasoner_timeout_secs() -> u64 {
    60
}

impl Default for ReasonerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: None,
            timeout_secs: default_reasoner_timeout_secs(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Google Custom Search API key. Overridable via `GOOGLE_API_KEY`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_api_key: Option<String>,

    /// Google Custom Search Engine ID. Overridable via
    /// `GOOGLE_SEARCH_ENGINE_ID`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_search_engine_id: Option<String>,

    /// Results requested per search call.
    #[serde(default = "default_num_results")]
    pub num_results: usize,

    /// HTTP timeout in seconds for backend calls.
    #[serde(default = "default_search_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_num_results() -> usize {
    5
}
fn default_search_timeout_secs() -> u64 {
    10
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            google_api_key: None,
            google_search_engine_id: None,
            num_results: default_num_results(),
            timeout_secs: default_search_timeout_secs(),
        }
    }
}

/// Control loop thresholds. The defaults encode the termination-guard
/// invariant: the diversity rule fires at confidence ≥ `min_confidence`
/// and the exhaustion rule below it, so the two can never both fire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Soft attempt budget per search approach. The exhaustion rule fires
    /// at twice this value.
    #[serde(default = "default_max_attempts_per_approach")]
    pub max_attempts_per_approach: u32,

    /// Minimum confidence for the diversity-based forced answer.
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f32,

    /// Absolute ceiling on loop iterations. The hard stop.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
}

fn default_max_attempts_per_approach() -> u32 {
    3
}
fn default_min_confidence() -> f32 {
    0.3
}
fn default_max_iterations() -> u32 {
    10
}

impl AgentConfig {
    /// Attempt count at which the exhaustion rule becomes eligible.
    pub fn exhaustion_threshold(&self) -> u32 {
        self.max_attempts_per_approach * 2
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_attempts_per_approach: default_max_attempts_per_approach(),
            min_confidence: default_min_confidence(),
            max_iterations: default_max_iterations(),
        }
    }
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for SiftConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiftConfig")
            .field("reasoner", &self.reasoner)
            .field("search", &self.search)
            .field("agent", &self.agent)
            .finish()
    }
}

impl std::fmt::Debug for ReasonerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReasonerConfig")
            .field("api_key", &redact(&self.api_key))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl std::fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchConfig")
            .field("google_api_key", &redact(&self.google_api_key))
            .field(
                "google_search_engine_id",
                &redact(&self.google_search_engine_id),
            )
            .field("num_results", &self.num_results)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl SiftConfig {
    /// Default config file location: `~/.sift/config.toml`.
    pub fn default_path() -> PathBuf {
        let home = std::env::var_os("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        home.join(".sift").join("config.toml")
    }

    /// Load from the default path, falling back to defaults when the file
    /// is absent. Environment overrides are applied either way.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            debug!(path = %path.display(), "No config file; using defaults + env");
            let mut config = Self::default();
            config.apply_env_overrides();
            config.validate()?;
            Ok(config)
        }
    }

    /// Load and validate from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let mut config: SiftConfig =
            toml::from_str(&raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Write this config to a path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        }
        let raw = toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, raw).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Environment variables win over file values for secrets and model.
    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("GEMINI_API_KEY")
            && !key.is_empty()
        {
            self.reasoner.api_key = Some(key);
        }
        if let Ok(key) = std::env::var("GOOGLE_API_KEY")
            && !key.is_empty()
        {
            self.search.google_api_key = Some(key);
        }
        if let Ok(id) = std::env::var("GOOGLE_SEARCH_ENGINE_ID")
            && !id.is_empty()
        {
            self.search.google_search_engine_id = Some(id);
        }
        if let Ok(model) = std::env::var("SIFT_MODEL")
            && !model.is_empty()
        {
            self.reasoner.model = model;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.agent.max_iterations == 0 {
            return Err(ConfigError::Invalid("max_iterations must be ≥ 1".into()));
        }
        if self.agent.max_attempts_per_approach == 0 {
            return Err(ConfigError::Invalid(
                "max_attempts_per_approach must be ≥ 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.agent.min_confidence) {
            return Err(ConfigError::Invalid(
                "min_confidence must be within [0, 1]".into(),
            ));
        }
        if self.search.num_results == 0 {
            return Err(ConfigError::Invalid("num_results must be ≥ 1".into()));
        }
        if self.reasoner.model.trim().is_empty() {
            return Err(ConfigError::Invalid("reasoner model must be set".into()));
        }
        Ok(())
    }
}
