//! Gemini reasoner implementation.
//!
//! Uses the `generateContent` REST endpoint:
//! `POST {base}/v1beta/models/{model}:generateContent?key={api_key}`
//!
//! The response text is the concatenation of all text parts in the first
//! candidate. Safety blocks and empty candidate lists surface as
//! [`ReasonerError::EmptyResponse`] so callers can fall back.

use async_trait::async_trait;
use serde::Deserialize;
use sift_core::Reasoner;
use sift_core::error::ReasonerError;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Gemini `generateContent` reasoner.
#[derive(Debug)]
pub struct GeminiReasoner {
    name: String,
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl GeminiReasoner {
    /// Create a new Gemini reasoner.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, ReasonerError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ReasonerError::NotConfigured(format!("HTTP client: {e}")))?;

        Ok(Self {
            name: "gemini".into(),
            base_url: DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
            model: model.into(),
            client,
        })
    }

    /// Build from config. Fails when no API key is available.
    pub fn from_config(config: &sift_config::ReasonerConfig) -> Result<Self, ReasonerError> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            ReasonerError::NotConfigured(
                "Gemini API key not set (config [reasoner].api_key or GEMINI_API_KEY)".into(),
            )
        })?;
        let mut reasoner = Self::new(api_key, config.model.clone(), config.timeout_secs)?;
        if let Some(base) = &config.base_url {
            reasoner = reasoner.with_base_url(base);
        }
        Ok(reasoner)
    }

    /// Create with a custom base URL (e.g., for testing or proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    /// Pull the text out of a parsed API response.
    fn extract_text(resp: GenerateContentResponse) -> Result<String, ReasonerError> {
        let candidate = resp
            .candidates
            .into_iter()
            .next()
            .ok_or(ReasonerError::EmptyResponse)?;

        let text: String = candidate
            .content
            .map(|c| {
                c.parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(ReasonerError::EmptyResponse);
        }
        Ok(text)
    }
}

#[async_trait]
impl Reasoner for GeminiReasoner {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, prompt: &str) -> Result<String, ReasonerError> {
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        debug!(model = %self.model, prompt_len = prompt.len(), "Sending reasoner request");

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ReasonerError::Network(e.to_string()))?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(ReasonerError::RateLimited {
                retry_after_secs: 5,
            });
        }
        if status == 401 || status == 403 {
            return Err(ReasonerError::AuthenticationFailed(
                "Invalid Gemini API key".into(),
            ));
        }
        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Gemini API error");
            return Err(ReasonerError::Api {
                status_code: status,
                message: error_body,
            });
        }

        let api_resp: GenerateContentResponse =
            response.json().await.map_err(|e| ReasonerError::Api {
                status_code: 200,
                message: format!("Failed to parse Gemini response: {e}"),
            })?;

        Self::extract_text(api_resp)
    }

    async fn health_check(&self) -> Result<bool, ReasonerError> {
        // A minimal request verifies both reachability and the API key.
        match self.complete("Reply with the single word: ok").await {
            Ok(_) => Ok(true),
            Err(ReasonerError::AuthenticationFailed(_)) => Ok(false),
            Err(ReasonerError::Network(_)) => Ok(false),
            // Reachable but degraded still counts as healthy transport.
            Err(_) => Ok(true),
        }
    }
}

// --- Gemini API types ---

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}
