//! Structured backend — Google Custom Search JSON API.
//!
//! `GET {base}/customsearch/v1?key=&cx=&q=&num=` returns an `items` array;
//! each item's `title` / `snippet` / `link` maps directly onto
//! [`ResultRecord`]. Missing fields become empty strings, an absent
//! `items` array means zero hits.

use async_trait::async_trait;
use serde::Deserialize;
use sift_core::error::BackendError;
use sift_core::{BackendKind, ResultRecord, SearchBackend};
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://customsearch.googleapis.com";

/// Google Custom Search backend.
#[derive(Debug)]
pub struct GoogleSearchBackend {
    base_url: String,
    api_key: String,
    search_engine_id: String,
    client: reqwest::Client,
}

impl GoogleSearchBackend {
    pub fn new(
        api_key: impl Into<String>,
        search_engine_id: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| BackendError::NotConfigured(format!("HTTP client: {e}")))?;

        Ok(Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
            search_engine_id: search_engine_id.into(),
            client,
        })
    }

    /// Build from config. Fails when credentials are missing.
    pub fn from_config(config: &sift_config::SearchConfig) -> Result<Self, BackendError> {
        let api_key = config.google_api_key.clone().ok_or_else(|| {
            BackendError::NotConfigured(
                "Google API key not set (config [search].google_api_key or GOOGLE_API_KEY)".into(),
            )
        })?;
        let cx = config.google_search_engine_id.clone().ok_or_else(|| {
            BackendError::NotConfigured(
                "Search engine ID not set (config [search].google_search_engine_id or GOOGLE_SEARCH_ENGINE_ID)"
                    .into(),
            )
        })?;
        Self::new(api_key, cx, config.timeout_secs)
    }

    /// Create with a custom base URL (e.g., for testing or proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// The fallible inner call. `search` flattens its errors.
    async fn fetch(&self, query: &str, num_results: usize) -> Result<Vec<ResultRecord>, BackendError> {
        let url = format!("{}/customsearch/v1", self.base_url);
        let num = num_results.min(10).to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.search_engine_id.as_str()),
                ("q", query),
                ("num", num.as_str()),
            ])
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Api {
                status_code: status,
                message: body,
            });
        }

        let api_resp: CustomSearchResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))?;

        Ok(api_resp
            .items
            .into_iter()
            .map(|item| ResultRecord {
                title: item.title,
                snippet: item.snippet,
                link: item.link,
            })
            .collect())
    }
}

#[async_trait]
impl SearchBackend for GoogleSearchBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Structured
    }

    fn name(&self) -> &str {
        "google_custom_search"
    }

    async fn search(&self, query: &str, num_results: usize) -> Vec<ResultRecord> {
        match self.fetch(query, num_results).await {
            Ok(results) => {
                debug!(count = results.len(), "Structured search returned");
                results
            }
            Err(e) => {
                warn!(error = %e, "Structured search degraded to empty results");
                Vec::new()
            }
        }
    }
}

// --- Custom Search API types ---

#[derive(Debug, Deserialize)]
struct CustomSearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: String,
    #[serde(default)]
    link: String,
}
