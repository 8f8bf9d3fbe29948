//! Exploratory backend — DuckDuckGo HTML scraping.
//!
//! Fetches `https://html.duckduckgo.com/html/?q={query}` with a desktop
//! User-Agent and extracts results from the `div.result` blocks: title and
//! link from `a.result__a`, snippet from `a.result__snippet`.
//!
//! Scraping is inherently fragile; a markup change simply yields fewer (or
//! zero) results, which the control loop already treats as a normal
//! outcome.

use async_trait::async_trait;
use scraper::{Html, Selector};
use sift_core::error::BackendError;
use sift_core::{BackendKind, ResultRecord, SearchBackend};
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://html.duckduckgo.com";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// DuckDuckGo HTML backend.
pub struct DuckDuckGoBackend {
    base_url: String,
    client: reqwest::Client,
}

impl DuckDuckGoBackend {
    pub fn new(timeout_secs: u64) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| BackendError::NotConfigured(format!("HTTP client: {e}")))?;

        Ok(Self {
            base_url: DEFAULT_BASE_URL.into(),
            client,
        })
    }

    /// Create with a custom base URL (e.g., for testing).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn fetch(&self, query: &str, num_results: usize) -> Result<Vec<ResultRecord>, BackendError> {
        let url = format!("{}/html/", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("q", query)])
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

        let html = response
            .text()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        Ok(extract_results(&html, num_results))
    }
}

/// Pull result records out of a DuckDuckGo HTML page.
fn extract_results(html: &str, num_results: usize) -> Vec<ResultRecord> {
    // Selectors are string constants; construction cannot fail.
    let result_sel = Selector::parse("div.result").expect("valid selector");
    let title_sel = Selector::parse("a.result__a").expect("valid selector");
    let snippet_sel = Selector::parse("a.result__snippet").expect("valid selector");

    let document = Html::parse_document(html);
    let mut records = Vec::new();

    for block in document.select(&result_sel) {
        if records.len() >= num_results {
            break;
        }

        let Some(title_elem) = block.select(&title_sel).next() else {
            continue;
        };
        let title = title_elem.text().collect::<String>().trim().to_string();
        let link = title_elem.value().attr("href").unwrap_or("").to_string();
        let snippet = block
            .select(&snippet_sel)
            .next()
            .map(|s| s.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        records.push(ResultRecord {
            title,
            snippet,
            link,
        });
    }

    records
}

#[async_trait]
impl SearchBackend for DuckDuckGoBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Exploratory
    }

    fn name(&self) -> &str {
        "duckduckgo_html"
    }

    async fn search(&self, query: &str, num_results: usize) -> Vec<ResultRecord> {
        match self.fetch(query, num_results).await {
            Ok(results) => {
                debug!(count = results.len(), "Exploratory search returned");
                results
            }
            Err(e) => {
                warn!(error = %e, "Exploratory search degraded to empty results");
                Vec::new()
            }
        }
    }
}
