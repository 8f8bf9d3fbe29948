//! Search backend implementations for Sift.
//!
//! Two backends, one per [`sift_core::BackendKind`]:
//! - [`GoogleSearchBackend`] — structured, via the Custom Search JSON API.
//! - [`DuckDuckGoBackend`] — exploratory, via HTML scraping.
//!
//! Both honor the executor contract: every failure degrades to an empty
//! result list. A backend never errors out of its `search` method.

mod exploratory;
mod structured;

pub use exploratory::DuckDuckGoBackend;
pub use structured::GoogleSearchBackend;

use sift_core::BackendSet;
use sift_core::error::BackendError;
use std::sync::Arc;

/// Build the standard backend set from config.
pub fn backend_set(config: &sift_config::SearchConfig) -> Result<BackendSet, BackendError> {
    let structured = GoogleSearchBackend::from_config(config)?;
    let exploratory = DuckDuckGoBackend::new(config.timeout_secs)?;
    Ok(BackendSet::new(
        Arc::new(structured),
        Arc::new(exploratory),
    ))
}
