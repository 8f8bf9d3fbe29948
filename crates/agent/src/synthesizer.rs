//! Answer synthesis — deterministic rendering of accumulated findings.
//!
//! No reasoner call happens here: by the time the loop reaches synthesis
//! the findings map is the whole of what was learned, and rendering it
//! must not be able to fail.

use sift_core::{Answer, SearchSession, Source};

const NO_INFORMATION: &str = "No relevant information was found for your query.";

/// Render the session's findings into the final [`Answer`].
pub fn synthesize(session: &SearchSession) -> Answer {
    let text = if session.findings.is_empty() {
        NO_INFORMATION.to_string()
    } else {
        let mut lines = vec!["Based on the available information:".to_string()];
        for (key, value) in &session.findings {
            if value.trim().is_empty() {
                continue;
            }
            lines.push(format!("- {key}: {value}"));
        }
        lines.join("\n")
    };

    Answer {
        text,
        sources: collect_sources(session),
    }
}

/// Sources come from the last result batch: entries with both a title
/// and a link, deduplicated by URL in first-seen order.
fn collect_sources(session: &SearchSession) -> Vec<Source> {
    let mut seen = std::collections::HashSet::new();
    session
        .last_results
        .iter()
        .filter(|r| !r.title.is_empty() && !r.link.is_empty())
        .filter(|r| seen.insert(r.link.clone()))
        .map(|r| Source {
            title: r.title.clone(),
            url: r.link.clone(),
        })
        .collect()
}
