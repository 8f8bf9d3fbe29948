//! Findings Aggregator — the monotonic merge.
//!
//! Information only ever grows: a key in the delta overwrites the stored
//! value, keys absent from the delta are untouched, nothing is deleted.
//! A degenerate or adversarial decision can therefore never shrink what
//! the session has learned.

use std::collections::BTreeMap;

/// Merge `delta` into `findings`, key-wise overwrite.
pub fn merge(findings: &mut BTreeMap<String, String>, delta: &BTreeMap<String, String>) {
    for (key, value) in delta {
        findings.insert(key.clone(), value.clone());
    }
}
