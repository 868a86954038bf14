//! Removal of duplicate retrieval candidates.

use super::types::RetrievedSet;
use crate::types::Document;
use std::collections::HashSet;

/// Collapse documents with identical content, keeping the first occurrence.
///
/// Stops once `max` unique documents are collected. Order is preserved, so
/// the result stays most-similar first.
pub fn dedupe(documents: Vec<Document>, max: usize) -> RetrievedSet {
    let mut seen = HashSet::new();
    documents
        .into_iter()
        .filter(|doc| seen.insert(doc.content.clone()))
        .take(max)
        .collect()
}
