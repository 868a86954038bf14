//! Post-processing of generated answers.

use crate::types::Document;
use std::collections::HashSet;

/// Phrases by which a generated answer admits missing information.
const MISSING_INFO_SIGNALS: &[&str] = &[
    "don't contain",
    "don’t contain",
    "not available",
    "don't have",
    "don’t have",
    "keine informationen",
    "nicht verfügbar",
];

/// Header placed above the appended source list.
pub const AVAILABLE_DOCUMENTS_HEADER: &str = "\n\nAvailable documents in knowledge base:\n";

/// Whether the response signals that information is missing.
pub fn signals_missing_information(response: &str) -> bool {
    let lower = response.to_lowercase();
    MISSING_INFO_SIGNALS.iter().any(|s| lower.contains(s))
}

/// Distinct filenames of the documents, in first-seen order.
pub fn distinct_filenames(sources: &[Document]) -> Vec<String> {
    let mut seen = HashSet::new();
    sources
        .iter()
        .map(|doc| doc.filename())
        .filter(|name| seen.insert(*name))
        .map(str::to_string)
        .collect()
}

/// Append the list of available documents when the response signals
/// missing information.
///
/// Any other response, or one without sources to list, is returned
/// unchanged.
pub fn augment(response: String, sources: &[Document]) -> String {
    if sources.is_empty() || !signals_missing_information(&response) {
        return response;
    }

    let mut augmented = response;
    augmented.push_str(AVAILABLE_DOCUMENTS_HEADER);
    for filename in distinct_filenames(sources) {
        augmented.push_str("• ");
        augmented.push_str(&filename);
        augmented.push('\n');
    }

    tracing::debug!("Appended available documents to answer");
    augmented
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources() -> Vec<Document> {
        vec![
            Document::new("a").with_filename("paris.md"),
            Document::new("b").with_filename("rome.md"),
            Document::new("c").with_filename("paris.md"),
            Document::new("d"),
        ]
    }

    #[test]
    fn test_appends_distinct_filenames_in_order() {
        let result = augment("Sorry, I don't have that.".to_string(), &sources());
        assert_eq!(
            result,
            "Sorry, I don't have that.\n\nAvailable documents in knowledge base:\n\
             • paris.md\n• rome.md\n• unknown\n"
        );
    }

    #[test]
    fn test_each_filename_listed_once() {
        let result = augment("That is not available.".to_string(), &sources());
        assert_eq!(result.matches("paris.md").count(), 1);
    }

    #[test]
    fn test_unchanged_without_signal() {
        let response = "The Eiffel Tower is 330 meters tall (paris.md).".to_string();
        assert_eq!(augment(response.clone(), &sources()), response);
    }

    #[test]
    fn test_signal_is_case_insensitive() {
        assert!(signals_missing_information("The documents DON'T CONTAIN this."));
        assert!(signals_missing_information("I don’t have details on that."));
        assert!(signals_missing_information(
            "Dazu habe ich keine Informationen in meiner Wissensbasis."
        ));
        assert!(!signals_missing_information("Here is the answer."));
    }

    #[test]
    fn test_unchanged_without_sources() {
        let response = "I don't have that.".to_string();
        assert_eq!(augment(response.clone(), &[]), response);
    }

    #[test]
    fn test_deterministic() {
        let a = augment("I don't have it".to_string(), &sources());
        let b = augment("I don't have it".to_string(), &sources());
        assert_eq!(a, b);
    }
}
