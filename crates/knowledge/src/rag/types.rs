//! RAG response types.

use crate::types::{Answer, Document};
use serde::{Deserialize, Serialize};

/// Distinct documents placed in the prompt, most similar first.
pub type RetrievedSet = Vec<Document>;

/// Which branch of the pipeline produced an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerKind {
    /// The question was a greeting
    Greeting,

    /// Nothing has been ingested yet
    EmptyCorpus,

    /// Nothing retrieved reached the similarity threshold
    NoRelevantMatch,

    /// General-knowledge question the documents do not cover
    OutOfScope,

    /// Answer produced by the generator
    Generated,

    /// A backend failed and an apology was returned instead
    Unavailable,
}

/// Answer together with how it was produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerOutcome {
    /// Final response text
    pub answer: Answer,

    /// Pipeline branch that produced the answer
    pub kind: AnswerKind,

    /// Filenames of the documents placed in the prompt, in prompt order.
    /// Empty unless the answer was generated.
    pub sources: Vec<String>,
}

impl AnswerOutcome {
    /// A fixed reply that involved no generation.
    pub fn fixed(kind: AnswerKind, text: &str) -> Self {
        Self {
            answer: Answer::new(text),
            kind,
            sources: Vec::new(),
        }
    }

    pub fn generated(text: String, sources: Vec<String>) -> Self {
        Self {
            answer: Answer::new(text),
            kind: AnswerKind::Generated,
            sources,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_outcome_has_no_sources() {
        let outcome = AnswerOutcome::fixed(AnswerKind::Greeting, "Hello!");
        assert_eq!(outcome.answer.text(), "Hello!");
        assert!(outcome.sources.is_empty());
    }

    #[test]
    fn test_outcome_serialization() {
        let outcome = AnswerOutcome::generated("330 meters.".to_string(), vec!["paris.md".into()]);
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["answer"]["answer"], "330 meters.");
        assert_eq!(json["kind"], "generated");
        assert_eq!(json["sources"][0], "paris.md");
    }
}
