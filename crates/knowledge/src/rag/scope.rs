//! Out-of-scope question detection.
//!
//! A question is first matched against an ordered list of rules describing
//! typical general-knowledge questions. A match is then checked against the
//! retrieved documents: when they share enough vocabulary with the question,
//! the corpus evidently covers the topic and the match is discarded.

use crate::types::Document;
use grounded_core::{AppError, AppResult, RagConfig};
use regex::Regex;
use std::sync::LazyLock;

/// Default general-knowledge rules, English first, then German.
const DEFAULT_RULES: &[(&str, &str)] = &[
    ("how tall is", "height of a thing"),
    ("how high is", "height of a thing"),
    ("what is the height of", "height of a thing"),
    ("when was.*born", "date of birth"),
    ("when did.*die", "date of death"),
    ("who invented", "inventor"),
    ("what is the capital of", "capital city"),
    ("what is the population of", "population"),
    ("how far is", "distance"),
    ("what time is it", "current time"),
    ("what['’]s the weather", "weather"),
    ("who is the president", "head of state"),
    ("who is the ceo of", "company executive"),
    ("what year did", "historical date"),
    ("how old is", "age"),
    ("what color is", "colour of a thing"),
    ("recipe for", "recipe"),
    ("how to cook", "recipe"),
    ("lyrics to", "song lyrics"),
    ("wie hoch ist", "height of a thing"),
    ("wann wurde.*geboren", "date of birth"),
    ("wann ist.*gestorben", "date of death"),
    ("wer hat.*erfunden", "inventor"),
    ("was ist die hauptstadt von", "capital city"),
    ("wie weit ist", "distance"),
    ("wie ist das wetter", "weather"),
    ("wer ist der pr.sident", "head of state"),
    ("wer ist der ceo von", "company executive"),
    ("in welchem jahr", "historical date"),
    ("wie alt ist", "age"),
];

static DEFAULT_SCOPE_RULES: LazyLock<Vec<ScopeRule>> = LazyLock::new(|| {
    DEFAULT_RULES
        .iter()
        .map(|(pattern, description)| {
            ScopeRule::new(pattern, description).expect("default scope rules are valid")
        })
        .collect()
});

/// A general-knowledge pattern with a human-readable description.
///
/// Patterns match anywhere in the lower-cased question.
#[derive(Debug, Clone)]
pub struct ScopeRule {
    pattern: Regex,
    description: String,
}

impl ScopeRule {
    pub fn new(pattern: &str, description: &str) -> AppResult<Self> {
        let pattern = Regex::new(pattern).map_err(|e| {
            AppError::Config(format!("Invalid scope rule pattern '{}': {}", pattern, e))
        })?;

        Ok(Self {
            pattern,
            description: description.to_string(),
        })
    }

    /// The built-in bilingual rule set.
    pub fn defaults() -> Vec<ScopeRule> {
        DEFAULT_SCOPE_RULES.clone()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    fn matches(&self, lower_question: &str) -> bool {
        self.pattern.is_match(lower_question)
    }
}

/// Decides whether retrieved documents cover a question that looks like
/// general knowledge.
pub trait RelevanceOverride: Send + Sync {
    fn overrides(&self, question: &str, documents: &[Document]) -> bool;
}

/// Overrides when a single document contains enough of the question's
/// significant words.
///
/// The question is split on whitespace. A token is significant when it has
/// at least `min_word_length` characters. A document qualifies when the
/// number of significant tokens found in its lower-cased content exceeds
/// `fraction` times the total number of tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct TermOverlap {
    pub min_word_length: usize,
    pub fraction: f32,
}

impl TermOverlap {
    pub fn from_config(config: &RagConfig) -> Self {
        Self {
            min_word_length: config.significant_word_min_length,
            fraction: config.relevance_overlap_fraction,
        }
    }
}

impl Default for TermOverlap {
    fn default() -> Self {
        Self::from_config(&RagConfig::default())
    }
}

impl RelevanceOverride for TermOverlap {
    fn overrides(&self, question: &str, documents: &[Document]) -> bool {
        let lower = question.to_lowercase();
        let tokens: Vec<&str> = lower.split_whitespace().collect();
        let significant: Vec<&str> = tokens
            .iter()
            .copied()
            .filter(|t| t.chars().count() >= self.min_word_length)
            .collect();
        let needed = tokens.len() as f32 * self.fraction;

        documents.iter().any(|doc| {
            let content = doc.content.to_lowercase();
            let matching = significant.iter().filter(|t| content.contains(*t)).count();
            matching as f32 > needed
        })
    }
}

/// Outcome of scope classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeVerdict {
    /// No rule matched.
    InScope,

    /// A rule matched but the documents cover the topic.
    Overridden { rule: String },

    /// A rule matched and the documents do not cover the topic.
    OutOfScope { rule: String },
}

impl ScopeVerdict {
    pub fn is_out_of_scope(&self) -> bool {
        matches!(self, ScopeVerdict::OutOfScope { .. })
    }
}

/// Rule-based scope classifier with a pluggable relevance override.
pub struct ScopeClassifier {
    rules: Vec<ScopeRule>,
    relevance: Box<dyn RelevanceOverride>,
}

impl ScopeClassifier {
    pub fn new(rules: Vec<ScopeRule>, relevance: Box<dyn RelevanceOverride>) -> Self {
        Self { rules, relevance }
    }

    /// Default rules with a `TermOverlap` override configured from `config`.
    pub fn from_config(config: &RagConfig) -> Self {
        Self::new(
            ScopeRule::defaults(),
            Box::new(TermOverlap::from_config(config)),
        )
    }

    /// Classify a question against the retrieved documents.
    ///
    /// Rules are evaluated in order; only the first match is considered.
    pub fn classify(&self, question: &str, documents: &[Document]) -> ScopeVerdict {
        let lower = question.to_lowercase();

        let Some(rule) = self.rules.iter().find(|r| r.matches(&lower)) else {
            return ScopeVerdict::InScope;
        };

        if self.relevance.overrides(question, documents) {
            tracing::debug!(
                "Documents cover general-knowledge question ({}), continuing",
                rule.description()
            );
            return ScopeVerdict::Overridden {
                rule: rule.description().to_string(),
            };
        }

        tracing::info!(
            "Detected general knowledge question ({}): {}",
            rule.description(),
            question
        );
        ScopeVerdict::OutOfScope {
            rule: rule.description().to_string(),
        }
    }

    pub fn is_out_of_scope(&self, question: &str, documents: &[Document]) -> bool {
        self.classify(question, documents).is_out_of_scope()
    }
}

impl Default for ScopeClassifier {
    fn default() -> Self {
        Self::from_config(&RagConfig::default())
    }
}
