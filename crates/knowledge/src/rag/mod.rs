//! RAG (Retrieval-Augmented Generation) answering.
//!
//! A question flows through greeting detection, retrieval, de-duplication,
//! the empty-context branches, scope classification, prompt building,
//! generation and answer augmentation.

pub mod augment;
pub mod dedup;
pub mod generator;
pub mod greeting;
pub mod pipeline;
pub mod retriever;
pub mod scope;
pub mod types;

pub use augment::augment;
pub use dedup::dedupe;
pub use generator::{Generator, LlmGenerator};
pub use greeting::is_greeting;
pub use pipeline::RagPipeline;
pub use retriever::Retriever;
pub use scope::{RelevanceOverride, ScopeClassifier, ScopeRule, ScopeVerdict, TermOverlap};
pub use types::{AnswerKind, AnswerOutcome, RetrievedSet};
