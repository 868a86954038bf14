//! Prompt system for Grounded.
//!
//! This crate turns retrieved context and a question into the single
//! instruction-following prompt sent to the generator:
//! - Versioned prompt templates with contractual answering rules
//! - Built-in English and German templates, overridable from YAML
//! - Handlebars rendering of rules, exemplars, context and question

pub mod builder;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::{build_prompt, render_context};
pub use loader::{load_template, validate_template};
pub use types::{BuiltPrompt, BuiltPromptMetadata, ContextSource, PromptTemplate};
