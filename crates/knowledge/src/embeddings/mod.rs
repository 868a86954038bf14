//! Embedding providers used by the local corpus.
//!
//! The pipeline never sees vectors; embeddings only exist behind the
//! similarity search backend.

pub mod provider;
pub mod trigram;

pub use provider::{create_provider, EmbeddingProvider, DEFAULT_DIMENSIONS};
pub use trigram::TrigramProvider;
