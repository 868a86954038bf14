//! Knowledge base and query-time answering for Grounded.
//!
//! Provides a local SQLite corpus with similarity search, file ingestion,
//! and the RAG pipeline that answers questions strictly from the corpus.

pub mod chunker;
pub mod corpus;
pub mod embeddings;
pub mod ingest;
pub mod rag;
pub mod search;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use corpus::SqliteCorpus;
pub use embeddings::{create_provider, EmbeddingProvider, TrigramProvider};
pub use ingest::learn;
pub use rag::{AnswerKind, AnswerOutcome, Generator, LlmGenerator, RagPipeline};
pub use search::SimilaritySearch;
pub use types::{
    Answer, Document, LearnOptions, LearnStats, Question, SearchRequest, StoredDocument,
};
