//! Command handlers for the Grounded CLI.

pub mod ask;
pub mod knowledge;

pub use ask::AskCommand;
pub use knowledge::KnowledgeCommand;

use grounded_core::{config::AppConfig, AppResult};
use grounded_knowledge::embeddings::DEFAULT_DIMENSIONS;
use grounded_knowledge::{create_provider, SqliteCorpus};

/// Open the workspace corpus with the default embedding provider.
pub fn open_corpus(config: &AppConfig) -> AppResult<SqliteCorpus> {
    let embedder = create_provider("trigram", DEFAULT_DIMENSIONS)?;
    SqliteCorpus::open(&config.corpus_path(), embedder)
}
