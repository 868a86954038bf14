//! Knowledge command handler.
//!
//! Fills and inspects the local document corpus.

use super::open_corpus;
use clap::{Args, Subcommand};
use grounded_core::{config::AppConfig, AppError, AppResult};
use grounded_knowledge::LearnOptions;
use std::path::PathBuf;

/// Knowledge base management
#[derive(Args, Debug)]
pub struct KnowledgeCommand {
    #[command(subcommand)]
    pub action: KnowledgeAction,
}

#[derive(Subcommand, Debug)]
pub enum KnowledgeAction {
    /// Learn from files and directories
    Learn(KnowledgeLearnCommand),
    /// List stored documents, newest first
    List(KnowledgeListCommand),
    /// Delete a stored document by id
    Delete(KnowledgeDeleteCommand),
    /// Show knowledge base statistics
    Stats(KnowledgeStatsCommand),
    /// Remove every stored document
    Clean(KnowledgeCleanCommand),
}

/// Learn from files and directories
#[derive(Args, Debug)]
pub struct KnowledgeLearnCommand {
    /// Files or directories to learn from
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Chunk size in characters
    #[arg(long, default_value_t = 1000)]
    pub chunk_size: usize,

    /// Characters shared by consecutive chunks
    #[arg(long, default_value_t = 200)]
    pub chunk_overlap: usize,

    /// Accepted file extensions (repeatable; default: md, markdown, txt, rst, adoc)
    #[arg(long = "ext")]
    pub extensions: Vec<String>,

    /// Remove existing documents before learning
    #[arg(long)]
    pub reset: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl KnowledgeLearnCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing knowledge learn command");

        if self.chunk_overlap >= self.chunk_size {
            return Err(AppError::Config(format!(
                "chunk overlap ({}) must be smaller than chunk size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }

        let corpus = open_corpus(config)?;
        if self.reset {
            corpus.reset()?;
        }

        let mut options = LearnOptions {
            paths: self.paths.clone(),
            chunk_size: self.chunk_size,
            chunk_overlap: self.chunk_overlap,
            ..Default::default()
        };
        if !self.extensions.is_empty() {
            options.extensions = self.extensions.clone();
        }

        let stats = grounded_knowledge::learn(&corpus, &options).await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        } else {
            println!(
                "Learned {} files ({} chunks, {} bytes, {} skipped) in {:.2}s",
                stats.files_count,
                stats.chunks_count,
                stats.bytes_processed,
                stats.skipped_count,
                stats.duration_secs
            );
        }

        Ok(())
    }
}

/// List stored documents
#[derive(Args, Debug)]
pub struct KnowledgeListCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl KnowledgeListCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing knowledge list command");

        let documents = open_corpus(config)?.list()?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&documents)?);
        } else if documents.is_empty() {
            println!("No documents stored");
        } else {
            for stored in &documents {
                println!(
                    "{}  {}  {}  ({} chars)",
                    stored.id,
                    stored.created_at.to_rfc3339(),
                    stored.document.filename(),
                    stored.document.content.chars().count()
                );
            }
        }

        Ok(())
    }
}

/// Delete a stored document
#[derive(Args, Debug)]
pub struct KnowledgeDeleteCommand {
    /// Document id as shown by `knowledge list`
    pub id: String,
}

impl KnowledgeDeleteCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing knowledge delete command for '{}'", self.id);

        if !open_corpus(config)?.delete(&self.id)? {
            return Err(AppError::Knowledge(format!(
                "No document with id '{}'",
                self.id
            )));
        }

        println!("Deleted document {}", self.id);
        Ok(())
    }
}

/// Show knowledge base stats
#[derive(Args, Debug)]
pub struct KnowledgeStatsCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl KnowledgeStatsCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing knowledge stats command");

        let corpus = open_corpus(config)?;
        let documents = corpus.count()?;
        let path = config.corpus_path();
        let db_size_bytes = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);

        if self.json {
            let output = serde_json::json!({
                "corpusPath": path,
                "documentsCount": documents,
                "dbSizeBytes": db_size_bytes,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("Knowledge base: {}", path.display());
            println!("  Documents: {}", documents);
            println!("  DB size: {} bytes", db_size_bytes);
        }

        Ok(())
    }
}

/// Remove every stored document
#[derive(Args, Debug)]
pub struct KnowledgeCleanCommand {}

impl KnowledgeCleanCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing knowledge clean command");

        open_corpus(config)?.reset()?;
        println!("Knowledge base cleaned");

        Ok(())
    }
}

impl KnowledgeCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        match &self.action {
            KnowledgeAction::Learn(cmd) => cmd.execute(config).await,
            KnowledgeAction::List(cmd) => cmd.execute(config).await,
            KnowledgeAction::Delete(cmd) => cmd.execute(config).await,
            KnowledgeAction::Stats(cmd) => cmd.execute(config).await,
            KnowledgeAction::Clean(cmd) => cmd.execute(config).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grounded_knowledge::Document;
    use tempfile::TempDir;

    fn workspace_config(temp: &TempDir) -> AppConfig {
        AppConfig {
            workspace: temp.path().to_path_buf(),
            ..AppConfig::default()
        }
    }

    #[tokio::test]
    async fn test_learn_then_delete() {
        let temp = TempDir::new().unwrap();
        let config = workspace_config(&temp);
        let docs = temp.path().join("docs");
        std::fs::create_dir_all(&docs).unwrap();
        std::fs::write(docs.join("paris.md"), "The Eiffel Tower is 330 meters tall.").unwrap();

        let learn = KnowledgeLearnCommand {
            paths: vec![docs],
            chunk_size: 1000,
            chunk_overlap: 200,
            extensions: Vec::new(),
            reset: false,
            json: true,
        };
        learn.execute(&config).await.unwrap();

        let stored = open_corpus(&config).unwrap().list().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].document.filename(), "paris.md");

        let delete = KnowledgeDeleteCommand {
            id: stored[0].id.clone(),
        };
        delete.execute(&config).await.unwrap();
        assert_eq!(open_corpus(&config).unwrap().count().unwrap(), 0);

        // Deleting again reports the missing id
        assert!(delete.execute(&config).await.is_err());
    }

    #[tokio::test]
    async fn test_clean() {
        let temp = TempDir::new().unwrap();
        let config = workspace_config(&temp);
        open_corpus(&config)
            .unwrap()
            .insert(&Document::new("to be removed"))
            .await
            .unwrap();

        KnowledgeCleanCommand {}.execute(&config).await.unwrap();
        assert_eq!(open_corpus(&config).unwrap().count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_overlap_must_be_smaller_than_chunk() {
        let temp = TempDir::new().unwrap();
        let learn = KnowledgeLearnCommand {
            paths: vec![temp.path().to_path_buf()],
            chunk_size: 100,
            chunk_overlap: 100,
            extensions: Vec::new(),
            reset: false,
            json: false,
        };
        assert!(learn.execute(&workspace_config(&temp)).await.is_err());
    }
}
