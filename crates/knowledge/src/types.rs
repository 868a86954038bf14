//! Knowledge system type definitions.

use chrono::{DateTime, Utc};
use grounded_prompt::ContextSource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Metadata key holding the originating file name.
pub const FILENAME_KEY: &str = "filename";

/// Attribution used when a document carries no file name.
pub const UNKNOWN_FILENAME: &str = "unknown";

/// A user question.
///
/// Any text is accepted, including empty or whitespace-only input; such
/// questions simply fall through to the no-match branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    question: String,
}

impl Question {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            question: text.into(),
        }
    }

    pub fn text(&self) -> &str {
        &self.question
    }
}

/// The final response text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    answer: String,
}

impl Answer {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            answer: text.into(),
        }
    }

    pub fn text(&self) -> &str {
        &self.answer
    }
}

/// A retrieved unit of text.
///
/// `score` is the similarity assigned by the search backend; the pipeline
/// never inspects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Text body
    pub content: String,

    /// String metadata; only `filename` is read by the pipeline
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,

    /// Similarity to the query, when produced by a search
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

impl Document {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: BTreeMap::new(),
            score: None,
        }
    }

    pub fn with_filename(self, filename: impl Into<String>) -> Self {
        self.with_metadata(FILENAME_KEY, filename)
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// The originating file name, or `"unknown"`.
    pub fn filename(&self) -> &str {
        self.metadata
            .get(FILENAME_KEY)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_FILENAME)
    }
}

impl ContextSource for Document {
    fn source_name(&self) -> &str {
        self.filename()
    }

    fn content(&self) -> &str {
        &self.content
    }
}

/// Parameters of one similarity search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    /// Query text
    pub query: String,

    /// Maximum number of candidates to return
    pub top_k: usize,

    /// Minimum similarity a candidate must reach
    pub similarity_threshold: f32,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, top_k: usize, similarity_threshold: f32) -> Self {
        Self {
            query: query.into(),
            top_k,
            similarity_threshold,
        }
    }
}

/// A document as persisted in the local corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredDocument {
    /// Corpus identifier
    pub id: String,

    /// Stored text and metadata
    pub document: Document,

    /// When the document was added
    pub created_at: DateTime<Utc>,
}

/// Options for the learn operation.
#[derive(Debug, Clone)]
pub struct LearnOptions {
    /// Files or directories to read
    pub paths: Vec<PathBuf>,

    /// Chunk size in characters
    pub chunk_size: usize,

    /// Characters shared by consecutive chunks
    pub chunk_overlap: usize,

    /// Accepted file extensions; empty accepts every file
    pub extensions: Vec<String>,
}

impl Default for LearnOptions {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            chunk_size: 1000,
            chunk_overlap: 200,
            extensions: ["md", "markdown", "txt", "rst", "adoc"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Statistics from a learn operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LearnStats {
    /// Files ingested
    pub files_count: u32,

    /// Chunks stored
    pub chunks_count: u32,

    /// Files skipped (unreadable or not UTF-8)
    pub skipped_count: u32,

    /// Total bytes read
    pub bytes_processed: u64,

    /// Duration in seconds
    pub duration_secs: f64,
}
