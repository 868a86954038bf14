//! SQLite-backed document corpus.
//!
//! Documents are stored with their embedding; similarity is computed in Rust
//! by a full scan, which is fine for the corpus sizes a single workspace holds.

use crate::embeddings::EmbeddingProvider;
use crate::search::SimilaritySearch;
use crate::types::{Document, SearchRequest, StoredDocument};
use chrono::{DateTime, SecondsFormat, Utc};
use grounded_core::{AppError, AppResult};
use rusqlite::{params, Connection};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    id TEXT PRIMARY KEY,
    content TEXT NOT NULL,
    metadata TEXT NOT NULL,
    embedding BLOB NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_documents_created ON documents(created_at);
"#;

/// Local document store with similarity search.
pub struct SqliteCorpus {
    conn: Mutex<Connection>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl std::fmt::Debug for SqliteCorpus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteCorpus")
            .field("embedder", &self.embedder)
            .finish_non_exhaustive()
    }
}

impl SqliteCorpus {
    /// Open (or create) the corpus database at `db_path`.
    pub fn open(db_path: &Path, embedder: Arc<dyn EmbeddingProvider>) -> AppResult<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::Knowledge(format!("Failed to create corpus directory: {}", e))
            })?;
        }

        let conn = Connection::open(db_path)
            .map_err(|e| AppError::Knowledge(format!("Failed to open corpus: {}", e)))?;

        tracing::debug!("Opened corpus at {:?}", db_path);
        Self::with_connection(conn, embedder)
    }

    /// Open a throwaway corpus held in memory.
    pub fn open_in_memory(embedder: Arc<dyn EmbeddingProvider>) -> AppResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| AppError::Knowledge(format!("Failed to open corpus: {}", e)))?;
        Self::with_connection(conn, embedder)
    }

    fn with_connection(conn: Connection, embedder: Arc<dyn EmbeddingProvider>) -> AppResult<Self> {
        conn.execute_batch(SCHEMA)
            .map_err(|e| AppError::Knowledge(format!("Failed to create tables: {}", e)))?;

        Ok(Self {
            conn: Mutex::new(conn),
            embedder,
        })
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| AppError::Knowledge("Corpus connection lock poisoned".to_string()))
    }

    /// Embed and store a document, returning its id.
    pub async fn insert(&self, document: &Document) -> AppResult<String> {
        let embedding = self.embedder.embed(&document.content).await?;
        let id = uuid::Uuid::new_v4().to_string();
        let metadata = serde_json::to_string(&document.metadata)?;

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO documents (id, content, metadata, embedding, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                id,
                document.content,
                metadata,
                embedding_to_bytes(&embedding),
                Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
            ],
        )
        .map_err(|e| AppError::Knowledge(format!("Failed to insert document: {}", e)))?;

        Ok(id)
    }

    /// All stored documents, newest first.
    pub fn list(&self) -> AppResult<Vec<StoredDocument>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, content, metadata, created_at FROM documents
                 ORDER BY created_at DESC, rowid DESC",
            )
            .map_err(|e| AppError::Knowledge(format!("Failed to prepare query: {}", e)))?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })
            .map_err(|e| AppError::Knowledge(format!("Failed to list documents: {}", e)))?;

        let mut documents = Vec::new();
        for row in rows {
            let (id, content, metadata, created_at) =
                row.map_err(|e| AppError::Knowledge(format!("Failed to read document: {}", e)))?;

            let created_at = DateTime::parse_from_rfc3339(&created_at)
                .map_err(|e| AppError::Knowledge(format!("Invalid timestamp for {}: {}", id, e)))?
                .with_timezone(&Utc);

            documents.push(StoredDocument {
                id,
                document: Document {
                    content,
                    metadata: serde_json::from_str(&metadata)?,
                    score: None,
                },
                created_at,
            });
        }

        Ok(documents)
    }

    /// Delete a document by id. Returns whether a document was removed.
    pub fn delete(&self, id: &str) -> AppResult<bool> {
        let conn = self.lock()?;
        let removed = conn
            .execute("DELETE FROM documents WHERE id = ?1", params![id])
            .map_err(|e| AppError::Knowledge(format!("Failed to delete document: {}", e)))?;

        Ok(removed > 0)
    }

    /// Remove every document.
    pub fn reset(&self) -> AppResult<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM documents", [])
            .map_err(|e| AppError::Knowledge(format!("Failed to delete documents: {}", e)))?;

        tracing::info!("Reset document corpus");
        Ok(())
    }

    /// Number of stored documents.
    pub fn count(&self) -> AppResult<u64> {
        let conn = self.lock()?;
        conn.query_row("SELECT COUNT(*) FROM documents", [], |row| {
            row.get::<_, i64>(0)
        })
        .map(|v| v as u64)
        .map_err(|e| AppError::Knowledge(format!("Failed to count documents: {}", e)))
    }

    fn scan(&self, query_embedding: &[f32], request: &SearchRequest) -> AppResult<Vec<Document>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT content, metadata, embedding FROM documents")
            .map_err(|e| AppError::Knowledge(format!("Failed to prepare query: {}", e)))?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Vec<u8>>(2)?,
                ))
            })
            .map_err(|e| AppError::Knowledge(format!("Failed to query documents: {}", e)))?;

        let mut results = Vec::new();
        for row in rows {
            let (content, metadata, embedding) =
                row.map_err(|e| AppError::Knowledge(format!("Failed to read document: {}", e)))?;

            let score = cosine_similarity(query_embedding, &bytes_to_embedding(&embedding)?);
            if score < request.similarity_threshold {
                continue;
            }

            let metadata: BTreeMap<String, String> = serde_json::from_str(&metadata)?;
            results.push(Document {
                content,
                metadata,
                score: Some(score),
            });
        }

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(request.top_k);

        Ok(results)
    }
}

#[async_trait::async_trait]
impl SimilaritySearch for SqliteCorpus {
    async fn similarity_search(&self, request: &SearchRequest) -> AppResult<Vec<Document>> {
        let query_embedding = self.embedder.embed(&request.query).await?;
        let results = self.scan(&query_embedding, request)?;

        tracing::debug!(
            "Corpus returned {} documents (top-{}, threshold {})",
            results.len(),
            request.top_k,
            request.similarity_threshold
        );

        Ok(results)
    }

    async fn document_count(&self) -> AppResult<u64> {
        self.count()
    }
}

/// Convert embedding vector to bytes for storage.
fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
    embedding.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Convert bytes back to embedding vector.
fn bytes_to_embedding(bytes: &[u8]) -> AppResult<Vec<f32>> {
    if bytes.len() % 4 != 0 {
        return Err(AppError::Knowledge(
            "Invalid embedding bytes length".to_string(),
        ));
    }

    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

/// Calculate cosine similarity between two vectors.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
