//! Similarity search abstraction.
//!
//! The pipeline talks to its document store only through this trait, so any
//! backend that can rank documents against a query can be plugged in.

use crate::types::{Document, SearchRequest};
use grounded_core::AppResult;

/// Trait for similarity search backends.
///
/// Implementations must:
/// - Return only documents whose similarity reaches the request threshold
/// - Return at most `top_k` documents, most similar first
/// - Report the total number of stored documents
#[async_trait::async_trait]
pub trait SimilaritySearch: Send + Sync {
    /// Search for documents similar to the request query.
    async fn similarity_search(&self, request: &SearchRequest) -> AppResult<Vec<Document>>;

    /// Number of documents currently stored.
    async fn document_count(&self) -> AppResult<u64>;
}
