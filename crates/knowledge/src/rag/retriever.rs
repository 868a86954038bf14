//! Candidate retrieval.

use crate::search::SimilaritySearch;
use crate::types::{Document, Question, SearchRequest};
use grounded_core::{AppResult, RagConfig};
use std::sync::Arc;

/// Turns a question into an ordered list of candidate documents.
///
/// Results are returned exactly as the search backend ranks them; search
/// failures propagate.
#[derive(Clone)]
pub struct Retriever {
    search: Arc<dyn SimilaritySearch>,
    top_k: usize,
    similarity_threshold: f32,
}

impl Retriever {
    pub fn new(search: Arc<dyn SimilaritySearch>, config: &RagConfig) -> Self {
        Self {
            search,
            top_k: config.top_k,
            similarity_threshold: config.similarity_threshold,
        }
    }

    pub async fn retrieve(&self, question: &Question) -> AppResult<Vec<Document>> {
        let request = SearchRequest::new(question.text(), self.top_k, self.similarity_threshold);
        self.search.similarity_search(&request).await
    }
}
