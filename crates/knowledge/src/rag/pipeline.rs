//! Query-time answering pipeline.

use super::augment::{augment, distinct_filenames};
use super::dedup::dedupe;
use super::generator::Generator;
use super::greeting::is_greeting;
use super::retriever::Retriever;
use super::scope::ScopeClassifier;
use super::types::{AnswerKind, AnswerOutcome};
use crate::search::SimilaritySearch;
use crate::types::{Answer, Question};
use grounded_core::{AppError, AppResult, RagConfig};
use grounded_prompt::{build_prompt, validate_template, PromptTemplate};
use std::sync::Arc;

/// Reply to a greeting.
pub const GREETING_REPLY: &str = "Hello! I'm here to help you with questions about the documents in my knowledge base. What would you like to know?";

/// Reply when nothing has been ingested.
pub const EMPTY_CORPUS_REPLY: &str =
    "My knowledge base is empty. Please upload documents before asking questions.";

/// Reply when retrieval finds nothing above the threshold.
pub const NO_RELEVANT_MATCH_REPLY: &str = "I don't have information about that topic in my knowledge base. Please try rephrasing your question or check if relevant documents have been uploaded.";

/// Reply to a general-knowledge question the documents do not cover.
pub const OUT_OF_SCOPE_REPLY: &str = "I don't have information about that in my knowledge base. Please ask questions related to the uploaded documents.";

/// Reply used by `answer_or_apology` when a backend fails.
pub const UNAVAILABLE_REPLY: &str =
    "Sorry, I can't answer right now because a backend service is unavailable. Please try again later.";

/// Answers questions from the documents of a knowledge base.
///
/// The pipeline holds only read-only configuration and shared collaborators;
/// every call to [`RagPipeline::answer`] is independent, so one pipeline can
/// serve concurrent requests.
pub struct RagPipeline {
    retriever: Retriever,
    search: Arc<dyn SimilaritySearch>,
    generator: Arc<dyn Generator>,
    classifier: ScopeClassifier,
    template: PromptTemplate,
    config: RagConfig,
}

impl RagPipeline {
    /// Build a pipeline with the default scope rules and the built-in prompt
    /// template named by `config.prompt_template`.
    pub fn new(
        search: Arc<dyn SimilaritySearch>,
        generator: Arc<dyn Generator>,
        config: RagConfig,
    ) -> AppResult<Self> {
        config.validate()?;

        let template = PromptTemplate::builtin(&config.prompt_template).ok_or_else(|| {
            AppError::Prompt(format!(
                "Unknown prompt template '{}'",
                config.prompt_template
            ))
        })?;

        Ok(Self {
            retriever: Retriever::new(Arc::clone(&search), &config),
            search,
            generator,
            classifier: ScopeClassifier::from_config(&config),
            template,
            config,
        })
    }

    /// Use a different prompt template.
    pub fn with_template(mut self, template: PromptTemplate) -> AppResult<Self> {
        validate_template(&template)?;
        self.template = template;
        Ok(self)
    }

    /// Use a different scope classifier.
    pub fn with_classifier(mut self, classifier: ScopeClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Answer a question.
    ///
    /// Greetings, an empty corpus, an empty retrieval and out-of-scope
    /// questions end with fixed replies and never reach the generator.
    /// Search and generation failures are returned as errors.
    pub async fn answer(&self, question: &Question) -> AppResult<AnswerOutcome> {
        let text = question.text();
        tracing::info!("Received question: {}", text);

        if is_greeting(text) {
            tracing::debug!("Question is a greeting");
            return Ok(AnswerOutcome::fixed(AnswerKind::Greeting, GREETING_REPLY));
        }

        let candidates = self.retriever.retrieve(question).await?;
        tracing::info!("Retrieved {} documents", candidates.len());

        let documents = dedupe(candidates, self.config.max_context_documents);
        tracing::info!("{} documents after de-duplication", documents.len());

        if documents.is_empty() {
            if self.search.document_count().await? == 0 {
                tracing::info!("Knowledge base is empty");
                return Ok(AnswerOutcome::fixed(
                    AnswerKind::EmptyCorpus,
                    EMPTY_CORPUS_REPLY,
                ));
            }

            tracing::info!("No relevant documents found");
            return Ok(AnswerOutcome::fixed(
                AnswerKind::NoRelevantMatch,
                NO_RELEVANT_MATCH_REPLY,
            ));
        }

        if self.classifier.is_out_of_scope(text, &documents) {
            return Ok(AnswerOutcome::fixed(
                AnswerKind::OutOfScope,
                OUT_OF_SCOPE_REPLY,
            ));
        }

        let prompt = build_prompt(&self.template, &documents, text)?;
        tracing::info!(
            "Context length: {} characters from {} documents",
            prompt.metadata.context_chars,
            documents.len()
        );

        let response = self.generator.generate(&prompt.text).await?;
        let sources = distinct_filenames(&documents);

        Ok(AnswerOutcome::generated(
            augment(response, &documents),
            sources,
        ))
    }

    /// Plain question-in, answer-out form of [`RagPipeline::answer`].
    pub async fn ask(&self, question: &str) -> AppResult<Answer> {
        Ok(self.answer(&Question::new(question)).await?.answer)
    }

    /// Like [`RagPipeline::answer`], but a failing backend yields a fixed
    /// apology instead of an error.
    pub async fn answer_or_apology(&self, question: &Question) -> AnswerOutcome {
        match self.answer(question).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("Failed to answer question: {}", e);
                AnswerOutcome::fixed(AnswerKind::Unavailable, UNAVAILABLE_REPLY)
            }
        }
    }
}
