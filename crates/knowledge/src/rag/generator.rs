//! Text generation collaborator.

use grounded_core::AppResult;
use grounded_llm::{LlmClient, LlmRequest};
use std::sync::Arc;

/// Sampling temperature used for grounded answers.
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Single-shot text generation.
#[async_trait::async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str) -> AppResult<String>;
}

/// `Generator` backed by an `LlmClient`.
pub struct LlmGenerator {
    client: Arc<dyn LlmClient>,
    model: String,
    temperature: f32,
}

impl LlmGenerator {
    pub fn new(client: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

#[async_trait::async_trait]
impl Generator for LlmGenerator {
    async fn generate(&self, prompt: &str) -> AppResult<String> {
        let request = LlmRequest::new(prompt, &self.model).with_temperature(self.temperature);

        tracing::debug!(
            "Generating answer with {} model {}",
            self.client.provider_name(),
            self.model
        );

        let response = self.client.complete(&request).await?;
        Ok(response.content)
    }
}
