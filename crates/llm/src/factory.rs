//! LLM provider factory.
//!
//! Builds the text-generation client named in the application configuration.

use crate::client::LlmClient;
use crate::providers::OllamaClient;
use grounded_core::{AppError, AppResult};
use std::sync::Arc;

/// Default Ollama endpoint.
pub const DEFAULT_OLLAMA_ENDPOINT: &str = "http://localhost:11434";

/// Create an LLM client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("ollama")
/// * `endpoint` - Optional custom endpoint URL
///
/// # Errors
/// Returns `AppError::Config` if the provider is unknown.
pub fn create_client(provider: &str, endpoint: Option<&str>) -> AppResult<Arc<dyn LlmClient>> {
    match provider.to_lowercase().as_str() {
        "ollama" => {
            let base_url = endpoint.unwrap_or(DEFAULT_OLLAMA_ENDPOINT);
            tracing::debug!("Creating Ollama client for {}", base_url);
            Ok(Arc::new(OllamaClient::with_base_url(base_url)))
        }
        _ => Err(AppError::Config(format!("Unknown provider: {}", provider))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_ollama_client() {
        let client = create_client("ollama", None).unwrap();
        assert_eq!(client.provider_name(), "ollama");
    }

    #[test]
    fn test_provider_name_is_case_insensitive() {
        assert!(create_client("Ollama", Some("http://localhost:8080")).is_ok());
    }

    #[test]
    fn test_unknown_provider() {
        match create_client("unknown", None) {
            Err(err) => assert!(err.to_string().contains("Unknown provider")),
            Ok(_) => panic!("Expected error for unknown provider"),
        }
    }
}
