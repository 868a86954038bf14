//! Configuration management for Grounded.
//!
//! This module handles loading and merging configuration from multiple sources:
//! - Config files (.grounded/config.yaml)
//! - Environment variables
//! - Command-line flags
//!
//! The configuration is workspace-centric, with the corpus and prompt
//! overrides stored in `.grounded/`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Providers the generation factory knows how to build.
pub const KNOWN_PROVIDERS: &[&str] = &["ollama"];

/// Main application configuration.
///
/// This struct holds all global configuration options that affect
/// CLI behavior across commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .grounded/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Text-generation provider (e.g., "ollama")
    pub provider: String,

    /// Default model identifier
    pub model: String,

    /// Provider endpoint override
    pub endpoint: Option<String>,

    /// Log level override
    pub log_level: Option<String>,

    /// Emit JSON log lines
    pub log_json: bool,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// Provider configurations from config.yaml
    pub llm: Option<LlmConfig>,

    /// Retrieval and classification thresholds
    pub rag: RagConfig,
}

/// LLM configuration from config.yaml.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(rename = "activeProvider")]
    pub active_provider: String,

    pub providers: HashMap<String, ProviderConfig>,
}

/// Provider-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub endpoint: Option<String>,
    pub model: String,
}

/// Thresholds and caps of the query-time pipeline.
///
/// Values are read once at startup and shared read-only by every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RagConfig {
    /// Minimum similarity score a candidate must reach to be retrieved
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,

    /// Number of candidates requested from similarity search
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Upper bound on distinct documents placed in the prompt
    #[serde(default = "default_max_context_documents")]
    pub max_context_documents: usize,

    /// Minimum character count for a question token to be significant
    #[serde(default = "default_significant_word_min_length")]
    pub significant_word_min_length: usize,

    /// Share of question tokens one document must contain to override
    /// a general-knowledge match
    #[serde(default = "default_relevance_overlap_fraction")]
    pub relevance_overlap_fraction: f32,

    /// Prompt template id used for generation
    #[serde(default = "default_prompt_template")]
    pub prompt_template: String,
}

fn default_similarity_threshold() -> f32 {
    0.3
}

fn default_top_k() -> usize {
    20
}

fn default_max_context_documents() -> usize {
    8
}

fn default_significant_word_min_length() -> usize {
    4
}

fn default_relevance_overlap_fraction() -> f32 {
    0.2
}

fn default_prompt_template() -> String {
    "rag.answer.en".to_string()
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            top_k: default_top_k(),
            max_context_documents: default_max_context_documents(),
            significant_word_min_length: default_significant_word_min_length(),
            relevance_overlap_fraction: default_relevance_overlap_fraction(),
            prompt_template: default_prompt_template(),
        }
    }
}

impl RagConfig {
    /// Reject thresholds the pipeline cannot work with.
    pub fn validate(&self) -> AppResult<()> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(AppError::Config(format!(
                "similarityThreshold must be within [0, 1], got {}",
                self.similarity_threshold
            )));
        }

        if self.top_k == 0 {
            return Err(AppError::Config("topK must be at least 1".to_string()));
        }

        if self.max_context_documents == 0 {
            return Err(AppError::Config(
                "maxContextDocuments must be at least 1".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.relevance_overlap_fraction) {
            return Err(AppError::Config(format!(
                "relevanceOverlapFraction must be within [0, 1], got {}",
                self.relevance_overlap_fraction
            )));
        }

        Ok(())
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    llm: Option<LlmConfig>,
    rag: Option<RagConfig>,
    workspace: Option<WorkspaceConfig>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WorkspaceConfig {
    path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
    json: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            provider: "ollama".to_string(),
            model: "llama3.2".to_string(),
            endpoint: None,
            log_level: None,
            log_json: false,
            verbose: false,
            no_color: false,
            llm: None,
            rag: RagConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, the YAML file and environment variables.
    ///
    /// Environment variables:
    /// - `GROUNDED_WORKSPACE`: Override workspace path
    /// - `GROUNDED_CONFIG`: Path to config file
    /// - `GROUNDED_PROVIDER`: Generation provider
    /// - `GROUNDED_MODEL`: Model identifier
    /// - `GROUNDED_ENDPOINT`: Provider endpoint
    /// - `GROUNDED_SIMILARITY_THRESHOLD`: Retrieval threshold
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use grounded_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Workspace: {:?}", config.workspace);
    /// ```
    pub fn load() -> AppResult<Self> {
        Self::load_from(None, None)
    }

    /// Like [`AppConfig::load`], with an explicit workspace and config file
    /// taking precedence over `GROUNDED_WORKSPACE` and `GROUNDED_CONFIG`.
    pub fn load_from(workspace: Option<PathBuf>, config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(workspace) =
            workspace.or_else(|| std::env::var("GROUNDED_WORKSPACE").ok().map(PathBuf::from))
        {
            config.workspace = workspace;
        }

        if let Some(config_file) =
            config_file.or_else(|| std::env::var("GROUNDED_CONFIG").ok().map(PathBuf::from))
        {
            config.config_file = Some(config_file);
        }

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = match config.config_file {
            Some(ref cf) => cf.clone(),
            None => config.grounded_dir().join("config.yaml"),
        };

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        // Environment variables override YAML config
        if let Ok(provider) = std::env::var("GROUNDED_PROVIDER") {
            config.provider = provider;
        }

        if let Ok(model) = std::env::var("GROUNDED_MODEL") {
            config.model = model;
        }

        if let Ok(endpoint) = std::env::var("GROUNDED_ENDPOINT") {
            config.endpoint = Some(endpoint);
        }

        if let Ok(threshold) = std::env::var("GROUNDED_SIMILARITY_THRESHOLD") {
            config.rag.similarity_threshold = threshold.parse().map_err(|e| {
                AppError::Config(format!(
                    "Invalid GROUNDED_SIMILARITY_THRESHOLD '{}': {}",
                    threshold, e
                ))
            })?;
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(path) = config_file.workspace.and_then(|ws| ws.path) {
            result.workspace = PathBuf::from(path);
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
            if let Some(json) = logging.json {
                result.log_json = json;
            }
        }

        if let Some(rag) = config_file.rag {
            result.rag = rag;
        }

        if let Some(llm) = config_file.llm {
            result.provider = llm.active_provider.clone();

            if let Some(provider_config) = llm.providers.get(&llm.active_provider) {
                result.model = provider_config.model.clone();
                if provider_config.endpoint.is_some() {
                    result.endpoint = provider_config.endpoint.clone();
                }
            }

            result.llm = Some(llm);
        }

        tracing::debug!("Merged configuration from {:?}", path);
        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over environment variables
    /// and the config file.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        workspace: Option<PathBuf>,
        config_file: Option<PathBuf>,
        provider: Option<String>,
        model: Option<String>,
        endpoint: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(workspace) = workspace {
            self.workspace = workspace;
        }

        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(provider) = provider {
            self.provider = provider;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(endpoint) = endpoint {
            self.endpoint = Some(endpoint);
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Get the path to the .grounded directory.
    pub fn grounded_dir(&self) -> PathBuf {
        self.workspace.join(".grounded")
    }

    /// Get the path to the SQLite corpus.
    pub fn corpus_path(&self) -> PathBuf {
        self.grounded_dir().join("knowledge").join("corpus.sqlite")
    }

    /// Ensure the .grounded directory exists.
    pub fn ensure_grounded_dir(&self) -> AppResult<()> {
        let grounded_dir = self.grounded_dir();
        if !grounded_dir.exists() {
            std::fs::create_dir_all(&grounded_dir).map_err(|e| {
                AppError::Config(format!("Failed to create .grounded directory: {}", e))
            })?;
        }
        Ok(())
    }

    /// Validate the active provider and the retrieval thresholds.
    pub fn validate(&self) -> AppResult<()> {
        if !KNOWN_PROVIDERS.contains(&self.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.provider,
                KNOWN_PROVIDERS.join(", ")
            )));
        }

        self.rag.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.provider, "ollama");
        assert_eq!(config.model, "llama3.2");
        assert!(!config.verbose);
        assert!(!config.no_color);
        assert_eq!(config.rag, RagConfig::default());
    }

    #[test]
    fn test_default_rag_config() {
        let rag = RagConfig::default();
        assert_eq!(rag.similarity_threshold, 0.3);
        assert_eq!(rag.top_k, 20);
        assert_eq!(rag.max_context_documents, 8);
        assert_eq!(rag.significant_word_min_length, 4);
        assert_eq!(rag.relevance_overlap_fraction, 0.2);
        assert_eq!(rag.prompt_template, "rag.answer.en");
    }

    #[test]
    fn test_grounded_dir() {
        let config = AppConfig::default();
        assert!(config.grounded_dir().ends_with(".grounded"));
        assert!(config.corpus_path().ends_with("knowledge/corpus.sqlite"));
    }

    #[test]
    fn test_with_overrides() {
        let config = AppConfig::default();
        let overridden = config.with_overrides(
            None,
            None,
            Some("ollama".to_string()),
            Some("mistral".to_string()),
            Some("http://gpu-box:11434".to_string()),
            None,
            true,
            false,
        );

        assert_eq!(overridden.model, "mistral");
        assert_eq!(overridden.endpoint.as_deref(), Some("http://gpu-box:11434"));
        assert!(overridden.verbose);
        assert_eq!(overridden.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_merge_yaml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(
            &path,
            r#"
llm:
  activeProvider: ollama
  providers:
    ollama:
      endpoint: http://localhost:11500
      model: qwen2.5
rag:
  similarityThreshold: 0.45
  maxContextDocuments: 4
logging:
  level: warn
  json: true
"#,
        )
        .unwrap();

        let merged = AppConfig::default().merge_yaml(&path).unwrap();
        assert_eq!(merged.model, "qwen2.5");
        assert_eq!(merged.endpoint.as_deref(), Some("http://localhost:11500"));
        assert_eq!(merged.rag.similarity_threshold, 0.45);
        assert_eq!(merged.rag.max_context_documents, 4);
        // Unspecified keys keep their defaults
        assert_eq!(merged.rag.top_k, 20);
        assert_eq!(merged.log_level.as_deref(), Some("warn"));
        assert!(merged.log_json);
    }

    #[test]
    fn test_load_from_explicit_paths() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("custom.yaml");
        std::fs::write(&path, "rag:\n  maxContextDocuments: 3\n").unwrap();

        let config =
            AppConfig::load_from(Some(temp.path().to_path_buf()), Some(path.clone())).unwrap();
        assert_eq!(config.workspace, temp.path());
        assert_eq!(config.config_file, Some(path));
        assert_eq!(config.rag.max_context_documents, 3);
    }

    #[test]
    fn test_load_from_missing_workspace() {
        let result = AppConfig::load_from(Some(PathBuf::from("/definitely/not/here")), None);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_merge_yaml_rejects_malformed_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, "rag: [unclosed").unwrap();

        assert!(AppConfig::default().merge_yaml(&path).is_err());
    }

    #[test]
    fn test_validate_unknown_provider() {
        let config = AppConfig {
            provider: "unknown".to_string(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_ollama() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rag_validate_bounds() {
        let mut rag = RagConfig::default();
        rag.similarity_threshold = 1.5;
        assert!(rag.validate().is_err());

        let mut rag = RagConfig::default();
        rag.top_k = 0;
        assert!(rag.validate().is_err());

        let mut rag = RagConfig::default();
        rag.max_context_documents = 0;
        assert!(rag.validate().is_err());

        let mut rag = RagConfig::default();
        rag.relevance_overlap_fraction = -0.1;
        assert!(rag.validate().is_err());
    }
}
