//! Ask command handler.
//!
//! Answers one question through the RAG pipeline.

use super::open_corpus;
use clap::Args;
use grounded_core::{config::AppConfig, AppError, AppResult};
use grounded_knowledge::{LlmGenerator, Question, RagPipeline};
use grounded_llm::create_client;
use grounded_prompt::load_template;
use std::io::Read;
use std::sync::Arc;

/// Ask a question about the documents in the knowledge base
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: Option<String>,

    /// Read a `{"question": "..."}` object from stdin
    #[arg(long, conflicts_with = "question")]
    pub stdin_json: bool,

    /// Prompt template id (overrides the configured one)
    #[arg(long)]
    pub template: Option<String>,

    /// Answer with an apology instead of failing when a backend is down
    #[arg(long)]
    pub apologize: bool,

    /// Output as a `{"answer": "..."}` object
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");

        let question = self.read_question()?;
        let pipeline = build_pipeline(config, self.template.as_deref())?;

        let outcome = if self.apologize {
            pipeline.answer_or_apology(&question).await
        } else {
            pipeline.answer(&question).await?
        };

        tracing::debug!(
            "Answer kind: {:?}, sources: {:?}",
            outcome.kind,
            outcome.sources
        );

        if self.json {
            println!("{}", serde_json::to_string(&outcome.answer)?);
        } else {
            println!("{}", outcome.answer.text());
        }

        Ok(())
    }

    fn read_question(&self) -> AppResult<Question> {
        if self.stdin_json {
            let mut input = String::new();
            std::io::stdin().read_to_string(&mut input)?;
            return parse_question_json(&input);
        }

        self.question
            .as_deref()
            .map(Question::new)
            .ok_or_else(|| AppError::Config("No question provided".to_string()))
    }
}

/// Parse a `{"question": "..."}` request body.
fn parse_question_json(input: &str) -> AppResult<Question> {
    serde_json::from_str(input)
        .map_err(|e| AppError::Serialization(format!("Invalid question JSON: {}", e)))
}

/// Wire the corpus, the generation backend and the prompt template into a
/// pipeline.
fn build_pipeline(config: &AppConfig, template_id: Option<&str>) -> AppResult<RagPipeline> {
    let corpus = Arc::new(open_corpus(config)?);

    let client = create_client(&config.provider, config.endpoint.as_deref())?;
    let generator = Arc::new(LlmGenerator::new(client, config.model.as_str()));

    let template_id = template_id.unwrap_or(config.rag.prompt_template.as_str());
    let template = load_template(&config.workspace, template_id)?;

    RagPipeline::new(corpus, generator, config.rag.clone())?.with_template(template)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_question_json() {
        let question = parse_question_json(r#"{"question": "What is in paris.md?"}"#).unwrap();
        assert_eq!(question.text(), "What is in paris.md?");
    }

    #[test]
    fn test_parse_question_json_rejects_other_shapes() {
        assert!(parse_question_json(r#"{"query": "x"}"#).is_err());
        assert!(parse_question_json("not json").is_err());
    }

    #[test]
    fn test_missing_question() {
        let cmd = AskCommand {
            question: None,
            stdin_json: false,
            template: None,
            apologize: false,
            json: false,
        };
        assert!(matches!(cmd.read_question(), Err(AppError::Config(_))));
    }
}
