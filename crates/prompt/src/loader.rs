//! Prompt template loader.
//!
//! Templates live in code (`PromptTemplate::builtin`) and can be replaced per
//! workspace by a YAML file at `.grounded/prompts/<id>.yml`.

use crate::builder::build_prompt;
use crate::types::{ContextSource, PromptTemplate, REQUIRED_RULES};
use grounded_core::{AppError, AppResult};
use std::path::Path;

/// Load a prompt template by ID.
///
/// A workspace file `.grounded/prompts/<id>.yml` takes precedence over the
/// built-in template of the same id. Either way the template is validated
/// before it is returned.
///
/// # Arguments
/// * `workspace_path` - Root workspace directory containing `.grounded/`
/// * `template_id` - Template identifier (e.g., "rag.answer.en")
///
/// # Example
/// ```no_run
/// use grounded_prompt::load_template;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let template = load_template(Path::new("."), "rag.answer.de")?;
/// println!("Loaded template: {} v{}", template.id, template.version);
/// # Ok(())
/// # }
/// ```
pub fn load_template(workspace_path: &Path, template_id: &str) -> AppResult<PromptTemplate> {
    let template_file = workspace_path
        .join(".grounded/prompts")
        .join(format!("{}.yml", template_id));

    let template = if template_file.exists() {
        tracing::debug!("Loading prompt template from: {:?}", template_file);

        let contents = std::fs::read_to_string(&template_file).map_err(|e| {
            AppError::Prompt(format!(
                "Failed to read prompt file {:?}: {}",
                template_file, e
            ))
        })?;

        serde_yaml::from_str::<PromptTemplate>(&contents).map_err(|e| {
            AppError::Prompt(format!(
                "Failed to parse prompt YAML {:?}: {}",
                template_file, e
            ))
        })?
    } else {
        PromptTemplate::builtin(template_id).ok_or_else(|| {
            AppError::Prompt(format!(
                "Unknown prompt template '{}' (no built-in and no {:?})",
                template_id, template_file
            ))
        })?
    };

    validate_template(&template)?;

    tracing::info!(
        "Loaded prompt template: {} v{} ({})",
        template.id,
        template.version,
        template.language
    );

    Ok(template)
}

const SAMPLE_SOURCE: &str = "sample.md";
const SAMPLE_CONTENT: &str = "Sample context line.";
const SAMPLE_QUESTION: &str = "Sample question?";

struct SampleSource;

impl ContextSource for SampleSource {
    fn source_name(&self) -> &str {
        SAMPLE_SOURCE
    }

    fn content(&self) -> &str {
        SAMPLE_CONTENT
    }
}

/// Validate the contractual parts of a template.
///
/// Wording is free, but every template must keep context-only grounding,
/// an explicit refusal sentence that appears in the rules, and slots for the
/// context block and the question. The body is rendered once against a
/// sample document; every rule and the refusal sentence must reach the
/// rendered prompt.
pub fn validate_template(template: &PromptTemplate) -> AppResult<()> {
    if template.id.trim().is_empty() {
        return Err(AppError::Prompt("Template id cannot be empty".to_string()));
    }

    if template.refusal.trim().is_empty() {
        return Err(AppError::Prompt(format!(
            "Template '{}' has no refusal sentence",
            template.id
        )));
    }

    if template.rules.len() < REQUIRED_RULES {
        return Err(AppError::Prompt(format!(
            "Template '{}' has {} rules, expected at least {}",
            template.id,
            template.rules.len(),
            REQUIRED_RULES
        )));
    }

    if !template.rules.iter().any(|r| r.contains(&template.refusal)) {
        return Err(AppError::Prompt(format!(
            "Template '{}' never tells the model to use its refusal sentence",
            template.id
        )));
    }

    for slot in ["{{context}}", "{{question}}"] {
        if !template.template.contains(slot) {
            return Err(AppError::Prompt(format!(
                "Template '{}' body is missing {}",
                template.id, slot
            )));
        }
    }

    let sample = build_prompt(template, &[SampleSource], SAMPLE_QUESTION)?;

    if let Some(rule) = template.rules.iter().find(|r| !sample.text.contains(r.as_str())) {
        return Err(AppError::Prompt(format!(
            "Template '{}' body does not render rule: {}",
            template.id, rule
        )));
    }

    for (what, needle) in [
        ("refusal sentence", template.refusal.as_str()),
        ("context", SAMPLE_CONTENT),
        ("question", SAMPLE_QUESTION),
    ] {
        if !sample.text.contains(needle) {
            return Err(AppError::Prompt(format!(
                "Template '{}' body does not render the {}",
                template.id, what
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_template(workspace: &Path, template: &PromptTemplate) {
        let dir = workspace.join(".grounded/prompts");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join(format!("{}.yml", template.id)),
            serde_yaml::to_string(template).unwrap(),
        )
        .unwrap();
    }

    #[test]
    fn test_load_builtin() {
        let temp = TempDir::new().unwrap();
        let template = load_template(temp.path(), "rag.answer.en").unwrap();
        assert_eq!(template, PromptTemplate::english());
    }

    #[test]
    fn test_workspace_file_overrides_builtin() {
        let temp = TempDir::new().unwrap();
        let mut custom = PromptTemplate::english();
        custom.version = 7;
        custom.preamble = "Answer like a librarian.".to_string();
        write_template(temp.path(), &custom);

        let loaded = load_template(temp.path(), "rag.answer.en").unwrap();
        assert_eq!(loaded.version, 7);
        assert_eq!(loaded.preamble, "Answer like a librarian.");
    }

    #[test]
    fn test_unknown_template() {
        let temp = TempDir::new().unwrap();
        let result = load_template(temp.path(), "rag.answer.xx");
        assert!(matches!(result, Err(AppError::Prompt(_))));
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let temp = TempDir::new().unwrap();
        let mut custom = PromptTemplate::english();
        custom.rules.truncate(2);
        write_template(temp.path(), &custom);

        assert!(load_template(temp.path(), "rag.answer.en").is_err());
    }

    #[test]
    fn test_validate_requires_refusal_in_rules() {
        let mut template = PromptTemplate::english();
        template.refusal = "Nothing to see here.".to_string();
        assert!(validate_template(&template).is_err());
    }

    #[test]
    fn test_validate_requires_slots() {
        let mut template = PromptTemplate::german();
        template.template = "{{preamble}} {{question}}".to_string();
        let err = validate_template(&template).unwrap_err();
        assert!(err.to_string().contains("{{context}}"));
    }

    #[test]
    fn test_validate_requires_rendered_rules() {
        let mut template = PromptTemplate::english();
        template.template = "{{context}}\n{{question}}".to_string();
        let err = validate_template(&template).unwrap_err();
        assert!(err.to_string().contains("does not render rule"));
    }

    #[test]
    fn test_rule_less_override_is_rejected() {
        let temp = TempDir::new().unwrap();
        let mut custom = PromptTemplate::german();
        custom.template = "{{preamble}}\n{{context}}\n{{question}}".to_string();
        write_template(temp.path(), &custom);

        assert!(matches!(
            load_template(temp.path(), "rag.answer.de"),
            Err(AppError::Prompt(_))
        ));
    }

    #[test]
    fn test_builtins_pass_validation() {
        validate_template(&PromptTemplate::english()).unwrap();
        validate_template(&PromptTemplate::german()).unwrap();
    }
}
