//! Prompt builder for rendering templates and injecting retrieved context.

use crate::types::{BuiltPrompt, BuiltPromptMetadata, ContextSource, PromptTemplate};
use grounded_core::{AppError, AppResult};
use handlebars::Handlebars;

/// Build the generation prompt for a question and its retrieved context.
///
/// This function:
/// 1. Renders the context block, one `From <source>:` entry per document
/// 2. Numbers the template's rules
/// 3. Renders the Handlebars body with rules, exemplars, context and question
/// 4. Returns a `BuiltPrompt` ready for generation
///
/// Documents are rendered in the order given; the question is inserted
/// verbatim.
///
/// # Example
/// ```no_run
/// use grounded_prompt::{build_prompt, ContextSource, PromptTemplate};
///
/// struct Note(&'static str, &'static str);
///
/// impl ContextSource for Note {
///     fn source_name(&self) -> &str { self.0 }
///     fn content(&self) -> &str { self.1 }
/// }
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let notes = [Note("paris.md", "The Eiffel Tower is 330 meters tall.")];
/// let built = build_prompt(&PromptTemplate::english(), &notes, "How tall is the Eiffel Tower?")?;
/// println!("{}", built.text);
/// # Ok(())
/// # }
/// ```
pub fn build_prompt<D: ContextSource>(
    template: &PromptTemplate,
    documents: &[D],
    question: &str,
) -> AppResult<BuiltPrompt> {
    tracing::debug!(
        "Building prompt from template {} v{}",
        template.id,
        template.version
    );

    let context = render_context(documents);

    let rules: Vec<String> = template
        .rules
        .iter()
        .enumerate()
        .map(|(i, rule)| format!("{}. {}", i + 1, rule))
        .collect();

    let data = serde_json::json!({
        "preamble": template.preamble,
        "rules": rules,
        "refusal": template.refusal,
        "exemplars": template.exemplars,
        "context": context,
        "question": question,
    });

    let text = render_template(&template.template, &data)?;

    let metadata = BuiltPromptMetadata {
        template_id: template.id.clone(),
        template_version: template.version,
        sources: documents
            .iter()
            .map(|d| d.source_name().to_string())
            .collect(),
        context_chars: context.chars().count(),
    };

    Ok(BuiltPrompt { text, metadata })
}

/// Render the context block: `From <source>:\n<content>\n\n` per document.
pub fn render_context<D: ContextSource>(documents: &[D]) -> String {
    documents
        .iter()
        .map(|d| format!("From {}:\n{}\n\n", d.source_name(), d.content()))
        .collect()
}

/// Render a Handlebars template with JSON data.
fn render_template(template: &str, data: &serde_json::Value) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Disable HTML escaping for plain text
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    handlebars
        .render("prompt", data)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))
}
