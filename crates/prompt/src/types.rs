//! Prompt types for Grounded.
//!
//! This module defines the prompt template, the built prompt handed to the
//! generator, and the seam through which retrieved documents enter a prompt.

use serde::{Deserialize, Serialize};

/// Minimum number of answering rules a template must carry.
pub const REQUIRED_RULES: usize = 5;

/// Anything that can be rendered into the context block of a prompt.
pub trait ContextSource {
    /// Name used for attribution (usually the originating filename).
    fn source_name(&self) -> &str;

    /// Text placed under the attribution line.
    fn content(&self) -> &str;
}

/// A versioned prompt template.
///
/// The rendered prompt is made of ordered sections: rules, exemplars of
/// questions that must not be answered, the retrieved context and the
/// question. `template` is the Handlebars body that lays those sections out;
/// it receives `preamble`, `rules` (already numbered), `exemplars`,
/// `refusal`, `context` and `question`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PromptTemplate {
    /// Unique template identifier (e.g. "rag.answer.en")
    pub id: String,

    /// Template revision, bumped whenever wording changes
    pub version: u32,

    /// Language tag of the wording (e.g. "en", "de")
    pub language: String,

    /// Opening instruction
    pub preamble: String,

    /// Answering rules, in order
    pub rules: Vec<String>,

    /// Sentence the model must use when the context has no answer
    pub refusal: String,

    /// Categories of questions that are never answered
    pub exemplars: Vec<String>,

    /// Handlebars body
    pub template: String,
}

impl PromptTemplate {
    /// Built-in English template.
    pub fn english() -> Self {
        let refusal = "I don't have information about that in my knowledge base.".to_string();

        Self {
            id: "rag.answer.en".to_string(),
            version: 1,
            language: "en".to_string(),
            preamble: "You are a helpful AI assistant and answer questions exclusively on the \
                       basis of the following document context. You must not use external \
                       knowledge."
                .to_string(),
            rules: vec![
                "**Provided context only**: Answer only with information that appears in the context below.".to_string(),
                "**No external knowledge**: Do not answer general topics or current events outside the context.".to_string(),
                format!("**Be strict**: If the answer is not in the context, say \"{}\"", refusal),
                "**Name your sources**: When you find matching information, state which document it comes from.".to_string(),
                "**Stay helpful**: If the context contains relevant information, give a thorough answer.".to_string(),
            ],
            exemplars: vec![
                "General knowledge (e.g. heights of mountains, historical dates) unless it is in a document".to_string(),
                "Current events that do not appear in the documents".to_string(),
                "Mathematical calculations unrelated to the documents".to_string(),
                "Personal advice or opinions".to_string(),
                "Recipes, song lyrics or other content that is not part of the uploaded documents".to_string(),
            ],
            refusal,
            template: ENGLISH_BODY.to_string(),
        }
    }

    /// Built-in German template.
    pub fn german() -> Self {
        let refusal = "Dazu habe ich keine Informationen in meiner Wissensbasis.".to_string();

        Self {
            id: "rag.answer.de".to_string(),
            version: 1,
            language: "de".to_string(),
            preamble: "Du bist ein hilfsbereiter KI-Assistent und beantwortest Fragen \
                       ausschließlich auf Basis des folgenden Dokumentenkontexts. Externes \
                       Wissen darfst du nicht verwenden."
                .to_string(),
            rules: vec![
                "**Nur der bereitgestellte Kontext**: Antworte nur mit Informationen, die im Kontext unten vorkommen.".to_string(),
                "**Kein externes Wissen**: Beantworte keine allgemeinen Themen oder Aktuelles außerhalb des Kontexts.".to_string(),
                format!("**Sei strikt**: Falls die Antwort nicht im Kontext steht, sage \"{}\"", refusal),
                "**Quellen nennen**: Wenn du passende Informationen findest, gib an, aus welchem Dokument sie stammen.".to_string(),
                "**Hilfreich bleiben**: Enthält der Kontext relevante Informationen, liefere eine ausführliche Antwort.".to_string(),
            ],
            exemplars: vec![
                "Allgemeinwissen (z.B. Höhe von Bergen, historische Daten), sofern nicht im Dokument enthalten".to_string(),
                "Aktuelle Ereignisse, die nicht im Dokument stehen".to_string(),
                "Mathematische Berechnungen ohne Bezug zum Dokument".to_string(),
                "Persönliche Ratschläge oder Meinungen".to_string(),
                "Rezepte, Liedtexte oder andere Inhalte, die nicht aus den hochgeladenen Dokumenten stammen".to_string(),
            ],
            refusal,
            template: GERMAN_BODY.to_string(),
        }
    }

    /// Look up a built-in template by id.
    pub fn builtin(id: &str) -> Option<Self> {
        match id {
            "rag.answer.en" => Some(Self::english()),
            "rag.answer.de" => Some(Self::german()),
            _ => None,
        }
    }
}

const ENGLISH_BODY: &str = "{{preamble}}

**IMPORTANT RULES:**
{{#each rules}}
{{this}}
{{/each}}

**ANSWERING RULES:**
- If the context contains relevant information, give a comprehensive answer with sources.
- If the context covers the question only partially, answer only what is covered and point out what is missing.
- If no suitable context is available, answer: \"{{refusal}} Please ask questions about the uploaded documents.\"

**EXAMPLES OF WHAT IS NOT ANSWERED:**
{{#each exemplars}}
- {{this}}
{{/each}}

**CONTEXT FROM THE DOCUMENTS:**
{{context}}

**USER QUESTION:** {{question}}

**YOUR ANSWER:**
";

const GERMAN_BODY: &str = "{{preamble}}

**WICHTIGE REGELN:**
{{#each rules}}
{{this}}
{{/each}}

**ANTWORTREGELN:**
- Enthält der Kontext relevante Informationen, gib eine umfassende Antwort mit Quellenangaben.
- Deckt der Kontext die Frage nur teilweise ab, beantworte nur, was enthalten ist, und verweise auf fehlende Informationen.
- Ist kein passender Kontext vorhanden, antworte: \"{{refusal}} Bitte stelle Fragen zu den hochgeladenen Dokumenten.\"

**BEISPIELE, WAS NICHT BEANTWORTET WIRD:**
{{#each exemplars}}
- {{this}}
{{/each}}

**KONTEXT AUS DEN DOKUMENTEN:**
{{context}}

**NUTZERFRAGE:** {{question}}

**DEINE ANTWORT:**
";

/// A fully built prompt ready for generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPrompt {
    /// Rendered prompt text
    pub text: String,

    /// Metadata about the built prompt
    pub metadata: BuiltPromptMetadata,
}

/// Metadata about a built prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPromptMetadata {
    /// Template the prompt was rendered from
    #[serde(rename = "templateId")]
    pub template_id: String,

    /// Template revision
    #[serde(rename = "templateVersion")]
    pub template_version: u32,

    /// Attribution names of the context documents, in prompt order
    pub sources: Vec<String>,

    /// Length of the rendered context block in characters
    #[serde(rename = "contextChars")]
    pub context_chars: usize,
}
