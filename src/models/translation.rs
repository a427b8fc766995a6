use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the two generative backends a language can be routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerativeModel {
    #[default]
    Primary,
    Secondary,
}

impl fmt::Display for GenerativeModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerativeModel::Primary => f.write_str("primary"),
            GenerativeModel::Secondary => f.write_str("secondary"),
        }
    }
}

/// A configured source language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    /// Display name used in prompts (e.g. "Brazilian Portuguese")
    pub name: String,
    /// Additional spellings accepted from callers
    #[serde(default)]
    pub aliases: Vec<String>,
    /// ISO 639-1 code passed to the deterministic translator
    pub code: String,
    /// Generative backend this language is routed to
    #[serde(default)]
    pub model: GenerativeModel,
}

impl Language {
    pub fn new(name: &str, code: &str, model: GenerativeModel) -> Self {
        Self {
            name: name.to_string(),
            aliases: vec![],
            code: code.to_string(),
            model,
        }
    }

    pub fn with_aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases = aliases.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn is_english(&self) -> bool {
        self.code.eq_ignore_ascii_case("en")
    }

    /// Whether a caller-supplied language string refers to this language
    pub fn matches(&self, input: &str) -> bool {
        let input = input.trim();
        self.name.eq_ignore_ascii_case(input)
            || self.code.eq_ignore_ascii_case(input)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(input))
    }
}

/// A slice of a larger text, translated independently
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub index: usize,
    pub text: String,
}

impl Chunk {
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Which translator tier produced a piece of text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslationService {
    Generative,
    Deterministic,
}

/// Record of a single call (or batch of chunk calls) against one tier
#[derive(Debug, Clone, Serialize)]
pub struct TranslationAttempt {
    pub service: TranslationService,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Wall-clock seconds
    pub duration: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TranslationAttempt {
    pub fn succeeded(&self) -> bool {
        self.text.is_some()
    }
}

/// Provenance of the text handed to the matcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceUsed {
    /// Source was already English
    None,
    Generative(GenerativeModel),
    Deterministic,
    /// Every tier failed
    Failed,
    /// Channel is not processed
    Skipped,
}

impl fmt::Display for ServiceUsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceUsed::None => f.write_str("none"),
            ServiceUsed::Generative(model) => write!(f, "generative:{}", model),
            ServiceUsed::Deterministic => f.write_str("deterministic"),
            ServiceUsed::Failed => f.write_str("failed"),
            ServiceUsed::Skipped => f.write_str("skipped"),
        }
    }
}

/// Accepted output of the translation orchestrator
#[derive(Debug, Clone, Serialize)]
pub struct TranslationResult {
    pub text: String,
    pub service_used: ServiceUsed,
    pub elapsed_seconds: f64,
    /// Every tier attempted for this call, in order
    pub attempts: Vec<TranslationAttempt>,
}

impl TranslationResult {
    /// Result for text that needed no translation
    pub fn untranslated(text: &str) -> Self {
        Self {
            text: text.to_string(),
            service_used: ServiceUsed::None,
            elapsed_seconds: 0.0,
            attempts: vec![],
        }
    }
}
