use async_trait::async_trait;

use crate::error::TranslationError;
use crate::models::{GenerativeModel, Language};

/// LLM-backed translation into English.
///
/// Calls may be slow or hang; the orchestrator bounds them with a timeout and
/// may abandon a call that is still in flight.
#[async_trait]
pub trait GenerativeTranslator: Send + Sync {
    async fn translate(
        &self,
        text: &str,
        language: &Language,
        model: GenerativeModel,
    ) -> Result<String, TranslationError>;
}

/// Statistical machine translation into English, used as the fallback tier
#[async_trait]
pub trait DeterministicTranslator: Send + Sync {
    async fn translate(&self, text: &str, source_language_code: &str)
    -> Result<String, TranslationError>;
}
