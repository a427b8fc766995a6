use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::prompts::{build_translation_prompt, SYSTEM_PROMPT};
use super::translator::{DeterministicTranslator, GenerativeTranslator};
use crate::error::TranslationError;
use crate::models::{GenerativeModel, Language};

/// Configuration for the Anthropic API client
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    /// API key (from ANTHROPIC_API_KEY env var)
    pub api_key: String,
    /// Model used for languages routed to the primary backend
    pub primary_model: String,
    /// Model used for languages routed to the secondary backend
    pub secondary_model: String,
    /// Temperature (0-1, lower = more deterministic)
    pub temperature: f64,
    /// Maximum tokens in response
    pub max_tokens: u32,
    pub base_url: String,
}

impl AnthropicConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .context("ANTHROPIC_API_KEY environment variable not set")?;

        Ok(Self {
            api_key,
            primary_model: std::env::var("REDFLAG_PRIMARY_MODEL")
                .unwrap_or_else(|_| "claude-sonnet-4-20250514".to_string()),
            secondary_model: std::env::var("REDFLAG_SECONDARY_MODEL")
                .unwrap_or_else(|_| "claude-3-5-haiku-20241022".to_string()),
            temperature: 0.0,
            max_tokens: 8192,
            base_url: "https://api.anthropic.com/v1".to_string(),
        })
    }

    pub fn model(&self, model: GenerativeModel) -> &str {
        match model {
            GenerativeModel::Primary => &self.primary_model,
            GenerativeModel::Secondary => &self.secondary_model,
        }
    }
}

/// Generative translator backed by the Anthropic messages API
pub struct AnthropicTranslator {
    client: Client,
    config: AnthropicConfig,
}

impl AnthropicTranslator {
    pub fn new(config: AnthropicConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Send a message to Claude and get the text of the first content block
    async fn send_message(
        &self,
        model: &str,
        system: &str,
        user: &str,
    ) -> Result<String, TranslationError> {
        let request = AnthropicRequest {
            model: model.to_string(),
            max_tokens: self.config.max_tokens,
            temperature: Some(self.config.temperature),
            system: Some(system.to_string()),
            messages: vec![Message {
                role: "user".to_string(),
                content: user.to_string(),
            }],
        };

        let response = self
            .client
            .post(format!("{}/messages", self.config.base_url))
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TranslationError::Backend(format!(
                "Anthropic API error: {} - {}",
                status, body
            )));
        }

        let response: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| TranslationError::Decode(e.to_string()))?;

        response
            .content
            .into_iter()
            .find(|c| c.content_type == "text")
            .map(|c| c.text)
            .ok_or(TranslationError::EmptyResponse)
    }
}

#[async_trait]
impl GenerativeTranslator for AnthropicTranslator {
    async fn translate(
        &self,
        text: &str,
        language: &Language,
        model: GenerativeModel,
    ) -> Result<String, TranslationError> {
        let model_id = self.config.model(model);
        debug!(
            "Generative translation: {} chars of {} via {}",
            text.chars().count(),
            language.name,
            model_id
        );
        let prompt = build_translation_prompt(text, language);
        self.send_message(model_id, SYSTEM_PROMPT, &prompt).await
    }
}

/// Configuration for a LibreTranslate-compatible machine translation service
#[derive(Debug, Clone)]
pub struct MachineTranslateConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

impl MachineTranslateConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("REDFLAG_MT_URL")
            .context("REDFLAG_MT_URL environment variable not set")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: std::env::var("REDFLAG_MT_API_KEY").ok(),
        })
    }
}

/// Deterministic translator backed by a machine translation HTTP service
pub struct MachineTranslateClient {
    client: Client,
    config: MachineTranslateConfig,
}

impl MachineTranslateClient {
    pub fn new(config: MachineTranslateConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl DeterministicTranslator for MachineTranslateClient {
    async fn translate(
        &self,
        text: &str,
        source_language_code: &str,
    ) -> Result<String, TranslationError> {
        let request = MachineTranslateRequest {
            q: text,
            source: source_language_code,
            target: "en",
            format: "text",
            api_key: self.config.api_key.as_deref(),
        };

        let response = self
            .client
            .post(format!("{}/translate", self.config.base_url))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TranslationError::Backend(format!(
                "machine translation error: {} - {}",
                status, body
            )));
        }

        let response: MachineTranslateResponse = response
            .json()
            .await
            .map_err(|e| TranslationError::Decode(e.to_string()))?;

        Ok(response.translated_text)
    }
}

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
struct MachineTranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct MachineTranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_routing() {
        let config = AnthropicConfig {
            api_key: "k".to_string(),
            primary_model: "big".to_string(),
            secondary_model: "small".to_string(),
            temperature: 0.0,
            max_tokens: 10,
            base_url: "http://localhost".to_string(),
        };
        assert_eq!(config.model(GenerativeModel::Primary), "big");
        assert_eq!(config.model(GenerativeModel::Secondary), "small");
    }

    #[test]
    fn test_parse_machine_translate_response() {
        let response: MachineTranslateResponse =
            serde_json::from_str(r#"{"translatedText": "I am addicted"}"#).unwrap();
        assert_eq!(response.translated_text, "I am addicted");
    }

    #[test]
    fn test_parse_anthropic_response_text_block() {
        let response: AnthropicResponse = serde_json::from_str(
            r#"{"content": [{"type": "text", "text": "CUSTOMER: hello"}]}"#,
        )
        .unwrap();
        assert_eq!(response.content[0].text, "CUSTOMER: hello");
    }
}
