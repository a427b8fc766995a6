use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::NameMapping;

/// A transcript-processing request as delivered by the ticketing system
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessRequest {
    #[serde(rename = "IncrementalTranscript")]
    pub transcript: String,
    #[serde(rename = "Language")]
    pub language: String,
    #[serde(rename = "CustomerName", default)]
    pub customer_name: String,
    #[serde(rename = "AgentName", default)]
    pub agent_name: String,
    #[serde(rename = "Channel", default = "default_channel")]
    pub channel: String,
    #[serde(rename = "TicketId", default, deserialize_with = "id_string")]
    pub ticket_id: Option<String>,
    #[serde(rename = "ConversationId", default, deserialize_with = "id_string")]
    pub conversation_id: Option<String>,
    #[serde(rename = "TicketCreatedTime", default)]
    pub ticket_created_time: Option<String>,
}

fn default_channel() -> String {
    "chat".to_string()
}

/// Ticket and conversation ids arrive as either numbers or strings
fn id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

impl ProcessRequest {
    pub fn name_mapping(&self) -> NameMapping {
        NameMapping::customer_agent(&self.customer_name, &self.agent_name)
    }
}

/// Parse a request JSON file
pub fn parse_request_file(path: &Path) -> Result<ProcessRequest> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    parse_request_json(&content)
}

/// Parse a request JSON string
pub fn parse_request_json(json: &str) -> Result<ProcessRequest> {
    serde_json::from_str(json).context("Failed to parse request JSON")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    #[test]
    fn test_parse_request() {
        let json = r#"{
            "IncrementalTranscript": "(10:00:01 AM) Maria: hola",
            "Language": "Spanish",
            "CustomerName": "Maria",
            "AgentName": "John",
            "Channel": "chat",
            "TicketId": 12345,
            "ConversationId": "abc-1",
            "TicketCreatedTime": "2024-05-01T10:00:00Z"
        }"#;

        let request = parse_request_json(json).unwrap();

        assert_eq!(request.language, "Spanish");
        assert_eq!(request.ticket_id.as_deref(), Some("12345"));
        assert_eq!(request.conversation_id.as_deref(), Some("abc-1"));

        let mapping = request.name_mapping();
        let mut roles: Vec<(&str, Role)> = mapping.iter().collect();
        roles.sort_by(|a, b| a.0.cmp(b.0));
        assert_eq!(roles, vec![("John", Role::Agent), ("Maria", Role::Customer)]);
    }

    #[test]
    fn test_missing_optional_fields() {
        let request =
            parse_request_json(r#"{"IncrementalTranscript": "hi", "Language": "en"}"#).unwrap();

        assert_eq!(request.channel, "chat");
        assert!(request.ticket_id.is_none());
        assert!(request.name_mapping().is_empty());
    }

    #[test]
    fn test_missing_transcript_is_an_error() {
        assert!(parse_request_json(r#"{"Language": "en"}"#).is_err());
    }
}
