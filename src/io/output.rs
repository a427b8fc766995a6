use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::input::ProcessRequest;
use crate::models::{Flag, Verdict};

/// Response printed for a processed transcript
#[derive(Debug, Clone, Serialize)]
pub struct VerdictResponse<'a> {
    pub red_word_flag: u8,
    #[serde(flatten)]
    pub verdict: &'a Verdict,
}

impl<'a> VerdictResponse<'a> {
    pub fn new(verdict: &'a Verdict) -> Self {
        Self {
            red_word_flag: u8::from(verdict.flagged),
            verdict,
        }
    }
}

/// Audit log entry for one processed request
#[derive(Debug, Clone, Serialize)]
pub struct AuditRecord {
    pub red_word_flag: u8,
    pub sentences_flagged: Vec<Flag>,
    pub ticket_id: Option<String>,
    pub conversation_id: Option<String>,
    pub create_timestamp: Option<String>,
    pub language: String,
    pub channel: String,
    pub translation_service_used: String,
    pub total_translation_time: f64,
    pub total_engine_time: f64,
}

impl AuditRecord {
    pub fn new(request: &ProcessRequest, verdict: &Verdict) -> Self {
        Self {
            red_word_flag: u8::from(verdict.flagged),
            sentences_flagged: verdict.flags.clone(),
            ticket_id: request.ticket_id.clone(),
            conversation_id: request.conversation_id.clone(),
            create_timestamp: request.ticket_created_time.clone(),
            language: request.language.clone(),
            channel: request.channel.clone(),
            translation_service_used: verdict.translation_service_used.to_string(),
            total_translation_time: verdict.timings.translation,
            total_engine_time: verdict.timings.total(),
        }
    }

    /// `<dir>/<YYYY-MM-DD>/logs_<conversation_id>_<unix seconds>.json`
    ///
    /// Characters other than ASCII alphanumerics, `-` and `_` in the
    /// conversation id become `_`, so the file always lands in the day directory.
    pub fn path_in(&self, dir: &Path, now: DateTime<Utc>) -> PathBuf {
        let conversation = self
            .conversation_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .map(file_safe)
            .unwrap_or_else(|| "unknown".to_string());
        dir.join(now.format("%Y-%m-%d").to_string())
            .join(format!("logs_{}_{}.json", conversation, now.timestamp()))
    }

    /// Write as pretty JSON under `dir`, creating the day directory
    pub fn write(&self, dir: &Path, now: DateTime<Utc>) -> Result<PathBuf> {
        let path = self.path_in(dir, now);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
        let file = std::fs::File::create(&path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        serde_json::to_writer_pretty(file, self).context("Failed to write JSON")?;
        Ok(path)
    }
}

fn file_safe(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::parse_request_json;
    use crate::models::{ServiceUsed, Timings};
    use chrono::TimeZone;

    fn request() -> ProcessRequest {
        parse_request_json(
            r#"{"IncrementalTranscript": "CUSTOMER: hi", "Language": "English", "ConversationId": "c-9"}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_response_flattens_verdict() {
        let verdict = Verdict::unflagged(ServiceUsed::Skipped, Timings::default());
        let json = serde_json::to_value(VerdictResponse::new(&verdict)).unwrap();

        assert_eq!(json["red_word_flag"], 0);
        assert_eq!(json["translation_service_used"], "skipped");
    }

    #[test]
    fn test_audit_record_written_under_day_directory() {
        let dir = tempfile::tempdir().unwrap();
        let verdict = Verdict::unflagged(
            ServiceUsed::None,
            Timings {
                translation: 0.5,
                matching: 0.25,
            },
        );
        let record = AuditRecord::new(&request(), &verdict);
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

        let path = record.write(dir.path(), now).unwrap();

        assert_eq!(
            path,
            dir.path()
                .join("2024-05-01")
                .join(format!("logs_c-9_{}.json", now.timestamp()))
        );
        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["red_word_flag"], 0);
        assert_eq!(written["translation_service_used"], "none");
        assert_eq!(written["total_engine_time"], 0.75);
    }

    #[test]
    fn test_audit_path_stays_in_day_directory() {
        let dir = tempfile::tempdir().unwrap();
        let verdict = Verdict::unflagged(ServiceUsed::None, Timings::default());
        let mut record = AuditRecord::new(&request(), &verdict);
        record.conversation_id = Some("../../etc/x".to_string());
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

        let path = record.write(dir.path(), now).unwrap();

        let day = dir.path().join("2024-05-01");
        assert_eq!(path.parent(), Some(day.as_path()));
        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some(format!("logs_______etc_x_{}.json", now.timestamp()).as_str())
        );
        assert!(path.exists());
    }
}
