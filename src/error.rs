//! Error types for the red-flag pipeline

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by a single translation backend call.
///
/// These never reach the caller of the pipeline; the orchestrator absorbs them
/// into its fallback policy.
#[derive(Error, Debug)]
pub enum TranslationError {
    #[error("translation timed out after {0:.1}s")]
    Timeout(f64),

    #[error("backend error: {0}")]
    Backend(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed backend response: {0}")]
    Decode(String),

    #[error("output rejected: {0}")]
    Rejected(String),

    #[error("backend returned no text")]
    EmptyResponse,

    #[error("language not supported: {0}")]
    UnsupportedLanguage(String),

    #[error("translation task failed: {0}")]
    TaskFailed(String),
}

/// Errors raised while loading the rule configuration
#[derive(Error, Debug)]
pub enum RuleError {
    #[error("failed to read rules from {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse rules: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("rule {index}: invalid regex {pattern:?}: {source}")]
    InvalidRegex {
        index: usize,
        pattern: String,
        source: regex::Error,
    },

    #[error("rule {0} has neither keywords nor regex patterns")]
    EmptyRule(usize),
}

/// Errors raised while loading the pipeline configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config from {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
