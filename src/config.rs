//! Pipeline configuration
//!
//! Every field has a default so a partial TOML file (or none at all) is enough
//! to run the pipeline.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::models::{GenerativeModel, Language, Role};

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub chunking: ChunkingConfig,
    pub translation: TranslationConfig,
    pub normalizer: NormalizerConfig,
    pub languages: LanguageTable,
    pub safety_nets: Vec<SafetyNetConfig>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chunking: ChunkingConfig::default(),
            translation: TranslationConfig::default(),
            normalizer: NormalizerConfig::default(),
            languages: LanguageTable::default(),
            safety_nets: vec![SafetyNetConfig::spanish_addiction()],
        }
    }
}

impl PipelineConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.chunking.split_threshold == 0 {
            return Err(ConfigError::Invalid("chunking.split_threshold must be > 0".into()));
        }
        if self.chunking.max_workers == 0 {
            return Err(ConfigError::Invalid("chunking.max_workers must be > 0".into()));
        }
        let timeout = self.translation.generative_timeout_secs;
        if !timeout.is_finite() || timeout < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "translation.generative_timeout_secs must be a finite number >= 0, got {}",
                timeout
            )));
        }
        for net in &self.safety_nets {
            net.compile()?;
        }
        Ok(())
    }
}

/// Chunking thresholds, measured in characters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Length above which text is chunked
    pub default_threshold: usize,
    /// Per-language thresholds keyed by language code
    pub language_thresholds: HashMap<String, usize>,
    /// Hard cap on a single chunk
    pub split_threshold: usize,
    /// How far past the threshold to look for a boundary marker
    pub lookahead: usize,
    /// Chunks translated concurrently
    pub max_workers: usize,
    /// Preferred split points, normally speaker labels
    pub markers: Vec<String>,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            default_threshold: 2500,
            language_thresholds: HashMap::from([("el".to_string(), 1500), ("pt".to_string(), 2000)]),
            split_threshold: 1500,
            lookahead: 500,
            max_workers: 4,
            markers: vec![
                "CUSTOMER:".to_string(),
                "CUSTOMER NAME:".to_string(),
                "AGENT:".to_string(),
                "AGENT NAME:".to_string(),
                "BOT:".to_string(),
            ],
        }
    }
}

impl ChunkingConfig {
    /// Effective chunking threshold for a language; an override can only lower it
    pub fn threshold_for(&self, language_code: &str) -> usize {
        self.language_thresholds
            .get(language_code)
            .map(|&t| t.min(self.default_threshold))
            .unwrap_or(self.default_threshold)
    }
}

/// What to report when every translation tier failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Report the transcript as not flagged
    #[default]
    FailOpen,
    /// Report the transcript as flagged so it lands in manual review
    FlagForReview,
}

/// Timeout and output-quality settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    pub generative_timeout_secs: f64,
    /// Known refusal messages from generative backends
    pub refusal_phrases: Vec<String>,
    /// Outputs that count as empty once trimmed
    pub placeholder_outputs: Vec<String>,
    /// Minimum output/input length ratio before output is considered hallucinated
    pub min_length_ratio: f64,
    pub on_failure: FailurePolicy,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            generative_timeout_secs: 50.0,
            refusal_phrases: vec![
                "Sorry - this model is unable to respond to this request.".to_string(),
            ],
            placeholder_outputs: vec![String::new(), "```\n\n```".to_string()],
            min_length_ratio: 0.5,
            on_failure: FailurePolicy::FailOpen,
        }
    }
}

impl TranslationConfig {
    /// Values rejected at load (negative, NaN, infinite) count as zero
    pub fn generative_timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.generative_timeout_secs).unwrap_or(Duration::ZERO)
    }
}

/// Speaker normalization settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Channels that are processed at all
    pub enabled_channels: Vec<String>,
    /// Markers of anonymous web-chat transcripts
    pub anonymous_markers: Vec<String>,
    /// Roles whose tokens are stripped unless they are speaker turns: preceded
    /// by a timestamp in timestamped transcripts, a `ROLE:` label otherwise
    pub guarded_roles: Vec<Role>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            enabled_channels: vec!["chat".to_string()],
            anonymous_markers: vec!["CUSTOMER:@".to_string(), "Web User".to_string()],
            guarded_roles: Role::ALL.to_vec(),
        }
    }
}

impl NormalizerConfig {
    pub fn channel_enabled(&self, channel: &str) -> bool {
        self.enabled_channels
            .iter()
            .any(|c| c.eq_ignore_ascii_case(channel.trim()))
    }
}

/// The fixed list of supported source languages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageTable(pub Vec<Language>);

impl Default for LanguageTable {
    fn default() -> Self {
        Self(vec![
            Language::new("English", "en", GenerativeModel::Primary),
            Language::new("German", "de", GenerativeModel::Primary),
            Language::new("Greek", "el", GenerativeModel::Secondary),
            Language::new("Brazilian Portuguese", "pt", GenerativeModel::Primary).with_aliases(&[
                "Brazilian-Portuguese",
                "Portuguese-Brazilian",
                "Portuguese Brazilian",
            ]),
            Language::new("Spanish", "es", GenerativeModel::Primary),
        ])
    }
}

impl LanguageTable {
    pub fn resolve(&self, input: &str) -> Option<&Language> {
        self.0.iter().find(|l| l.matches(input))
    }
}

/// Post-translation guard for a term a backend is known to under-translate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyNetConfig {
    /// Language code the net applies to
    pub language: String,
    /// Regexes searched in the untranslated text
    pub source_patterns: Vec<String>,
    /// English phrase whose presence means the term survived translation
    pub canonical_phrase: String,
    /// Sentence appended when it did not
    pub sentence: String,
}

impl SafetyNetConfig {
    pub fn spanish_addiction() -> Self {
        Self {
            language: "es".to_string(),
            source_patterns: vec![
                "ludópata".to_string(),
                "ludopata".to_string(),
                "enganchado".to_string(),
            ],
            canonical_phrase: "I am addicted".to_string(),
            sentence: "CUSTOMER: I am addicted".to_string(),
        }
    }

    /// Compile the source patterns into one case-insensitive alternation
    pub fn compile(&self) -> Result<Regex, ConfigError> {
        let pattern = self.source_patterns.join("|");
        RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| ConfigError::Invalid(format!("safety net for {}: {}", self.language, e)))
    }
}
