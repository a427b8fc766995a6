pub mod config;
pub mod error;
pub mod io;
pub mod llm;
pub mod models;
pub mod nlp;
pub mod pipeline;
pub mod stages;

pub use config::{FailurePolicy, PipelineConfig};
pub use error::{ConfigError, RuleError, TranslationError};
pub use io::{parse_request_file, parse_request_json, AuditRecord, ProcessRequest, VerdictResponse};
pub use llm::{
    AnthropicConfig, AnthropicTranslator, DeterministicTranslator, GenerativeTranslator,
    MachineTranslateClient, MachineTranslateConfig,
};
pub use models::{
    Flag, GenerativeModel, Language, NameMapping, Role, Rule, RuleSet, ServiceUsed, Timings,
    TranslationResult, Verdict,
};
pub use pipeline::RedFlagPipeline;
pub use stages::TranslationOrchestrator;
