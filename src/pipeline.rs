//! End-to-end processing of one transcript
//!
//! anonymize -> translate (+ safety nets) -> segment -> customer sentences ->
//! match -> aggregate

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::config::{FailurePolicy, PipelineConfig};
use crate::error::TranslationError;
use crate::llm::{DeterministicTranslator, GenerativeTranslator};
use crate::models::{NameMapping, RuleSet, ServiceUsed, Timings, Verdict};
use crate::stages::{
    aggregate, anonymize, apply_safety_nets, customer_sentences, match_sentences, segment,
    SafetyNet, TranslationOrchestrator,
};

/// Red-flag detection pipeline.
///
/// Rules, configuration and safety-net patterns are fixed at construction;
/// `process` can be called concurrently from many tasks.
pub struct RedFlagPipeline {
    config: PipelineConfig,
    rules: Arc<RuleSet>,
    safety_nets: Vec<SafetyNet>,
    orchestrator: TranslationOrchestrator,
}

impl RedFlagPipeline {
    pub fn new(
        config: PipelineConfig,
        rules: Arc<RuleSet>,
        generative: Arc<dyn GenerativeTranslator>,
        deterministic: Arc<dyn DeterministicTranslator>,
    ) -> Self {
        let orchestrator = TranslationOrchestrator::new(
            generative,
            deterministic,
            config.chunking.clone(),
            config.translation.clone(),
        );
        // from_toml already rejects broken patterns
        let safety_nets = config
            .safety_nets
            .iter()
            .filter_map(|net| match SafetyNet::new(net.clone()) {
                Ok(net) => Some(net),
                Err(e) => {
                    warn!("Skipping safety net: {}", e);
                    None
                }
            })
            .collect();
        Self {
            config,
            rules,
            safety_nets,
            orchestrator,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn safety_nets(&self) -> &[SafetyNet] {
        &self.safety_nets
    }

    /// Decide whether a transcript should be flagged for review.
    ///
    /// Never fails: translation failures produce a degraded verdict shaped by
    /// the configured failure policy.
    pub async fn process(
        &self,
        transcript: &str,
        language: &str,
        names: &NameMapping,
        channel: &str,
    ) -> Verdict {
        let span = info_span!("transcript", run_id = %Uuid::new_v4());
        self.process_inner(transcript, language, names, channel)
            .instrument(span)
            .await
    }

    async fn process_inner(
        &self,
        transcript: &str,
        language: &str,
        names: &NameMapping,
        channel: &str,
    ) -> Verdict {
        info!(
            "Processing {} chars, language={}, channel={}",
            transcript.chars().count(),
            language,
            channel
        );

        if !self.config.normalizer.channel_enabled(channel) {
            info!("Channel {:?} is not processed, skipping", channel);
            return Verdict::unflagged(ServiceUsed::Skipped, Timings::default());
        }

        let anonymized = anonymize(transcript, names, &self.config.normalizer);
        if anonymized.trim().is_empty() {
            info!("Empty transcript, nothing to match");
            return Verdict::unflagged(ServiceUsed::None, Timings::default());
        }

        let start = Instant::now();
        let translated = match self.config.languages.resolve(language) {
            Some(lang) => self
                .orchestrator
                .translate(&anonymized, lang)
                .await
                .map(|result| {
                    let text = if lang.is_english() {
                        result.text
                    } else {
                        apply_safety_nets(&anonymized, &result.text, lang, &self.safety_nets)
                    };
                    (text, result.service_used)
                }),
            None => {
                warn!("{}", TranslationError::UnsupportedLanguage(language.to_string()));
                None
            }
        };
        let translation_time = start.elapsed().as_secs_f64();

        let Some((english, service_used)) = translated else {
            return self.translation_failed(translation_time);
        };

        let start = Instant::now();
        let messages = segment(&english, &self.config.normalizer);
        let sentences = customer_sentences(&messages);
        let matches = match_sentences(&sentences, &self.rules);
        let (flagged, flags) = aggregate(&matches);
        let timings = Timings {
            translation: translation_time,
            matching: start.elapsed().as_secs_f64(),
        };

        info!(
            "{} messages, {} customer sentences, {} rule matches, {} flagged sentences ({:.2}s total)",
            messages.len(),
            sentences.len(),
            matches.len(),
            flags.len(),
            timings.total()
        );

        Verdict {
            flagged,
            flags,
            translation_service_used: service_used,
            degraded: false,
            timings,
        }
    }

    fn translation_failed(&self, translation_time: f64) -> Verdict {
        let flagged = match self.config.translation.on_failure {
            FailurePolicy::FailOpen => false,
            FailurePolicy::FlagForReview => true,
        };
        warn!(
            "Translation failed, reporting flagged={} ({:?})",
            flagged, self.config.translation.on_failure
        );

        Verdict {
            flagged,
            flags: vec![],
            translation_service_used: ServiceUsed::Failed,
            degraded: true,
            timings: Timings {
                translation: translation_time,
                matching: 0.0,
            },
        }
    }
}
