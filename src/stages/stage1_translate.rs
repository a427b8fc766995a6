use std::sync::Arc;
use std::time::Instant;

use futures::stream::{self, StreamExt};
use regex::Regex;
use tracing::{debug, info, warn};

use crate::config::{ChunkingConfig, SafetyNetConfig, TranslationConfig};
use crate::error::{ConfigError, TranslationError};
use crate::llm::{check_generative_output, DeterministicTranslator, GenerativeTranslator};
use crate::models::{
    Chunk, Language, ServiceUsed, TranslationAttempt, TranslationResult, TranslationService,
};

/// Split text into ordered chunks no longer than `config.split_threshold`.
///
/// Text at or under `threshold` characters comes back as a single chunk.
/// Longer text is cut once at the rightmost boundary marker within
/// `threshold + lookahead` characters (or at `threshold` when there is none),
/// and each half is then sliced to the split cap. Whitespace-only pieces are
/// dropped. Lengths are in characters, not bytes.
pub fn chunk_text(text: &str, threshold: usize, config: &ChunkingConfig) -> Vec<Chunk> {
    let length = text.chars().count();
    let pieces: Vec<&str> = if length <= threshold {
        vec![text]
    } else {
        let window_end = byte_offset(text, threshold + config.lookahead);
        let split_at = config
            .markers
            .iter()
            .filter(|m| !m.is_empty())
            .filter_map(|m| text[..window_end].rfind(m.as_str()))
            .max()
            .unwrap_or_else(|| byte_offset(text, threshold));

        let (head, tail) = text.split_at(split_at);
        let cap = config.split_threshold.max(1);
        let mut pieces = slice_chars(head, cap);
        pieces.extend(slice_chars(tail, cap));
        pieces
    };

    pieces
        .into_iter()
        .filter(|p| !p.trim().is_empty())
        .enumerate()
        .map(|(index, text)| Chunk {
            index,
            text: text.to_string(),
        })
        .collect()
}

/// Byte offset of the `n`th character, clamped to the end of the string
fn byte_offset(text: &str, n: usize) -> usize {
    text.char_indices()
        .nth(n)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

fn slice_chars(text: &str, cap: usize) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let end = byte_offset(rest, cap);
        let (piece, tail) = rest.split_at(end);
        pieces.push(piece);
        rest = tail;
    }
    pieces
}

/// Two-tier translation into English with timeout, output checks and
/// all-or-nothing chunk fallback
pub struct TranslationOrchestrator {
    generative: Arc<dyn GenerativeTranslator>,
    deterministic: Arc<dyn DeterministicTranslator>,
    chunking: ChunkingConfig,
    translation: TranslationConfig,
}

impl TranslationOrchestrator {
    pub fn new(
        generative: Arc<dyn GenerativeTranslator>,
        deterministic: Arc<dyn DeterministicTranslator>,
        chunking: ChunkingConfig,
        translation: TranslationConfig,
    ) -> Self {
        Self {
            generative,
            deterministic,
            chunking,
            translation,
        }
    }

    /// Translate `text` into English.
    ///
    /// Returns `None` only when both tiers failed; backend errors are logged
    /// and recorded as attempts, never returned.
    pub async fn translate(&self, text: &str, language: &Language) -> Option<TranslationResult> {
        if language.is_english() {
            return Some(TranslationResult::untranslated(text));
        }

        let threshold = self.chunking.threshold_for(&language.code);
        let chunks = chunk_text(text, threshold, &self.chunking);

        info!(
            "Translating {} chars of {} ({} chunk(s), threshold {})",
            text.chars().count(),
            language.name,
            chunks.len(),
            threshold
        );

        let start = Instant::now();
        let outcome = match chunks.len() {
            0 => return Some(TranslationResult::untranslated(text)),
            1 => self.translate_single(text, language).await,
            _ => self.translate_chunks(&chunks, language).await,
        };
        let elapsed_seconds = start.elapsed().as_secs_f64();

        match outcome {
            (Some((text, service_used)), attempts) => {
                info!("Translation via {} in {:.2}s", service_used, elapsed_seconds);
                Some(TranslationResult {
                    text,
                    service_used,
                    elapsed_seconds,
                    attempts,
                })
            }
            (None, _) => {
                warn!(
                    "All translation tiers failed for {} after {:.2}s",
                    language.name, elapsed_seconds
                );
                None
            }
        }
    }

    async fn translate_single(
        &self,
        text: &str,
        language: &Language,
    ) -> (Option<(String, ServiceUsed)>, Vec<TranslationAttempt>) {
        let mut attempts = Vec::with_capacity(2);

        let start = Instant::now();
        let generative = self.generative_checked(text, language).await;
        let duration = start.elapsed().as_secs_f64();
        match generative {
            Ok(output) => {
                attempts.push(succeeded(TranslationService::Generative, &output, duration));
                return (Some((output, ServiceUsed::Generative(language.model))), attempts);
            }
            Err(e) => {
                warn!("Generative translation failed, falling back: {}", e);
                attempts.push(failed(TranslationService::Generative, &e, duration));
            }
        }

        let start = Instant::now();
        let deterministic = self.deterministic.translate(text, &language.code).await;
        let duration = start.elapsed().as_secs_f64();
        match deterministic {
            Ok(output) => {
                attempts.push(succeeded(TranslationService::Deterministic, &output, duration));
                (Some((output, ServiceUsed::Deterministic)), attempts)
            }
            Err(e) => {
                warn!("Deterministic translation failed: {}", e);
                attempts.push(failed(TranslationService::Deterministic, &e, duration));
                (None, attempts)
            }
        }
    }

    async fn translate_chunks(
        &self,
        chunks: &[Chunk],
        language: &Language,
    ) -> (Option<(String, ServiceUsed)>, Vec<TranslationAttempt>) {
        let mut attempts = Vec::with_capacity(2);
        let workers = self.chunking.max_workers.max(1);

        let start = Instant::now();
        let outputs: Vec<Result<String, TranslationError>> = stream::iter(chunks)
            .map(|chunk| self.generative_checked(&chunk.text, language))
            .buffered(workers)
            .collect()
            .await;
        let duration = start.elapsed().as_secs_f64();

        match join_chunks(outputs) {
            Ok(text) => {
                attempts.push(succeeded(TranslationService::Generative, &text, duration));
                return (Some((text, ServiceUsed::Generative(language.model))), attempts);
            }
            Err(e) => {
                warn!(
                    "Generative chunk translation failed, retranslating all {} chunks: {}",
                    chunks.len(),
                    e
                );
                attempts.push(failed(TranslationService::Generative, &e, duration));
            }
        }

        let start = Instant::now();
        let outputs: Vec<Result<String, TranslationError>> = stream::iter(chunks)
            .map(|chunk| self.deterministic.translate(&chunk.text, &language.code))
            .buffered(workers)
            .collect()
            .await;
        let duration = start.elapsed().as_secs_f64();

        match join_chunks(outputs) {
            Ok(text) => {
                attempts.push(succeeded(TranslationService::Deterministic, &text, duration));
                (Some((text, ServiceUsed::Deterministic)), attempts)
            }
            Err(e) => {
                warn!("Deterministic chunk translation failed: {}", e);
                attempts.push(failed(TranslationService::Deterministic, &e, duration));
                (None, attempts)
            }
        }
    }

    /// Generative call raced against the timeout, with its output checked
    async fn generative_checked(
        &self,
        text: &str,
        language: &Language,
    ) -> Result<String, TranslationError> {
        let output = self.generative_with_timeout(text, language).await?;
        check_generative_output(&output, text, &self.translation)
            .map_err(|reason| TranslationError::Rejected(reason.to_string()))
    }

    async fn generative_with_timeout(
        &self,
        text: &str,
        language: &Language,
    ) -> Result<String, TranslationError> {
        let translator = Arc::clone(&self.generative);
        let owned_text = text.to_string();
        let owned_language = language.clone();
        let mut handle = tokio::spawn(async move {
            translator
                .translate(&owned_text, &owned_language, owned_language.model)
                .await
        });

        let timeout = self.translation.generative_timeout();
        match tokio::time::timeout(timeout, &mut handle).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(TranslationError::TaskFailed(e.to_string())),
            Err(_) => {
                // the task may still finish; aborting drops whatever it produces
                handle.abort();
                Err(TranslationError::Timeout(timeout.as_secs_f64()))
            }
        }
    }
}

/// Join chunk outputs in chunk order, failing on the first failed chunk
fn join_chunks(outputs: Vec<Result<String, TranslationError>>) -> Result<String, TranslationError> {
    let total = outputs.len();
    let mut texts = Vec::with_capacity(total);
    let mut first_error = None;

    for (index, output) in outputs.into_iter().enumerate() {
        match output {
            Ok(text) => texts.push(text),
            Err(e) => {
                debug!("Chunk {} failed: {}", index, e);
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        Some(e) => {
            debug!("{} of {} chunks translated", texts.len(), total);
            Err(e)
        }
        None => Ok(texts.join(" ")),
    }
}

fn succeeded(service: TranslationService, text: &str, duration: f64) -> TranslationAttempt {
    TranslationAttempt {
        service,
        text: Some(text.to_string()),
        duration,
        error: None,
    }
}

fn failed(service: TranslationService, error: &TranslationError, duration: f64) -> TranslationAttempt {
    TranslationAttempt {
        service,
        text: None,
        duration,
        error: Some(error.to_string()),
    }
}

/// A safety net with its source patterns compiled
#[derive(Debug, Clone)]
pub struct SafetyNet {
    pub config: SafetyNetConfig,
    pattern: Regex,
}

impl SafetyNet {
    pub fn new(config: SafetyNetConfig) -> Result<Self, ConfigError> {
        let pattern = config.compile()?;
        Ok(Self { config, pattern })
    }

    fn applies_to(&self, language: &Language) -> bool {
        self.config.language.eq_ignore_ascii_case(&language.code)
    }
}

/// Append a canonical customer sentence when a known term in the source did
/// not survive translation.
///
/// Runs on the full translated text, before segmentation.
pub fn apply_safety_nets(
    source: &str,
    translated: &str,
    language: &Language,
    nets: &[SafetyNet],
) -> String {
    let mut text = translated.to_string();

    for net in nets.iter().filter(|n| n.applies_to(language)) {
        if !net.pattern.is_match(source) {
            continue;
        }
        if text
            .to_lowercase()
            .contains(&net.config.canonical_phrase.to_lowercase())
        {
            continue;
        }

        info!(
            "Safety net for {}: appending {:?}",
            language.code, net.config.sentence
        );
        text = format!("{} {}", text.trim_end(), net.config.sentence);
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GenerativeModel;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Generative fake: `EN[text]` after a per-text delay, failing on texts
    /// containing `fail_on`, or always answering `reply` when set
    struct FakeGenerative {
        delay_ms: fn(&str) -> u64,
        fail_on: Option<&'static str>,
        reply: Option<&'static str>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        completed: AtomicUsize,
    }

    impl FakeGenerative {
        fn new() -> Self {
            Self {
                delay_ms: |_| 1,
                fail_on: None,
                reply: None,
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
                completed: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl GenerativeTranslator for FakeGenerative {
        async fn translate(
            &self,
            text: &str,
            _language: &Language,
            _model: GenerativeModel,
        ) -> Result<String, TranslationError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis((self.delay_ms)(text))).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.completed.fetch_add(1, Ordering::SeqCst);

            if let Some(marker) = self.fail_on {
                if text.contains(marker) {
                    return Err(TranslationError::Backend("boom".to_string()));
                }
            }
            Ok(match self.reply {
                Some(reply) => reply.to_string(),
                None => format!("EN[{}]", text),
            })
        }
    }

    struct FakeDeterministic {
        fail: bool,
        calls: AtomicUsize,
    }

    impl FakeDeterministic {
        fn new(fail: bool) -> Self {
            Self {
                fail,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl DeterministicTranslator for FakeDeterministic {
        async fn translate(
            &self,
            text: &str,
            _source_language_code: &str,
        ) -> Result<String, TranslationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(TranslationError::Backend("mt down".to_string()));
            }
            Ok(format!("MT[{}]", text))
        }
    }

    fn spanish() -> Language {
        Language::new("Spanish", "es", GenerativeModel::Primary)
    }

    fn small_chunks() -> ChunkingConfig {
        ChunkingConfig {
            default_threshold: 10,
            language_thresholds: Default::default(),
            split_threshold: 10,
            lookahead: 0,
            max_workers: 3,
            markers: vec![],
        }
    }

    fn orchestrator(
        generative: Arc<FakeGenerative>,
        deterministic: Arc<FakeDeterministic>,
        chunking: ChunkingConfig,
        timeout_secs: f64,
    ) -> TranslationOrchestrator {
        let translation = TranslationConfig {
            generative_timeout_secs: timeout_secs,
            ..TranslationConfig::default()
        };
        TranslationOrchestrator::new(generative, deterministic, chunking, translation)
    }

    #[test]
    fn test_short_text_is_one_chunk() {
        let chunks = chunk_text("CUSTOMER: hola", 2500, &ChunkingConfig::default());
        assert_eq!(
            chunks,
            vec![Chunk {
                index: 0,
                text: "CUSTOMER: hola".to_string()
            }]
        );
    }

    #[test]
    fn test_split_at_rightmost_marker() {
        let config = ChunkingConfig {
            lookahead: 10,
            split_threshold: 100,
            markers: vec!["AGENT:".to_string()],
            ..ChunkingConfig::default()
        };
        let text = "CUSTOMER: aaaa bbbb AGENT: cccc dddd eeee";

        let chunks = chunk_text(text, 20, &config);

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["CUSTOMER: aaaa bbbb ", "AGENT: cccc dddd eeee"]);
    }

    #[test]
    fn test_split_without_marker_respects_cap() {
        let config = ChunkingConfig {
            lookahead: 10,
            split_threshold: 15,
            markers: vec!["AGENT:".to_string()],
            ..ChunkingConfig::default()
        };
        let text = "x".repeat(50);

        let chunks = chunk_text(&text, 20, &config);

        let lengths: Vec<usize> = chunks.iter().map(Chunk::char_len).collect();
        assert_eq!(lengths, vec![15, 5, 15, 15]);
        let indices: Vec<usize> = chunks.iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
        assert_eq!(chunks.iter().map(|c| c.text.as_str()).collect::<String>(), text);
    }

    #[test]
    fn test_whitespace_chunks_dropped() {
        let config = ChunkingConfig {
            lookahead: 0,
            split_threshold: 15,
            markers: vec![],
            ..ChunkingConfig::default()
        };
        let text = format!("{}{}{}", "a".repeat(20), " ".repeat(15), "b".repeat(5));

        let chunks = chunk_text(&text, 20, &config);

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["a".repeat(15), "a".repeat(5), "b".repeat(5)]);
        assert_eq!(chunks[2].index, 2);
    }

    #[test]
    fn test_chunking_counts_characters() {
        let text = "λ".repeat(25);
        let chunks = chunk_text(&text, 10, &small_chunks());

        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.char_len() <= 10));
        assert_eq!(chunks.iter().map(|c| c.text.as_str()).collect::<String>(), text);
    }

    #[tokio::test]
    async fn test_english_is_passed_through() {
        let generative = Arc::new(FakeGenerative::new());
        let deterministic = Arc::new(FakeDeterministic::new(false));
        let orch = orchestrator(generative.clone(), deterministic.clone(), ChunkingConfig::default(), 1.0);
        let english = Language::new("English", "en", GenerativeModel::Primary);

        let result = orch.translate("CUSTOMER: hi", &english).await.unwrap();

        assert_eq!(result.text, "CUSTOMER: hi");
        assert_eq!(result.service_used, ServiceUsed::None);
        assert_eq!(generative.completed.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_single_shot_generative() {
        let generative = Arc::new(FakeGenerative::new());
        let deterministic = Arc::new(FakeDeterministic::new(false));
        let orch = orchestrator(generative, deterministic.clone(), ChunkingConfig::default(), 1.0);

        let result = orch.translate("CUSTOMER: hola", &spanish()).await.unwrap();

        assert_eq!(result.text, "EN[CUSTOMER: hola]");
        assert_eq!(result.service_used, ServiceUsed::Generative(GenerativeModel::Primary));
        assert_eq!(deterministic.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_timeout_falls_back_and_discards_late_result() {
        let generative = Arc::new(FakeGenerative {
            delay_ms: |_| 2_000,
            ..FakeGenerative::new()
        });
        let deterministic = Arc::new(FakeDeterministic::new(false));
        let orch = orchestrator(generative.clone(), deterministic, ChunkingConfig::default(), 0.05);

        let result = orch.translate("CUSTOMER: hola", &spanish()).await.unwrap();

        assert_eq!(result.text, "MT[CUSTOMER: hola]");
        assert_eq!(result.service_used, ServiceUsed::Deterministic);
        assert_eq!(result.attempts.len(), 2);
        assert!(result.attempts[0].error.as_deref().unwrap().contains("timed out"));

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(generative.completed.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_refusal_falls_back() {
        let generative = Arc::new(FakeGenerative {
            reply: Some("Sorry - this model is unable to respond to this request."),
            ..FakeGenerative::new()
        });
        let deterministic = Arc::new(FakeDeterministic::new(false));
        let orch = orchestrator(generative, deterministic, ChunkingConfig::default(), 1.0);

        let result = orch.translate("CUSTOMER: hola", &spanish()).await.unwrap();

        assert_eq!(result.service_used, ServiceUsed::Deterministic);
        assert!(result.attempts[0].error.as_deref().unwrap().contains("refusal"));
    }

    #[tokio::test]
    async fn test_chunks_reassembled_in_order() {
        // pseudo-random per-chunk delays so completion order differs from chunk order
        let generative = Arc::new(FakeGenerative {
            delay_ms: |text| text.bytes().map(u64::from).sum::<u64>() * 7919 % 40,
            ..FakeGenerative::new()
        });
        let deterministic = Arc::new(FakeDeterministic::new(false));
        let orch = orchestrator(generative.clone(), deterministic.clone(), small_chunks(), 1.0);
        let text = "una cosa, dos cosas, tres gatos, cuatro perros, cinco casas, seis";

        let result = orch.translate(text, &spanish()).await.unwrap();

        let expected: Vec<String> = chunk_text(text, 10, &small_chunks())
            .iter()
            .map(|c| format!("EN[{}]", c.text))
            .collect();
        assert!(expected.len() > 3);
        assert_eq!(result.text, expected.join(" "));
        assert_eq!(result.service_used, ServiceUsed::Generative(GenerativeModel::Primary));
        assert!(generative.max_in_flight.load(Ordering::SeqCst) <= 3);
        assert_eq!(deterministic.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_one_failed_chunk_retranslates_every_chunk() {
        let generative = Arc::new(FakeGenerative {
            fail_on: Some("FAIL"),
            ..FakeGenerative::new()
        });
        let deterministic = Arc::new(FakeDeterministic::new(false));
        let orch = orchestrator(generative, deterministic.clone(), small_chunks(), 1.0);

        let result = orch
            .translate("aaaaaaaaaaFAILbbbbbbcccccccccc", &spanish())
            .await
            .unwrap();

        assert_eq!(result.service_used, ServiceUsed::Deterministic);
        assert_eq!(result.text, "MT[aaaaaaaaaa] MT[FAILbbbbbb] MT[cccccccccc]");
        assert!(!result.text.contains("EN["));
        assert_eq!(deterministic.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_both_tiers_failing_is_none() {
        let generative = Arc::new(FakeGenerative {
            fail_on: Some("a"),
            ..FakeGenerative::new()
        });
        let deterministic = Arc::new(FakeDeterministic::new(true));

        let single = orchestrator(generative.clone(), deterministic.clone(), ChunkingConfig::default(), 1.0);
        assert!(single.translate("hola amiga", &spanish()).await.is_none());

        let chunked = orchestrator(generative, deterministic, small_chunks(), 1.0);
        assert!(chunked.translate("aaaaaaaaaabbbbbbbbbbaaaa", &spanish()).await.is_none());
    }

    fn spanish_nets() -> Vec<SafetyNet> {
        vec![SafetyNet::new(SafetyNetConfig::spanish_addiction()).unwrap()]
    }

    #[test]
    fn test_safety_net_appends_sentence() {
        let nets = spanish_nets();

        let out = apply_safety_nets(
            "CUSTOMER: creo que soy Ludópata",
            "CUSTOMER: I think I am a gambler",
            &spanish(),
            &nets,
        );

        assert_eq!(out, "CUSTOMER: I think I am a gambler CUSTOMER: I am addicted");
    }

    #[test]
    fn test_safety_net_skips_when_phrase_present_or_other_language() {
        let nets = spanish_nets();

        let out = apply_safety_nets(
            "CUSTOMER: estoy enganchado",
            "CUSTOMER: I am addicted to it",
            &spanish(),
            &nets,
        );
        assert_eq!(out, "CUSTOMER: I am addicted to it");

        let german = Language::new("German", "de", GenerativeModel::Primary);
        let out = apply_safety_nets("ludopata", "gambler", &german, &nets);
        assert_eq!(out, "gambler");
    }

    #[test]
    fn test_safety_net_rejects_broken_pattern() {
        let mut config = SafetyNetConfig::spanish_addiction();
        config.source_patterns.push("(broken".to_string());

        assert!(matches!(SafetyNet::new(config), Err(ConfigError::Invalid(_))));
    }
}
