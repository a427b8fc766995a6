use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::debug;

use crate::config::NormalizerConfig;
use crate::models::{CustomerSentence, NameMapping, Role, TranscriptMessage};
use crate::nlp::split_sentences;

const TIMESTAMP: &str = r"\(\d{2}:\d{2}:\d{2}(?:\s[APM]{2})?\)";

static TIMESTAMP_ANYWHERE: Lazy<Regex> = Lazy::new(|| Regex::new(TIMESTAMP).unwrap());

/// A role token, capturing the timestamp in front of it and the colon after it
static ROLE_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"({}\s)?\b(CUSTOMER|AGENT|BOT)\b(:)?", TIMESTAMP)).unwrap()
});

/// A speaker turn: optional timestamp, role token, optional colon
static TURN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?:{}\s*)?\b(CUSTOMER|AGENT|BOT)\b:?", TIMESTAMP)).unwrap()
});

static LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(CUSTOMER|AGENT|BOT):").unwrap());

const NO_PERIOD_NEEDED: &[char] = &['.', '!', '?', ':'];

/// Replace participant names with role tokens.
///
/// Each name matches as whole words, case-insensitively, on any run of its
/// constituent words ("Maria", "Silva" and "Maria Silva" all become one
/// token). A guarded role token that is a mention rather than a speaker turn
/// is removed: in timestamped transcripts a turn has a timestamp in front of
/// it, otherwise a turn is a `ROLE:` label.
pub fn anonymize(transcript: &str, names: &NameMapping, config: &NormalizerConfig) -> String {
    let mut entries: Vec<(&str, Role)> = names.iter().collect();
    // longest names first so overlapping names resolve the same way every time
    entries.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then(a.0.cmp(b.0)));

    let mut text = transcript.to_string();
    for (name, role) in entries {
        let Some(pattern) = name_pattern(name) else {
            continue;
        };
        text = pattern.replace_all(&text, role.token()).into_owned();
    }

    if !config.guarded_roles.is_empty() {
        let timestamped = TIMESTAMP_ANYWHERE.is_match(&text);
        text = strip_role_mentions(&text, &config.guarded_roles, timestamped);
    }

    text
}

fn name_pattern(name: &str) -> Option<Regex> {
    let parts: Vec<String> = name.split_whitespace().map(regex::escape).collect();
    if parts.is_empty() {
        return None;
    }
    let part = format!("(?:{})", parts.join("|"));
    Regex::new(&format!(r"(?i)\b{part}(?:\s+{part})*\b")).ok()
}

fn strip_role_mentions(text: &str, guarded: &[Role], timestamped: bool) -> String {
    ROLE_TOKEN
        .replace_all(text, |caps: &Captures| {
            let whole = caps.get(0).map_or("", |m| m.as_str());
            let is_turn = if timestamped {
                caps.get(1).is_some()
            } else {
                caps.get(3).is_some()
            };
            let guarded_role = caps
                .get(2)
                .and_then(|m| Role::from_token(m.as_str()))
                .is_some_and(|role| guarded.contains(&role));
            if guarded_role && !is_turn {
                String::new()
            } else {
                whole.to_string()
            }
        })
        .into_owned()
}

/// Put a sentence boundary in front of every speaker turn and normalize the
/// turn to a `ROLE:` label; timestamps in front of turns are dropped.
pub fn punctuate_turns(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    let mut last = 0;

    for caps in TURN.captures_iter(text) {
        let (Some(whole), Some(role)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        out.push_str(text[last..whole.start()].trim_end());
        if !out.is_empty() {
            if !out.ends_with(NO_PERIOD_NEEDED) {
                out.push('.');
            }
            out.push(' ');
        }
        out.push_str(role.as_str());
        out.push(':');
        last = whole.end();
    }

    out.push_str(&text[last..]);
    out.trim().to_string()
}

/// Split English text with role tokens into speaker-attributed messages.
///
/// Text before the first label has no speaker and is dropped. A transcript
/// with no `CUSTOMER:` label (or one marked as anonymous web chat) is treated
/// as a single customer message so unlabeled transcripts are still matched.
pub fn segment(text: &str, config: &NormalizerConfig) -> Vec<TranscriptMessage> {
    if text.trim().is_empty() {
        return vec![];
    }

    let punctuated = punctuate_turns(text);
    let mut messages = Vec::new();
    let mut current: Option<(Role, usize)> = None;
    let mut has_customer = false;

    for caps in LABEL.captures_iter(&punctuated) {
        let (Some(whole), Some(role)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if let Some((sender, start)) = current.take() {
            push_message(&mut messages, sender, &punctuated[start..whole.start()]);
        }
        current = Role::from_token(role.as_str()).map(|r| (r, whole.end()));
        // an empty customer turn still labels the transcript
        has_customer |= matches!(current, Some((Role::Customer, _)));
    }
    if let Some((sender, start)) = current {
        push_message(&mut messages, sender, &punctuated[start..]);
    }

    let anonymous = config
        .anonymous_markers
        .iter()
        .any(|marker| !marker.is_empty() && text.contains(marker.as_str()));

    if anonymous || !has_customer {
        debug!(
            "No labelled customer turns (anonymous={}), treating transcript as one customer message",
            anonymous
        );
        return vec![TranscriptMessage::new(Role::Customer, text.trim())];
    }

    messages
}

fn push_message(messages: &mut Vec<TranscriptMessage>, sender: Role, text: &str) {
    let text = text.trim();
    if !text.is_empty() {
        messages.push(TranscriptMessage::new(sender, text));
    }
}

/// Sentences spoken by the customer, in transcript order
pub fn customer_sentences(messages: &[TranscriptMessage]) -> Vec<CustomerSentence> {
    messages
        .iter()
        .filter(|m| m.is_customer())
        .flat_map(|m| split_sentences(&m.text))
        .map(CustomerSentence::new)
        .collect()
}
