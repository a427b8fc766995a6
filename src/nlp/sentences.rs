use std::collections::HashSet;

use once_cell::sync::Lazy;

static ABBREVIATIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "vs", "etc", "e.g", "i.e", "no",
        "approx", "dept", "inc", "ltd", "co",
    ]
    .into_iter()
    .collect()
});

const TERMINALS: &[char] = &['.', '!', '?'];
const CLOSERS: &[char] = &['"', '\'', ')', ']', '\u{201D}', '\u{2019}'];

/// Split text into sentences on terminal punctuation followed by whitespace
pub fn split_sentences(text: &str) -> Vec<String> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut sentences = Vec::new();
    let mut start = 0usize;
    let mut i = 0usize;

    while i < chars.len() {
        let (_, c) = chars[i];
        if !TERMINALS.contains(&c) {
            i += 1;
            continue;
        }

        let punct_start = i;
        while i < chars.len() && (TERMINALS.contains(&chars[i].1) || CLOSERS.contains(&chars[i].1)) {
            i += 1;
        }

        let at_end = i == chars.len();
        let before_space = !at_end && chars[i].1.is_whitespace();
        if !(at_end || before_space) {
            continue;
        }

        let end_byte = if at_end { text.len() } else { chars[i].0 };
        if chars[punct_start].1 == '.' && is_abbreviation(&text[start..chars[punct_start].0]) {
            continue;
        }

        push_sentence(&mut sentences, &text[start..end_byte]);
        start = end_byte;
    }

    push_sentence(&mut sentences, &text[start..]);
    sentences
}

fn push_sentence(sentences: &mut Vec<String>, candidate: &str) {
    let trimmed = candidate.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }
}

/// Whether the word right before a period is an abbreviation or an initial
fn is_abbreviation(before: &str) -> bool {
    let last_word = before
        .rsplit(|c: char| c.is_whitespace() || c == '(')
        .next()
        .unwrap_or("");
    if last_word.is_empty() {
        return false;
    }
    let lower = last_word.to_lowercase();
    let single_initial = last_word.chars().count() == 1
        && last_word.chars().all(|c| c.is_uppercase());
    single_initial || ABBREVIATIONS.contains(lower.as_str())
}
