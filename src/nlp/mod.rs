//! Lexical normalization for rule matching
//!
//! Sentences are reduced to lowercase lemmas so that rule keywords match
//! inflected forms ("bets", "betting" as a verb) without listing every variant.

pub mod lemma;
pub mod lexicon;
pub mod pos;
pub mod sentences;

pub use lemma::lemmatize;
pub use pos::{Tag, WordClass};
pub use sentences::split_sentences;

use once_cell::sync::Lazy;
use regex::Regex;

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").unwrap());

/// Lowercase word tokens of a sentence
pub fn tokenize(sentence: &str) -> Vec<String> {
    let lower = sentence.to_lowercase();
    WORD.find_iter(&lower).map(|m| m.as_str().to_string()).collect()
}

/// Tokenize, tag and lemmatize a sentence
pub fn normalize(sentence: &str) -> Vec<String> {
    let words = tokenize(sentence);
    let tags = pos::tag(&words);
    words
        .iter()
        .zip(tags)
        .map(|(word, tag)| lemmatize(word, tag.word_class()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_drops_punctuation() {
        assert_eq!(
            tokenize("I can't STOP, really!"),
            vec!["i", "can", "t", "stop", "really"]
        );
    }

    #[test]
    fn test_normalize_sentence() {
        assert_eq!(
            normalize("I am addicted to betting"),
            vec!["i", "be", "addicted", "to", "betting"]
        );
        assert_eq!(
            normalize("I lost all my savings on the bets"),
            vec!["i", "lose", "all", "my", "saving", "on", "the", "bet"]
        );
    }

    #[test]
    fn test_normalize_is_repeatable() {
        let sentence = "She keeps gambling and losing thousands.";
        assert_eq!(normalize(sentence), normalize(sentence));
    }

    #[test]
    fn test_normalize_is_idempotent_on_lemmas() {
        let corpus = [
            "I lost all my savings on the bets",
            "I closed my account",
            "I am closing my account",
            "She refused the payments",
            "He caused problems and raised his limits",
            "We were betting every week",
            "I am addicted to betting",
        ];
        for sentence in corpus {
            let once = normalize(sentence);
            let twice = normalize(&once.join(" "));
            assert_eq!(once, twice, "{}", sentence);
        }
    }

    #[test]
    fn test_normalize_restores_silent_e() {
        assert_eq!(normalize("I closed my account"), vec!["i", "close", "my", "account"]);
        assert_eq!(
            normalize("She refused the payments"),
            vec!["she", "refuse", "the", "payment"]
        );
    }
}
