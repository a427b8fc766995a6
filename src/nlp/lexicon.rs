//! Closed word lists used by the tagger and lemmatizer

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;

use super::pos::Tag;

static DETERMINERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "an", "the", "this", "that", "these", "those", "my", "your", "his", "her", "its",
        "our", "their", "some", "any", "no", "every", "each", "all", "both", "another", "much",
        "many", "more", "most", "few", "several", "such",
    ]
    .into_iter()
    .collect()
});

static PRONOUNS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "i", "me", "you", "he", "him", "she", "it", "we", "us", "they", "them", "myself",
        "yourself", "himself", "herself", "itself", "ourselves", "themselves", "mine", "yours",
        "hers", "ours", "theirs", "who", "whom", "whose", "what", "which", "something",
        "anything", "nothing", "everything", "someone", "anyone", "everyone", "somebody",
        "anybody", "nobody",
    ]
    .into_iter()
    .collect()
});

static SUBJECT_PRONOUNS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["i", "you", "we", "they", "he", "she", "it"].into_iter().collect());

static PREPOSITIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "of", "in", "on", "at", "by", "for", "with", "about", "against", "between", "into",
        "through", "during", "before", "after", "above", "below", "from", "up", "down", "out",
        "off", "over", "under", "since", "until", "without", "within", "per", "via", "towards",
        "upon", "across", "behind", "like",
    ]
    .into_iter()
    .collect()
});

static CONJUNCTIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "and", "or", "but", "nor", "so", "yet", "because", "if", "when", "while", "although",
        "though", "unless", "whether", "than", "then",
    ]
    .into_iter()
    .collect()
});

static MODALS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "can", "could", "will", "would", "shall", "should", "may", "might", "must", "ca", "wo",
        "ll", "d",
    ]
    .into_iter()
    .collect()
});

static ADVERBS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "not", "n", "t", "very", "really", "never", "always", "just", "too", "also", "again",
        "already", "still", "even", "only", "now", "here", "there", "often", "sometimes",
        "soon", "almost", "quite", "ever", "please", "yes", "no", "ok", "okay", "well",
        "anymore", "maybe", "why", "how", "where",
    ]
    .into_iter()
    .collect()
});

static BE_FORMS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["am", "is", "are", "was", "were", "be", "been", "being", "m", "re", "get", "got", "feel", "felt"]
        .into_iter()
        .collect()
});

/// Words ending in -ly that are not adverbs
static LY_NOUNS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["family", "reply", "supply", "apply", "rely", "ally", "belly", "bully", "ugly", "july", "italy"]
        .into_iter()
        .collect()
});

/// Base verbs whose surface form looks inflected
static BASE_VERBS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "need", "feed", "proceed", "succeed", "exceed", "bleed", "speed", "bring", "sing",
        "ring", "string", "cling", "fling", "sting", "swing",
    ]
    .into_iter()
    .collect()
});

/// Irregular verb forms with their lemma and inflection
static IRREGULAR_VERBS: Lazy<HashMap<&'static str, (&'static str, Tag)>> = Lazy::new(|| {
    use Tag::*;
    [
        ("am", "be", Verb),
        ("is", "be", Verb3rd),
        ("are", "be", Verb),
        ("was", "be", VerbPast),
        ("were", "be", VerbPast),
        ("been", "be", VerbParticiple),
        ("being", "be", VerbGerund),
        ("m", "be", Verb),
        ("re", "be", Verb),
        ("has", "have", Verb3rd),
        ("had", "have", VerbPast),
        ("having", "have", VerbGerund),
        ("does", "do", Verb3rd),
        ("did", "do", VerbPast),
        ("done", "do", VerbParticiple),
        ("doing", "do", VerbGerund),
        ("went", "go", VerbPast),
        ("gone", "go", VerbParticiple),
        ("lost", "lose", VerbPast),
        ("won", "win", VerbPast),
        ("spent", "spend", VerbPast),
        ("paid", "pay", VerbPast),
        ("made", "make", VerbPast),
        ("got", "get", VerbPast),
        ("gotten", "get", VerbParticiple),
        ("felt", "feel", VerbPast),
        ("kept", "keep", VerbPast),
        ("left", "leave", VerbPast),
        ("took", "take", VerbPast),
        ("taken", "take", VerbParticiple),
        ("gave", "give", VerbPast),
        ("given", "give", VerbParticiple),
        ("said", "say", VerbPast),
        ("thought", "think", VerbPast),
        ("told", "tell", VerbPast),
        ("became", "become", VerbPast),
        ("began", "begin", VerbPast),
        ("begun", "begin", VerbParticiple),
        ("came", "come", VerbPast),
        ("saw", "see", VerbPast),
        ("seen", "see", VerbParticiple),
        ("knew", "know", VerbPast),
        ("known", "know", VerbParticiple),
        ("ran", "run", VerbPast),
        ("sold", "sell", VerbPast),
        ("bought", "buy", VerbPast),
        ("borrowed", "borrow", VerbPast),
        ("stole", "steal", VerbPast),
        ("stolen", "steal", VerbParticiple),
        ("quit", "quit", VerbPast),
        ("lent", "lend", VerbPast),
        ("owed", "owe", VerbPast),
        ("wrote", "write", VerbPast),
        ("written", "write", VerbParticiple),
    ]
    .into_iter()
    .map(|(form, lemma, tag)| (form, (lemma, tag)))
    .collect()
});

static IRREGULAR_NOUNS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("men", "man"),
        ("women", "woman"),
        ("children", "child"),
        ("feet", "foot"),
        ("teeth", "tooth"),
        ("mice", "mouse"),
        ("lives", "life"),
        ("wives", "wife"),
        ("knives", "knife"),
        ("halves", "half"),
        ("selves", "self"),
    ]
    .into_iter()
    .collect()
});

static IRREGULAR_ADJECTIVES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [("better", "good"), ("best", "good"), ("worse", "bad"), ("worst", "bad")]
        .into_iter()
        .collect()
});

/// Tag for words whose part of speech does not depend on context
pub fn closed_class(word: &str) -> Option<Tag> {
    if word == "to" {
        Some(Tag::To)
    } else if MODALS.contains(word) {
        Some(Tag::Modal)
    } else if PRONOUNS.contains(word) {
        Some(Tag::Pronoun)
    } else if DETERMINERS.contains(word) {
        Some(Tag::Determiner)
    } else if PREPOSITIONS.contains(word) {
        Some(Tag::Preposition)
    } else if CONJUNCTIONS.contains(word) {
        Some(Tag::Conjunction)
    } else if ADVERBS.contains(word) {
        Some(Tag::Adverb)
    } else {
        None
    }
}

/// Function words are never inflected by the lemmatizer
pub fn is_function_word(word: &str) -> bool {
    word == "to"
        || MODALS.contains(word)
        || PRONOUNS.contains(word)
        || DETERMINERS.contains(word)
        || PREPOSITIONS.contains(word)
        || CONJUNCTIONS.contains(word)
        || ADVERBS.contains(word)
}

/// Copular verbs after which a participle reads as an adjective
pub fn is_copula(word: &str) -> bool {
    BE_FORMS.contains(word)
}

pub fn is_subject_pronoun(word: &str) -> bool {
    SUBJECT_PRONOUNS.contains(word)
}

pub fn is_ly_noun(word: &str) -> bool {
    LY_NOUNS.contains(word)
}

pub fn is_base_verb(word: &str) -> bool {
    BASE_VERBS.contains(word)
}

pub fn irregular_verb(word: &str) -> Option<(&'static str, Tag)> {
    IRREGULAR_VERBS.get(word).copied()
}

pub fn irregular_noun(word: &str) -> Option<&'static str> {
    IRREGULAR_NOUNS.get(word).copied()
}

pub fn irregular_adjective(word: &str) -> Option<&'static str> {
    IRREGULAR_ADJECTIVES.get(word).copied()
}
