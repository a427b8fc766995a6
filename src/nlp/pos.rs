use super::lexicon;

/// Coarse part-of-speech tag, loosely following the Penn Treebank split
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Noun,
    PluralNoun,
    Verb,
    Verb3rd,
    VerbPast,
    VerbParticiple,
    VerbGerund,
    Adjective,
    Adverb,
    Pronoun,
    Determiner,
    Preposition,
    Conjunction,
    Modal,
    To,
    Number,
}

/// The four categories the lemmatizer distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordClass {
    Adjective,
    Verb,
    Noun,
    Adverb,
}

impl Tag {
    /// Map to a lemmatizer category; anything unrecognised counts as a noun
    pub fn word_class(self) -> WordClass {
        match self {
            Tag::Adjective => WordClass::Adjective,
            Tag::Verb | Tag::Verb3rd | Tag::VerbPast | Tag::VerbParticiple | Tag::VerbGerund => {
                WordClass::Verb
            }
            Tag::Adverb => WordClass::Adverb,
            _ => WordClass::Noun,
        }
    }
}

const ADJECTIVE_SUFFIXES: &[&str] = &["ous", "ful", "ive", "able", "ible", "less", "ish"];

/// Tag lowercased words left to right, using the previous content word as context
pub fn tag(words: &[String]) -> Vec<Tag> {
    let mut tags: Vec<Tag> = Vec::with_capacity(words.len());

    for (i, word) in words.iter().enumerate() {
        // Adverbs are transparent: "i really need" tags "need" as if after "i"
        let context = (0..i).rev().find(|&j| tags[j] != Tag::Adverb);
        let prev_word = context.map(|j| words[j].as_str());
        let prev_tag = context.map(|j| tags[j]);
        tags.push(tag_word(word, prev_word, prev_tag));
    }

    tags
}

fn tag_word(word: &str, prev_word: Option<&str>, prev_tag: Option<Tag>) -> Tag {
    if let Some(tag) = lexicon::closed_class(word) {
        return tag;
    }
    if word.chars().all(|c| c.is_ascii_digit()) {
        return Tag::Number;
    }

    let after_copula = prev_word.is_some_and(lexicon::is_copula);

    if let Some((_, form)) = lexicon::irregular_verb(word) {
        if after_copula && matches!(form, Tag::VerbPast | Tag::VerbParticiple) {
            return Tag::Adjective;
        }
        return form;
    }

    let len = word.chars().count();

    if len > 4 && word.ends_with("ly") && !lexicon::is_ly_noun(word) {
        return Tag::Adverb;
    }

    if after_copula {
        if len > 4 && word.ends_with("ing") {
            return Tag::VerbGerund;
        }
        if len > 3 && (word.ends_with("ed") || word.ends_with("en")) {
            return Tag::Adjective;
        }
    }

    if matches!(prev_tag, Some(Tag::Modal | Tag::To)) && !word.ends_with("ing") {
        return Tag::Verb;
    }

    if let Some(subject) = prev_word.filter(|w| lexicon::is_subject_pronoun(w)) {
        if len > 3 && word.ends_with("ed") {
            return Tag::VerbPast;
        }
        let third_person = matches!(subject, "he" | "she" | "it");
        if third_person && word.ends_with('s') && !word.ends_with("ss") {
            return Tag::Verb3rd;
        }
        if !word.ends_with("ing") {
            return Tag::Verb;
        }
    }

    if matches!(prev_tag, Some(Tag::Determiner | Tag::Adjective)) {
        return noun_tag(word);
    }

    if ADJECTIVE_SUFFIXES.iter().any(|s| word.ends_with(s)) && len > 5 {
        return Tag::Adjective;
    }
    if len > 4 && word.ends_with("ing") {
        // bare gerunds ("betting is ruining me") behave as nouns
        return Tag::Noun;
    }
    if len > 3 && word.ends_with("ed") {
        return Tag::VerbPast;
    }

    noun_tag(word)
}

fn noun_tag(word: &str) -> Tag {
    let plural = word.chars().count() > 3
        && word.ends_with('s')
        && !(word.ends_with("ss") || word.ends_with("us") || word.ends_with("is"));
    if plural { Tag::PluralNoun } else { Tag::Noun }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags_for(sentence: &str) -> Vec<Tag> {
        let words: Vec<String> = sentence.split_whitespace().map(str::to_string).collect();
        tag(&words)
    }

    #[test]
    fn test_predicative_participle_is_adjective() {
        let tags = tags_for("i am addicted to betting");
        assert_eq!(
            tags,
            vec![Tag::Pronoun, Tag::Verb, Tag::Adjective, Tag::To, Tag::Noun]
        );
    }

    #[test]
    fn test_progressive_is_verb() {
        let tags = tags_for("i am losing money");
        assert_eq!(tags[2], Tag::VerbGerund);
    }

    #[test]
    fn test_subject_context_through_adverb() {
        let tags = tags_for("she really bets");
        assert_eq!(tags[1], Tag::Adverb);
        assert_eq!(tags[2], Tag::Verb3rd);
    }

    #[test]
    fn test_irregular_past() {
        let tags = tags_for("i lost everything");
        assert_eq!(tags[1], Tag::VerbPast);
    }

    #[test]
    fn test_determiner_forces_noun() {
        let tags = tags_for("the bets");
        assert_eq!(tags[1], Tag::PluralNoun);
    }

    #[test]
    fn test_word_class_defaults_to_noun() {
        assert_eq!(Tag::Preposition.word_class(), WordClass::Noun);
        assert_eq!(Tag::VerbGerund.word_class(), WordClass::Verb);
    }
}
