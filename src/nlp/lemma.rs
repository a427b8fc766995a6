use super::lexicon;
use super::pos::WordClass;

/// Reduce a lowercased word to its dictionary form for the given class
pub fn lemmatize(word: &str, class: WordClass) -> String {
    if lexicon::is_function_word(word) {
        return word.to_string();
    }

    match class {
        WordClass::Noun => noun_lemma(word),
        WordClass::Verb => verb_lemma(word),
        WordClass::Adjective => lexicon::irregular_adjective(word)
            .map(str::to_string)
            .unwrap_or_else(|| word.to_string()),
        WordClass::Adverb => word.to_string(),
    }
}

fn noun_lemma(word: &str) -> String {
    if let Some(lemma) = lexicon::irregular_noun(word) {
        return lemma.to_string();
    }
    if word.chars().count() <= 3 || ["ss", "us", "is"].iter().any(|s| word.ends_with(s)) {
        return word.to_string();
    }
    if word.len() > 4 {
        if let Some(stem) = word.strip_suffix("ies") {
            return format!("{}y", stem);
        }
    }
    if ["sses", "xes", "zes", "ches", "shes"].iter().any(|s| word.ends_with(s)) {
        return word[..word.len() - 2].to_string();
    }
    word.strip_suffix('s').unwrap_or(word).to_string()
}

fn verb_lemma(word: &str) -> String {
    if let Some((lemma, _)) = lexicon::irregular_verb(word) {
        return lemma.to_string();
    }
    if word.chars().count() <= 3 || lexicon::is_base_verb(word) {
        return word.to_string();
    }

    if let Some(stem) = word.strip_suffix("ies").or_else(|| word.strip_suffix("ied")) {
        return format!("{}y", stem);
    }
    if word.len() >= 5 {
        if let Some(stem) = word.strip_suffix("ing") {
            if has_vowel(stem) {
                return restore_stem(stem);
            }
            return word.to_string();
        }
    }
    if let Some(stem) = word.strip_suffix("ed") {
        if has_vowel(stem) && !word.ends_with("eed") {
            return restore_stem(stem);
        }
        return word.to_string();
    }
    if let Some(stem) = word.strip_suffix("es") {
        if ["s", "x", "z", "ch", "sh", "o"].iter().any(|s| stem.ends_with(s)) {
            return stem.to_string();
        }
    }
    if !word.ends_with("ss") {
        if let Some(stem) = word.strip_suffix('s') {
            return stem.to_string();
        }
    }
    word.to_string()
}

/// Undo spelling changes made when -ing/-ed was attached
fn restore_stem(stem: &str) -> String {
    let chars: Vec<char> = stem.chars().collect();
    let n = chars.len();

    // betting -> bet, stopped -> stop; calling/missing keep their double letter
    if n >= 3 && chars[n - 1] == chars[n - 2] && is_consonant(chars[n - 1]) {
        if !matches!(chars[n - 1], 'l' | 's' | 'z' | 'f') {
            return chars[..n - 1].iter().collect();
        }
        return stem.to_string();
    }

    // gambling -> gamble, saving -> save, forced -> force, closed -> close
    let last = chars[n - 1];
    let needs_e = match last {
        'v' | 'z' => true,
        's' => n >= 2 && is_vowel(chars[n - 2]),
        'c' => n >= 3 && is_vowel(chars[n - 2]),
        'l' => n >= 2 && matches!(chars[n - 2], 'b' | 'g' | 'p' | 't' | 'k' | 'd' | 'c' | 'f' | 'z'),
        _ => false,
    };
    if needs_e {
        return format!("{}e", stem);
    }

    // making -> make, hoping -> hope, used -> use
    let short_cvc = n == 3
        && is_consonant(chars[0])
        && is_vowel(chars[1])
        && is_consonant(chars[2])
        && !matches!(chars[2], 'w' | 'x' | 'y');
    let short_vc = n == 2 && is_vowel(chars[0]) && is_consonant(chars[1]);
    if short_cvc || short_vc {
        return format!("{}e", stem);
    }

    stem.to_string()
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

fn is_consonant(c: char) -> bool {
    c.is_ascii_alphabetic() && !is_vowel(c)
}

fn has_vowel(s: &str) -> bool {
    s.chars().any(|c| is_vowel(c) || c == 'y')
}
