use tracing::debug;

use crate::models::{CompiledRule, CustomerSentence, MatchKind, RuleSet};
use crate::nlp::normalize;

/// A rule that matched a customer sentence
#[derive(Debug, Clone)]
pub struct RuleMatch<'a> {
    pub sentence: &'a CustomerSentence,
    pub rule: &'a CompiledRule,
    pub kind: MatchKind,
}

/// Evaluate one rule against one sentence.
///
/// Regex patterns are searched in the raw sentence and win outright unless an
/// exclusion pattern also matches. Otherwise every keyword must be found in
/// `normalized_words` within `max_distance` positions, in keyword order unless
/// the rule is flexible.
pub fn evaluate(sentence: &str, normalized_words: &[String], rule: &CompiledRule) -> (bool, MatchKind) {
    if rule.include.iter().any(|re| re.is_match(sentence)) {
        let excluded = rule.exclude.iter().any(|re| re.is_match(sentence));
        return (!excluded, MatchKind::Regex);
    }

    let kind = if rule.rule.flexible_order {
        MatchKind::FlexibleOrder
    } else {
        MatchKind::StrictOrder
    };

    let Some(positions) = keyword_positions(normalized_words, &rule.keywords) else {
        return (false, kind);
    };

    let matched = match kind {
        MatchKind::FlexibleOrder => flexible_order_match(&positions, rule.rule.max_distance),
        _ => strict_order_match(&positions, rule.rule.max_distance),
    };
    (matched, kind)
}

/// Positions of each keyword, or `None` if any keyword is missing
fn keyword_positions(words: &[String], keywords: &[String]) -> Option<Vec<Vec<usize>>> {
    if keywords.is_empty() {
        return None;
    }
    keywords
        .iter()
        .map(|keyword| {
            let positions: Vec<usize> = words
                .iter()
                .enumerate()
                .filter(|(_, w)| w.eq_ignore_ascii_case(keyword))
                .map(|(i, _)| i)
                .collect();
            (!positions.is_empty()).then_some(positions)
        })
        .collect()
}

/// One strictly increasing position per keyword, in keyword order, spanning
/// at most `max_distance`
fn strict_order_match(positions: &[Vec<usize>], max_distance: usize) -> bool {
    let Some((first, rest)) = positions.split_first() else {
        return false;
    };

    first.iter().any(|&start| {
        let mut last = start;
        for candidates in rest {
            // the earliest next position gives the tightest span for this start
            match candidates.iter().find(|&&p| p > last) {
                Some(&p) => last = p,
                None => return false,
            }
        }
        last - start <= max_distance
    })
}

/// Any run of `positions.len()` consecutive keyword positions spanning at most
/// `max_distance`
fn flexible_order_match(positions: &[Vec<usize>], max_distance: usize) -> bool {
    let needed = positions.len();
    let mut all: Vec<usize> = positions.iter().flatten().copied().collect();
    all.sort_unstable();
    all.dedup();

    all.windows(needed)
        .any(|run| run[needed - 1] - run[0] <= max_distance)
}

/// Evaluate every rule against every customer sentence
pub fn match_sentences<'a>(sentences: &'a [CustomerSentence], rules: &'a RuleSet) -> Vec<RuleMatch<'a>> {
    let mut matches = Vec::new();

    for sentence in sentences {
        let words = normalize(sentence.as_str());
        for rule in rules.iter() {
            let (matched, kind) = evaluate(sentence.as_str(), &words, rule);
            if matched {
                debug!("Rule {:?} matched ({:?}): {}", rule.reported_keywords(), kind, sentence);
                matches.push(RuleMatch { sentence, rule, kind });
            }
        }
    }

    matches
}
