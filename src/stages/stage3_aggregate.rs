use std::collections::{BTreeSet, HashMap};

use super::stage2_match::RuleMatch;
use crate::models::Flag;

/// Collapse rule matches into one flag per distinct sentence.
///
/// Flags keep the order in which their sentence first matched; each carries
/// the union of keywords of every rule that matched it.
pub fn aggregate(matches: &[RuleMatch<'_>]) -> (bool, Vec<Flag>) {
    let mut flags: Vec<Flag> = Vec::new();
    let mut by_sentence: HashMap<&str, usize> = HashMap::new();

    for m in matches {
        let sentence = m.sentence.as_str();
        let slot = *by_sentence.entry(sentence).or_insert_with(|| {
            flags.push(Flag {
                sentence: sentence.to_string(),
                matched_keywords: BTreeSet::new(),
            });
            flags.len() - 1
        });
        flags[slot]
            .matched_keywords
            .extend(m.rule.reported_keywords().iter().cloned());
    }

    (!flags.is_empty(), flags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CompiledRule, CustomerSentence, MatchKind, Rule};

    #[test]
    fn test_aggregate_unions_keywords_per_sentence() {
        let betting = CompiledRule::compile(0, Rule::keywords(&["betting", "addicted"], 5, false)).unwrap();
        let addicted = CompiledRule::compile(1, Rule::keywords(&["addicted", "cannot"], 5, true)).unwrap();
        let first = CustomerSentence::new("I am addicted to betting.");
        let second = CustomerSentence::new("I cannot stop, I am addicted.");
        let repeat = CustomerSentence::new("I am addicted to betting.");

        let matches = vec![
            RuleMatch { sentence: &first, rule: &betting, kind: MatchKind::StrictOrder },
            RuleMatch { sentence: &second, rule: &addicted, kind: MatchKind::FlexibleOrder },
            RuleMatch { sentence: &repeat, rule: &addicted, kind: MatchKind::FlexibleOrder },
        ];

        let (flagged, flags) = aggregate(&matches);

        assert!(flagged);
        assert_eq!(flags.len(), 2);
        assert_eq!(flags[0].sentence, "I am addicted to betting.");
        assert_eq!(
            flags[0].matched_keywords.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["addicted", "betting", "cannot"]
        );
        assert_eq!(flags[1].sentence, "I cannot stop, I am addicted.");
    }

    #[test]
    fn test_no_matches_is_not_flagged() {
        let (flagged, flags) = aggregate(&[]);
        assert!(!flagged);
        assert!(flags.is_empty());
    }
}
