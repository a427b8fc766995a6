use std::path::Path;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::RuleError;

/// A phrase rule as it appears in the rules file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Keywords that must all occur in the sentence (compared against lemmas)
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Maximum word-position span allowed between the matched keywords
    #[serde(default)]
    pub max_distance: usize,
    /// Whether keywords may appear in any order
    #[serde(default)]
    pub flexible_order: bool,
    /// Patterns searched in the raw sentence; a hit short-circuits keyword logic
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex_patterns: Option<Vec<String>>,
    /// Patterns that veto a regex hit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex_exclusion_patterns: Option<Vec<String>>,
}

impl Rule {
    pub fn keywords(keywords: &[&str], max_distance: usize, flexible_order: bool) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            max_distance,
            flexible_order,
            regex_patterns: None,
            regex_exclusion_patterns: None,
        }
    }

    pub fn with_regex(mut self, patterns: &[&str]) -> Self {
        self.regex_patterns = Some(patterns.iter().map(|p| p.to_string()).collect());
        self
    }

    pub fn with_exclusions(mut self, patterns: &[&str]) -> Self {
        self.regex_exclusion_patterns = Some(patterns.iter().map(|p| p.to_string()).collect());
        self
    }
}

/// How a rule ended up matching (or being rejected)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Regex,
    StrictOrder,
    FlexibleOrder,
}

/// A rule with its regexes compiled and keywords lowercased
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub rule: Rule,
    pub keywords: Vec<String>,
    pub include: Vec<Regex>,
    pub exclude: Vec<Regex>,
}

impl CompiledRule {
    pub fn compile(index: usize, rule: Rule) -> Result<Self, RuleError> {
        let include = compile_patterns(index, rule.regex_patterns.as_deref())?;
        let exclude = compile_patterns(index, rule.regex_exclusion_patterns.as_deref())?;

        if rule.keywords.is_empty() && include.is_empty() {
            return Err(RuleError::EmptyRule(index));
        }

        let keywords = rule.keywords.iter().map(|k| k.to_lowercase()).collect();

        Ok(Self {
            rule,
            keywords,
            include,
            exclude,
        })
    }

    /// Keywords reported for a sentence this rule matched
    pub fn reported_keywords(&self) -> &[String] {
        &self.rule.keywords
    }
}

fn compile_patterns(index: usize, patterns: Option<&[String]>) -> Result<Vec<Regex>, RuleError> {
    patterns
        .unwrap_or_default()
        .iter()
        .map(|pattern| {
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map_err(|source| RuleError::InvalidRegex {
                    index,
                    pattern: pattern.clone(),
                    source,
                })
        })
        .collect()
}

/// The immutable set of rules shared by every request
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<CompiledRule>,
}

impl RuleSet {
    /// Compile rules; any malformed rule fails the whole load
    pub fn new(rules: Vec<Rule>) -> Result<Self, RuleError> {
        let rules = rules
            .into_iter()
            .enumerate()
            .map(|(i, rule)| CompiledRule::compile(i, rule))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    pub fn from_json(json: &str) -> Result<Self, RuleError> {
        let rules: Vec<Rule> = serde_json::from_str(json)?;
        Self::new(rules)
    }

    pub fn from_file(path: &Path) -> Result<Self, RuleError> {
        let content = std::fs::read_to_string(path).map_err(|source| RuleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompiledRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rules_json() {
        let json = r#"[
            {"keywords": ["addicted", "betting"], "max_distance": 5},
            {
                "keywords": ["lose", "control"],
                "max_distance": 3,
                "flexible_order": true,
                "regex_patterns": ["can'?t stop (betting|gambling)"],
                "regex_exclusion_patterns": ["friend"]
            }
        ]"#;

        let rules = RuleSet::from_json(json).unwrap();

        assert_eq!(rules.len(), 2);
        let first = rules.iter().next().unwrap();
        assert!(!first.rule.flexible_order);
        assert!(first.include.is_empty());
        let second = rules.iter().nth(1).unwrap();
        assert!(second.rule.flexible_order);
        assert_eq!(second.include.len(), 1);
        assert_eq!(second.exclude.len(), 1);
    }

    #[test]
    fn test_invalid_regex_fails_at_load() {
        let json = r#"[{"keywords": ["a"], "max_distance": 1, "regex_patterns": ["(unclosed"]}]"#;

        let err = RuleSet::from_json(json).unwrap_err();

        assert!(matches!(err, RuleError::InvalidRegex { index: 0, .. }));
    }

    #[test]
    fn test_rule_without_keywords_or_regex_is_rejected() {
        let err = RuleSet::new(vec![Rule::keywords(&[], 2, false)]).unwrap_err();
        assert!(matches!(err, RuleError::EmptyRule(0)));
    }

    #[test]
    fn test_keywords_are_lowercased() {
        let rules = RuleSet::new(vec![Rule::keywords(&["Addicted"], 0, false)]).unwrap();
        let rule = rules.iter().next().unwrap();
        assert_eq!(rule.keywords, vec!["addicted"]);
        assert_eq!(rule.reported_keywords(), &["Addicted".to_string()]);
    }
}
