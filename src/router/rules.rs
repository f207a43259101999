//! Keyword and pattern rules for intent classification
//!
//! A [`RuleSet`] is built once at startup (built-in table plus any rules
//! from `[[classifier.rules]]`) and is immutable afterwards. Tests inject
//! their own rule sets through [`RuleSet::new`].

use super::IntentCategory;
use crate::config::{ClassifierConfig, PatternKind};
use crate::error::{AppError, AppResult};
use regex::{Regex, RegexBuilder};

/// Default weight for a regex rule match
pub const DEFAULT_REGEX_WEIGHT: u32 = 3;
/// Default weight for a literal keyword match
pub const DEFAULT_KEYWORD_WEIGHT: u32 = 5;

/// Built-in rule table: (category, regex patterns, literal keywords)
const BUILTIN_RULES: &[(IntentCategory, &[&str], &[&str])] = &[
    (
        IntentCategory::Programming,
        &[
            r"\b(code|program|function|script|debug|compile|syntax|api|app|software|develop)\b",
            r"\b(react|vue|angular|django|flask|node|express|python|java|javascript|html|css|rust)\b",
            r"\b(algorithm|data structure|class|object|method|variable|loop|array)\b",
            r"\b(programming|coding|software development|web dev)\b",
        ],
        &[
            "write code",
            "fix bug",
            "create function",
            "program",
            "debug",
            "build app",
        ],
    ),
    (
        IntentCategory::SourcesAndLinks,
        &[
            r"\b(link|source|reference|citation|article|research|paper|find|search|google|look up)\b",
            r"\b(where can i|find me|search for|give me sources|list of resources)\b",
        ],
        &["sources", "references", "links", "citations", "research"],
    ),
    (
        IntentCategory::Factual,
        &[
            r"\b(fact|history|date|location|famous|population|culture|definition|meaning)\b",
            r"\b(who|what|where|when)\s+(is|are|was|were|did|does)\b",
            r"\b(factual|knowledge|information|dictionary)\b",
            r"^\s*(who|when|where|which)\b",
            r"\b(discovered|invented|founded|born|capital)\b",
        ],
        &[
            "tell me about",
            "what is",
            "who is",
            "when did",
            "where is",
            "define",
        ],
    ),
    (
        IntentCategory::LongForm,
        &[
            r"\b(explain in detail|comprehensive|thorough|in-depth|elaborate|detailed)\b",
            r"\b(long form|essay|extensive|complete guide|full explanation)\b",
        ],
        &[
            "explain thoroughly",
            "detailed analysis",
            "comprehensive guide",
            "in depth",
        ],
    ),
    (
        IntentCategory::MathLogic,
        &[
            r"\d+(\.\d+)?\s*[-+*/%^=]\s*\(?\d",
            r"\b(calculate|solve|equation|math|algebra|calculus|geometry|puzzle|logic)\b",
            r"\b(compute|sum|difference|product|quotient|modulo|derivative|integral)\b",
        ],
        &[
            "solve this",
            "calculate",
            "math problem",
            "equation",
            "formula",
        ],
    ),
    (
        IntentCategory::General,
        &[r"\b(opinion|thoughts|perspective|general|anyway|basically|overall)\b"],
        &[],
    ),
];

/// How a rule tests the normalized query text
#[derive(Debug, Clone)]
pub enum RulePattern {
    /// Substring containment (stored lowercased)
    Literal(String),
    /// Regex search (compiled case-insensitive)
    Regex(Regex),
}

impl RulePattern {
    /// Test the pattern against already-lowercased text
    pub fn matches(&self, normalized: &str) -> bool {
        match self {
            Self::Literal(keyword) => normalized.contains(keyword.as_str()),
            Self::Regex(regex) => regex.is_match(normalized),
        }
    }

    /// Source text of the pattern
    pub fn as_str(&self) -> &str {
        match self {
            Self::Literal(keyword) => keyword,
            Self::Regex(regex) => regex.as_str(),
        }
    }

    pub fn kind(&self) -> PatternKind {
        match self {
            Self::Literal(_) => PatternKind::Literal,
            Self::Regex(_) => PatternKind::Regex,
        }
    }
}

/// A weighted pattern belonging to exactly one intent category
#[derive(Debug, Clone)]
pub struct KeywordRule {
    category: IntentCategory,
    pattern: RulePattern,
    weight: u32,
}

impl KeywordRule {
    /// Literal substring rule
    ///
    /// # Errors
    /// Returns an error if the keyword is blank or the weight is zero.
    pub fn literal(category: IntentCategory, keyword: &str, weight: u32) -> AppResult<Self> {
        let keyword = keyword.trim().to_lowercase();
        if keyword.is_empty() {
            return Err(AppError::Config(format!(
                "Keyword rule for category '{}' has an empty keyword",
                category
            )));
        }
        Self::build(category, RulePattern::Literal(keyword), weight)
    }

    /// Regex search rule
    ///
    /// # Errors
    /// Returns an error if the pattern does not compile or the weight is zero.
    pub fn regex(category: IntentCategory, pattern: &str, weight: u32) -> AppResult<Self> {
        let compiled = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| AppError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })?;
        Self::build(category, RulePattern::Regex(compiled), weight)
    }

    fn build(category: IntentCategory, pattern: RulePattern, weight: u32) -> AppResult<Self> {
        if weight == 0 {
            return Err(AppError::Config(format!(
                "Rule '{}' for category '{}' has weight 0. Weight must be a positive integer.",
                pattern.as_str(),
                category
            )));
        }
        Ok(Self {
            category,
            pattern,
            weight,
        })
    }

    pub fn category(&self) -> IntentCategory {
        self.category
    }

    pub fn pattern(&self) -> &RulePattern {
        &self.pattern
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }

    /// Test the rule against already-lowercased text
    pub fn matches(&self, normalized: &str) -> bool {
        self.pattern.matches(normalized)
    }
}

/// Immutable collection of classification rules
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<KeywordRule>,
}

impl RuleSet {
    /// Rule set from an explicit list of rules
    pub fn new(rules: Vec<KeywordRule>) -> Self {
        Self { rules }
    }

    /// Built-in rule table with the given weights
    ///
    /// # Errors
    /// Returns an error if either weight is zero.
    pub fn builtin(regex_weight: u32, keyword_weight: u32) -> AppResult<Self> {
        let mut rules = Vec::new();
        for (category, patterns, keywords) in BUILTIN_RULES {
            for pattern in *patterns {
                rules.push(KeywordRule::regex(*category, pattern, regex_weight)?);
            }
            for keyword in *keywords {
                rules.push(KeywordRule::literal(*category, keyword, keyword_weight)?);
            }
        }
        Ok(Self { rules })
    }

    /// Built-in table plus the custom rules declared in configuration
    ///
    /// Custom rules without an explicit weight take the configured default
    /// for their pattern kind.
    ///
    /// # Errors
    /// Returns an error if any weight is zero or a custom regex fails to compile.
    pub fn from_config(config: &ClassifierConfig) -> AppResult<Self> {
        let mut set = Self::builtin(config.regex_weight, config.keyword_weight)?;

        for custom in &config.rules {
            let rule = match custom.kind {
                PatternKind::Literal => KeywordRule::literal(
                    custom.category,
                    &custom.pattern,
                    custom.weight.unwrap_or(config.keyword_weight),
                )?,
                PatternKind::Regex => KeywordRule::regex(
                    custom.category,
                    &custom.pattern,
                    custom.weight.unwrap_or(config.regex_weight),
                )?,
            };
            set.rules.push(rule);
        }

        tracing::debug!(
            total_rules = set.rules.len(),
            custom_rules = config.rules.len(),
            "Classifier rule set built"
        );

        Ok(set)
    }

    pub fn rules(&self) -> &[KeywordRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules belonging to one category
    pub fn for_category(&self, category: IntentCategory) -> impl Iterator<Item = &KeywordRule> {
        self.rules.iter().filter(move |r| r.category == category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CustomRule;

    #[test]
    fn test_builtin_compiles_every_pattern() {
        let set = RuleSet::builtin(DEFAULT_REGEX_WEIGHT, DEFAULT_KEYWORD_WEIGHT)
            .expect("built-in rules must compile");
        let expected: usize = BUILTIN_RULES
            .iter()
            .map(|(_, patterns, keywords)| patterns.len() + keywords.len())
            .sum();
        assert_eq!(set.len(), expected);
    }

    #[test]
    fn test_builtin_covers_every_category() {
        let set = RuleSet::builtin(DEFAULT_REGEX_WEIGHT, DEFAULT_KEYWORD_WEIGHT).unwrap();
        for category in IntentCategory::ALL {
            assert!(
                set.for_category(category).count() > 0,
                "category {} has no rules",
                category
            );
        }
    }

    #[test]
    fn test_builtin_weights_by_kind() {
        let set = RuleSet::builtin(2, 7).unwrap();
        for rule in set.rules() {
            match rule.pattern().kind() {
                PatternKind::Regex => assert_eq!(rule.weight(), 2),
                PatternKind::Literal => assert_eq!(rule.weight(), 7),
            }
        }
    }

    #[test]
    fn test_zero_weight_rejected() {
        let err = RuleSet::builtin(0, 5).unwrap_err();
        assert!(err.to_string().contains("weight 0"));

        let err = KeywordRule::literal(IntentCategory::General, "hello", 0).unwrap_err();
        assert!(err.to_string().contains("weight 0"));
    }

    #[test]
    fn test_literal_is_lowercased_and_trimmed() {
        let rule = KeywordRule::literal(IntentCategory::Factual, "  Tell Me  ", 5).unwrap();
        assert_eq!(rule.pattern().as_str(), "tell me");
        assert!(rule.matches("please tell me more"));
    }

    #[test]
    fn test_blank_literal_rejected() {
        let err = KeywordRule::literal(IntentCategory::Factual, "   ", 5).unwrap_err();
        assert!(err.to_string().contains("empty keyword"));
    }

    #[test]
    fn test_invalid_regex_rejected() {
        let err = KeywordRule::regex(IntentCategory::MathLogic, r"(\d+", 3).unwrap_err();
        assert!(matches!(err, AppError::InvalidPattern { .. }));
        assert!(err.to_string().contains(r"(\d+"));
    }

    #[test]
    fn test_regex_matches_with_word_boundaries() {
        let rule = KeywordRule::regex(IntentCategory::Programming, r"\b(app)\b", 3).unwrap();
        assert!(rule.matches("build an app today"));
        assert!(!rule.matches("an apple a day"));
    }

    #[test]
    fn test_regex_is_case_insensitive() {
        let rule = KeywordRule::regex(IntentCategory::SourcesAndLinks, r"\bWhere Can I\b", 3)
            .unwrap();
        assert!(rule.matches("where can i read more"));
    }

    #[test]
    fn test_math_expression_pattern() {
        let set = RuleSet::builtin(DEFAULT_REGEX_WEIGHT, DEFAULT_KEYWORD_WEIGHT).unwrap();
        let expression = set
            .for_category(IntentCategory::MathLogic)
            .next()
            .expect("math rules exist");
        assert!(expression.matches("what is 12 * (3 + 4)"));
        assert!(expression.matches("2+2"));
        assert!(expression.matches("3.5 / 7"));
        assert!(!expression.matches("an in-depth look"));
        assert!(!expression.matches("released in 2024"));
    }

    #[test]
    fn test_from_config_appends_custom_rules() {
        let config = ClassifierConfig {
            regex_weight: 3,
            keyword_weight: 5,
            rules: vec![
                CustomRule {
                    category: IntentCategory::Programming,
                    pattern: "borrow checker".to_string(),
                    kind: PatternKind::Literal,
                    weight: None,
                },
                CustomRule {
                    category: IntentCategory::MathLogic,
                    pattern: r"\bprime(s)?\b".to_string(),
                    kind: PatternKind::Regex,
                    weight: Some(9),
                },
            ],
        };

        let set = RuleSet::from_config(&config).unwrap();
        let builtin = RuleSet::builtin(3, 5).unwrap();
        assert_eq!(set.len(), builtin.len() + 2);

        let last_two: Vec<_> = set.rules().iter().rev().take(2).collect();
        assert_eq!(last_two[0].weight(), 9);
        assert_eq!(last_two[0].category(), IntentCategory::MathLogic);
        assert_eq!(last_two[1].weight(), 5);
        assert_eq!(last_two[1].pattern().as_str(), "borrow checker");
    }

    #[test]
    fn test_from_config_rejects_bad_custom_regex() {
        let config = ClassifierConfig {
            regex_weight: 3,
            keyword_weight: 5,
            rules: vec![CustomRule {
                category: IntentCategory::General,
                pattern: "[unclosed".to_string(),
                kind: PatternKind::Regex,
                weight: None,
            }],
        };
        assert!(RuleSet::from_config(&config).is_err());
    }
}
