//! Lexical intent classifier
//!
//! Pure function of (text, rule set): lowercases the text and adds each
//! matching rule's weight to its category. A rule contributes at most once
//! per query no matter how many times it matches.

use super::{CategoryScores, RuleSet};

/// Score `text` against every rule in `rules`
///
/// Callers reject empty input before classifying; empty text simply yields
/// all-zero scores.
pub fn classify(text: &str, rules: &RuleSet) -> CategoryScores {
    let normalized = text.to_lowercase();
    let mut scores = CategoryScores::new();

    for rule in rules.rules() {
        if rule.matches(&normalized) {
            scores.add(rule.category(), rule.weight());
        }
    }

    scores
}
