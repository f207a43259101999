//! Rule-based intent router
//!
//! Fast, deterministic routing using keyword and pattern matching.
//! Every call runs the same pipeline:
//!
//! Received → Classified → Resolved → FallbackChecked → Decided | Failed
//!
//! Input validation happens before classification, so empty or oversized
//! queries never reach the classifier.

use super::{CategoryScores, RoutingDecision, RuleSet, apply_fallback, classify, resolve};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::session::SubscriptionState;
use std::sync::Arc;

/// Default maximum query length in characters (100K chars)
pub const DEFAULT_MAX_QUERY_CHARS: usize = 100_000;

/// Router that classifies query text and picks a subscribed provider
#[derive(Debug, Clone)]
pub struct IntentRouter {
    rules: Arc<RuleSet>,
    max_query_chars: usize,
}

impl IntentRouter {
    /// Create a router over an explicit rule set
    pub fn new(rules: RuleSet) -> Self {
        Self {
            rules: Arc::new(rules),
            max_query_chars: DEFAULT_MAX_QUERY_CHARS,
        }
    }

    /// Create a router from configuration (built-in rules plus custom rules)
    ///
    /// # Errors
    /// Returns an error if a configured rule is invalid.
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let rules = RuleSet::from_config(&config.classifier)?;
        Ok(Self::new(rules).with_max_query_chars(config.routing.max_query_chars))
    }

    /// Override the maximum accepted query length
    pub fn with_max_query_chars(mut self, max_query_chars: usize) -> Self {
        self.max_query_chars = max_query_chars;
        self
    }

    /// Rule set used for classification
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn max_query_chars(&self) -> usize {
        self.max_query_chars
    }

    /// Reject empty, whitespace-only and oversized queries
    ///
    /// # Errors
    /// Returns `AppError::Validation` describing why the query was rejected.
    pub fn validate_query(&self, text: &str) -> AppResult<()> {
        if text.trim().is_empty() {
            return Err(AppError::Validation(
                "query cannot be empty or contain only whitespace".to_string(),
            ));
        }

        // Count Unicode characters, not bytes
        let char_count = text.chars().count();
        if char_count > self.max_query_chars {
            return Err(AppError::Validation(format!(
                "query exceeds maximum length of {} characters (got {})",
                self.max_query_chars, char_count
            )));
        }

        Ok(())
    }

    /// Score text against the rule set without validating it
    pub fn classify(&self, text: &str) -> CategoryScores {
        classify(text, &self.rules)
    }

    /// Route a query, returning the decision
    ///
    /// # Errors
    /// - `AppError::Validation` if the query is empty or too long
    /// - `AppError::NoProviderAvailable` if every provider is unsubscribed
    pub fn route(&self, text: &str, subscriptions: &SubscriptionState) -> AppResult<RoutingDecision> {
        self.route_with_scores(text, subscriptions)
            .map(|(decision, _)| decision)
    }

    /// Route a query, also returning the per-category scores behind the decision
    ///
    /// # Errors
    /// Same as [`IntentRouter::route`].
    pub fn route_with_scores(
        &self,
        text: &str,
        subscriptions: &SubscriptionState,
    ) -> AppResult<(RoutingDecision, CategoryScores)> {
        self.validate_query(text)?;

        let scores = self.classify(text);
        let resolution = resolve(&scores);

        tracing::debug!(
            category = %resolution.category,
            score = resolution.score,
            scores = ?scores,
            "Query classified"
        );

        match apply_fallback(resolution, subscriptions) {
            Ok(decision) => {
                tracing::info!(
                    provider = decision.provider().as_str(),
                    category = %decision.category(),
                    score = decision.score(),
                    fallback = decision.is_fallback(),
                    "Routing decision made"
                );
                Ok((decision, scores))
            }
            Err(e) => {
                tracing::warn!(
                    category = %resolution.category,
                    error = %e,
                    "Routing failed: no subscribed provider"
                );
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ProviderId;
    use crate::router::IntentCategory;
    use crate::router::rules::{DEFAULT_KEYWORD_WEIGHT, DEFAULT_REGEX_WEIGHT};

    fn router() -> IntentRouter {
        IntentRouter::new(RuleSet::builtin(DEFAULT_REGEX_WEIGHT, DEFAULT_KEYWORD_WEIGHT).unwrap())
    }

    #[test]
    fn test_rejects_empty_query() {
        let err = router()
            .route("", &SubscriptionState::all_active())
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_rejects_whitespace_query() {
        let err = router()
            .route(" \t\n ", &SubscriptionState::all_active())
            .unwrap_err();
        assert!(err.to_string().contains("empty or contain only whitespace"));
    }

    #[test]
    fn test_rejects_oversized_query() {
        let router = router().with_max_query_chars(10);
        let err = router
            .route("debug this code please", &SubscriptionState::all_active())
            .unwrap_err();
        assert!(err.to_string().contains("maximum length of 10"));
    }

    #[test]
    fn test_length_limit_counts_chars() {
        // 5 chars, 15 bytes
        let router = router().with_max_query_chars(5);
        assert!(router.validate_query("日本語です").is_ok());
        assert!(router.validate_query("日本語ですね").is_err());
    }

    #[test]
    fn test_routes_programming_to_codex() {
        let decision = router()
            .route(
                "Write a Python function to reverse a string",
                &SubscriptionState::all_active(),
            )
            .unwrap();
        assert_eq!(decision.category(), IntentCategory::Programming);
        assert_eq!(decision.provider(), ProviderId::Codex);
        assert!(!decision.is_fallback());
    }

    #[test]
    fn test_route_with_scores_returns_classifier_output() {
        let router = router();
        let (decision, scores) = router
            .route_with_scores("Who discovered penicillin?", &SubscriptionState::all_active())
            .unwrap();
        assert_eq!(scores, router.classify("Who discovered penicillin?"));
        assert_eq!(decision.score(), scores.get(IntentCategory::Factual));
    }

    #[test]
    fn test_all_unsubscribed_fails() {
        let err = router()
            .route("debug this code", &SubscriptionState::all_inactive())
            .unwrap_err();
        assert!(matches!(err, AppError::NoProviderAvailable { .. }));
    }

    #[test]
    fn test_router_is_cheap_to_clone() {
        let router = router();
        let cloned = router.clone();
        assert!(Arc::ptr_eq(&router.rules, &cloned.rules));
    }
}
