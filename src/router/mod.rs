//! Intent routing for Engine Agent
//!
//! Three stages turn a query into a provider choice:
//! - [`classifier`] scores the text against every intent category
//! - [`resolver`] picks the winning category with a fixed tie-break order
//! - [`fallback`] maps the category to a provider, substituting when unsubscribed
//!
//! [`IntentRouter`] chains the stages and is what handlers call.

pub mod classifier;
pub mod fallback;
pub mod resolver;
pub mod rule_based;
pub mod rules;

pub use classifier::classify;
pub use fallback::{FALLBACK_RANKING, apply_fallback};
pub use resolver::{TIE_BREAK_PRIORITY, resolve};
pub use rule_based::IntentRouter;
pub use rules::{KeywordRule, RulePattern, RuleSet};

use crate::providers::ProviderId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse bucket of query purpose used to choose a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentCategory {
    Programming,
    SourcesAndLinks,
    Factual,
    LongForm,
    MathLogic,
    General,
}

impl IntentCategory {
    /// Every category, in declaration order
    pub const ALL: [IntentCategory; 6] = [
        Self::Programming,
        Self::SourcesAndLinks,
        Self::Factual,
        Self::LongForm,
        Self::MathLogic,
        Self::General,
    ];

    /// Snake-case identifier used in JSON, config files and metrics labels
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Programming => "programming",
            Self::SourcesAndLinks => "sources_and_links",
            Self::Factual => "factual",
            Self::LongForm => "long_form",
            Self::MathLogic => "math_logic",
            Self::General => "general",
        }
    }

    /// Human-readable description used in routing reasons
    pub fn label(&self) -> &'static str {
        match self {
            Self::Programming => "Programming/code request",
            Self::SourcesAndLinks => "Source/link request",
            Self::Factual => "Factual knowledge/lookup request",
            Self::LongForm => "Long-form explanation request",
            Self::MathLogic => "Math/logic/puzzle request",
            Self::General => "General knowledge/conversational query",
        }
    }

    /// The provider this category routes to when it is subscribed
    pub fn default_provider(&self) -> ProviderId {
        match self {
            Self::Programming => ProviderId::Codex,
            Self::SourcesAndLinks => ProviderId::Perplexity,
            Self::Factual => ProviderId::Gemini,
            Self::LongForm => ProviderId::DeepSeek,
            Self::MathLogic => ProviderId::Gpai,
            Self::General => ProviderId::ChatGpt,
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for IntentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for IntentCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "Unknown intent category '{}'. Valid categories: {}",
                    s,
                    Self::ALL.map(|c| c.as_str()).join(", ")
                )
            })
    }
}

/// Score per intent category
///
/// Backed by a fixed array, so every category always has an entry (0 when
/// nothing matched).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryScores([u32; 6]);

impl CategoryScores {
    /// Create an all-zero score map
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a category's score (builder style, mostly for tests)
    pub fn with(mut self, category: IntentCategory, score: u32) -> Self {
        self.0[category.index()] = score;
        self
    }

    /// Get a category's score
    pub fn get(&self, category: IntentCategory) -> u32 {
        self.0[category.index()]
    }

    /// Add weight to a category's running score
    pub fn add(&mut self, category: IntentCategory, weight: u32) {
        let slot = &mut self.0[category.index()];
        *slot = slot.saturating_add(weight);
    }

    /// Highest score across all categories
    pub fn max(&self) -> u32 {
        self.0.iter().copied().max().unwrap_or(0)
    }

    /// Iterate `(category, score)` pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (IntentCategory, u32)> + '_ {
        IntentCategory::ALL.into_iter().map(|c| (c, self.get(c)))
    }
}

impl Serialize for CategoryScores {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(IntentCategory::ALL.len()))?;
        for (category, score) in self.iter() {
            map.serialize_entry(category.as_str(), &score)?;
        }
        map.end()
    }
}

/// Output of the resolver stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub category: IntentCategory,
    pub score: u32,
}

impl Resolution {
    pub fn new(category: IntentCategory, score: u32) -> Self {
        Self { category, score }
    }

    /// True when nothing matched and General was chosen as the default
    pub fn is_no_signal(&self) -> bool {
        self.score == 0
    }
}

/// Result of a routing decision
///
/// Fields are private so that a decision can only be produced by the
/// fallback stage, which keeps `fallback` and `intended_provider` consistent.
/// It is serialize-only for the same reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutingDecision {
    provider: ProviderId,
    category: IntentCategory,
    score: u32,
    reason: String,
    fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    intended_provider: Option<ProviderId>,
}

impl RoutingDecision {
    /// Decision that uses the category's default provider
    pub(crate) fn direct(resolution: Resolution, provider: ProviderId, reason: String) -> Self {
        Self {
            provider,
            category: resolution.category,
            score: resolution.score,
            reason,
            fallback: false,
            intended_provider: None,
        }
    }

    /// Decision that substitutes `provider` for the unsubscribed `intended`
    pub(crate) fn substituted(
        resolution: Resolution,
        intended: ProviderId,
        provider: ProviderId,
        reason: String,
    ) -> Self {
        Self {
            provider,
            category: resolution.category,
            score: resolution.score,
            reason,
            fallback: true,
            intended_provider: Some(intended),
        }
    }

    /// Provider that will answer the query
    pub fn provider(&self) -> ProviderId {
        self.provider
    }

    /// Resolved intent category
    pub fn category(&self) -> IntentCategory {
        self.category
    }

    /// Winning category score
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Human-readable routing rationale
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Whether the default provider was replaced
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    /// The unsubscribed default provider, when a fallback happened
    pub fn intended_provider(&self) -> Option<ProviderId> {
        self.intended_provider
    }
}
