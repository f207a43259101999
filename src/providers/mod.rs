//! AI providers that queries can be routed to
//!
//! [`ProviderId`] names a provider. [`ProviderResponder`] is the seam that
//! produces an answer from a provider; [`MockResponder`] is the only
//! implementation and synthesizes canned replies.

pub mod mock;

pub use mock::MockResponder;

use crate::error::AppResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of an AI provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    ChatGpt,
    Gemini,
    DeepSeek,
    Perplexity,
    Gpai,
    Codex,
}

impl ProviderId {
    /// Every provider, in declaration order
    pub const ALL: [ProviderId; 6] = [
        Self::ChatGpt,
        Self::Gemini,
        Self::DeepSeek,
        Self::Perplexity,
        Self::Gpai,
        Self::Codex,
    ];

    /// Lowercase identifier used in JSON, config keys and metrics labels
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ChatGpt => "chatgpt",
            Self::Gemini => "gemini",
            Self::DeepSeek => "deepseek",
            Self::Perplexity => "perplexity",
            Self::Gpai => "gpai",
            Self::Codex => "codex",
        }
    }

    /// Name shown to users
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::ChatGpt => "ChatGPT",
            Self::Gemini => "Gemini",
            Self::DeepSeek => "DeepSeek",
            Self::Perplexity => "Perplexity",
            Self::Gpai => "GPAI",
            Self::Codex => "Codex",
        }
    }

    /// Accent color for the UI
    pub fn color(&self) -> &'static str {
        match self {
            Self::ChatGpt => "#10a37f",
            Self::Gemini => "#1a73e8",
            Self::DeepSeek => "#4b6bfb",
            Self::Perplexity => "#5436da",
            Self::Gpai => "#ff6b4a",
            Self::Codex => "#ff6e4a",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ProviderId {
    type Err = String;

    /// Parse a provider identifier (case-insensitive)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == needle)
            .ok_or_else(|| {
                format!(
                    "Unknown provider '{}'. Available providers: {}",
                    s,
                    Self::ALL.map(|p| p.as_str()).join(", ")
                )
            })
    }
}

/// Answer produced by a provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderResponse {
    /// Display name of the provider that answered
    pub agent: String,
    /// UI accent color for the provider
    pub agent_color: String,
    /// Response text
    pub response: String,
    /// Local wall-clock time of the answer (`HH:MM:SS`)
    pub timestamp: String,
}

/// Produces a provider's answer to a prompt
///
/// Routing never depends on this trait: the router picks a [`ProviderId`]
/// and the responder only turns that choice into text.
#[async_trait]
pub trait ProviderResponder: Send + Sync {
    async fn respond(&self, provider: ProviderId, prompt: &str) -> AppResult<ProviderResponse>;
}
