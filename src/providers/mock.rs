//! Canned provider responses
//!
//! Stands in for real provider calls. Each provider has three templates that
//! quote the start of the prompt; one is picked at random per call.

use super::{ProviderId, ProviderResponder, ProviderResponse};
use crate::error::{AppError, AppResult};
use crate::shared::text::truncate_chars;
use async_trait::async_trait;
use rand::seq::IndexedRandom;

/// Response text wrapped around a quoted, truncated prefix of the prompt
struct Template {
    before: &'static str,
    quote_chars: usize,
    after: &'static str,
}

impl Template {
    const fn new(before: &'static str, quote_chars: usize, after: &'static str) -> Self {
        Self {
            before,
            quote_chars,
            after,
        }
    }

    fn render(&self, prompt: &str) -> String {
        format!(
            "{}'{}...'{}",
            self.before,
            truncate_chars(prompt, self.quote_chars),
            self.after
        )
    }
}

static CHATGPT: [Template; 3] = [
    Template::new(
        "Based on general knowledge: ",
        50,
        " relates to various perspectives. ChatGPT would provide a balanced overview considering multiple viewpoints.",
    ),
    Template::new(
        "ChatGPT analysis: The query ",
        40,
        " touches on general concepts. Here's what I know from my training data...",
    ),
    Template::new(
        "General assistant response: I understand you're asking about ",
        30,
        ". Let me share some general information on this topic.",
    ),
];

static GEMINI: [Template; 3] = [
    Template::new(
        "Gemini factual lookup: Searching for ",
        50,
        ". According to verified sources, this involves several key facts and data points.",
    ),
    Template::new(
        "Based on factual knowledge: ",
        40,
        " - this is documented in multiple authoritative sources. Let me summarize the key information.",
    ),
    Template::new(
        "Gemini knowledge search: I've found relevant information about ",
        30,
        ". Here are the verified facts.",
    ),
];

static DEEPSEEK: [Template; 3] = [
    Template::new(
        "DeepSeek detailed analysis: Let me provide a comprehensive explanation of ",
        40,
        " This topic has several layers to explore...",
    ),
    Template::new(
        "In-depth explanation requested for: ",
        30,
        " I'll break this down into detailed components and elaborate on each aspect.",
    ),
    Template::new(
        "DeepSeek long-form response: Your query about ",
        35,
        " requires thorough examination. Let me provide a complete guide.",
    ),
];

static PERPLEXITY: [Template; 3] = [
    Template::new(
        "Perplexity sources: I found multiple references for ",
        45,
        ". Here are relevant sources with citations and links.",
    ),
    Template::new(
        "Source compilation for: ",
        35,
        " - I've gathered information from academic papers, articles, and verified references.",
    ),
    Template::new(
        "Perplexity research: Regarding ",
        40,
        ", here are the key sources and references with their credibility assessments.",
    ),
];

static GPAI: [Template; 3] = [
    Template::new(
        "GPAI logical reasoning: Analyzing ",
        40,
        " through mathematical frameworks. The solution involves several computational steps.",
    ),
    Template::new(
        "Math/Logic processing: For ",
        35,
        ", I've computed the result using formal logic and mathematical operations.",
    ),
    Template::new(
        "GPAI puzzle solver: Your query ",
        30,
        " requires logical deduction. Here's my step-by-step reasoning.",
    ),
];

static CODEX: [Template; 3] = [
    Template::new(
        "Codex programming: For ",
        40,
        ", here's a code solution with implementation details and best practices.",
    ),
    Template::new(
        "Software development: Analyzing ",
        35,
        " - I'll provide a clean, efficient implementation with documentation.",
    ),
    Template::new(
        "Codex assistance: Your coding request ",
        30,
        " can be solved with this optimized approach.",
    ),
];

fn templates(provider: ProviderId) -> &'static [Template] {
    match provider {
        ProviderId::ChatGpt => &CHATGPT,
        ProviderId::Gemini => &GEMINI,
        ProviderId::DeepSeek => &DEEPSEEK,
        ProviderId::Perplexity => &PERPLEXITY,
        ProviderId::Gpai => &GPAI,
        ProviderId::Codex => &CODEX,
    }
}

/// Responder that synthesizes a reply from per-provider templates
#[derive(Debug, Clone, Default)]
pub struct MockResponder;

impl MockResponder {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProviderResponder for MockResponder {
    async fn respond(&self, provider: ProviderId, prompt: &str) -> AppResult<ProviderResponse> {
        let template = templates(provider)
            .choose(&mut rand::rng())
            .ok_or_else(|| {
                AppError::Internal(format!("No response templates for provider {}", provider))
            })?;

        let response = ProviderResponse {
            agent: provider.display_name().to_string(),
            agent_color: provider.color().to_string(),
            response: template.render(prompt),
            timestamp: chrono::Local::now().format("%H:%M:%S").to_string(),
        };

        tracing::debug!(
            provider = provider.as_str(),
            response_length = response.response.len(),
            "Mock provider response generated"
        );

        Ok(response)
    }
}
