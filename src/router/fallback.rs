//! Subscription-aware provider selection
//!
//! Maps a resolved category to its default provider. When that provider is
//! unsubscribed, walks [`FALLBACK_RANKING`] and takes the first active one.
//! With nothing active the request fails with `NoProviderAvailable` rather
//! than guessing.

use super::{Resolution, RoutingDecision};
use crate::error::{AppError, AppResult};
use crate::providers::ProviderId;
use crate::session::SubscriptionState;

/// Global substitution order, ChatGPT first as the universal default
pub const FALLBACK_RANKING: [ProviderId; 6] = [
    ProviderId::ChatGpt,
    ProviderId::Gemini,
    ProviderId::DeepSeek,
    ProviderId::Perplexity,
    ProviderId::Gpai,
    ProviderId::Codex,
];

/// Leading phrase of a routing reason
fn detection_phrase(resolution: &Resolution) -> String {
    if resolution.is_no_signal() {
        "No strong signal, using default".to_string()
    } else {
        format!("{} detected", resolution.category.label())
    }
}

/// Choose the provider for a resolved category given the session's subscriptions
///
/// # Errors
/// Returns `AppError::NoProviderAvailable` when every provider is unsubscribed.
pub fn apply_fallback(
    resolution: Resolution,
    subscriptions: &SubscriptionState,
) -> AppResult<RoutingDecision> {
    let intended = resolution.category.default_provider();
    let detected = detection_phrase(&resolution);

    if subscriptions.is_active(intended) {
        let reason = format!("{} → routed to {}.", detected, intended);
        return Ok(RoutingDecision::direct(resolution, intended, reason));
    }

    let substitute = FALLBACK_RANKING
        .into_iter()
        .find(|p| subscriptions.is_active(*p))
        .ok_or(AppError::NoProviderAvailable {
            category: resolution.category,
            intended,
        })?;

    tracing::debug!(
        category = %resolution.category,
        intended = intended.as_str(),
        substitute = substitute.as_str(),
        "Default provider unsubscribed, substituting"
    );

    let reason = format!(
        "{} → {} unsubscribed, falling back to {}.",
        detected, intended, substitute
    );
    Ok(RoutingDecision::substituted(
        resolution, intended, substitute, reason,
    ))
}
