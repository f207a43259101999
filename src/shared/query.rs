//! Shared routing flow used by the prompt, preview and search endpoints
//!
//! Every endpoint that needs a decision goes through [`route_query`], so
//! validation, timing, logging and metrics are identical across them.
//! [`route_and_respond`] adds the provider's answer on top.

use crate::error::AppResult;
use crate::handlers::AppState;
use crate::metrics::RouteSource;
use crate::providers::ProviderResponse;
use crate::router::{CategoryScores, RoutingDecision};
use crate::session::SubscriptionState;
use std::time::Instant;

/// A routing decision with the scores behind it
#[derive(Debug, Clone)]
pub struct RoutedQuery {
    pub decision: RoutingDecision,
    pub scores: CategoryScores,
}

/// A routed query plus the chosen provider's answer
#[derive(Debug, Clone)]
pub struct RoutedAnswer {
    pub decision: RoutingDecision,
    pub scores: CategoryScores,
    pub response: ProviderResponse,
}

/// Route query text against a subscription snapshot
///
/// Metrics failures are logged and counted but never fail the request.
///
/// # Errors
/// - `AppError::Validation` for empty or over-long text
/// - `AppError::NoProviderAvailable` when every provider is unsubscribed
pub fn route_query(
    state: &AppState,
    text: &str,
    subscriptions: &SubscriptionState,
    source: RouteSource,
) -> AppResult<RoutedQuery> {
    let metrics = state.metrics();
    let routing_start = Instant::now();

    let result = state.router().route_with_scores(text, subscriptions);
    let routing_duration_ms = routing_start.elapsed().as_secs_f64() * 1000.0;

    if let Err(e) = metrics.record_routing_duration(source, routing_duration_ms) {
        tracing::error!(
            error = %e,
            source = source.as_str(),
            "Metrics recording failed (non-fatal)"
        );
        metrics.metrics_recording_failure("record_routing_duration");
    }

    let (decision, scores) = match result {
        Ok(routed) => routed,
        Err(e) => {
            metrics.record_failure(&e);
            return Err(e);
        }
    };

    if let Err(e) = metrics.record_decision(source, &decision) {
        tracing::error!(
            error = %e,
            provider = decision.provider().as_str(),
            category = %decision.category(),
            "Metrics recording failed (non-fatal)"
        );
        metrics.metrics_recording_failure("record_decision");
    }

    tracing::debug!(
        source = source.as_str(),
        provider = decision.provider().as_str(),
        routing_duration_ms,
        "Query routed"
    );

    Ok(RoutedQuery { decision, scores })
}

/// Route query text and fetch the chosen provider's answer
///
/// # Errors
/// Same as [`route_query`], plus any error from the responder.
pub async fn route_and_respond(
    state: &AppState,
    text: &str,
    subscriptions: &SubscriptionState,
    source: RouteSource,
) -> AppResult<RoutedAnswer> {
    let RoutedQuery { decision, scores } = route_query(state, text, subscriptions, source)?;

    let response = state
        .responder()
        .respond(decision.provider(), text)
        .await?;

    Ok(RoutedAnswer {
        decision,
        scores,
        response,
    })
}
