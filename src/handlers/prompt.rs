//! Prompt endpoint handler
//!
//! Handles `POST /prompt`: routes the prompt, asks the chosen provider for
//! an answer and appends the exchange to the session's history.

use crate::error::AppError;
use crate::handlers::AppState;
use crate::metrics::RouteSource;
use crate::middleware::RequestId;
use crate::providers::ProviderResponse;
use crate::router::{CategoryScores, RoutingDecision};
use crate::session::SessionId;
use crate::shared::query::{RoutedAnswer, route_and_respond};
use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};

/// Prompt submission from the UI
#[derive(Debug, Clone, Deserialize)]
pub struct PromptRequest {
    #[serde(default)]
    pub prompt: String,
}

/// Routed answer returned to the UI
#[derive(Debug, Serialize)]
pub struct PromptResponse {
    pub success: bool,
    pub routing: RoutingDecision,
    pub scores: CategoryScores,
    pub response: ProviderResponse,
}

/// Prompt handler
///
/// # Errors
/// - 400 for an empty or over-long prompt
/// - 503 when every provider is unsubscribed
pub async fn handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Extension(session_id): Extension<SessionId>,
    Json(request): Json<PromptRequest>,
) -> Result<Json<PromptResponse>, AppError> {
    tracing::debug!(
        request_id = %request_id,
        session_id = %session_id,
        prompt_length = request.prompt.chars().count(),
        "Received prompt"
    );

    let subscriptions = state.sessions().subscriptions(session_id).await;

    let RoutedAnswer {
        decision,
        scores,
        response,
    } = route_and_respond(&state, &request.prompt, &subscriptions, RouteSource::Prompt)
        .await
        .inspect_err(|e| {
            tracing::warn!(
                request_id = %request_id,
                session_id = %session_id,
                error = %e,
                "Prompt could not be routed"
            );
        })?;

    state
        .sessions()
        .append_history(session_id, &request.prompt, &decision, chrono::Local::now())
        .await;

    tracing::info!(
        request_id = %request_id,
        session_id = %session_id,
        provider = decision.provider().as_str(),
        category = %decision.category(),
        fallback = decision.is_fallback(),
        "Prompt answered"
    );

    Ok(Json(PromptResponse {
        success: true,
        routing: decision,
        scores,
        response,
    }))
}
