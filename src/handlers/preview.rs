//! Live routing preview
//!
//! Handles `POST /preview`, called by the UI (debounced) while the user is
//! typing. Routes the text against the session's subscriptions without
//! asking a provider or touching history.

use crate::error::AppError;
use crate::handlers::AppState;
use crate::metrics::RouteSource;
use crate::providers::ProviderId;
use crate::router::{CategoryScores, RoutingDecision};
use crate::session::SessionId;
use crate::shared::query::{RoutedQuery, route_query};
use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct PreviewRequest {
    #[serde(default)]
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub prompt: String,
    pub routing: RoutingDecision,
    pub scores: CategoryScores,
    /// Whether the detected category's default provider is subscribed
    pub subscription_status: bool,
    pub available_agents: Vec<ProviderId>,
}

pub async fn handler(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
    Json(request): Json<PreviewRequest>,
) -> Result<Json<PreviewResponse>, AppError> {
    let subscriptions = state.sessions().subscriptions(session_id).await;

    let RoutedQuery { decision, scores } = route_query(
        &state,
        &request.prompt,
        &subscriptions,
        RouteSource::Preview,
    )?;

    let subscription_status = subscriptions.is_active(decision.category().default_provider());

    Ok(Json(PreviewResponse {
        prompt: request.prompt,
        routing: decision,
        scores,
        subscription_status,
        available_agents: ProviderId::ALL.to_vec(),
    }))
}
