//! Subscription toggle endpoints
//!
//! `GET /subscription/status` returns the session's toggles and
//! `POST /subscription` flips one provider.

use crate::error::AppError;
use crate::handlers::AppState;
use crate::middleware::RequestId;
use crate::providers::ProviderId;
use crate::session::{SessionId, SubscriptionState};
use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};

/// Toggle request
///
/// `agent` stays a string so an unknown provider is reported as a 400 with
/// the list of valid ids instead of a generic JSON rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionRequest {
    pub agent: String,
    pub status: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubscriptionResponse {
    pub success: bool,
    pub agent: ProviderId,
    pub status: bool,
    pub subscriptions: SubscriptionState,
}

/// Current subscription toggles for the session
pub async fn status_handler(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
) -> Json<SubscriptionState> {
    Json(state.sessions().subscriptions(session_id).await)
}

/// Set one provider's toggle
///
/// # Errors
/// - 400 for an unknown provider
/// - 500 if the update could not be applied (state is left unchanged)
pub async fn update_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Extension(session_id): Extension<SessionId>,
    Json(request): Json<SubscriptionRequest>,
) -> Result<Json<SubscriptionResponse>, AppError> {
    let provider: ProviderId = request.agent.parse().map_err(AppError::Validation)?;

    let subscriptions = state
        .sessions()
        .set_subscription(session_id, provider, request.status)
        .await
        .inspect_err(|e| {
            tracing::error!(
                request_id = %request_id,
                session_id = %session_id,
                provider = provider.as_str(),
                error = %e,
                "Subscription update failed"
            );
        })?;

    state
        .metrics()
        .record_subscription_update(provider, request.status);

    Ok(Json(SubscriptionResponse {
        success: true,
        agent: provider,
        status: request.status,
        subscriptions,
    }))
}
