//! Health check endpoint

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::handlers::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// "operational", or "degraded" once any metrics recording has failed
    pub metrics_status: String,
    pub active_sessions: usize,
}

/// Liveness handler, always 200
pub async fn handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let metrics_status = if state.metrics().metrics_recording_failures_count() > 0 {
        "degraded"
    } else {
        "operational"
    };

    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "OK".to_string(),
            metrics_status: metrics_status.to_string(),
            active_sessions: state.sessions().session_count().await,
        }),
    )
}
