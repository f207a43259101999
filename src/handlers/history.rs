//! Request history endpoints

use crate::handlers::AppState;
use crate::session::{HistoryEntry, SessionId};
use axum::{Extension, Json, extract::State};
use serde_json::{Value, json};

/// `GET /history`: entries for the session, most recent first
pub async fn handler(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
) -> Json<Vec<HistoryEntry>> {
    Json(state.sessions().history(session_id).await)
}

/// `POST /history/clear`
pub async fn clear_handler(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
) -> Json<Value> {
    state.sessions().clear_history(session_id).await;
    Json(json!({ "success": true }))
}
