//! Prometheus metrics endpoint

use axum::{extract::State, http::StatusCode};

use crate::handlers::AppState;

/// Metrics handler for Prometheus scraping
///
/// ```bash
/// curl http://localhost:3000/metrics
/// # HELP engine_agent_routing_decisions_total Total routing decisions by requesting operation, chosen provider and detected category
/// # TYPE engine_agent_routing_decisions_total counter
/// engine_agent_routing_decisions_total{category="programming",provider="codex",source="prompt"} 3
/// ```
pub async fn handler(State(state): State<AppState>) -> (StatusCode, String) {
    match state.metrics().gather() {
        Ok(output) => (StatusCode::OK, output),
        Err(e) => {
            tracing::error!(error = %e, "Failed to gather metrics for Prometheus scraping");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to gather metrics: {}", e),
            )
        }
    }
}
