//! HTTP request handlers for the Engine Agent API

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::metrics::Metrics;
use crate::middleware::{request_id_middleware, session_middleware};
use crate::providers::{MockResponder, ProviderResponder};
use crate::router::IntentRouter;
use crate::session::SessionStore;
use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod health;
pub mod history;
pub mod index;
pub mod metrics;
pub mod preview;
pub mod prompt;
pub mod search;
pub mod subscription;

/// Application state shared across all handlers
///
/// All fields are Arc'd for cheap cloning across Axum handlers.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    router: Arc<IntentRouter>,
    sessions: Arc<SessionStore>,
    responder: Arc<dyn ProviderResponder>,
    metrics: Arc<Metrics>,
}

impl AppState {
    /// Create a new AppState from configuration
    ///
    /// # Errors
    /// Returns an error if the classifier rules are invalid or metrics
    /// registration fails.
    pub fn new(config: Arc<Config>) -> AppResult<Self> {
        let router = IntentRouter::from_config(&config)?;
        let sessions = SessionStore::new(&config);
        let metrics = Metrics::new().map_err(|e| {
            AppError::Internal(format!("Failed to initialize metrics: {}", e))
        })?;

        tracing::debug!(
            rules = router.rules().len(),
            max_query_chars = router.max_query_chars(),
            max_sessions = config.sessions.max_sessions,
            "Application state initialized"
        );

        Ok(Self {
            config,
            router: Arc::new(router),
            sessions: Arc::new(sessions),
            responder: Arc::new(MockResponder::new()),
            metrics: Arc::new(metrics),
        })
    }

    /// Replace the provider responder
    pub fn with_responder(mut self, responder: Arc<dyn ProviderResponder>) -> Self {
        self.responder = responder;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn router(&self) -> &IntentRouter {
        &self.router
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn responder(&self) -> &dyn ProviderResponder {
        self.responder.as_ref()
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}

/// Build the full HTTP application
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index::handler))
        .route("/prompt", post(prompt::handler))
        .route("/preview", post(preview::handler))
        .route("/subscription/status", get(subscription::status_handler))
        .route("/subscription", post(subscription::update_handler))
        .route("/history", get(history::handler))
        .route("/history/clear", post(history::clear_handler))
        .route("/search", post(search::search_handler))
        .route("/search-and-route", post(search::search_and_route_handler))
        .route("/health", get(health::handler))
        .route("/metrics", get(metrics::handler))
        .layer(middleware::from_fn(session_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
