//! Error types for Engine Agent
//!
//! All errors implement `IntoResponse` for Axum handlers.

use crate::providers::ProviderId;
use crate::router::IntentCategory;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read config file {path}: {source}")]
    ConfigFileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid config file {path}: {reason}")]
    ConfigValidationFailed { path: String, reason: String },

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Invalid rule pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error(
        "No provider available: {category} requests go to {intended}, and every provider is unsubscribed. Enable at least one provider and try again."
    )]
    NoProviderAvailable {
        category: IntentCategory,
        intended: ProviderId,
    },

    #[error("Failed to update subscription for {provider}: {reason}")]
    SubscriptionUpdateFailed { provider: ProviderId, reason: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable label for metrics and logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_)
            | Self::ConfigFileRead { .. }
            | Self::ConfigParseFailed { .. }
            | Self::ConfigValidationFailed { .. }
            | Self::InvalidPattern { .. } => "config",
            Self::Validation(_) => "invalid_input",
            Self::NoProviderAvailable { .. } => "no_provider_available",
            Self::SubscriptionUpdateFailed { .. } => "subscription_update_failed",
            Self::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::NoProviderAvailable { .. } => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
            Self::SubscriptionUpdateFailed { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            Self::Config(msg) | Self::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
            Self::ConfigFileRead { .. }
            | Self::ConfigParseFailed { .. }
            | Self::ConfigValidationFailed { .. }
            | Self::InvalidPattern { .. } => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

/// Convenience type alias for Results
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_creates() {
        let err = AppError::Config("test error".to_string());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_validation_error_creates() {
        let err = AppError::Validation("invalid input".to_string());
        assert_eq!(err.to_string(), "Invalid request: invalid input");
    }

    #[test]
    fn test_no_provider_available_names_category_and_provider() {
        let err = AppError::NoProviderAvailable {
            category: IntentCategory::Programming,
            intended: ProviderId::Codex,
        };
        let msg = err.to_string();
        assert!(msg.contains("programming"));
        assert!(msg.contains("Codex"));
        assert!(msg.contains("unsubscribed"));
    }

    #[test]
    fn test_validation_error_response_status() {
        let response = AppError::Validation("test".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_no_provider_available_response_status() {
        let err = AppError::NoProviderAvailable {
            category: IntentCategory::General,
            intended: ProviderId::ChatGpt,
        };
        assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_subscription_update_failed_response_status() {
        let err = AppError::SubscriptionUpdateFailed {
            provider: ProviderId::Gemini,
            reason: "session expired".to_string(),
        };
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_error_response_status() {
        let response = AppError::Internal("test".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_config_file_read_keeps_path_and_source() {
        let err = AppError::ConfigFileRead {
            path: "/etc/engine.toml".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.to_string().contains("/etc/engine.toml"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_error_kind_labels() {
        assert_eq!(AppError::Validation(String::new()).kind(), "invalid_input");
        assert_eq!(
            AppError::NoProviderAvailable {
                category: IntentCategory::General,
                intended: ProviderId::ChatGpt,
            }
            .kind(),
            "no_provider_available"
        );
    }
}
