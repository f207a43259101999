//! Telemetry and observability setup
//!
//! Configures structured logging with tracing and tracing-subscriber.

use std::sync::Once;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

/// Filter directive used when `RUST_LOG` is unset
pub fn default_filter(level: &str) -> String {
    format!(
        "engine_agent={},tower_http=debug",
        level.to_lowercase()
    )
}

/// Initialize tracing subscriber for structured logging
///
/// Only the first call per process has any effect. `RUST_LOG` takes
/// precedence over the configured level.
///
/// # Examples
///
/// ```no_run
/// engine_agent::telemetry::init("info");
/// tracing::info!("Application started");
/// ```
pub fn init(default_level: &str) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_filter(default_level)));

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    });
}
