//! Prometheus metrics collection for Engine Agent
//!
//! Tracks routing decisions, fallbacks, failures, routing latency and
//! subscription toggles. Exposed via `/metrics` in Prometheus text format.
//!
//! Every label comes from a closed enum ([`ProviderId`], [`IntentCategory`],
//! [`RouteSource`]) so label cardinality is fixed at compile time.

use crate::error::AppError;
use crate::providers::ProviderId;
use crate::router::{IntentCategory, RoutingDecision};
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

/// Which operation asked for a routing decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteSource {
    /// `POST /prompt`
    Prompt,
    /// `POST /preview`
    Preview,
    /// `POST /search`
    Search,
    /// `POST /search-and-route`
    SearchAndRoute,
}

impl RouteSource {
    /// Convert source to Prometheus label string
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteSource::Prompt => "prompt",
            RouteSource::Preview => "preview",
            RouteSource::Search => "search",
            RouteSource::SearchAndRoute => "search_and_route",
        }
    }
}

/// Metrics collector for Engine Agent
#[derive(Clone)]
pub struct Metrics {
    pub registry: Arc<Registry>,
    routing_decisions: IntCounterVec,
    fallbacks: IntCounterVec,
    routing_failures: IntCounterVec,
    routing_duration: HistogramVec,
    subscription_updates: IntCounterVec,
    metrics_recording_failures: IntCounterVec,
}

impl Metrics {
    /// Create a new Metrics instance registered with a fresh registry
    ///
    /// # Errors
    ///
    /// Returns an error if metric registration fails (e.g., duplicate names).
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        // Cardinality: 4 sources × 6 providers × 6 categories = 144 series at most
        let routing_decisions = IntCounterVec::new(
            Opts::new(
                "engine_agent_routing_decisions_total",
                "Total routing decisions by requesting operation, chosen provider and detected category",
            ),
            &["source", "provider", "category"],
        )?;

        let fallbacks = IntCounterVec::new(
            Opts::new(
                "engine_agent_fallbacks_total",
                "Total decisions where the default provider was unsubscribed, by intended and substituted provider",
            ),
            &["intended", "provider"],
        )?;

        let routing_failures = IntCounterVec::new(
            Opts::new(
                "engine_agent_routing_failures_total",
                "Total routing requests that ended in an error, by error kind",
            ),
            &["reason"],
        )?;

        let routing_duration = HistogramVec::new(
            HistogramOpts::new(
                "engine_agent_routing_duration_ms",
                "Routing decision latency in milliseconds",
            )
            .buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0, 50.0]),
            &["source"],
        )?;

        let subscription_updates = IntCounterVec::new(
            Opts::new(
                "engine_agent_subscription_updates_total",
                "Total subscription toggles by provider and resulting state",
            ),
            &["provider", "state"],
        )?;

        let metrics_recording_failures = IntCounterVec::new(
            Opts::new(
                "engine_agent_metrics_recording_failures_total",
                "Total metrics recording failures by operation. \
                Indicates Prometheus internal errors.",
            ),
            &["operation"],
        )?;

        registry.register(Box::new(routing_decisions.clone()))?;
        registry.register(Box::new(fallbacks.clone()))?;
        registry.register(Box::new(routing_failures.clone()))?;
        registry.register(Box::new(routing_duration.clone()))?;
        registry.register(Box::new(subscription_updates.clone()))?;
        registry.register(Box::new(metrics_recording_failures.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            routing_decisions,
            fallbacks,
            routing_failures,
            routing_duration,
            subscription_updates,
            metrics_recording_failures,
        })
    }

    /// Record a routing decision (and its fallback, if any)
    ///
    /// Fallbacks are only counted for submitted prompts, so live previews
    /// don't inflate them.
    ///
    /// # Errors
    ///
    /// Returns an error if the label set is rejected by the registry.
    pub fn record_decision(
        &self,
        source: RouteSource,
        decision: &RoutingDecision,
    ) -> Result<(), prometheus::Error> {
        self.routing_decisions
            .get_metric_with_label_values(&[
                source.as_str(),
                decision.provider().as_str(),
                decision.category().as_str(),
            ])?
            .inc();

        if source == RouteSource::Prompt
            && let Some(intended) = decision.intended_provider()
        {
            self.fallbacks
                .get_metric_with_label_values(&[intended.as_str(), decision.provider().as_str()])?
                .inc();
        }
        Ok(())
    }

    /// Record a routing request that failed
    pub fn record_failure(&self, error: &AppError) {
        self.routing_failures
            .with_label_values(&[error.kind()])
            .inc();
    }

    /// Record routing decision duration
    ///
    /// # Errors
    ///
    /// Returns an error if `duration_ms` is NaN, infinite or negative.
    pub fn record_routing_duration(
        &self,
        source: RouteSource,
        duration_ms: f64,
    ) -> Result<(), prometheus::Error> {
        if !duration_ms.is_finite() {
            return Err(prometheus::Error::Msg(format!(
                "Histogram value must be finite (not NaN or Infinity), got: {}",
                duration_ms
            )));
        }

        if duration_ms < 0.0 {
            return Err(prometheus::Error::Msg(format!(
                "Histogram value must be non-negative (duration cannot be negative), got: {}",
                duration_ms
            )));
        }

        self.routing_duration
            .get_metric_with_label_values(&[source.as_str()])?
            .observe(duration_ms);
        Ok(())
    }

    /// Record a subscription toggle
    pub fn record_subscription_update(&self, provider: ProviderId, active: bool) {
        let state = if active { "active" } else { "inactive" };
        self.subscription_updates
            .with_label_values(&[provider.as_str(), state])
            .inc();
    }

    /// Record a failed metrics operation
    pub fn metrics_recording_failure(&self, operation: &str) {
        self.metrics_recording_failures
            .with_label_values(&[operation])
            .inc();
    }

    /// Total routing decisions recorded for one source/provider/category
    pub fn decisions_count(
        &self,
        source: RouteSource,
        provider: ProviderId,
        category: IntentCategory,
    ) -> u64 {
        self.routing_decisions
            .with_label_values(&[source.as_str(), provider.as_str(), category.as_str()])
            .get()
    }

    /// Total fallbacks recorded across every label
    pub fn fallbacks_count(&self) -> u64 {
        self.sum_counter("engine_agent_fallbacks_total")
    }

    /// Total metrics recording failures across every operation
    pub fn metrics_recording_failures_count(&self) -> u64 {
        self.sum_counter("engine_agent_metrics_recording_failures_total")
    }

    fn sum_counter(&self, name: &str) -> u64 {
        self.registry
            .gather()
            .iter()
            .find(|mf| mf.name() == name)
            .map(|mf| {
                mf.get_metric()
                    .iter()
                    .map(|m| m.counter.value.unwrap_or(0.0) as u64)
                    .sum()
            })
            .unwrap_or(0)
    }

    /// Encode every metric family in Prometheus text format
    ///
    /// # Errors
    ///
    /// Returns an error if metric encoding fails.
    pub fn gather(&self) -> Result<String, prometheus::Error> {
        let metric_families = self.registry.gather();
        let metric_count = metric_families.len();

        tracing::debug!(
            metric_family_count = metric_count,
            "Encoding metrics to Prometheus text format"
        );

        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    metric_family_count = metric_count,
                    "Prometheus text encoder failed"
                );
                prometheus::Error::Msg(format!(
                    "Failed to encode {} metric families: {}",
                    metric_count, e
                ))
            })?;

        String::from_utf8(buffer).map_err(|e| {
            prometheus::Error::Msg(format!(
                "Failed to convert metrics to UTF-8 at byte {}: {}",
                e.utf8_error().valid_up_to(),
                e
            ))
        })
    }
}
