//! Mock contextual search
//!
//! `POST /search` returns canned results plus a routing annotation;
//! `POST /search-and-route` also asks the routed provider for an answer and
//! puts it first. Neither endpoint records history.

use crate::error::AppError;
use crate::handlers::AppState;
use crate::metrics::RouteSource;
use crate::providers::{ProviderId, ProviderResponse};
use crate::router::RoutingDecision;
use crate::session::SessionId;
use crate::shared::query::{RoutedAnswer, RoutedQuery, route_and_respond, route_query};
use crate::shared::text::capitalize;
use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};

const MOCK_SOURCES: [&str; 3] = ["Wikipedia", "Academic Journal", "Technical Documentation"];

#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
}

/// One search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub snippet: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_router_result: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<ProviderId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_response: Option<String>,
}

impl SearchResult {
    fn plain(title: String, snippet: String, source: &str) -> Self {
        Self {
            title,
            snippet,
            source: source.to_string(),
            is_router_result: false,
            agent: None,
            agent_color: None,
            full_response: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Serialize)]
pub struct SearchAndRouteResponse {
    pub results: Vec<SearchResult>,
    pub routing: Option<RoutingDecision>,
    pub agent_response: Option<ProviderResponse>,
}

/// Three canned results for a query
fn mock_results(query: &str) -> Vec<SearchResult> {
    MOCK_SOURCES
        .iter()
        .enumerate()
        .map(|(i, source)| {
            SearchResult::plain(
                format!("{} - Key Concept {}", capitalize(query), i + 1),
                format!(
                    "Comprehensive information about {}. This includes relevant details and contextual understanding of the topic.",
                    query
                ),
                source,
            )
        })
        .collect()
}

fn routing_annotation(decision: &RoutingDecision) -> SearchResult {
    SearchResult::plain(
        "AI Agent Routing Result".to_string(),
        format!(
            "This query was classified as: {}. Reason: {}",
            decision.provider().as_str().to_uppercase(),
            decision.reason()
        ),
        "Engine Agent",
    )
}

fn router_result(decision: &RoutingDecision, response: &ProviderResponse) -> SearchResult {
    SearchResult {
        title: format!(
            "AI ENGINE AGENT: Routed to {}",
            decision.provider().as_str().to_uppercase()
        ),
        snippet: format!(
            "ROUTER DECISION: {}\n\n{}",
            decision.reason(),
            response.response
        ),
        source: format!("Agent: {} at {}", response.agent, response.timestamp),
        is_router_result: true,
        agent: Some(decision.provider()),
        agent_color: Some(response.agent_color.clone()),
        full_response: Some(response.response.clone()),
    }
}

/// `POST /search`
///
/// An empty query yields no results.
pub async fn search_handler(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    if request.query.trim().is_empty() {
        return Ok(Json(SearchResponse {
            results: Vec::new(),
        }));
    }

    let subscriptions = state.sessions().subscriptions(session_id).await;
    let RoutedQuery { decision, .. } =
        route_query(&state, &request.query, &subscriptions, RouteSource::Search)?;

    let mut results = mock_results(&request.query);
    results.push(routing_annotation(&decision));

    Ok(Json(SearchResponse { results }))
}

/// `POST /search-and-route`
///
/// An empty query yields no results and no routing.
pub async fn search_and_route_handler(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchAndRouteResponse>, AppError> {
    if request.query.trim().is_empty() {
        return Ok(Json(SearchAndRouteResponse {
            results: Vec::new(),
            routing: None,
            agent_response: None,
        }));
    }

    let subscriptions = state.sessions().subscriptions(session_id).await;
    let RoutedAnswer {
        decision, response, ..
    } = route_and_respond(
        &state,
        &request.query,
        &subscriptions,
        RouteSource::SearchAndRoute,
    )
    .await?;

    let mut results = Vec::with_capacity(MOCK_SOURCES.len() + 1);
    results.push(router_result(&decision, &response));
    results.extend(mock_results(&request.query));

    tracing::info!(
        session_id = %session_id,
        provider = decision.provider().as_str(),
        result_count = results.len(),
        "Search routed"
    );

    Ok(Json(SearchAndRouteResponse {
        results,
        routing: Some(decision),
        agent_response: Some(response),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_results_titles_and_sources() {
        let results = mock_results("rust ownership");
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].title, "Rust ownership - Key Concept 1");
        assert_eq!(results[2].title, "Rust ownership - Key Concept 3");
        let sources: Vec<_> = results.iter().map(|r| r.source.as_str()).collect();
        assert_eq!(sources, MOCK_SOURCES.to_vec());
        assert!(results.iter().all(|r| !r.is_router_result));

        let shouted = mock_results("RUST Ownership");
        assert_eq!(shouted[0].title, "Rust ownership - Key Concept 1");
    }

    #[test]
    fn test_plain_result_omits_router_fields() {
        let json = serde_json::to_value(&mock_results("x")[0]).unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("is_router_result"));
        assert!(!obj.contains_key("agent"));
    }
}
