//! Integration tests for the HTTP surface
//!
//! Drives the full application router (middleware included) with
//! `tower::ServiceExt::oneshot`.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use engine_agent::{
    config::Config,
    handlers::{self, AppState},
    middleware::{REQUEST_ID_HEADER, SESSION_COOKIE},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

fn create_test_app() -> Router {
    let state = AppState::new(Arc::new(Config::default())).expect("AppState::new should succeed");
    handlers::app(state)
}

fn post_json(uri: &str, body: Value, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// `name=value` pair from the response's Set-Cookie header
fn session_cookie(response: &axum::response::Response) -> String {
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("session cookie should be set")
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

#[tokio::test]
async fn test_index_serves_html() {
    let response = create_test_app().oneshot(get("/", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers().get(header::CONTENT_TYPE).unwrap();
    assert!(content_type.to_str().unwrap().starts_with("text/html"));
}

#[tokio::test]
async fn test_every_response_has_request_id() {
    let response = create_test_app().oneshot(get("/health", None)).await.unwrap();
    assert!(response.headers().contains_key(REQUEST_ID_HEADER));
}

#[tokio::test]
async fn test_first_contact_issues_session_cookie() {
    let response = create_test_app().oneshot(get("/health", None)).await.unwrap();
    let cookie = session_cookie(&response);
    assert!(cookie.starts_with(&format!("{}=", SESSION_COOKIE)));
}

#[tokio::test]
async fn test_prompt_routes_and_answers() {
    let response = create_test_app()
        .oneshot(post_json(
            "/prompt",
            json!({"prompt": "Write a Python function to reverse a string"}),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["routing"]["provider"], "codex");
    assert_eq!(body["routing"]["category"], "programming");
    assert_eq!(body["routing"]["fallback"], false);
    assert_eq!(body["response"]["agent"], "Codex");
    assert_eq!(body["scores"]["programming"], body["routing"]["score"]);
}

#[tokio::test]
async fn test_empty_prompt_is_bad_request() {
    let response = create_test_app()
        .oneshot(post_json("/prompt", json!({"prompt": "   "}), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("empty"));
}

#[tokio::test]
async fn test_missing_prompt_field_is_bad_request() {
    let response = create_test_app()
        .oneshot(post_json("/prompt", json!({}), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_oversized_prompt_is_bad_request() {
    let prompt = "a".repeat(100_001);
    let response = create_test_app()
        .oneshot(post_json("/prompt", json!({"prompt": prompt}), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_preview_reports_subscription_status() {
    let response = create_test_app()
        .oneshot(post_json(
            "/preview",
            json!({"prompt": "Who discovered penicillin?"}),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["routing"]["provider"], "gemini");
    assert_eq!(body["subscription_status"], true);
    assert_eq!(body["available_agents"].as_array().unwrap().len(), 6);
    assert_eq!(body["prompt"], "Who discovered penicillin?");
}

#[tokio::test]
async fn test_unknown_provider_toggle_is_bad_request() {
    let response = create_test_app()
        .oneshot(post_json(
            "/subscription",
            json!({"agent": "claude", "status": false}),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("Unknown provider"));
}

#[tokio::test]
async fn test_search_returns_mock_results_and_annotation() {
    let response = create_test_app()
        .oneshot(post_json("/search", json!({"query": "rust ownership"}), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 4);
    assert_eq!(results[0]["title"], "Rust ownership - Key Concept 1");
    assert_eq!(results[0]["source"], "Wikipedia");
    assert_eq!(results[3]["title"], "AI Agent Routing Result");
    assert!(
        results[3]["snippet"]
            .as_str()
            .unwrap()
            .contains("This query was classified as: CODEX")
    );
}

#[tokio::test]
async fn test_search_with_empty_query_has_no_results() {
    let response = create_test_app()
        .oneshot(post_json("/search", json!({"query": ""}), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["results"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_search_and_route_puts_router_result_first() {
    let response = create_test_app()
        .oneshot(post_json(
            "/search-and-route",
            json!({"query": "Who discovered penicillin?"}),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 4);
    assert_eq!(results[0]["is_router_result"], true);
    assert_eq!(results[0]["agent"], "gemini");
    assert_eq!(results[0]["agent_color"], "#1a73e8");
    assert!(results[1].get("is_router_result").is_none());
    assert_eq!(body["routing"]["provider"], "gemini");
    assert_eq!(body["agent_response"]["agent"], "Gemini");
}

#[tokio::test]
async fn test_search_and_route_empty_query() {
    let response = create_test_app()
        .oneshot(post_json("/search-and-route", json!({"query": " "}), None))
        .await
        .unwrap();

    let body = body_json(response).await;
    assert!(body["results"].as_array().unwrap().is_empty());
    assert!(body["routing"].is_null());
    assert!(body["agent_response"].is_null());
}

#[tokio::test]
async fn test_health_endpoint() {
    let response = create_test_app().oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "OK");
}

#[tokio::test]
async fn test_metrics_endpoint_after_prompt() {
    let app = create_test_app();
    let response = app
        .clone()
        .oneshot(post_json("/prompt", json!({"prompt": "calculate 2 + 2"}), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/metrics", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("engine_agent_routing_decisions_total"));
    assert!(text.contains("provider=\"gpai\""));
}
