//! Common test helpers for integration tests.
//!
//! # Note
//!
//! The `#![allow(dead_code)]` attribute is necessary because Rust compiles each
//! integration test file as a separate crate, and not every file uses every
//! helper.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use lead_pipeline::api::{AppState, router};
use lead_pipeline::infrastructure::Repositories;

// =============================================================================
// AppState Creation Helpers
// =============================================================================

/// Creates a test `AppState` over fresh in-memory repositories.
pub fn create_test_app_state() -> AppState {
    AppState::from_repositories(&Repositories::in_memory())
}

/// Creates the full router over fresh in-memory repositories.
pub fn create_test_app() -> Router {
    router(create_test_app_state())
}

// =============================================================================
// Request Helpers
// =============================================================================

/// Sends one request and returns the status and the JSON body (`Null` when
/// the body is empty or not JSON).
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::DELETE, uri, None).await
}

// =============================================================================
// Fixtures
// =============================================================================

/// Creates an agent and returns its id.
pub async fn create_agent(app: &Router, name: &str, email: &str) -> String {
    let (status, body) = post(
        app,
        "/agents",
        serde_json::json!({ "name": name, "email": email }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_str().unwrap().to_string()
}

/// Creates a lead assigned to `agent` and returns the created lead JSON.
pub async fn create_lead(app: &Router, agent: &str, name: &str, status: &str) -> Value {
    let (code, body) = post(
        app,
        "/leads",
        serde_json::json!({
            "name": name,
            "source": "Referral",
            "salesAgent": agent,
            "status": status,
            "tags": ["High Value"],
            "timeToClose": 30,
            "priority": "High",
        }),
    )
    .await;
    assert_eq!(code, StatusCode::CREATED, "{body}");
    body["data"].clone()
}
