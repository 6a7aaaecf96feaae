//! Shared helpers for API integration tests.
//!
//! `build_test_app` mirrors the router construction in `main.rs` so tests
//! exercise the same middleware stack that production uses, with a fixed
//! JWT secret instead of environment configuration.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use studio_api::auth::jwt::JwtConfig;
use studio_api::config::ServerConfig;
use studio_api::router::build_app_router;
use studio_api::state::AppState;
use studio_eval::registry::Registry;

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        db_max_connections: 5,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Application state backed by the reference provider registry.
pub fn test_state(pool: PgPool) -> AppState {
    AppState {
        pool,
        config: Arc::new(test_config()),
        providers: Arc::new(Registry::reference()).provider_set(),
    }
}

/// Build the full application router with all middleware layers.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    build_app_router(test_state(pool), &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
}

// ---------------------------------------------------------------------------
// Domain fixtures
// ---------------------------------------------------------------------------

/// Register a user via the API and return their access token.
pub async fn register_user(app: &Router, username: &str) -> String {
    let body = serde_json::json!({
        "username": username,
        "password": "test-password-123",
    });
    let response = post_json(app.clone(), "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    json["access_token"].as_str().unwrap().to_string()
}

/// JSON body for a valid stream job against the `demo-small` reference
/// dataset (events span epoch seconds 1,000,000 to 1,600,000).
pub fn demo_stream_body(name: &str) -> serde_json::Value {
    let split_start = chrono::DateTime::from_timestamp(1_300_000, 0).unwrap();
    serde_json::json!({
        "name": name,
        "dataset": "demo-small",
        "top_k": 5,
        "metrics": ["Precision", "Recall"],
        "split_start": split_start.to_rfc3339(),
        "window_size_secs": 100_000,
    })
}

/// Create a stream job via the API and return its id.
pub async fn create_stream(app: &Router, token: &str, name: &str) -> i64 {
    let response =
        post_json_auth(app.clone(), "/api/v1/streams", token, demo_stream_body(name)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    json["data"]["id"].as_i64().unwrap()
}

/// Attach a reference algorithm to a job via the API.
pub async fn attach_algorithm(app: &Router, token: &str, job_id: i64, name: &str) {
    let body = serde_json::json!({ "name": name });
    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/streams/{job_id}/algorithms"),
        token,
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

/// Poll the status endpoint until the job reaches a terminal status.
///
/// Panics after ~10 seconds so a hung run fails the test instead of the
/// harness.
pub async fn wait_until_terminal(app: &Router, token: &str, job_id: i64) -> String {
    for _ in 0..100 {
        let response =
            get_auth(app.clone(), &format!("/api/v1/streams/{job_id}/status"), token).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let status = json["data"]["status"].as_str().unwrap().to_string();
        if status == "completed" || status == "failed" {
            return status;
        }
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    }
    panic!("stream job {job_id} did not reach a terminal status in time");
}
