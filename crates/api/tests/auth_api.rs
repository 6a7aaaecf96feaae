//! HTTP-level integration tests for registration, login, and auth
//! enforcement.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json, register_user};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_returns_token_and_user(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({
        "username": "alice",
        "email": "alice@example.com",
        "password": "test-password-123",
    });
    let response = post_json(app, "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert_eq!(json["token_type"], "Bearer");
    assert_eq!(json["user"]["username"], "alice");
    assert_eq!(json["user"]["email"], "alice@example.com");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_duplicate_username_conflicts(pool: PgPool) {
    let app = common::build_test_app(pool);
    register_user(&app, "bob").await;

    let body = serde_json::json!({ "username": "bob", "password": "test-password-123" });
    let response = post_json(app, "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_rejects_weak_password(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "username": "carol", "password": "short" });
    let response = post_json(app, "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_succeeds_with_correct_password(pool: PgPool) {
    let app = common::build_test_app(pool);
    register_user(&app, "dave").await;

    let body = serde_json::json!({ "username": "dave", "password": "test-password-123" });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert_eq!(json["user"]["username"], "dave");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_rejects_wrong_password(pool: PgPool) {
    let app = common::build_test_app(pool);
    register_user(&app, "erin").await;

    let body = serde_json::json!({ "username": "erin", "password": "not-the-password" });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_rejects_unknown_user(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "username": "ghost", "password": "whatever-123" });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn protected_route_requires_token(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = common::get(app.clone(), "/api/v1/streams").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(app, "/api/v1/streams", "not-a-real-token").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
