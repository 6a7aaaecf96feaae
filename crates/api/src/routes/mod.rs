//! Route definitions.

pub mod auth;
pub mod catalog;
pub mod health;
pub mod streams;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/register                         register (public)
/// /auth/login                            login (public)
///
/// /datasets                              catalog (auth required)
/// /algorithms                            catalog (auth required)
/// /metrics                               catalog (auth required)
///
/// /streams                               list, create
/// /streams/available                     never-dispatched jobs
/// /streams/{id}                          get, delete
/// /streams/{id}/status                   derived status
/// /streams/{id}/algorithms               list, attach
/// /streams/{id}/algorithms/{algorithm_id} detach
/// /streams/{id}/run                      dispatch first run (POST)
/// /streams/{id}/rerun                    reset and dispatch again (POST)
/// /streams/{id}/results/{category}       macro | micro | window | user
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .merge(catalog::router())
        .nest("/streams", streams::router())
}
