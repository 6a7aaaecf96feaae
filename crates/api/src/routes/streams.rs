//! Route definitions for the `/streams` resource.
//!
//! All endpoints require authentication.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::{evaluations, streams};
use crate::state::AppState;

/// Routes mounted at `/streams`.
///
/// ```text
/// GET    /                                  -> list_streams
/// POST   /                                  -> create_stream
/// GET    /available                         -> available_streams
/// GET    /{id}                              -> get_stream
/// DELETE /{id}                              -> delete_stream
/// GET    /{id}/status                       -> get_status
/// GET    /{id}/algorithms                   -> list_algorithms
/// POST   /{id}/algorithms                   -> add_algorithm
/// DELETE /{id}/algorithms/{algorithm_id}    -> remove_algorithm
/// POST   /{id}/run                          -> run_stream
/// POST   /{id}/rerun                        -> rerun_stream
/// GET    /{id}/results/macro                -> macro_results
/// GET    /{id}/results/micro                -> micro_results
/// GET    /{id}/results/window               -> window_results
/// GET    /{id}/results/user                 -> user_results
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(streams::list_streams).post(streams::create_stream))
        .route("/available", get(streams::available_streams))
        .route("/{id}", get(streams::get_stream).delete(streams::delete_stream))
        .route("/{id}/status", get(streams::get_status))
        .route(
            "/{id}/algorithms",
            get(streams::list_algorithms).post(streams::add_algorithm),
        )
        .route(
            "/{id}/algorithms/{algorithm_id}",
            delete(streams::remove_algorithm),
        )
        .route("/{id}/run", post(streams::run_stream))
        .route("/{id}/rerun", post(streams::rerun_stream))
        .route("/{id}/results/macro", get(evaluations::macro_results))
        .route("/{id}/results/micro", get(evaluations::micro_results))
        .route("/{id}/results/window", get(evaluations::window_results))
        .route("/{id}/results/user", get(evaluations::user_results))
}
