//! Route definitions for the catalog endpoints.

use axum::routing::get;
use axum::Router;

use crate::handlers::catalog;
use crate::state::AppState;

/// Catalog routes, mounted at the API root.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/datasets", get(catalog::list_datasets))
        .route("/algorithms", get(catalog::list_algorithms))
        .route("/metrics", get(catalog::list_metrics))
}
