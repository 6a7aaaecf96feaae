use std::sync::Arc;

use studio_eval::ProviderSet;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; inner data is behind `Arc` or already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: studio_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Dataset, algorithm, and metric lookup services for the engine and
    /// catalog endpoints.
    pub providers: ProviderSet,
}
