//! Handlers for the read-only catalog endpoints: datasets, algorithms,
//! and metrics available for new stream jobs.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// One registered dataset and its event timestamp range, which clients use
/// to pick a valid split point.
#[derive(Debug, Serialize)]
pub struct DatasetInfo {
    pub name: String,
    pub start_ts: i64,
    pub end_ts: i64,
}

/// One registered algorithm and its default parameter map.
#[derive(Debug, Serialize)]
pub struct AlgorithmInfo {
    pub name: String,
    pub default_params: serde_json::Value,
}

/// GET /api/v1/datasets
pub async fn list_datasets(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<DatasetInfo>>>> {
    let mut datasets = Vec::new();
    for name in state.providers.datasets.names() {
        let Some(dataset) = state.providers.datasets.resolve(&name) else {
            continue;
        };
        match dataset.timestamp_range() {
            Ok((start_ts, end_ts)) => datasets.push(DatasetInfo {
                name,
                start_ts,
                end_ts,
            }),
            Err(e) => tracing::warn!(dataset = %name, error = %e, "Skipping dataset in catalog"),
        }
    }
    Ok(Json(DataResponse { data: datasets }))
}

/// GET /api/v1/algorithms
pub async fn list_algorithms(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<AlgorithmInfo>>>> {
    let algorithms = state
        .providers
        .algorithms
        .names()
        .into_iter()
        .filter_map(|name| {
            let factory = state.providers.algorithms.resolve(&name)?;
            Some(AlgorithmInfo {
                name,
                default_params: factory.default_params(),
            })
        })
        .collect();
    Ok(Json(DataResponse { data: algorithms }))
}

/// GET /api/v1/metrics
pub async fn list_metrics(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<String>>>> {
    Ok(Json(DataResponse {
        data: state.providers.metrics.names(),
    }))
}
