//! Handlers for the per-category result endpoints under
//! `/streams/{id}/results`.

use axum::extract::{Path, State};
use axum::Json;
use studio_core::error::CoreError;
use studio_core::types::DbId;
use studio_db::models::{MacroResultRow, MicroResultRow, UserResultRow, WindowResultRow};
use studio_db::repositories::{ResultRepo, StreamJobRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

async fn ensure_owned(state: &AppState, user_id: DbId, job_id: DbId) -> Result<(), AppError> {
    StreamJobRepo::find_by_id(&state.pool, user_id, job_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "stream job",
            id: job_id,
        }))?;
    Ok(())
}

/// GET /api/v1/streams/{id}/results/macro
pub async fn macro_results(
    user: AuthUser,
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<MacroResultRow>>>> {
    ensure_owned(&state, user.user_id, job_id).await?;
    let rows = ResultRepo::macro_for_job(&state.pool, job_id).await?;
    Ok(Json(DataResponse { data: rows }))
}

/// GET /api/v1/streams/{id}/results/micro
pub async fn micro_results(
    user: AuthUser,
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<MicroResultRow>>>> {
    ensure_owned(&state, user.user_id, job_id).await?;
    let rows = ResultRepo::micro_for_job(&state.pool, job_id).await?;
    Ok(Json(DataResponse { data: rows }))
}

/// GET /api/v1/streams/{id}/results/window
pub async fn window_results(
    user: AuthUser,
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<WindowResultRow>>>> {
    ensure_owned(&state, user.user_id, job_id).await?;
    let rows = ResultRepo::window_for_job(&state.pool, job_id).await?;
    Ok(Json(DataResponse { data: rows }))
}

/// GET /api/v1/streams/{id}/results/user
pub async fn user_results(
    user: AuthUser,
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<UserResultRow>>>> {
    ensure_owned(&state, user.user_id, job_id).await?;
    let rows = ResultRepo::user_for_job(&state.pool, job_id).await?;
    Ok(Json(DataResponse { data: rows }))
}
