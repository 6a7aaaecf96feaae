//! Handlers for the `/streams` resource: job CRUD, algorithm attachment,
//! and run dispatch.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use studio_core::correlation::correlation_id;
use studio_core::error::CoreError;
use studio_core::status::JobStatus;
use studio_core::types::DbId;
use studio_db::models::{AddAlgorithm, CreateStreamJob, StreamAlgorithm, StreamJob};
use studio_db::repositories::{StreamAlgorithmRepo, StreamJobRepo};

use crate::engine::dispatcher;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// A stream job with its derived status.
#[derive(Debug, Serialize)]
pub struct StreamJobView {
    #[serde(flatten)]
    pub job: StreamJob,
    pub status: JobStatus,
}

/// Lightweight status payload for `GET /streams/{id}/status`.
#[derive(Debug, Serialize)]
pub struct StreamStatus {
    pub id: DbId,
    pub name: String,
    pub status: JobStatus,
}

async fn view(state: &AppState, job: StreamJob) -> Result<StreamJobView, AppError> {
    let count = StreamAlgorithmRepo::count_for_job(&state.pool, job.id).await?;
    let status = job.status(count > 0);
    Ok(StreamJobView { job, status })
}

/// Fetch a job owned by the caller or fail with 404.
async fn owned_job(state: &AppState, user_id: DbId, job_id: DbId) -> Result<StreamJob, AppError> {
    StreamJobRepo::find_by_id(&state.pool, user_id, job_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "stream job",
                id: job_id,
            })
        })
}

// ---------------------------------------------------------------------------
// Job CRUD
// ---------------------------------------------------------------------------

/// POST /api/v1/streams
///
/// Create a stream job. The run configuration is validated against the
/// catalog here and is immutable afterwards.
pub async fn create_stream(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateStreamJob>,
) -> AppResult<(StatusCode, Json<DataResponse<StreamJobView>>)> {
    if input.name.trim().is_empty() {
        return Err(CoreError::Validation("Stream name must not be empty".into()).into());
    }
    if input.top_k < 1 {
        return Err(CoreError::Validation("top_k must be at least 1".into()).into());
    }
    if input.window_size_secs < 1 {
        return Err(CoreError::Validation("window_size_secs must be at least 1".into()).into());
    }
    if input.metrics.is_empty() {
        return Err(CoreError::Validation("At least one metric is required".into()).into());
    }
    for metric in &input.metrics {
        if state.providers.metrics.resolve(metric).is_none() {
            return Err(CoreError::Validation(format!("Unknown metric '{metric}'")).into());
        }
    }
    if state.providers.datasets.resolve(&input.dataset).is_none() {
        return Err(CoreError::Validation(format!("Unknown dataset '{}'", input.dataset)).into());
    }

    let job = StreamJobRepo::create(&state.pool, user.user_id, &input).await?;
    tracing::info!(job_id = job.id, user_id = user.user_id, "Created stream job");

    let view = view(&state, job).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: view })))
}

/// GET /api/v1/streams
pub async fn list_streams(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<StreamJobView>>>> {
    let jobs = StreamJobRepo::list_for_user(&state.pool, user.user_id).await?;
    let mut views = Vec::with_capacity(jobs.len());
    for job in jobs {
        views.push(view(&state, job).await?);
    }
    Ok(Json(DataResponse { data: views }))
}

/// GET /api/v1/streams/available
///
/// Jobs that have never been dispatched, i.e. still configurable.
pub async fn available_streams(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<StreamJobView>>>> {
    let jobs = StreamJobRepo::list_available(&state.pool, user.user_id).await?;
    let mut views = Vec::with_capacity(jobs.len());
    for job in jobs {
        views.push(view(&state, job).await?);
    }
    Ok(Json(DataResponse { data: views }))
}

/// GET /api/v1/streams/{id}
pub async fn get_stream(
    user: AuthUser,
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
) -> AppResult<Json<DataResponse<StreamJobView>>> {
    let job = owned_job(&state, user.user_id, job_id).await?;
    let view = view(&state, job).await?;
    Ok(Json(DataResponse { data: view }))
}

/// DELETE /api/v1/streams/{id}
///
/// Deletes the job together with its algorithms and results (cascade).
pub async fn delete_stream(
    user: AuthUser,
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = StreamJobRepo::delete(&state.pool, user.user_id, job_id).await?;
    if !deleted {
        return Err(CoreError::NotFound {
            entity: "stream job",
            id: job_id,
        }
        .into());
    }
    tracing::info!(job_id, user_id = user.user_id, "Deleted stream job");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/streams/{id}/status
pub async fn get_status(
    user: AuthUser,
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
) -> AppResult<Json<DataResponse<StreamStatus>>> {
    let job = owned_job(&state, user.user_id, job_id).await?;
    let count = StreamAlgorithmRepo::count_for_job(&state.pool, job_id).await?;
    let status = StreamStatus {
        id: job.id,
        name: job.name.clone(),
        status: job.status(count > 0),
    };
    Ok(Json(DataResponse { data: status }))
}

// ---------------------------------------------------------------------------
// Algorithm attachment
// ---------------------------------------------------------------------------

/// POST /api/v1/streams/{id}/algorithms
///
/// Attach an algorithm to a not-yet-dispatched job. Parameters are
/// validated by instantiating the algorithm once, so bad configuration is
/// rejected here instead of failing the run later.
pub async fn add_algorithm(
    user: AuthUser,
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
    Json(input): Json<AddAlgorithm>,
) -> AppResult<(StatusCode, Json<DataResponse<StreamAlgorithm>>)> {
    let job = owned_job(&state, user.user_id, job_id).await?;
    if job.started_at.is_some() {
        return Err(CoreError::Conflict(
            "Cannot modify algorithms after the job was dispatched".into(),
        )
        .into());
    }

    let factory = state
        .providers
        .algorithms
        .resolve(&input.name)
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(format!(
                "Unknown algorithm '{}'",
                input.name
            )))
        })?;

    let parameters = input.parameters.unwrap_or_else(|| factory.default_params());
    factory.instantiate(&parameters)?;

    let correlation = correlation_id(job_id, &input.name);
    let algorithm =
        StreamAlgorithmRepo::add(&state.pool, job_id, &input.name, correlation, &parameters)
            .await?;

    tracing::info!(job_id, algorithm = %algorithm.algorithm_name, "Attached algorithm");
    Ok((StatusCode::CREATED, Json(DataResponse { data: algorithm })))
}

/// GET /api/v1/streams/{id}/algorithms
pub async fn list_algorithms(
    user: AuthUser,
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<StreamAlgorithm>>>> {
    owned_job(&state, user.user_id, job_id).await?;
    let algorithms = StreamAlgorithmRepo::list_for_job(&state.pool, job_id).await?;
    Ok(Json(DataResponse { data: algorithms }))
}

/// DELETE /api/v1/streams/{id}/algorithms/{algorithm_id}
pub async fn remove_algorithm(
    user: AuthUser,
    State(state): State<AppState>,
    Path((job_id, algorithm_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let job = owned_job(&state, user.user_id, job_id).await?;
    if job.started_at.is_some() {
        return Err(CoreError::Conflict(
            "Cannot modify algorithms after the job was dispatched".into(),
        )
        .into());
    }

    let removed = StreamAlgorithmRepo::remove(&state.pool, job_id, algorithm_id).await?;
    if !removed {
        return Err(CoreError::NotFound {
            entity: "stream algorithm",
            id: algorithm_id,
        }
        .into());
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// POST /api/v1/streams/{id}/run
///
/// Dispatch the first run. Returns 202 once the job is claimed; the run
/// proceeds in the background.
pub async fn run_stream(
    user: AuthUser,
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
) -> AppResult<(StatusCode, Json<DataResponse<StreamStatus>>)> {
    dispatcher::dispatch_run(&state, user.user_id, job_id).await?;

    let job = owned_job(&state, user.user_id, job_id).await?;
    let status = StreamStatus {
        id: job.id,
        name: job.name.clone(),
        status: job.status(true),
    };
    Ok((StatusCode::ACCEPTED, Json(DataResponse { data: status })))
}

/// POST /api/v1/streams/{id}/rerun
///
/// Reset a finished job and dispatch it again. Previous results are
/// deleted as part of the claim.
pub async fn rerun_stream(
    user: AuthUser,
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
) -> AppResult<(StatusCode, Json<DataResponse<StreamStatus>>)> {
    dispatcher::dispatch_rerun(&state, user.user_id, job_id).await?;

    let job = owned_job(&state, user.user_id, job_id).await?;
    let status = StreamStatus {
        id: job.id,
        name: job.name.clone(),
        status: job.status(true),
    };
    Ok((StatusCode::ACCEPTED, Json(DataResponse { data: status })))
}
