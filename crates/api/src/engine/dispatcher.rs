//! Run dispatch: precondition checks, claim, then spawn the orchestrator.
//!
//! Both entry points return synchronously once the job is claimed; the run
//! itself proceeds in a background task. `started_at` is the claim token,
//! so a second dispatch for the same job loses the conditional update and
//! gets a conflict instead of a duplicate run.

use studio_core::error::CoreError;
use studio_core::types::DbId;
use studio_db::repositories::{StreamAlgorithmRepo, StreamJobRepo};

use crate::engine::evaluation;
use crate::error::AppResult;
use crate::state::AppState;

/// Dispatch the first run of a stream job.
///
/// Requires at least one attached algorithm and a job that has never
/// started. Ownership is enforced through the user-scoped lookup.
pub async fn dispatch_run(state: &AppState, user_id: DbId, job_id: DbId) -> AppResult<()> {
    let job = StreamJobRepo::find_by_id(&state.pool, user_id, job_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "stream job",
            id: job_id,
        })?;

    if job.started_at.is_some() {
        return Err(CoreError::Conflict("Stream job was already dispatched".into()).into());
    }

    let algorithms = StreamAlgorithmRepo::count_for_job(&state.pool, job_id).await?;
    if algorithms == 0 {
        return Err(CoreError::Validation(
            "Stream job has no algorithms attached".into(),
        )
        .into());
    }

    // The checks above give precise error messages; the claim is what
    // actually decides a race between concurrent dispatches.
    if !StreamJobRepo::claim_run(&state.pool, job_id).await? {
        return Err(CoreError::Conflict("Stream job was already dispatched".into()).into());
    }

    tracing::info!(job_id, user_id, "Dispatched stream job");
    tokio::spawn(evaluation::run_evaluation(state.clone(), job_id));
    Ok(())
}

/// Dispatch a rerun of a finished stream job.
///
/// Only jobs with a terminal timestamp qualify. The claim transactionally
/// clears the terminal state, deletes all previous results, and sets a
/// fresh `started_at`; a failure inside that transaction leaves the job and
/// its results untouched.
pub async fn dispatch_rerun(state: &AppState, user_id: DbId, job_id: DbId) -> AppResult<()> {
    let job = StreamJobRepo::find_by_id(&state.pool, user_id, job_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "stream job",
            id: job_id,
        })?;

    if job.completed_at.is_none() {
        return Err(CoreError::Conflict(
            "Stream job has not finished; only finished jobs can be rerun".into(),
        )
        .into());
    }

    if !StreamJobRepo::claim_rerun(&state.pool, job_id).await? {
        return Err(CoreError::Conflict("Stream job was already claimed for rerun".into()).into());
    }

    tracing::info!(job_id, user_id, "Dispatched stream job rerun");
    tokio::spawn(evaluation::run_evaluation(state.clone(), job_id));
    Ok(())
}
