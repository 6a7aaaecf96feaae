//! Evaluation orchestrator.
//!
//! [`run_evaluation`] executes one dispatched run end to end and records its
//! outcome on the job row. It never propagates an error to its caller: any
//! failure is stringified into `error_message` and the job goes terminal
//! either way.

use studio_core::types::DbId;
use studio_db::repositories::{StreamAlgorithmRepo, StreamJobRepo};
use studio_eval::{EvalError, PipelineBuilder, SlidingWindow};

use crate::engine::ingest;
use crate::state::AppState;

/// Everything that can fail inside a run. The `Display` form becomes the
/// job's `error_message`.
#[derive(Debug, thiserror::Error)]
pub(crate) enum RunError {
    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),

    #[error("Stream job {0} disappeared before evaluation")]
    MissingJob(DbId),

    #[error("Evaluation task panicked: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Execute a claimed run and record its outcome.
///
/// On success the job is marked completed even if some result categories
/// failed to persist; on any failure the job is marked failed with the
/// error message. Failures to record the outcome itself are logged only.
pub async fn run_evaluation(state: AppState, job_id: DbId) {
    tracing::info!(job_id, "Starting evaluation run");

    match execute(&state, job_id).await {
        Ok(categories) => {
            tracing::info!(job_id, categories, "Evaluation run completed");
            if let Err(e) = StreamJobRepo::mark_completed(&state.pool, job_id).await {
                tracing::error!(job_id, error = %e, "Failed to record run completion");
            }
        }
        Err(e) => {
            tracing::error!(job_id, error = %e, "Evaluation run failed");
            if let Err(mark) = StreamJobRepo::mark_failed(&state.pool, job_id, &e.to_string()).await
            {
                tracing::error!(job_id, error = %mark, "Failed to record run failure");
            }
        }
    }
}

/// Build and run the pipeline, then persist results.
///
/// Returns the number of result categories that were persisted.
async fn execute(state: &AppState, job_id: DbId) -> Result<usize, RunError> {
    let job = StreamJobRepo::find_by_id_unscoped(&state.pool, job_id)
        .await?
        .ok_or(RunError::MissingJob(job_id))?;
    let algorithms = StreamAlgorithmRepo::list_for_job(&state.pool, job_id).await?;
    if algorithms.is_empty() {
        return Err(EvalError::Configuration("No algorithms attached to this job".into()).into());
    }

    let dataset = state
        .providers
        .datasets
        .resolve(&job.dataset)
        .ok_or_else(|| EvalError::Configuration(format!("Unknown dataset '{}'", job.dataset)))?;
    // Loading is blocking and potentially large.
    let data = tokio::task::spawn_blocking(move || dataset.load()).await??;

    let top_k = usize::try_from(job.top_k).unwrap_or(0);
    let window = SlidingWindow::new(job.split_start.timestamp(), job.window_size_secs, top_k)?;

    let mut builder = PipelineBuilder::new().with_window(window);
    for metric in &job.metrics {
        let spec = state
            .providers
            .metrics
            .resolve(metric)
            .ok_or_else(|| EvalError::Configuration(format!("Unknown metric '{metric}'")))?;
        builder.add_metric(spec);
    }
    for algo in &algorithms {
        // An attached algorithm the registry no longer knows is skipped, not
        // fatal: the run proceeds with whatever still resolves. If nothing
        // does, `build()` rejects the empty set below.
        let Some(factory) = state.providers.algorithms.resolve(&algo.algorithm_name) else {
            tracing::error!(
                job_id,
                algorithm = %algo.algorithm_name,
                "Skipping unknown algorithm"
            );
            continue;
        };
        builder.add_algorithm(factory.as_ref(), &algo.parameters, algo.correlation_id)?;
    }
    let pipeline = builder.build()?;

    let report = tokio::task::spawn_blocking(move || pipeline.run(&data)).await??;

    Ok(ingest::persist_report(&state.pool, job_id, &algorithms, &report).await)
}
