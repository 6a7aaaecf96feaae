//! Result ingestion: map evaluator output to result rows and persist them.
//!
//! Persistence is best-effort across the four categories and atomic within
//! each one. Macro and micro rows must resolve to a stream algorithm; an
//! unresolvable reference aborts that category so aggregate tables never
//! carry orphaned rows. Window and user rows keep a NULL reference instead,
//! since per-window detail is still useful without attribution.

use std::collections::HashMap;

use sqlx::PgPool;
use studio_core::correlation::correlation_from_label;
use studio_core::types::DbId;
use studio_db::models::{NewMacroResult, NewMicroResult, NewUserResult, NewWindowResult};
use studio_db::models::StreamAlgorithm;
use studio_db::repositories::ResultRepo;
use studio_eval::report::{AlgorithmRef, EvaluationReport, MacroRow, MicroRow, UserRow, WindowRow};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub(crate) enum IngestError {
    #[error("No stream algorithm matches evaluator label '{0}'")]
    UnmatchedAlgorithm(String),
}

/// Correlation id to `stream_algorithms.id` lookup for one job.
pub(crate) fn algorithm_index(algorithms: &[StreamAlgorithm]) -> HashMap<Uuid, DbId> {
    algorithms
        .iter()
        .map(|a| (a.correlation_id, a.id))
        .collect()
}

/// Resolve a result row's algorithm reference to a database id.
///
/// Prefers the first-class correlation id; falls back to parsing the legacy
/// composite label for rows that predate it.
fn resolve(index: &HashMap<Uuid, DbId>, algorithm: &AlgorithmRef) -> Option<DbId> {
    algorithm
        .correlation_id
        .or_else(|| correlation_from_label(&algorithm.label))
        .and_then(|id| index.get(&id).copied())
}

pub(crate) fn macro_rows(
    rows: &[MacroRow],
    index: &HashMap<Uuid, DbId>,
) -> Result<Vec<NewMacroResult>, IngestError> {
    rows.iter()
        .map(|row| {
            let algorithm_id = resolve(index, &row.algorithm)
                .ok_or_else(|| IngestError::UnmatchedAlgorithm(row.algorithm.label.clone()))?;
            Ok(NewMacroResult {
                stream_algorithm_id: algorithm_id,
                metric: row.metric.clone(),
                macro_score: row.macro_score,
                num_windows: row.num_windows,
            })
        })
        .collect()
}

pub(crate) fn micro_rows(
    rows: &[MicroRow],
    index: &HashMap<Uuid, DbId>,
) -> Result<Vec<NewMicroResult>, IngestError> {
    rows.iter()
        .map(|row| {
            let algorithm_id = resolve(index, &row.algorithm)
                .ok_or_else(|| IngestError::UnmatchedAlgorithm(row.algorithm.label.clone()))?;
            Ok(NewMicroResult {
                stream_algorithm_id: algorithm_id,
                metric: row.metric.clone(),
                micro_score: row.micro_score,
                num_users: row.num_users,
            })
        })
        .collect()
}

pub(crate) fn window_rows(rows: &[WindowRow], index: &HashMap<Uuid, DbId>) -> Vec<NewWindowResult> {
    rows.iter()
        .map(|row| NewWindowResult {
            stream_algorithm_id: resolve(index, &row.algorithm),
            metric: row.metric.clone(),
            window_score: row.window_score,
            num_users: row.num_users,
            window_ts: row.window_ts.to_string(),
        })
        .collect()
}

pub(crate) fn user_rows(rows: &[UserRow], index: &HashMap<Uuid, DbId>) -> Vec<NewUserResult> {
    rows.iter()
        .map(|row| NewUserResult {
            stream_algorithm_id: resolve(index, &row.algorithm),
            metric: row.metric.clone(),
            user_score: row.user_score,
            user_ref: row.user,
            window_ts: row.window_ts.to_string(),
        })
        .collect()
}

/// Persist all four result categories for a finished run.
///
/// Each category is attempted independently; a failed category is logged
/// and skipped without affecting the others. Returns how many categories
/// were persisted.
pub(crate) async fn persist_report(
    pool: &PgPool,
    job_id: DbId,
    algorithms: &[StreamAlgorithm],
    report: &EvaluationReport,
) -> usize {
    let index = algorithm_index(algorithms);
    let mut persisted = 0;

    match report.macro_results() {
        Ok(rows) => match macro_rows(rows, &index) {
            Ok(new_rows) => match ResultRepo::insert_macro(pool, job_id, &new_rows).await {
                Ok(n) => {
                    tracing::debug!(job_id, rows = n, "Persisted macro results");
                    persisted += 1;
                }
                Err(e) => tracing::warn!(job_id, error = %e, "Failed to persist macro results"),
            },
            Err(e) => tracing::warn!(job_id, error = %e, "Skipping macro results"),
        },
        Err(e) => tracing::warn!(job_id, error = %e, "No macro results to persist"),
    }

    match report.micro_results() {
        Ok(rows) => match micro_rows(rows, &index) {
            Ok(new_rows) => match ResultRepo::insert_micro(pool, job_id, &new_rows).await {
                Ok(n) => {
                    tracing::debug!(job_id, rows = n, "Persisted micro results");
                    persisted += 1;
                }
                Err(e) => tracing::warn!(job_id, error = %e, "Failed to persist micro results"),
            },
            Err(e) => tracing::warn!(job_id, error = %e, "Skipping micro results"),
        },
        Err(e) => tracing::warn!(job_id, error = %e, "No micro results to persist"),
    }

    match report.window_results() {
        Ok(rows) => {
            let new_rows = window_rows(rows, &index);
            match ResultRepo::insert_window(pool, job_id, &new_rows).await {
                Ok(n) => {
                    tracing::debug!(job_id, rows = n, "Persisted window results");
                    persisted += 1;
                }
                Err(e) => tracing::warn!(job_id, error = %e, "Failed to persist window results"),
            }
        }
        Err(e) => tracing::warn!(job_id, error = %e, "No window results to persist"),
    }

    match report.user_results() {
        Ok(rows) => {
            let new_rows = user_rows(rows, &index);
            match ResultRepo::insert_user(pool, job_id, &new_rows).await {
                Ok(n) => {
                    tracing::debug!(job_id, rows = n, "Persisted user results");
                    persisted += 1;
                }
                Err(e) => tracing::warn!(job_id, error = %e, "Failed to persist user results"),
            }
        }
        Err(e) => tracing::warn!(job_id, error = %e, "No user results to persist"),
    }

    persisted
}
