//! Repository for the `stream_jobs` table.
//!
//! Lifecycle transitions go through `claim_run` / `claim_rerun`, which use
//! conditional updates so a concurrent second dispatch loses the race at
//! the database instead of racing in application code. `started_at` is the
//! claim token: setting it is what moves a job out of the dispatchable set.

use sqlx::PgPool;
use studio_core::types::DbId;

use crate::models::stream_job::{CreateStreamJob, StreamJob};

/// Column list for `stream_jobs` queries.
const COLUMNS: &str = "\
    id, name, description, dataset, top_k, metrics, split_start, \
    window_size_secs, started_at, completed_at, error_message, \
    user_id, created_at, updated_at";

pub struct StreamJobRepo;

impl StreamJobRepo {
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateStreamJob,
    ) -> Result<StreamJob, sqlx::Error> {
        let query = format!(
            "INSERT INTO stream_jobs \
                 (name, description, dataset, top_k, metrics, split_start, \
                  window_size_secs, user_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StreamJob>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.dataset)
            .bind(input.top_k)
            .bind(&input.metrics)
            .bind(input.split_start)
            .bind(input.window_size_secs)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Fetch a job owned by `user_id`.
    pub async fn find_by_id(
        pool: &PgPool,
        user_id: DbId,
        job_id: DbId,
    ) -> Result<Option<StreamJob>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM stream_jobs WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, StreamJob>(&query)
            .bind(job_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch a job regardless of owner. Used by the evaluation engine after
    /// dispatch, where ownership was already checked.
    pub async fn find_by_id_unscoped(
        pool: &PgPool,
        job_id: DbId,
    ) -> Result<Option<StreamJob>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM stream_jobs WHERE id = $1");
        sqlx::query_as::<_, StreamJob>(&query)
            .bind(job_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<StreamJob>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM stream_jobs WHERE user_id = $1 ORDER BY created_at DESC");
        sqlx::query_as::<_, StreamJob>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Jobs that have never started, i.e. still dispatchable.
    pub async fn list_available(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<StreamJob>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM stream_jobs \
             WHERE user_id = $1 AND started_at IS NULL \
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, StreamJob>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, user_id: DbId, job_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM stream_jobs WHERE id = $1 AND user_id = $2")
            .bind(job_id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Atomically claim a job for its first run.
    ///
    /// Succeeds only if the job has never started and has at least one
    /// algorithm attached. Returns `false` when another dispatch won the
    /// race or the preconditions no longer hold.
    pub async fn claim_run(pool: &PgPool, job_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE stream_jobs \
             SET started_at = NOW(), updated_at = NOW() \
             WHERE id = $1 \
               AND started_at IS NULL \
               AND EXISTS (SELECT 1 FROM stream_algorithms WHERE stream_job_id = $1)",
        )
        .bind(job_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Atomically claim a finished job for a rerun.
    ///
    /// In one transaction: clears the terminal state, deletes all four
    /// result sets, and sets a fresh `started_at`. Succeeds only if the job
    /// had actually finished; returns `false` otherwise, with nothing
    /// modified. Errors roll the whole transaction back, so a failed reset
    /// never leaves a job stripped of its results.
    pub async fn claim_rerun(pool: &PgPool, job_id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let claimed = sqlx::query(
            "UPDATE stream_jobs \
             SET completed_at = NULL, error_message = NULL, \
                 started_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND completed_at IS NOT NULL",
        )
        .bind(job_id)
        .execute(&mut *tx)
        .await?;

        if claimed.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        for table in [
            "macro_results",
            "micro_results",
            "window_results",
            "user_results",
        ] {
            let query = format!("DELETE FROM {table} WHERE stream_job_id = $1");
            sqlx::query(&query).bind(job_id).execute(&mut *tx).await?;
        }

        tx.commit().await?;
        Ok(true)
    }

    /// Record a successful run. Clears any stale error message.
    pub async fn mark_completed(pool: &PgPool, job_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE stream_jobs \
             SET completed_at = NOW(), error_message = NULL, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(job_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Record a failed run: terminal timestamp plus the error message.
    pub async fn mark_failed(
        pool: &PgPool,
        job_id: DbId,
        error_message: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE stream_jobs \
             SET completed_at = NOW(), error_message = $2, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(job_id)
        .bind(error_message)
        .execute(pool)
        .await?;
        Ok(())
    }
}
