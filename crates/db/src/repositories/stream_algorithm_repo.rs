//! Repository for the `stream_algorithms` table.

use sqlx::PgPool;
use studio_core::types::DbId;
use uuid::Uuid;

use crate::models::stream_algorithm::StreamAlgorithm;

/// Column list for `stream_algorithms` queries.
const COLUMNS: &str =
    "id, stream_job_id, algorithm_name, correlation_id, parameters, added_at";

pub struct StreamAlgorithmRepo;

impl StreamAlgorithmRepo {
    /// Attach an algorithm to a job. The correlation id is deterministic per
    /// (job, algorithm name), so attaching the same algorithm twice hits the
    /// unique constraint and surfaces as a conflict.
    pub async fn add(
        pool: &PgPool,
        job_id: DbId,
        algorithm_name: &str,
        correlation_id: Uuid,
        parameters: &serde_json::Value,
    ) -> Result<StreamAlgorithm, sqlx::Error> {
        let query = format!(
            "INSERT INTO stream_algorithms \
                 (stream_job_id, algorithm_name, correlation_id, parameters) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StreamAlgorithm>(&query)
            .bind(job_id)
            .bind(algorithm_name)
            .bind(correlation_id)
            .bind(parameters)
            .fetch_one(pool)
            .await
    }

    pub async fn list_for_job(
        pool: &PgPool,
        job_id: DbId,
    ) -> Result<Vec<StreamAlgorithm>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM stream_algorithms \
             WHERE stream_job_id = $1 ORDER BY added_at, id"
        );
        sqlx::query_as::<_, StreamAlgorithm>(&query)
            .bind(job_id)
            .fetch_all(pool)
            .await
    }

    pub async fn count_for_job(pool: &PgPool, job_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM stream_algorithms WHERE stream_job_id = $1")
            .bind(job_id)
            .fetch_one(pool)
            .await
    }

    pub async fn remove(
        pool: &PgPool,
        job_id: DbId,
        algorithm_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM stream_algorithms WHERE id = $1 AND stream_job_id = $2")
                .bind(algorithm_id)
                .bind(job_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
