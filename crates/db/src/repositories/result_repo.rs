//! Repository for the four result tables.
//!
//! Each insert batch runs in its own transaction: a category is persisted
//! entirely or not at all, and a failed category never undoes categories
//! already committed.

use sqlx::PgPool;
use studio_core::types::DbId;

use crate::models::result::{
    MacroResultRow, MicroResultRow, NewMacroResult, NewMicroResult, NewUserResult,
    NewWindowResult, UserResultRow, WindowResultRow,
};

pub struct ResultRepo;

impl ResultRepo {
    pub async fn insert_macro(
        pool: &PgPool,
        job_id: DbId,
        rows: &[NewMacroResult],
    ) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;
        for row in rows {
            sqlx::query(
                "INSERT INTO macro_results \
                     (stream_job_id, stream_algorithm_id, metric, macro_score, num_windows) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(job_id)
            .bind(row.stream_algorithm_id)
            .bind(&row.metric)
            .bind(row.macro_score)
            .bind(row.num_windows)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(rows.len() as u64)
    }

    pub async fn insert_micro(
        pool: &PgPool,
        job_id: DbId,
        rows: &[NewMicroResult],
    ) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;
        for row in rows {
            sqlx::query(
                "INSERT INTO micro_results \
                     (stream_job_id, stream_algorithm_id, metric, micro_score, num_users) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(job_id)
            .bind(row.stream_algorithm_id)
            .bind(&row.metric)
            .bind(row.micro_score)
            .bind(row.num_users)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(rows.len() as u64)
    }

    pub async fn insert_window(
        pool: &PgPool,
        job_id: DbId,
        rows: &[NewWindowResult],
    ) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;
        for row in rows {
            sqlx::query(
                "INSERT INTO window_results \
                     (stream_job_id, stream_algorithm_id, metric, window_score, \
                      num_users, window_ts) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(job_id)
            .bind(row.stream_algorithm_id)
            .bind(&row.metric)
            .bind(row.window_score)
            .bind(row.num_users)
            .bind(&row.window_ts)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(rows.len() as u64)
    }

    pub async fn insert_user(
        pool: &PgPool,
        job_id: DbId,
        rows: &[NewUserResult],
    ) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;
        for row in rows {
            sqlx::query(
                "INSERT INTO user_results \
                     (stream_job_id, stream_algorithm_id, metric, user_score, \
                      user_ref, window_ts) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(job_id)
            .bind(row.stream_algorithm_id)
            .bind(&row.metric)
            .bind(row.user_score)
            .bind(row.user_ref)
            .bind(&row.window_ts)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(rows.len() as u64)
    }

    pub async fn macro_for_job(
        pool: &PgPool,
        job_id: DbId,
    ) -> Result<Vec<MacroResultRow>, sqlx::Error> {
        sqlx::query_as::<_, MacroResultRow>(
            "SELECT m.id, a.algorithm_name AS algorithm, m.metric, \
                    m.macro_score, m.num_windows \
             FROM macro_results m \
             JOIN stream_algorithms a ON a.id = m.stream_algorithm_id \
             WHERE m.stream_job_id = $1 \
             ORDER BY a.algorithm_name, m.metric",
        )
        .bind(job_id)
        .fetch_all(pool)
        .await
    }

    pub async fn micro_for_job(
        pool: &PgPool,
        job_id: DbId,
    ) -> Result<Vec<MicroResultRow>, sqlx::Error> {
        sqlx::query_as::<_, MicroResultRow>(
            "SELECT m.id, a.algorithm_name AS algorithm, m.metric, \
                    m.micro_score, m.num_users \
             FROM micro_results m \
             JOIN stream_algorithms a ON a.id = m.stream_algorithm_id \
             WHERE m.stream_job_id = $1 \
             ORDER BY a.algorithm_name, m.metric",
        )
        .bind(job_id)
        .fetch_all(pool)
        .await
    }

    pub async fn window_for_job(
        pool: &PgPool,
        job_id: DbId,
    ) -> Result<Vec<WindowResultRow>, sqlx::Error> {
        sqlx::query_as::<_, WindowResultRow>(
            "SELECT w.id, a.algorithm_name AS algorithm, w.metric, \
                    w.window_score, w.num_users, w.window_ts \
             FROM window_results w \
             LEFT JOIN stream_algorithms a ON a.id = w.stream_algorithm_id \
             WHERE w.stream_job_id = $1 \
             ORDER BY a.algorithm_name, w.metric, w.window_ts",
        )
        .bind(job_id)
        .fetch_all(pool)
        .await
    }

    pub async fn user_for_job(
        pool: &PgPool,
        job_id: DbId,
    ) -> Result<Vec<UserResultRow>, sqlx::Error> {
        sqlx::query_as::<_, UserResultRow>(
            "SELECT u.id, a.algorithm_name AS algorithm, u.metric, \
                    u.user_score, u.user_ref, u.window_ts \
             FROM user_results u \
             LEFT JOIN stream_algorithms a ON a.id = u.stream_algorithm_id \
             WHERE u.stream_job_id = $1 \
             ORDER BY a.algorithm_name, u.metric, u.window_ts, u.user_ref",
        )
        .bind(job_id)
        .fetch_all(pool)
        .await
    }
}
