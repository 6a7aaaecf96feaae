//! Result rows for the four evaluation granularities.
//!
//! `New*` structs are write-side payloads the engine inserts after a run;
//! `*Result` structs mirror the raw tables; `*ResultRow` structs are the
//! read-side shapes joined with the algorithm name for API responses.

use serde::Serialize;
use sqlx::FromRow;
use studio_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Raw table rows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MacroResult {
    pub id: DbId,
    pub stream_job_id: DbId,
    pub stream_algorithm_id: DbId,
    pub metric: String,
    pub macro_score: f64,
    pub num_windows: i64,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MicroResult {
    pub id: DbId,
    pub stream_job_id: DbId,
    pub stream_algorithm_id: DbId,
    pub metric: String,
    pub micro_score: f64,
    pub num_users: i64,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WindowResult {
    pub id: DbId,
    pub stream_job_id: DbId,
    pub stream_algorithm_id: Option<DbId>,
    pub metric: String,
    pub window_score: f64,
    pub num_users: i64,
    pub window_ts: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserResult {
    pub id: DbId,
    pub stream_job_id: DbId,
    pub stream_algorithm_id: Option<DbId>,
    pub metric: String,
    pub user_score: f64,
    pub user_ref: DbId,
    pub window_ts: String,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Write-side payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct NewMacroResult {
    pub stream_algorithm_id: DbId,
    pub metric: String,
    pub macro_score: f64,
    pub num_windows: i64,
}

#[derive(Debug, Clone)]
pub struct NewMicroResult {
    pub stream_algorithm_id: DbId,
    pub metric: String,
    pub micro_score: f64,
    pub num_users: i64,
}

#[derive(Debug, Clone)]
pub struct NewWindowResult {
    pub stream_algorithm_id: Option<DbId>,
    pub metric: String,
    pub window_score: f64,
    pub num_users: i64,
    pub window_ts: String,
}

#[derive(Debug, Clone)]
pub struct NewUserResult {
    pub stream_algorithm_id: Option<DbId>,
    pub metric: String,
    pub user_score: f64,
    pub user_ref: DbId,
    pub window_ts: String,
}

// ---------------------------------------------------------------------------
// Read-side rows (joined with algorithm name)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MacroResultRow {
    pub id: DbId,
    pub algorithm: String,
    pub metric: String,
    pub macro_score: f64,
    pub num_windows: i64,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MicroResultRow {
    pub id: DbId,
    pub algorithm: String,
    pub metric: String,
    pub micro_score: f64,
    pub num_users: i64,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WindowResultRow {
    pub id: DbId,
    pub algorithm: Option<String>,
    pub metric: String,
    pub window_score: f64,
    pub num_users: i64,
    pub window_ts: String,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserResultRow {
    pub id: DbId,
    pub algorithm: Option<String>,
    pub metric: String,
    pub user_score: f64,
    pub user_ref: DbId,
    pub window_ts: String,
}
