//! Stream job entity and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use studio_core::status::{derive_status, JobStatus};
use studio_core::types::{DbId, Timestamp};

/// A row from the `stream_jobs` table.
///
/// There is no status column; status is derived from the lifecycle
/// timestamps plus whether any algorithms are attached.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StreamJob {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub dataset: String,
    pub top_k: i32,
    pub metrics: Vec<String>,
    pub split_start: Timestamp,
    pub window_size_secs: i64,
    pub started_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub error_message: Option<String>,
    pub user_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl StreamJob {
    pub fn status(&self, has_algorithms: bool) -> JobStatus {
        derive_status(
            self.started_at,
            self.completed_at,
            self.error_message.as_deref(),
            has_algorithms,
        )
    }
}

/// DTO for `POST /api/v1/streams`.
#[derive(Debug, Deserialize)]
pub struct CreateStreamJob {
    pub name: String,
    pub description: Option<String>,
    pub dataset: String,
    pub top_k: i32,
    pub metrics: Vec<String>,
    pub split_start: Timestamp,
    pub window_size_secs: i64,
}
