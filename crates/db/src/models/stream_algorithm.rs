use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use studio_core::types::{DbId, Timestamp};
use uuid::Uuid;

/// A row from the `stream_algorithms` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StreamAlgorithm {
    pub id: DbId,
    pub stream_job_id: DbId,
    pub algorithm_name: String,
    pub correlation_id: Uuid,
    pub parameters: serde_json::Value,
    pub added_at: Timestamp,
}

/// DTO for `POST /api/v1/streams/:id/algorithms`.
#[derive(Debug, Deserialize)]
pub struct AddAlgorithm {
    pub name: String,
    /// Overrides for the algorithm's default parameters.
    pub parameters: Option<serde_json::Value>,
}
