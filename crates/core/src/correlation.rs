//! Correlation identifiers linking evaluator output back to stream algorithms.
//!
//! Every algorithm attached to a job gets a UUID derived deterministically
//! from `(job id, algorithm name)`. The evaluator tags each result row with
//! this id so the ingestor can resolve the owning `stream_algorithms` row.

use uuid::Uuid;

use crate::types::DbId;

/// Namespace for v5 correlation UUIDs. Fixed so the same (job, algorithm)
/// pair always yields the same id across processes.
const CORRELATION_NAMESPACE: Uuid = Uuid::from_bytes([
    0x6b, 0x1d, 0x6f, 0x6e, 0x2c, 0x1a, 0x4f, 0x0b, 0x9e, 0x3d, 0x5a, 0x7c, 0x41, 0x88, 0x20, 0x9f,
]);

/// Deterministic correlation UUID for an algorithm within a job.
pub fn correlation_id(job_id: DbId, algorithm_name: &str) -> Uuid {
    Uuid::new_v5(
        &CORRELATION_NAMESPACE,
        format!("{job_id}:{algorithm_name}").as_bytes(),
    )
}

/// Composite label the evaluator historically used for result rows:
/// `"{algorithm_name}_{correlation_id}"`.
pub fn algorithm_label(algorithm_name: &str, correlation: Uuid) -> String {
    format!("{algorithm_name}_{correlation}")
}

/// Compatibility shim: recover a correlation UUID from a composite label by
/// parsing the suffix after the last `_`.
///
/// New evaluator output carries the correlation id as a first-class field;
/// this parser only exists for rows that predate that change.
pub fn correlation_from_label(label: &str) -> Option<Uuid> {
    label.rsplit('_').next().and_then(|s| Uuid::parse_str(s).ok())
}
