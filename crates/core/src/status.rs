//! Stream job lifecycle status, derived from persisted timestamps.
//!
//! Status is never stored in its own column. It is recomputed on every read
//! from `started_at`, `completed_at`, `error_message`, and whether the job has
//! any algorithms attached, so a denormalized status column can never drift
//! out of sync with the timestamps that define it.

use serde::Serialize;

use crate::types::Timestamp;

/// Lifecycle state of a stream job.
///
/// ```text
/// created --(>=1 algorithm added)--> ready
/// ready   --(run)-->                 running
/// running --(success)-->             completed
/// running --(failure)-->             failed
/// completed/failed --(rerun)-->      running
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Created,
    Ready,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    /// Lowercase wire name, matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Created => "created",
            JobStatus::Ready => "ready",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derive the lifecycle status from a job row snapshot.
///
/// Precedence: the terminal timestamp is checked before the running
/// timestamp, which is checked before algorithm presence. This makes the
/// function total: every combination of field values maps to exactly one
/// status (a job can never read as `ready` once `started_at` is set, no
/// matter what is attached to it).
pub fn derive_status(
    started_at: Option<Timestamp>,
    completed_at: Option<Timestamp>,
    error_message: Option<&str>,
    has_algorithms: bool,
) -> JobStatus {
    if completed_at.is_some() {
        if error_message.is_some() {
            JobStatus::Failed
        } else {
            JobStatus::Completed
        }
    } else if started_at.is_some() {
        JobStatus::Running
    } else if has_algorithms {
        JobStatus::Ready
    } else {
        JobStatus::Created
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn now() -> Timestamp {
        Utc::now()
    }

    #[test]
    fn fresh_job_is_created() {
        assert_eq!(derive_status(None, None, None, false), JobStatus::Created);
    }

    #[test]
    fn job_with_algorithms_is_ready() {
        assert_eq!(derive_status(None, None, None, true), JobStatus::Ready);
    }

    #[test]
    fn started_job_is_running() {
        assert_eq!(
            derive_status(Some(now()), None, None, true),
            JobStatus::Running
        );
    }

    #[test]
    fn completed_without_error_is_completed() {
        assert_eq!(
            derive_status(Some(now()), Some(now()), None, true),
            JobStatus::Completed
        );
    }

    #[test]
    fn completed_with_error_is_failed() {
        assert_eq!(
            derive_status(Some(now()), Some(now()), Some("boom"), true),
            JobStatus::Failed
        );
    }

    #[test]
    fn terminal_timestamp_wins_over_started() {
        // completed_at takes precedence over started_at.
        assert_eq!(
            derive_status(Some(now()), Some(now()), None, false),
            JobStatus::Completed
        );
    }

    #[test]
    fn started_wins_over_algorithm_presence() {
        // Once started, the job never reads as ready again, with or without
        // algorithms attached.
        assert_eq!(
            derive_status(Some(now()), None, None, false),
            JobStatus::Running
        );
        assert_eq!(
            derive_status(Some(now()), None, None, true),
            JobStatus::Running
        );
    }

    #[test]
    fn every_combination_maps_to_a_status() {
        let instants = [None, Some(now())];
        let errors = [None, Some("err")];
        for started in instants {
            for completed in instants {
                for error in errors {
                    for has_algos in [false, true] {
                        // Must not panic, and must be one of the five states.
                        let status = derive_status(started, completed, error, has_algos);
                        assert!(matches!(
                            status,
                            JobStatus::Created
                                | JobStatus::Ready
                                | JobStatus::Running
                                | JobStatus::Completed
                                | JobStatus::Failed
                        ));
                    }
                }
            }
        }
    }

    #[test]
    fn derivation_is_idempotent() {
        let started = Some(now());
        let a = derive_status(started, None, None, true);
        let b = derive_status(started, None, None, true);
        assert_eq!(a, b);
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&JobStatus::Completed).unwrap(),
            "\"completed\""
        );
    }
}
