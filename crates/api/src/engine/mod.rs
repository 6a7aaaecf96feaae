//! Evaluation engine: dispatch, orchestration, and result ingestion.
//!
//! Handlers call into [`dispatcher`], which claims a job and spawns the
//! orchestrator in [`evaluation`]. The orchestrator builds and runs the
//! pipeline, then [`ingest`] persists the four result categories.

pub mod dispatcher;
pub mod evaluation;
pub mod ingest;
