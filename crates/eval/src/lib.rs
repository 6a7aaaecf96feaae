//! Evaluation-library boundary for Streamsight Studio.
//!
//! Defines the interfaces the orchestration engine consumes (dataset,
//! algorithm, and metric providers, the sliding-window split, the pipeline
//! builder, and the four-category evaluation report) plus an in-memory
//! [`registry::Registry`] with reference implementations so the server runs
//! end-to-end without an external evaluation service.
//!
//! The scoring logic here is deliberately simple; the contract that matters
//! is the boundary: blocking `run()`, per-category result tables, and result
//! rows tagged with a first-class correlation UUID.

pub mod algorithms;
pub mod error;
pub mod interactions;
pub mod metrics;
pub mod pipeline;
pub mod providers;
pub mod registry;
pub mod report;
pub mod window;

pub use error::EvalError;
pub use interactions::{Interaction, Interactions};
pub use metrics::{MetricKind, MetricSpec};
pub use pipeline::{Pipeline, PipelineBuilder};
pub use providers::{
    Algorithm, AlgorithmFactory, AlgorithmProvider, Dataset, DatasetProvider, MetricProvider,
    ProviderSet,
};
pub use registry::Registry;
pub use report::{AlgorithmRef, Category, EvaluationReport, MacroRow, MicroRow, UserRow, WindowRow};
pub use window::SlidingWindow;
