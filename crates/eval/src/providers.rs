//! Provider traits at the evaluation-library boundary.
//!
//! The orchestration engine never imports a global registry; it receives a
//! [`ProviderSet`] of read-only lookup services so tests can substitute fakes.

use std::sync::Arc;

use crate::error::EvalError;
use crate::interactions::Interactions;
use crate::metrics::MetricSpec;

/// A loadable dataset. Loading may be I/O- and memory-heavy and is blocking;
/// callers are expected to run it off the async request path.
pub trait Dataset: Send + Sync {
    fn name(&self) -> &str;

    /// Materialize the full interaction stream.
    fn load(&self) -> Result<Interactions, EvalError>;

    /// Earliest and latest event timestamps, without a full load.
    fn timestamp_range(&self) -> Result<(i64, i64), EvalError>;
}

/// Resolve datasets by registry name.
pub trait DatasetProvider: Send + Sync {
    fn resolve(&self, name: &str) -> Option<Arc<dyn Dataset>>;
    fn names(&self) -> Vec<String>;
}

/// A fitted-then-queried recommendation model. `fit` may be called multiple
/// times as the evaluation window advances; each call sees the full history
/// up to the current window.
pub trait Algorithm: Send + std::fmt::Debug {
    fn fit(&mut self, history: &Interactions);

    /// Top-`k` item recommendations for a user, best first.
    fn recommend(&self, user: i64, k: usize) -> Vec<i64>;
}

/// Constructs [`Algorithm`] instances from a JSON parameter map, with
/// default-parameter introspection for the catalog endpoints.
pub trait AlgorithmFactory: Send + Sync {
    fn name(&self) -> &str;
    fn default_params(&self) -> serde_json::Value;
    fn instantiate(&self, params: &serde_json::Value) -> Result<Box<dyn Algorithm>, EvalError>;
}

/// Resolve algorithm factories by registry name.
pub trait AlgorithmProvider: Send + Sync {
    fn resolve(&self, name: &str) -> Option<Arc<dyn AlgorithmFactory>>;
    fn names(&self) -> Vec<String>;
}

/// Resolve metrics by registry name.
pub trait MetricProvider: Send + Sync {
    fn resolve(&self, name: &str) -> Option<MetricSpec>;
    fn names(&self) -> Vec<String>;
}

/// Bundle of the three lookup services injected into the orchestrator.
///
/// Cheaply cloneable; all providers are shared behind `Arc`.
#[derive(Clone)]
pub struct ProviderSet {
    pub datasets: Arc<dyn DatasetProvider>,
    pub algorithms: Arc<dyn AlgorithmProvider>,
    pub metrics: Arc<dyn MetricProvider>,
}
