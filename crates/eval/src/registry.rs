//! In-memory provider registry and reference datasets.

use std::collections::HashMap;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::algorithms::{ItemKnnFactory, PopularityFactory, RandomFactory};
use crate::error::EvalError;
use crate::interactions::{Interaction, Interactions};
use crate::metrics::{MetricKind, MetricSpec};
use crate::providers::{
    AlgorithmFactory, AlgorithmProvider, Dataset, DatasetProvider, MetricProvider, ProviderSet,
};

/// Synthetic interaction stream, generated deterministically from a seed.
///
/// Item choice is skewed (min of two uniform draws) so popularity-based
/// models have signal to pick up.
pub struct SyntheticDataset {
    name: String,
    seed: u64,
    users: i64,
    items: i64,
    events: usize,
    start_t: i64,
    span: i64,
}

impl SyntheticDataset {
    pub fn new(
        name: impl Into<String>,
        seed: u64,
        users: i64,
        items: i64,
        events: usize,
        start_t: i64,
        span: i64,
    ) -> Self {
        Self {
            name: name.into(),
            seed,
            users,
            items,
            events,
            start_t,
            span,
        }
    }
}

impl Dataset for SyntheticDataset {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<Interactions, EvalError> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut events = Vec::with_capacity(self.events);
        for i in 0..self.events {
            let user = rng.random_range(0..self.users);
            let item = rng
                .random_range(0..self.items)
                .min(rng.random_range(0..self.items));
            // Timestamps advance monotonically across the span.
            let timestamp = self.start_t + (i as i64 * self.span) / self.events as i64;
            events.push(Interaction {
                user,
                item,
                timestamp,
            });
        }
        Ok(Interactions::new(events))
    }

    fn timestamp_range(&self) -> Result<(i64, i64), EvalError> {
        let last = self.start_t + ((self.events as i64 - 1) * self.span) / self.events as i64;
        Ok((self.start_t, last))
    }
}

/// In-memory registry implementing all three provider traits.
///
/// One `Arc<Registry>` can back every field of a [`ProviderSet`].
#[derive(Default)]
pub struct Registry {
    datasets: HashMap<String, Arc<dyn Dataset>>,
    algorithms: HashMap<String, Arc<dyn AlgorithmFactory>>,
    metrics: HashMap<String, MetricSpec>,
}

impl Registry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry seeded with the reference datasets, algorithms, and metrics.
    pub fn reference() -> Self {
        let mut registry = Self::empty();
        registry.register_dataset(Arc::new(SyntheticDataset::new(
            "demo-small",
            7,
            25,
            40,
            1_500,
            1_000_000,
            600_000,
        )));
        registry.register_dataset(Arc::new(SyntheticDataset::new(
            "demo-large",
            11,
            200,
            500,
            40_000,
            1_000_000,
            6_000_000,
        )));
        registry.register_algorithm(Arc::new(ItemKnnFactory));
        registry.register_algorithm(Arc::new(PopularityFactory));
        registry.register_algorithm(Arc::new(RandomFactory));
        registry.register_metric(MetricSpec::new("Precision", MetricKind::Precision));
        registry.register_metric(MetricSpec::new("Recall", MetricKind::Recall));
        registry.register_metric(MetricSpec::new("Hit", MetricKind::Hit));
        registry
    }

    pub fn register_dataset(&mut self, dataset: Arc<dyn Dataset>) {
        self.datasets.insert(dataset.name().to_string(), dataset);
    }

    pub fn register_algorithm(&mut self, factory: Arc<dyn AlgorithmFactory>) {
        self.algorithms.insert(factory.name().to_string(), factory);
    }

    pub fn register_metric(&mut self, metric: MetricSpec) {
        self.metrics.insert(metric.name.clone(), metric);
    }

    /// Bundle one shared registry into the provider set the engine consumes.
    pub fn provider_set(self: Arc<Self>) -> ProviderSet {
        ProviderSet {
            datasets: self.clone(),
            algorithms: self.clone(),
            metrics: self,
        }
    }
}

fn sorted_names<V>(map: &HashMap<String, V>) -> Vec<String> {
    let mut names: Vec<String> = map.keys().cloned().collect();
    names.sort();
    names
}

impl DatasetProvider for Registry {
    fn resolve(&self, name: &str) -> Option<Arc<dyn Dataset>> {
        self.datasets.get(name).cloned()
    }

    fn names(&self) -> Vec<String> {
        sorted_names(&self.datasets)
    }
}

impl AlgorithmProvider for Registry {
    fn resolve(&self, name: &str) -> Option<Arc<dyn AlgorithmFactory>> {
        self.algorithms.get(name).cloned()
    }

    fn names(&self) -> Vec<String> {
        sorted_names(&self.algorithms)
    }
}

impl MetricProvider for Registry {
    fn resolve(&self, name: &str) -> Option<MetricSpec> {
        self.metrics.get(name).cloned()
    }

    fn names(&self) -> Vec<String> {
        sorted_names(&self.metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_registry_resolves_expected_names() {
        let registry = Registry::reference();
        assert!(DatasetProvider::resolve(&registry, "demo-small").is_some());
        assert!(AlgorithmProvider::resolve(&registry, "ItemKNN").is_some());
        assert!(MetricProvider::resolve(&registry, "Precision").is_some());
        assert!(AlgorithmProvider::resolve(&registry, "SVD").is_none());
    }

    #[test]
    fn names_are_sorted() {
        let registry = Registry::reference();
        assert_eq!(
            AlgorithmProvider::names(&registry),
            vec!["ItemKNN", "Popularity", "Random"]
        );
        assert_eq!(MetricProvider::names(&registry), vec!["Hit", "Precision", "Recall"]);
    }

    #[test]
    fn synthetic_dataset_is_deterministic() {
        let dataset = SyntheticDataset::new("d", 1, 10, 20, 100, 0, 1_000);
        let a = dataset.load().unwrap();
        let b = dataset.load().unwrap();
        assert_eq!(a.as_slice(), b.as_slice());
        assert_eq!(a.len(), 100);
    }

    #[test]
    fn synthetic_range_matches_loaded_range() {
        let dataset = SyntheticDataset::new("d", 1, 10, 20, 100, 500, 1_000);
        let declared = dataset.timestamp_range().unwrap();
        let loaded = dataset.load().unwrap().timestamp_range().unwrap();
        assert_eq!(declared, loaded);
    }
}
