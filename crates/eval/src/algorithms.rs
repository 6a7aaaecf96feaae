//! Reference recommendation algorithms.
//!
//! These exist so the server and tests can exercise the full job lifecycle
//! without an external evaluation service. Scoring quality is not the point;
//! deterministic, cheap-to-fit models are.

use std::collections::{HashMap, HashSet};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::EvalError;
use crate::interactions::Interactions;
use crate::providers::{Algorithm, AlgorithmFactory};

/// Read an optional positive integer parameter, falling back to a default.
fn param_usize(
    params: &serde_json::Value,
    key: &str,
    default: usize,
) -> Result<usize, EvalError> {
    match params.get(key) {
        None => Ok(default),
        Some(value) => value
            .as_u64()
            .filter(|v| *v > 0)
            .map(|v| v as usize)
            .ok_or_else(|| {
                EvalError::Configuration(format!(
                    "parameter '{key}' must be a positive integer, got {value}"
                ))
            }),
    }
}

fn param_u64(params: &serde_json::Value, key: &str, default: u64) -> Result<u64, EvalError> {
    match params.get(key) {
        None => Ok(default),
        Some(value) => value.as_u64().ok_or_else(|| {
            EvalError::Configuration(format!(
                "parameter '{key}' must be a non-negative integer, got {value}"
            ))
        }),
    }
}

// ---------------------------------------------------------------------------
// Popularity
// ---------------------------------------------------------------------------

/// Recommends globally most-interacted items the user has not seen.
#[derive(Debug, Default)]
pub struct Popularity {
    counts: HashMap<i64, usize>,
    seen: HashMap<i64, HashSet<i64>>,
}

impl Algorithm for Popularity {
    fn fit(&mut self, history: &Interactions) {
        self.counts.clear();
        self.seen.clear();
        for event in history {
            *self.counts.entry(event.item).or_default() += 1;
            self.seen.entry(event.user).or_default().insert(event.item);
        }
    }

    fn recommend(&self, user: i64, k: usize) -> Vec<i64> {
        let seen = self.seen.get(&user);
        let mut ranked: Vec<(i64, usize)> = self
            .counts
            .iter()
            .filter(|(item, _)| seen.is_none_or(|s| !s.contains(item)))
            .map(|(item, count)| (*item, *count))
            .collect();
        // Deterministic order: count desc, then item id asc.
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked.into_iter().take(k).map(|(item, _)| item).collect()
    }
}

pub struct PopularityFactory;

impl AlgorithmFactory for PopularityFactory {
    fn name(&self) -> &str {
        "Popularity"
    }

    fn default_params(&self) -> serde_json::Value {
        serde_json::json!({})
    }

    fn instantiate(&self, _params: &serde_json::Value) -> Result<Box<dyn Algorithm>, EvalError> {
        Ok(Box::new(Popularity::default()))
    }
}

// ---------------------------------------------------------------------------
// ItemKNN
// ---------------------------------------------------------------------------

/// Item-to-item co-occurrence model. Scores candidates by summed
/// co-occurrence with the user's history, truncated to the `k` nearest
/// neighbours per history item.
#[derive(Debug)]
pub struct ItemKnn {
    neighbours: usize,
    cooc: HashMap<i64, HashMap<i64, usize>>,
    seen: HashMap<i64, HashSet<i64>>,
    fallback: Popularity,
}

impl ItemKnn {
    fn new(neighbours: usize) -> Self {
        Self {
            neighbours,
            cooc: HashMap::new(),
            seen: HashMap::new(),
            fallback: Popularity::default(),
        }
    }
}

impl Algorithm for ItemKnn {
    fn fit(&mut self, history: &Interactions) {
        self.cooc.clear();
        self.seen.clear();
        for event in history {
            self.seen.entry(event.user).or_default().insert(event.item);
        }
        for items in self.seen.values() {
            for &a in items {
                let row = self.cooc.entry(a).or_default();
                for &b in items {
                    if a != b {
                        *row.entry(b).or_default() += 1;
                    }
                }
            }
        }
        self.fallback.fit(history);
    }

    fn recommend(&self, user: i64, k: usize) -> Vec<i64> {
        let Some(history) = self.seen.get(&user) else {
            // Cold user: back off to popularity.
            return self.fallback.recommend(user, k);
        };

        let mut scores: HashMap<i64, usize> = HashMap::new();
        for item in history {
            let Some(row) = self.cooc.get(item) else {
                continue;
            };
            let mut nearest: Vec<(i64, usize)> =
                row.iter().map(|(i, c)| (*i, *c)).collect();
            nearest.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
            for (candidate, count) in nearest.into_iter().take(self.neighbours) {
                if !history.contains(&candidate) {
                    *scores.entry(candidate).or_default() += count;
                }
            }
        }

        if scores.is_empty() {
            return self.fallback.recommend(user, k);
        }

        let mut ranked: Vec<(i64, usize)> = scores.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked.into_iter().take(k).map(|(item, _)| item).collect()
    }
}

pub struct ItemKnnFactory;

/// Default neighbourhood size for [`ItemKnn`].
const DEFAULT_NEIGHBOURS: usize = 10;

impl AlgorithmFactory for ItemKnnFactory {
    fn name(&self) -> &str {
        "ItemKNN"
    }

    fn default_params(&self) -> serde_json::Value {
        serde_json::json!({ "k": DEFAULT_NEIGHBOURS })
    }

    fn instantiate(&self, params: &serde_json::Value) -> Result<Box<dyn Algorithm>, EvalError> {
        let neighbours = param_usize(params, "k", DEFAULT_NEIGHBOURS)?;
        Ok(Box::new(ItemKnn::new(neighbours)))
    }
}

// ---------------------------------------------------------------------------
// Random
// ---------------------------------------------------------------------------

/// Uniformly random unseen items. Seeded per (seed, user) so reruns produce
/// identical output.
#[derive(Debug)]
pub struct RandomRec {
    seed: u64,
    items: Vec<i64>,
    seen: HashMap<i64, HashSet<i64>>,
}

impl Algorithm for RandomRec {
    fn fit(&mut self, history: &Interactions) {
        self.seen.clear();
        let mut items: HashSet<i64> = HashSet::new();
        for event in history {
            items.insert(event.item);
            self.seen.entry(event.user).or_default().insert(event.item);
        }
        self.items = items.into_iter().collect();
        self.items.sort_unstable();
    }

    fn recommend(&self, user: i64, k: usize) -> Vec<i64> {
        let seen = self.seen.get(&user);
        let mut candidates: Vec<i64> = self
            .items
            .iter()
            .copied()
            .filter(|item| seen.is_none_or(|s| !s.contains(item)))
            .collect();
        let mut rng = StdRng::seed_from_u64(self.seed ^ (user as u64).wrapping_mul(0x9E37_79B9));
        candidates.shuffle(&mut rng);
        candidates.truncate(k);
        candidates
    }
}

pub struct RandomFactory;

/// Default RNG seed for [`RandomRec`].
const DEFAULT_SEED: u64 = 42;

impl AlgorithmFactory for RandomFactory {
    fn name(&self) -> &str {
        "Random"
    }

    fn default_params(&self) -> serde_json::Value {
        serde_json::json!({ "seed": DEFAULT_SEED })
    }

    fn instantiate(&self, params: &serde_json::Value) -> Result<Box<dyn Algorithm>, EvalError> {
        let seed = param_u64(params, "seed", DEFAULT_SEED)?;
        Ok(Box::new(RandomRec {
            seed,
            items: Vec::new(),
            seen: HashMap::new(),
        }))
    }
}
