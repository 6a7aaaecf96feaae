//! Top-K ranking metrics.

use std::collections::HashSet;

/// The metric families the reference engine can compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    /// Fraction of the K recommendations that were interacted with.
    Precision,
    /// Fraction of the ground-truth items that were recommended.
    Recall,
    /// 1.0 when at least one recommendation was interacted with, else 0.0.
    Hit,
}

/// A resolved metric: registry name plus scoring family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSpec {
    pub name: String,
    pub kind: MetricKind,
}

impl MetricSpec {
    pub fn new(name: impl Into<String>, kind: MetricKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Score one user's recommendation list against their ground-truth items.
    pub fn score(&self, recommended: &[i64], truth: &HashSet<i64>, k: usize) -> f64 {
        if truth.is_empty() || k == 0 {
            return 0.0;
        }
        let hits = recommended
            .iter()
            .take(k)
            .filter(|item| truth.contains(item))
            .count();
        match self.kind {
            MetricKind::Precision => hits as f64 / k as f64,
            MetricKind::Recall => hits as f64 / truth.len() as f64,
            MetricKind::Hit => {
                if hits > 0 {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn truth(items: &[i64]) -> HashSet<i64> {
        items.iter().copied().collect()
    }

    #[test]
    fn precision_counts_hits_over_k() {
        let m = MetricSpec::new("Precision", MetricKind::Precision);
        assert_eq!(m.score(&[1, 2, 3, 4], &truth(&[2, 4, 9]), 4), 0.5);
    }

    #[test]
    fn recall_counts_hits_over_truth() {
        let m = MetricSpec::new("Recall", MetricKind::Recall);
        assert_eq!(m.score(&[1, 2, 3, 4], &truth(&[2, 9]), 4), 0.5);
    }

    #[test]
    fn hit_is_binary() {
        let m = MetricSpec::new("Hit", MetricKind::Hit);
        assert_eq!(m.score(&[1, 2], &truth(&[2]), 2), 1.0);
        assert_eq!(m.score(&[1, 2], &truth(&[3]), 2), 0.0);
    }

    #[test]
    fn only_first_k_recommendations_count() {
        let m = MetricSpec::new("Hit", MetricKind::Hit);
        // The hit is at rank 3, beyond the K=2 cutoff.
        assert_eq!(m.score(&[1, 2, 5], &truth(&[5]), 2), 0.0);
    }

    #[test]
    fn empty_truth_scores_zero() {
        let m = MetricSpec::new("Precision", MetricKind::Precision);
        assert_eq!(m.score(&[1, 2], &truth(&[]), 2), 0.0);
    }
}
