//! Evaluation pipeline: builder, blocking run, and aggregation.

use std::collections::{BTreeMap, HashSet};

use uuid::Uuid;

use crate::error::EvalError;
use crate::interactions::Interactions;
use crate::metrics::MetricSpec;
use crate::providers::{Algorithm, AlgorithmFactory};
use crate::report::{AlgorithmRef, EvaluationReport, MacroRow, MicroRow, UserRow, WindowRow};
use crate::window::SlidingWindow;

/// One algorithm attached to a pipeline, already instantiated with its
/// parameter map and tagged with its correlation UUID.
#[derive(Debug)]
struct PipelineAlgorithm {
    name: String,
    correlation_id: Uuid,
    model: Box<dyn Algorithm>,
}

/// Accumulates the split, metrics, and algorithms for one evaluation run.
#[derive(Default)]
pub struct PipelineBuilder {
    window: Option<SlidingWindow>,
    metrics: Vec<MetricSpec>,
    algorithms: Vec<PipelineAlgorithm>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the sliding-window split (required).
    pub fn with_window(mut self, window: SlidingWindow) -> Self {
        self.window = Some(window);
        self
    }

    /// Attach an already-resolved metric.
    pub fn add_metric(&mut self, metric: MetricSpec) {
        self.metrics.push(metric);
    }

    /// Instantiate an algorithm from its factory and parameter map, tagging
    /// it with the correlation UUID assigned when it was added to the job.
    pub fn add_algorithm(
        &mut self,
        factory: &dyn AlgorithmFactory,
        params: &serde_json::Value,
        correlation_id: Uuid,
    ) -> Result<(), EvalError> {
        let model = factory.instantiate(params)?;
        self.algorithms.push(PipelineAlgorithm {
            name: factory.name().to_string(),
            correlation_id,
            model,
        });
        Ok(())
    }

    pub fn build(self) -> Result<Pipeline, EvalError> {
        let window = self
            .window
            .ok_or_else(|| EvalError::Configuration("pipeline has no window split".into()))?;
        if self.metrics.is_empty() {
            return Err(EvalError::Configuration(
                "pipeline has no metrics attached".into(),
            ));
        }
        if self.algorithms.is_empty() {
            return Err(EvalError::Configuration(
                "pipeline has no algorithms attached".into(),
            ));
        }
        Ok(Pipeline {
            window,
            metrics: self.metrics,
            algorithms: self.algorithms,
        })
    }
}

/// An executable evaluation run. `run` is blocking and potentially
/// long-running; callers dispatch it off the async request path. No timeout
/// is imposed here.
#[derive(Debug)]
pub struct Pipeline {
    window: SlidingWindow,
    metrics: Vec<MetricSpec>,
    algorithms: Vec<PipelineAlgorithm>,
}

impl Pipeline {
    /// Execute the run: split the stream, then for every algorithm advance
    /// window by window, fitting on all history before the window and
    /// scoring against the interactions inside it.
    pub fn run(mut self, data: &Interactions) -> Result<EvaluationReport, EvalError> {
        let split = self.window.split(data)?;
        let top_k = self.window.top_k;
        let mut report = EvaluationReport::default();

        for algo in &mut self.algorithms {
            let algo_ref = AlgorithmRef::new(&algo.name, algo.correlation_id);
            tracing::debug!(
                algorithm = %algo_ref.label,
                windows = split.windows.len(),
                "Evaluating algorithm"
            );

            // Per-metric accumulators across the whole run.
            let mut window_means: BTreeMap<String, Vec<f64>> = BTreeMap::new();
            let mut user_scores: BTreeMap<String, Vec<f64>> = BTreeMap::new();

            let mut history = split.background.clone();
            for window in &split.windows {
                algo.model.fit(&history);

                // Ground truth per user inside this window.
                let mut truth: BTreeMap<i64, HashSet<i64>> = BTreeMap::new();
                for event in &window.interactions {
                    truth.entry(event.user).or_default().insert(event.item);
                }

                for metric in &self.metrics {
                    let mut scores = Vec::with_capacity(truth.len());
                    for (user, items) in &truth {
                        let recommended = algo.model.recommend(*user, top_k);
                        let score = metric.score(&recommended, items, top_k);
                        scores.push(score);
                        report.user_rows.push(UserRow {
                            algorithm: algo_ref.clone(),
                            metric: metric.name.clone(),
                            user_score: score,
                            user: *user,
                            window_ts: window.start_t,
                        });
                    }
                    let mean = mean(&scores);
                    report.window_rows.push(WindowRow {
                        algorithm: algo_ref.clone(),
                        metric: metric.name.clone(),
                        window_score: mean,
                        num_users: scores.len() as i64,
                        window_ts: window.start_t,
                    });
                    window_means.entry(metric.name.clone()).or_default().push(mean);
                    user_scores
                        .entry(metric.name.clone())
                        .or_default()
                        .extend(scores);
                }

                history.extend_from(&window.interactions);
            }

            for metric in &self.metrics {
                let windows = &window_means[&metric.name];
                report.macro_rows.push(MacroRow {
                    algorithm: algo_ref.clone(),
                    metric: metric.name.clone(),
                    macro_score: mean(windows),
                    num_windows: windows.len() as i64,
                });
                let users = &user_scores[&metric.name];
                report.micro_rows.push(MicroRow {
                    algorithm: algo_ref.clone(),
                    metric: metric.name.clone(),
                    micro_score: mean(users),
                    num_users: users.len() as i64,
                });
            }
        }

        Ok(report)
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
