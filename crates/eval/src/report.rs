//! Four-category evaluation report produced by a pipeline run.
//!
//! Every row references its algorithm through [`AlgorithmRef`], which carries
//! the correlation UUID as a first-class field. The composite
//! `"{name}_{uuid}"` label is still populated for consumers that parse it,
//! but new code should read `correlation_id` directly.

use uuid::Uuid;

use crate::error::EvalError;

/// Result granularity reported by the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Macro,
    Micro,
    Window,
    User,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Macro,
        Category::Micro,
        Category::Window,
        Category::User,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Macro => "macro",
            Category::Micro => "micro",
            Category::Window => "window",
            Category::User => "user",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference from a result row back to the algorithm that produced it.
#[derive(Debug, Clone)]
pub struct AlgorithmRef {
    /// Legacy composite label, `"{algorithm_name}_{correlation_id}"`.
    pub label: String,
    /// Correlation UUID assigned when the algorithm was attached to the job.
    pub correlation_id: Option<Uuid>,
}

impl AlgorithmRef {
    pub fn new(name: &str, correlation_id: Uuid) -> Self {
        Self {
            label: format!("{name}_{correlation_id}"),
            correlation_id: Some(correlation_id),
        }
    }
}

/// Aggregate score across all windows, per (algorithm, metric).
#[derive(Debug, Clone)]
pub struct MacroRow {
    pub algorithm: AlgorithmRef,
    pub metric: String,
    pub macro_score: f64,
    pub num_windows: i64,
}

/// Aggregate score across all user-level scores, per (algorithm, metric).
#[derive(Debug, Clone)]
pub struct MicroRow {
    pub algorithm: AlgorithmRef,
    pub metric: String,
    pub micro_score: f64,
    pub num_users: i64,
}

/// Mean user score within one evaluation window.
#[derive(Debug, Clone)]
pub struct WindowRow {
    pub algorithm: AlgorithmRef,
    pub metric: String,
    pub window_score: f64,
    pub num_users: i64,
    /// Window start, epoch seconds.
    pub window_ts: i64,
}

/// One user's score within one evaluation window.
#[derive(Debug, Clone)]
pub struct UserRow {
    pub algorithm: AlgorithmRef,
    pub metric: String,
    pub user_score: f64,
    pub user: i64,
    /// Window start, epoch seconds.
    pub window_ts: i64,
}

/// Tabular results of one completed pipeline run.
///
/// Each category is independently retrievable and may be absent; retrieval of
/// an absent category is an execution error the caller is expected to treat
/// as non-fatal.
#[derive(Debug, Default)]
pub struct EvaluationReport {
    pub macro_rows: Vec<MacroRow>,
    pub micro_rows: Vec<MicroRow>,
    pub window_rows: Vec<WindowRow>,
    pub user_rows: Vec<UserRow>,
}

impl EvaluationReport {
    pub fn macro_results(&self) -> Result<&[MacroRow], EvalError> {
        Self::present(&self.macro_rows, Category::Macro)
    }

    pub fn micro_results(&self) -> Result<&[MicroRow], EvalError> {
        Self::present(&self.micro_rows, Category::Micro)
    }

    pub fn window_results(&self) -> Result<&[WindowRow], EvalError> {
        Self::present(&self.window_rows, Category::Window)
    }

    pub fn user_results(&self) -> Result<&[UserRow], EvalError> {
        Self::present(&self.user_rows, Category::User)
    }

    fn present<T>(rows: &[T], category: Category) -> Result<&[T], EvalError> {
        if rows.is_empty() {
            Err(EvalError::Execution(format!(
                "no {category} results were produced by this run"
            )))
        } else {
            Ok(rows)
        }
    }
}
