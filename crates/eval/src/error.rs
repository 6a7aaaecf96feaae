/// Failure taxonomy for one evaluation run.
///
/// `Configuration` covers bad dataset/metric/algorithm references and invalid
/// window parameters, always terminal for the run. `Execution` covers
/// failures inside the pipeline run itself. Result-write failures are not
/// represented here; they are category-scoped and handled by the ingestor.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Execution error: {0}")]
    Execution(String),
}
