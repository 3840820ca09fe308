use thiserror::Error;

/// Everything that can go wrong inside the epoch driver.
///
/// Every failure is terminal for the call that produced it: the driver makes
/// a single attempt, never retries, and discards any partial `History`.
#[derive(Debug, Error)]
pub enum TrainError {
    /// A driver operation was invoked before `compile`.
    #[error("`{op}` called before `compile`")]
    NotCompiled { op: &'static str },

    /// `compile` was called a second time; the configuration is immutable
    /// once set.
    #[error("`compile` called twice; the driver is already configured")]
    AlreadyCompiled,

    /// A textual task name did not match a known task kind.
    #[error("unknown task `{0}`; expected `classification` or `regression`")]
    UnknownTask(String),

    /// A batch dimension is incompatible with the model.
    #[error("shape mismatch for {what}: got {got}, expected {expected}")]
    ShapeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },

    /// R² was requested over targets with zero variance; the metric is
    /// undefined there and must never surface as a silent NaN.
    #[error("{what} is undefined: target variance is zero")]
    DegenerateMetric { what: &'static str },

    /// A data stream produced no batches where at least one is required.
    #[error("data stream yielded no batches during `{op}`")]
    EmptyStream { op: &'static str },
}
