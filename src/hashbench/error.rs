use thiserror::Error;

/// Ways a benchmark request can be malformed.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BenchError {
    #[error("trial count must be at least 1")]
    NoTrials,
    #[error("workload has no points to measure")]
    EmptyWorkload,
    #[error("spread must be non-negative, got {0}")]
    NegativeSpread(i32),
}
