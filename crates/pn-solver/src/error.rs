//! Error types for the outer solver.

use pn_network::NetworkError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SolverError {
    #[error("convergence failure after {iterations} iterations (residual {residual_norm:e}): {what}")]
    ConvergenceFailure {
        what: String,
        iterations: usize,
        residual_norm: f64,
    },

    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    #[error("numeric error: {what}")]
    Numeric { what: String },

    #[error("invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

pub type SolverResult<T> = Result<T, SolverError>;

impl SolverError {
    /// The residual function is undefined at the trial point.
    pub fn is_diverged(&self) -> bool {
        matches!(self, SolverError::Network(e) if e.is_diverged())
    }
}
