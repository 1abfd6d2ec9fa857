//! Error types for the solver.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RsmtError {
    /// The LP backend returned something other than optimal or infeasible.
    #[error("Solve status = {status}")]
    LpStatus { status: String },

    #[error("terminal {index} has a non-finite coordinate")]
    NonFinite { index: usize },

    /// No FST subset spans the terminals (the MST seed makes this unreachable
    /// for well-formed input).
    #[error("no spanning set of full Steiner trees was found")]
    Disconnected,
}

pub type Result<T> = std::result::Result<T, RsmtError>;
