use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// Rejected before any simulation state exists.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A defect inside the core; the run is aborted.
    #[error("Internal invariant violated: {0}")]
    InvariantViolation(String),
}

pub type SimulationResult<T> = Result<T, SimulationError>;
