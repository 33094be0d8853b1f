//! Error taxonomy for the analysis pipeline
//!
//! Loading failures live in `enersim-io`; everything here is raised by the
//! pure stages (filter, aggregate, simulate) and by criteria validation.
//!
//! Two of the variants are recognized *states* rather than faults:
//! [`CoreError::EmptyView`] (filters matched no rows) and
//! [`CoreError::UndefinedSimulation`] (no energy to replace). The pipeline
//! turns them into `None` / `SimulationOutcome::Undefined` so renderers can
//! show a notice instead of aborting.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// A selector value that cannot be used (e.g. "ALL" for the state)
    #[error("invalid filter criteria: {0}")]
    InvalidCriteria(String),

    /// The filtered view has no records, so there is nothing to summarize
    #[error("no records match the selected filters")]
    EmptyView,

    /// Replacement percentage outside [0, 100] or not a number
    #[error("solar replacement percentage must be within 0..=100, got {0}")]
    InvalidPercentage(f64),

    /// Negative or non-finite price per kWh
    #[error("unit price per kWh must be a finite, non-negative number, got {0}")]
    InvalidUnitPrice(f64),

    /// Total energy is zero or has no data, so the emission ratio is undefined
    #[error("simulation is undefined: total energy consumption is zero or missing")]
    UndefinedSimulation,
}

/// Convenience type alias for Results using CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// True for the states the dashboard reports as notices instead of failures.
    pub fn is_recognized_state(&self) -> bool {
        matches!(self, CoreError::EmptyView | CoreError::UndefinedSimulation)
    }
}
