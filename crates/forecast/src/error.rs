//! Error types for the snowcast-forecast crate.

use snowcast_ensemble::EnsembleError;
use snowcast_snow::SnowError;
use snowcast_table::{Interval, TableError};

/// Error type for all fallible operations in the snowcast-forecast crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ForecastError {
    /// Returned when a configuration parameter is invalid.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a table has the wrong time step for its role.
    #[error("table interval mismatch: expected {expected:?}, got {got:?}")]
    IntervalMismatch {
        /// Interval the role requires.
        expected: Interval,
        /// Interval of the table supplied.
        got: Interval,
    },

    /// JSON serialization failed.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the failure.
        reason: String,
    },

    /// Wrapped error from the table crate.
    #[error(transparent)]
    Table(#[from] TableError),

    /// Wrapped error from the snow crate.
    #[error(transparent)]
    Snow(#[from] SnowError),

    /// Wrapped error from the ensemble crate.
    #[error(transparent)]
    Ensemble(#[from] EnsembleError),
}
