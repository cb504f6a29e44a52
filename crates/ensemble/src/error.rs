//! Error types for the snowcast-ensemble crate.

/// Error type for all fallible operations in the snowcast-ensemble crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EnsembleError {
    /// Returned when no series in the table reports the requested variable.
    #[error("no such variable: {variable}")]
    NoSuchVariable {
        /// Name of the requested variable.
        variable: String,
    },

    /// Returned when a cross-model comparison has fewer than two models.
    #[error("insufficient models for {variable}: need at least 2, found {found}")]
    InsufficientModels {
        /// Name of the compared variable.
        variable: String,
        /// Number of distinct models found.
        found: usize,
    },

    /// Returned when a configuration parameter is invalid.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },
}
