//! Error types for the snowcast-snow crate.

use snowcast_table::TableError;

/// Error type for all fallible operations in the snowcast-snow crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SnowError {
    /// Returned when a snow parameter is out of its valid domain.
    #[error("invalid snow parameters: {reason}")]
    InvalidParams {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when an input variable needed for derivation is absent.
    #[error("no such variable: {variable}")]
    NoSuchVariable {
        /// Name of the missing variable.
        variable: String,
    },

    /// Returned when input series have different lengths.
    #[error("length mismatch: expected {expected}, got {got} for {field}")]
    LengthMismatch {
        /// Expected length.
        expected: usize,
        /// Actual length.
        got: usize,
        /// Name of the mismatched input.
        field: String,
    },

    /// Wrapped error from the table crate.
    #[error(transparent)]
    Table(#[from] TableError),
}
