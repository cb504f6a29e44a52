//! Error types for snowcast-table.

/// Error type for all fallible operations in the snowcast-table crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TableError {
    /// Returned when a table is built with no timestamps.
    #[error("time axis is empty")]
    EmptyTimeAxis,

    /// Returned when timestamps are not strictly increasing.
    #[error("timestamps not strictly increasing at index {index}")]
    NonMonotonicTime {
        /// Index of the first offending timestamp.
        index: usize,
    },

    /// Returned when the spacing between timestamps differs from the table interval.
    #[error("{count} irregular step(s) on time axis: {details}")]
    IrregularInterval {
        /// Number of irregular steps found.
        count: usize,
        /// Human-readable summary of the steps.
        details: String,
    },

    /// Returned when a series length differs from the time axis length.
    #[error("length mismatch for {key}: expected {expected}, got {got}")]
    LengthMismatch {
        /// Display form of the series key.
        key: String,
        /// Number of timestamps in the table.
        expected: usize,
        /// Length of the offending series.
        got: usize,
    },

    /// Returned when the same series key is inserted twice.
    #[error("duplicate series: {key}")]
    DuplicateSeries {
        /// Display form of the series key.
        key: String,
    },

    /// Returned when a variable name is outside the known vocabulary.
    #[error("unknown variable '{name}'")]
    UnknownVariable {
        /// The unrecognised name.
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_empty_time_axis() {
        assert_eq!(TableError::EmptyTimeAxis.to_string(), "time axis is empty");
    }

    #[test]
    fn display_non_monotonic() {
        let e = TableError::NonMonotonicTime { index: 4 };
        assert_eq!(e.to_string(), "timestamps not strictly increasing at index 4");
    }

    #[test]
    fn display_irregular_interval() {
        let e = TableError::IrregularInterval {
            count: 2,
            details: "a; b".to_string(),
        };
        assert_eq!(e.to_string(), "2 irregular step(s) on time axis: a; b");
    }

    #[test]
    fn display_length_mismatch() {
        let e = TableError::LengthMismatch {
            key: "gfs_seamless/temperature_2m/member0".to_string(),
            expected: 24,
            got: 23,
        };
        let msg = e.to_string();
        assert!(msg.contains("gfs_seamless/temperature_2m/member0"));
        assert!(msg.contains("expected 24"));
        assert!(msg.contains("got 23"));
    }

    #[test]
    fn display_unknown_variable() {
        let e = TableError::UnknownVariable {
            name: "visibility".to_string(),
        };
        assert_eq!(e.to_string(), "unknown variable 'visibility'");
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_bounds<T: Send + Sync + std::error::Error>() {}
        assert_bounds::<TableError>();
    }
}
