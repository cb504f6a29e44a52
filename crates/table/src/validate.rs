//! Time-axis validation.
//!
//! [`ValidationCollector`] gathers every irregular step on a time axis so a
//! malformed input reports all of its gaps at once instead of the first one.

use chrono::{DateTime, TimeDelta, Utc};

use crate::error::TableError;

/// Accumulates irregular-step messages and converts them into a single
/// [`TableError::IrregularInterval`].
pub(crate) struct ValidationCollector {
    errors: Vec<String>,
}

impl ValidationCollector {
    /// Create an empty collector.
    pub(crate) fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Record one validation error.
    pub(crate) fn push(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    /// Returns the number of recorded errors.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.errors.len()
    }

    /// Consume the collector and return `Ok(())` if nothing was recorded.
    ///
    /// The `details` string joins all messages with `"; "`.
    pub(crate) fn finish(self) -> Result<(), TableError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(TableError::IrregularInterval {
                count: self.errors.len(),
                details: self.errors.join("; "),
            })
        }
    }
}

/// Checks that `times` is non-empty and strictly increasing.
///
/// Ordering is checked eagerly: an out-of-order timestamp makes every
/// spacing check after it meaningless.
pub(crate) fn validate_monotonic(times: &[DateTime<Utc>]) -> Result<(), TableError> {
    if times.is_empty() {
        return Err(TableError::EmptyTimeAxis);
    }
    if let Some(i) = times.windows(2).position(|w| w[1] <= w[0]) {
        return Err(TableError::NonMonotonicTime { index: i + 1 });
    }
    Ok(())
}

/// Records one message per step whose length differs from `step`.
pub(crate) fn validate_regular_step(times: &[DateTime<Utc>], step: TimeDelta) -> ValidationCollector {
    let mut c = ValidationCollector::new();

    for (i, w) in times.windows(2).enumerate() {
        let got = w[1] - w[0];
        if got != step {
            c.push(format!(
                "step {} -> {} is {} min, expected {} min",
                i,
                i + 1,
                got.num_minutes(),
                step.num_minutes()
            ));
        }
    }

    c
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn hours(hs: &[i64]) -> Vec<DateTime<Utc>> {
        let t0 = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        hs.iter().map(|&h| t0 + TimeDelta::hours(h)).collect()
    }

    #[test]
    fn empty_collector_finishes_ok() {
        assert!(ValidationCollector::new().finish().is_ok());
    }

    #[test]
    fn collector_joins_messages() {
        let mut c = ValidationCollector::new();
        c.push("a");
        c.push("b");
        assert_eq!(c.len(), 2);
        match c.finish() {
            Err(TableError::IrregularInterval { count, details }) => {
                assert_eq!(count, 2);
                assert_eq!(details, "a; b");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn monotonic_rejects_empty() {
        assert_eq!(validate_monotonic(&[]), Err(TableError::EmptyTimeAxis));
    }

    #[test]
    fn monotonic_rejects_repeat() {
        let t = hours(&[0, 1, 1, 2]);
        assert_eq!(
            validate_monotonic(&t),
            Err(TableError::NonMonotonicTime { index: 2 })
        );
    }

    #[test]
    fn regular_step_counts_every_gap() {
        let t = hours(&[0, 1, 3, 4, 6]);
        let c = validate_regular_step(&t, TimeDelta::hours(1));
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn regular_step_accepts_uniform_axis() {
        let t = hours(&[0, 1, 2, 3]);
        assert!(validate_regular_step(&t, TimeDelta::hours(1)).finish().is_ok());
    }
}
