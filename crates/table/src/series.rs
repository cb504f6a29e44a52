//! Numeric series with explicit missing values.

use std::ops::Range;

/// A numeric time series where missing values are NaN internally and
/// `None` through every accessor.
///
/// Non-finite inputs are normalised to NaN at construction, so a stored
/// value is either finite or missing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Series {
    values: Vec<f64>,
}

impl Series {
    /// Wraps raw values. Infinities become missing.
    pub fn new(values: Vec<f64>) -> Self {
        let values = values
            .into_iter()
            .map(|v| if v.is_finite() { v } else { f64::NAN })
            .collect();
        Self { values }
    }

    /// Builds a series from optional values.
    pub fn from_options(values: impl IntoIterator<Item = Option<f64>>) -> Self {
        values.into_iter().collect()
    }

    /// A series of `len` missing values.
    pub fn missing(len: usize) -> Self {
        Self {
            values: vec![f64::NAN; len],
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at `i`, or `None` if missing or out of range.
    pub fn get(&self, i: usize) -> Option<f64> {
        self.values.get(i).copied().filter(|v| v.is_finite())
    }

    /// Raw storage, NaN for missing.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Iterates values as options.
    pub fn iter(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.values
            .iter()
            .map(|&v| if v.is_finite() { Some(v) } else { None })
    }

    /// Number of defined values.
    pub fn valid_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_finite()).count()
    }

    /// Defined values within `range`, in order.
    pub fn valid_in(&self, range: Range<usize>) -> Vec<f64> {
        self.values
            .get(range)
            .unwrap_or(&[])
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .collect()
    }

    /// Mean of the defined values, `None` if there are none.
    pub fn mean(&self) -> Option<f64> {
        snowcast_stats::mean(&snowcast_stats::finite_values(&self.values))
    }

    /// Copies `range` into a new series.
    pub fn slice(&self, range: Range<usize>) -> Self {
        Self {
            values: self.values.get(range).unwrap_or(&[]).to_vec(),
        }
    }

    /// Applies `f` to every defined value; missing stays missing.
    pub fn map(&self, mut f: impl FnMut(f64) -> f64) -> Self {
        self.iter().map(|v| v.map(&mut f)).collect()
    }
}

impl FromIterator<Option<f64>> for Series {
    fn from_iter<I: IntoIterator<Item = Option<f64>>>(iter: I) -> Self {
        Series::new(iter.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
    }
}

impl From<Vec<f64>> for Series {
    fn from(values: Vec<f64>) -> Self {
        Series::new(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_finite_becomes_missing() {
        let s = Series::new(vec![1.0, f64::INFINITY, f64::NAN, 2.0]);
        assert_eq!(s.get(0), Some(1.0));
        assert_eq!(s.get(1), None);
        assert_eq!(s.get(2), None);
        assert_eq!(s.valid_count(), 2);
    }

    #[test]
    fn out_of_range_is_none() {
        assert_eq!(Series::new(vec![1.0]).get(5), None);
    }

    #[test]
    fn from_options_round_trips() {
        let s = Series::from_options([Some(1.5), None, Some(0.0)]);
        assert_eq!(s.iter().collect::<Vec<_>>(), vec![Some(1.5), None, Some(0.0)]);
    }

    #[test]
    fn zero_is_not_missing() {
        let s = Series::new(vec![0.0]);
        assert_eq!(s.get(0), Some(0.0));
    }

    #[test]
    fn map_preserves_missing() {
        let s = Series::from_options([Some(2.0), None]).map(|v| v * 10.0);
        assert_eq!(s.get(0), Some(20.0));
        assert_eq!(s.get(1), None);
    }

    #[test]
    fn valid_in_and_slice() {
        let s = Series::from_options([Some(1.0), None, Some(3.0), Some(4.0)]);
        assert_eq!(s.valid_in(0..3), vec![1.0, 3.0]);
        assert_eq!(s.slice(2..4).values(), &[3.0, 4.0]);
        assert!(s.valid_in(3..10).is_empty());
    }

    #[test]
    fn mean_skips_missing() {
        let s = Series::from_options([Some(1.0), None, Some(3.0)]);
        assert_eq!(s.mean(), Some(2.0));
        assert_eq!(Series::missing(3).mean(), None);
    }
}
