//! The ensemble table.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Range;

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TableError;
use crate::key::{Origin, SeriesKey};
use crate::series::Series;
use crate::validate;
use crate::variable::Variable;

/// Fixed spacing of a table's time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    Hourly,
    Daily,
}

impl Interval {
    /// Step between consecutive timestamps.
    pub fn duration(self) -> TimeDelta {
        match self {
            Interval::Hourly => TimeDelta::hours(1),
            Interval::Daily => TimeDelta::days(1),
        }
    }

    /// Step length in hours.
    pub fn hours(self) -> f64 {
        match self {
            Interval::Hourly => 1.0,
            Interval::Daily => 24.0,
        }
    }
}

#[derive(Debug, Clone)]
struct Column {
    series: Series,
    origin: Origin,
}

/// Time-indexed collection of series keyed by `(model, variable, member)`.
///
/// Every series has exactly one value per timestamp. Timestamps are
/// strictly increasing with a fixed [`Interval`].
#[derive(Debug, Clone)]
pub struct EnsembleTable {
    times: Vec<DateTime<Utc>>,
    interval: Interval,
    columns: BTreeMap<SeriesKey, Column>,
}

impl EnsembleTable {
    /// Creates an empty table over `times`.
    ///
    /// # Errors
    ///
    /// - [`TableError::EmptyTimeAxis`] if `times` is empty
    /// - [`TableError::NonMonotonicTime`] if timestamps do not strictly increase
    /// - [`TableError::IrregularInterval`] listing every step that differs
    ///   from `interval`
    pub fn new(times: Vec<DateTime<Utc>>, interval: Interval) -> Result<Self, TableError> {
        validate::validate_monotonic(&times)?;
        validate::validate_regular_step(&times, interval.duration()).finish()?;
        Ok(Self {
            times,
            interval,
            columns: BTreeMap::new(),
        })
    }

    /// Inserts a genuine ensemble-member series.
    ///
    /// # Errors
    ///
    /// [`TableError::LengthMismatch`] if the series length differs from the
    /// time axis, [`TableError::DuplicateSeries`] if `key` is already present.
    pub fn insert(&mut self, key: SeriesKey, series: Series) -> Result<(), TableError> {
        self.insert_with_origin(key, series, Origin::Member)
    }

    /// Inserts a per-model aggregate series (no ensemble spread).
    pub fn insert_aggregate(&mut self, key: SeriesKey, series: Series) -> Result<(), TableError> {
        self.insert_with_origin(key, series, Origin::Aggregate)
    }

    fn insert_with_origin(
        &mut self,
        key: SeriesKey,
        series: Series,
        origin: Origin,
    ) -> Result<(), TableError> {
        if series.len() != self.times.len() {
            return Err(TableError::LengthMismatch {
                key: key.to_string(),
                expected: self.times.len(),
                got: series.len(),
            });
        }
        if self.columns.contains_key(&key) {
            return Err(TableError::DuplicateSeries {
                key: key.to_string(),
            });
        }
        self.columns.insert(key, Column { series, origin });
        Ok(())
    }

    pub fn times(&self) -> &[DateTime<Utc>] {
        &self.times
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }

    pub fn n_timesteps(&self) -> usize {
        self.times.len()
    }

    pub fn n_series(&self) -> usize {
        self.columns.len()
    }

    /// Looks up one series.
    pub fn get(&self, key: &SeriesKey) -> Option<&Series> {
        self.columns.get(key).map(|c| &c.series)
    }

    /// Provenance of one series.
    pub fn origin(&self, key: &SeriesKey) -> Option<Origin> {
        self.columns.get(key).map(|c| c.origin)
    }

    /// Returns `true` if any series reports `variable`.
    pub fn contains_variable(&self, variable: Variable) -> bool {
        self.columns.keys().any(|k| k.variable() == variable)
    }

    /// Iterates every series in key order.
    pub fn series(&self) -> impl Iterator<Item = (&SeriesKey, &Series)> {
        self.columns.iter().map(|(k, c)| (k, &c.series))
    }

    /// Iterates every series reporting `variable`, across all models.
    pub fn variable_series(&self, variable: Variable) -> impl Iterator<Item = (&SeriesKey, &Series)> {
        self.series().filter(move |(k, _)| k.variable() == variable)
    }

    /// Iterates the series of one model reporting `variable`.
    pub fn model_series<'a>(
        &'a self,
        model: &'a str,
        variable: Variable,
    ) -> impl Iterator<Item = (&'a SeriesKey, &'a Series)> + 'a {
        self.variable_series(variable)
            .filter(move |(k, _)| k.model() == model)
    }

    /// Distinct model identifiers, sorted.
    pub fn models(&self) -> Vec<&str> {
        let set: BTreeSet<&str> = self.columns.keys().map(|k| k.model()).collect();
        set.into_iter().collect()
    }

    /// Distinct models contributing at least one series of `variable`, sorted.
    pub fn models_for(&self, variable: Variable) -> Vec<&str> {
        let set: BTreeSet<&str> = self
            .variable_series(variable)
            .map(|(k, _)| k.model())
            .collect();
        set.into_iter().collect()
    }

    /// Member indices of `model` for `variable`, ascending.
    pub fn members(&self, model: &str, variable: Variable) -> Vec<u32> {
        self.model_series(model, variable)
            .map(|(k, _)| k.member())
            .collect()
    }

    /// Number of genuine ensemble members reporting `variable`, summed over
    /// models. Aggregate series are not counted.
    pub fn member_count(&self, variable: Variable) -> usize {
        self.columns
            .iter()
            .filter(|(k, c)| k.variable() == variable && c.origin == Origin::Member)
            .count()
    }

    /// Distinct variables present, sorted.
    pub fn variables(&self) -> Vec<Variable> {
        let set: BTreeSet<Variable> = self.columns.keys().map(|k| k.variable()).collect();
        set.into_iter().collect()
    }

    /// Defined values of `variable` at timestep `idx`, across every series.
    pub fn values_at(&self, variable: Variable, idx: usize) -> Vec<f64> {
        self.variable_series(variable)
            .filter_map(|(_, s)| s.get(idx))
            .collect()
    }

    /// Index of an exact timestamp.
    pub fn index_of(&self, t: DateTime<Utc>) -> Option<usize> {
        self.times.binary_search(&t).ok()
    }

    /// Index range of timestamps falling on calendar day `date` (UTC).
    /// Empty if the day is not covered.
    pub fn day_indices(&self, date: NaiveDate) -> Range<usize> {
        let start = self.times.partition_point(|t| t.date_naive() < date);
        let end = self.times.partition_point(|t| t.date_naive() <= date);
        start..end
    }

    /// Distinct calendar days covered by the time axis, ascending.
    pub fn dates(&self) -> Vec<NaiveDate> {
        let mut out: Vec<NaiveDate> = Vec::new();
        for t in &self.times {
            let d = t.date_naive();
            if out.last() != Some(&d) {
                out.push(d);
            }
        }
        out
    }

    /// Restricts the table to timestamps in `[start, end]`.
    ///
    /// # Errors
    ///
    /// [`TableError::EmptyTimeAxis`] if no timestamp falls in the range.
    pub fn filter_time_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Self, TableError> {
        let lo = self.times.partition_point(|t| *t < start);
        let hi = self.times.partition_point(|t| *t <= end);
        if lo >= hi {
            return Err(TableError::EmptyTimeAxis);
        }
        let columns = self
            .columns
            .iter()
            .map(|(k, c)| {
                (
                    k.clone(),
                    Column {
                        series: c.series.slice(lo..hi),
                        origin: c.origin,
                    },
                )
            })
            .collect();
        Ok(Self {
            times: self.times[lo..hi].to_vec(),
            interval: self.interval,
            columns,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variable::Quantity;
    use chrono::TimeZone;

    fn hourly(n: i64) -> Vec<DateTime<Utc>> {
        let t0 = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap();
        (0..n).map(|h| t0 + TimeDelta::hours(h)).collect()
    }

    #[test]
    fn rejects_irregular_axis() {
        let mut t = hourly(4);
        t[3] = t[2] + TimeDelta::hours(2);
        let err = EnsembleTable::new(t, Interval::Hourly).unwrap_err();
        assert!(matches!(err, TableError::IrregularInterval { count: 1, .. }));
    }

    #[test]
    fn rejects_wrong_length_series() {
        let mut table = EnsembleTable::new(hourly(3), Interval::Hourly).unwrap();
        let err = table
            .insert(
                SeriesKey::new("m", Quantity::Temperature2m, 0),
                Series::new(vec![1.0, 2.0]),
            )
            .unwrap_err();
        assert!(matches!(err, TableError::LengthMismatch { expected: 3, got: 2, .. }));
    }

    #[test]
    fn rejects_duplicate_key() {
        let mut table = EnsembleTable::new(hourly(1), Interval::Hourly).unwrap();
        let key = SeriesKey::new("m", Quantity::Temperature2m, 0);
        table.insert(key.clone(), Series::new(vec![1.0])).unwrap();
        let err = table.insert(key, Series::new(vec![2.0])).unwrap_err();
        assert!(matches!(err, TableError::DuplicateSeries { .. }));
    }

    #[test]
    fn aggregate_series_are_tagged_and_not_counted() {
        let mut table = EnsembleTable::new(hourly(1), Interval::Hourly).unwrap();
        let member = SeriesKey::new("a", Quantity::Temperature2m, 0);
        let agg = SeriesKey::new("b", Quantity::Temperature2m, 0);
        table.insert(member.clone(), Series::new(vec![1.0])).unwrap();
        table.insert_aggregate(agg.clone(), Series::new(vec![2.0])).unwrap();
        assert_eq!(table.origin(&member), Some(Origin::Member));
        assert_eq!(table.origin(&agg), Some(Origin::Aggregate));
        assert_eq!(table.member_count(Quantity::Temperature2m.into()), 1);
    }

    #[test]
    fn day_indices_cover_one_day() {
        let table = EnsembleTable::new(hourly(30), Interval::Hourly).unwrap();
        let d1 = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2025, 2, 2).unwrap();
        let d3 = NaiveDate::from_ymd_opt(2025, 2, 3).unwrap();
        assert_eq!(table.day_indices(d1), 0..24);
        assert_eq!(table.day_indices(d2), 24..30);
        assert!(table.day_indices(d3).is_empty());
        assert_eq!(table.dates(), vec![d1, d2]);
    }
}
