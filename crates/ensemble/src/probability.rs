//! Empirical event probabilities.
//!
//! A probability is the fraction of members with a defined value that
//! satisfy a predicate. Missing members are excluded from numerator and
//! denominator alike; a timestamp with no defined value has no probability.

use serde::Serialize;
use snowcast_table::{EnsembleTable, Quantity, Variable};

use crate::config::{ProbabilityThresholds, Tiers};
use crate::error::EnsembleError;
use crate::statistics::require_variable;

/// A strict one-sided threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Threshold {
    Above(f64),
    Below(f64),
}

impl Threshold {
    pub fn is_met(self, value: f64) -> bool {
        match self {
            Threshold::Above(t) => value > t,
            Threshold::Below(t) => value < t,
        }
    }
}

/// Fraction of the finite `values` satisfying `predicate`, or `None` if no
/// value is finite.
pub fn fraction(values: &[f64], predicate: impl Fn(f64) -> bool) -> Option<f64> {
    let (hits, n) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((0usize, 0usize), |(hits, n), &v| {
            (hits + usize::from(predicate(v)), n + 1)
        });
    if n == 0 {
        None
    } else {
        Some(hits as f64 / n as f64)
    }
}

/// Per-timestamp probability that a member's `variable` satisfies
/// `predicate`.
///
/// # Errors
///
/// [`EnsembleError::NoSuchVariable`] if no series reports `variable`.
pub fn probability(
    table: &EnsembleTable,
    variable: Variable,
    predicate: impl Fn(f64) -> bool,
) -> Result<Vec<Option<f64>>, EnsembleError> {
    require_variable(table, variable)?;
    Ok((0..table.n_timesteps())
        .map(|i| fraction(&table.values_at(variable, i), &predicate))
        .collect())
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PrecipitationProbabilities {
    pub measurable: f64,
    pub heavy: f64,
    pub very_heavy: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TemperatureProbabilities {
    pub freezing: f64,
    pub hard_freeze: f64,
    pub hot: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WindProbabilities {
    pub breezy: f64,
    pub windy: f64,
    pub very_windy: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SnowProbabilities {
    pub any: f64,
    pub moderate: f64,
    pub heavy: f64,
}

/// Evaluates three thresholds per timestamp on values multiplied by `scale`.
fn three_way(
    table: &EnsembleTable,
    variable: Variable,
    scale: f64,
    thresholds: [Threshold; 3],
) -> Result<Vec<Option<[f64; 3]>>, EnsembleError> {
    require_variable(table, variable)?;
    Ok((0..table.n_timesteps())
        .map(|i| {
            let values: Vec<f64> = table
                .values_at(variable, i)
                .into_iter()
                .map(|v| v * scale)
                .collect();
            let [a, b, c] = thresholds;
            Some([
                fraction(&values, |v| a.is_met(v))?,
                fraction(&values, |v| b.is_met(v))?,
                fraction(&values, |v| c.is_met(v))?,
            ])
        })
        .collect())
}

fn above(t: Tiers) -> [Threshold; 3] {
    [
        Threshold::Above(t.low),
        Threshold::Above(t.mid),
        Threshold::Above(t.high),
    ]
}

/// Measurable, heavy and very heavy precipitation probabilities.
pub fn precipitation_probabilities(
    table: &EnsembleTable,
    thresholds: &ProbabilityThresholds,
) -> Result<Vec<Option<PrecipitationProbabilities>>, EnsembleError> {
    let rows = three_way(
        table,
        Variable::new(Quantity::Precipitation),
        1.0,
        above(thresholds.precipitation()),
    )?;
    Ok(rows
        .into_iter()
        .map(|r| {
            r.map(|[measurable, heavy, very_heavy]| PrecipitationProbabilities {
                measurable,
                heavy,
                very_heavy,
            })
        })
        .collect())
}

/// Freezing, hard-freeze and hot probabilities from 2 m temperature.
pub fn temperature_probabilities(
    table: &EnsembleTable,
    thresholds: &ProbabilityThresholds,
) -> Result<Vec<Option<TemperatureProbabilities>>, EnsembleError> {
    let rows = three_way(
        table,
        Variable::new(Quantity::Temperature2m),
        1.0,
        [
            Threshold::Below(thresholds.freezing()),
            Threshold::Below(thresholds.hard_freeze()),
            Threshold::Above(thresholds.hot()),
        ],
    )?;
    Ok(rows
        .into_iter()
        .map(|r| {
            r.map(|[freezing, hard_freeze, hot]| TemperatureProbabilities {
                freezing,
                hard_freeze,
                hot,
            })
        })
        .collect())
}

/// Wind probabilities for `variable`, with every member value multiplied
/// by `scale` first (e.g. to bring 10 m wind to ridge height).
pub fn wind_probabilities(
    table: &EnsembleTable,
    variable: Variable,
    scale: f64,
    thresholds: &ProbabilityThresholds,
) -> Result<Vec<Option<WindProbabilities>>, EnsembleError> {
    let rows = three_way(table, variable, scale, above(thresholds.wind()))?;
    Ok(rows
        .into_iter()
        .map(|r| {
            r.map(|[breezy, windy, very_windy]| WindProbabilities {
                breezy,
                windy,
                very_windy,
            })
        })
        .collect())
}

/// Snowfall probabilities for `variable` (reported or derived snowfall).
pub fn snow_probabilities(
    table: &EnsembleTable,
    variable: Variable,
    thresholds: &ProbabilityThresholds,
) -> Result<Vec<Option<SnowProbabilities>>, EnsembleError> {
    let rows = three_way(table, variable, 1.0, above(thresholds.snow()))?;
    Ok(rows
        .into_iter()
        .map(|r| r.map(|[any, moderate, heavy]| SnowProbabilities { any, moderate, heavy }))
        .collect())
}
