//! Cross-member descriptive statistics.

use serde::Serialize;
use snowcast_stats::{finite_values, mean, median, min_max, quantile_type7, sd, sort_ascending};
use snowcast_table::{EnsembleTable, Variable};
use tracing::debug;

use crate::error::EnsembleError;

/// Type-7 percentiles of the member distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Percentiles {
    pub p10: f64,
    pub p25: f64,
    pub p75: f64,
    pub p90: f64,
}

/// Summary of the defined member values at one timestamp.
///
/// `std` is the sample standard deviation (N-1), zero for a single member.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnsembleStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub percentiles: Percentiles,
    /// Number of members with a defined value.
    pub count: usize,
}

/// Summarises a set of member values. Non-finite values are ignored;
/// returns `None` if nothing is left.
pub fn summarize(values: &[f64]) -> Option<EnsembleStats> {
    let mut v = finite_values(values);
    sort_ascending(&mut v);
    let (min, max) = min_max(&v)?;
    Some(EnsembleStats {
        min,
        max,
        mean: mean(&v)?,
        median: median(&v)?,
        std: sd(&v)?,
        percentiles: Percentiles {
            p10: quantile_type7(&v, 0.10)?,
            p25: quantile_type7(&v, 0.25)?,
            p75: quantile_type7(&v, 0.75)?,
            p90: quantile_type7(&v, 0.90)?,
        },
        count: v.len(),
    })
}

/// Computes [`EnsembleStats`] for `variable` at every timestamp, across
/// every series (all models, all members) reporting it.
///
/// A timestamp with no defined value yields `None`.
///
/// # Errors
///
/// [`EnsembleError::NoSuchVariable`] if no series reports `variable`.
#[tracing::instrument(skip_all, fields(variable = %variable))]
pub fn calculate_statistics(
    table: &EnsembleTable,
    variable: Variable,
) -> Result<Vec<Option<EnsembleStats>>, EnsembleError> {
    require_variable(table, variable)?;
    let out: Vec<Option<EnsembleStats>> = (0..table.n_timesteps())
        .map(|i| summarize(&table.values_at(variable, i)))
        .collect();
    debug!(
        undefined = out.iter().filter(|s| s.is_none()).count(),
        "statistics computed"
    );
    Ok(out)
}

pub(crate) fn require_variable(table: &EnsembleTable, variable: Variable) -> Result<(), EnsembleError> {
    if table.contains_variable(variable) {
        Ok(())
    } else {
        Err(EnsembleError::NoSuchVariable {
            variable: variable.to_string(),
        })
    }
}
