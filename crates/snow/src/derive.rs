//! Per-member snowfall derivation over an ensemble table.

use rayon::prelude::*;
use snowcast_table::{EnsembleTable, Quantity, Series, SeriesKey, Variable};
use tracing::{debug, warn};

use crate::config::SnowParams;
use crate::error::SnowError;
use crate::formulas::calculate_snowfall;

const TEMPERATURE: Variable = Variable::new(Quantity::Temperature2m);
const HUMIDITY: Variable = Variable::new(Quantity::RelativeHumidity2m);
const PRECIPITATION: Variable = Variable::new(Quantity::Precipitation);

/// The derived variable appended by [`append_snowfall`].
pub const SNOWFALL_CALCULATED: Variable = Variable::new(Quantity::SnowfallCalculated);

/// Applies the snow model elementwise to three aligned series.
///
/// A timestep with any missing input yields a missing output.
///
/// # Errors
///
/// [`SnowError::LengthMismatch`] if the series lengths differ.
pub fn snowfall_series(
    temp: &Series,
    rh: &Series,
    precip: &Series,
    duration_h: Option<f64>,
    params: &SnowParams,
) -> Result<Series, SnowError> {
    for (field, s) in [("relative_humidity", rh), ("precipitation", precip)] {
        if s.len() != temp.len() {
            return Err(SnowError::LengthMismatch {
                expected: temp.len(),
                got: s.len(),
                field: field.to_string(),
            });
        }
    }
    Ok(temp
        .iter()
        .zip(rh.iter())
        .zip(precip.iter())
        .map(|((t, h), p)| match (t, h, p) {
            (Some(t), Some(h), Some(p)) => Some(calculate_snowfall(t, h, p, duration_h, params)),
            _ => None,
        })
        .collect())
}

/// Derives a `snowfall_calculated` series for every `(model, member)` that
/// reports temperature, humidity and precipitation.
///
/// The table interval is used as the precipitation duration. Members lacking
/// humidity or precipitation are skipped with a warning. The table is only
/// read; merging the results is left to the caller.
///
/// # Errors
///
/// - [`SnowError::InvalidParams`] if `params` fail validation
/// - [`SnowError::NoSuchVariable`] if the table has no series at all for one
///   of the three inputs
#[tracing::instrument(skip(table, params), fields(n_series = table.n_series()))]
pub fn compute_snowfall(
    table: &EnsembleTable,
    params: &SnowParams,
) -> Result<Vec<(SeriesKey, Series)>, SnowError> {
    params.validate()?;
    for v in [TEMPERATURE, HUMIDITY, PRECIPITATION] {
        if !table.contains_variable(v) {
            return Err(SnowError::NoSuchVariable {
                variable: v.to_string(),
            });
        }
    }

    let duration = Some(table.interval().hours());
    let mut inputs: Vec<(SeriesKey, &Series, &Series, &Series)> = Vec::new();
    for (key, temp) in table.variable_series(TEMPERATURE) {
        let rh = table.get(&key.with_variable(HUMIDITY));
        let precip = table.get(&key.with_variable(PRECIPITATION));
        match (rh, precip) {
            (Some(rh), Some(precip)) => {
                inputs.push((key.with_variable(SNOWFALL_CALCULATED), temp, rh, precip));
            }
            _ => warn!(
                model = key.model(),
                member = key.member(),
                "skipping member: humidity or precipitation missing"
            ),
        }
    }

    let derived: Vec<(SeriesKey, Series)> = inputs
        .par_iter()
        .map(|(key, temp, rh, precip)| {
            snowfall_series(temp, rh, precip, duration, params).map(|s| (key.clone(), s))
        })
        .collect::<Result<_, _>>()?;

    debug!(n_members = derived.len(), "derived snowfall");
    Ok(derived)
}

/// Computes derived snowfall and inserts it into `table` under
/// `snowfall_calculated`. Returns the number of series added.
///
/// # Errors
///
/// As [`compute_snowfall`], plus [`SnowError::Table`] if a derived series is
/// already present.
pub fn append_snowfall(table: &mut EnsembleTable, params: &SnowParams) -> Result<usize, SnowError> {
    let derived = compute_snowfall(table, params)?;
    let n = derived.len();
    for (key, series) in derived {
        table.insert(key, series)?;
    }
    Ok(n)
}
