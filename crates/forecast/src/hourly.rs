//! Per-timestep forecast records.

use chrono::{DateTime, Utc};
use serde::Serialize;
use snowcast_ensemble::{
    AgreementSnapshot, EnsembleError, EnsembleStats, ModelComparison, PrecipitationProbabilities,
    SnowProbabilities, TemperatureProbabilities, Trend, WindProbabilities, calculate_statistics,
    calculate_trend, precipitation_probabilities, snow_probabilities, summarize,
    temperature_probabilities, wind_probabilities,
};
use snowcast_snow::SNOWFALL_CALCULATED;
use snowcast_table::{EnsembleTable, Quantity, Variable};
use tracing::debug;

use crate::config::{ForecastConfig, Location};
use crate::error::ForecastError;
use crate::levels::{estimate_freezing_level, profile_lapse_rate, snow_level};
use crate::wind::{SPEED_10M, SPEED_80M, WindHeight, WindReport, wind_at};

pub(crate) const TEMPERATURE: Variable = Variable::new(Quantity::Temperature2m);
pub(crate) const PRECIPITATION: Variable = Variable::new(Quantity::Precipitation);
pub(crate) const FREEZING_LEVEL: Variable = Variable::new(Quantity::FreezingLevelHeight);
const TEMPERATURE_850: Variable = Variable::new(Quantity::Temperature850hPa);

/// Event probabilities at one timestamp. Wind probabilities follow the
/// wind source chosen for the record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HourlyProbabilities {
    pub precipitation: Option<PrecipitationProbabilities>,
    pub temperature: Option<TemperatureProbabilities>,
    pub snow: Option<SnowProbabilities>,
    pub wind: Option<WindProbabilities>,
}

/// Forecast for one timestep.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyRecord {
    pub time: DateTime<Utc>,
    pub temperature: Option<EnsembleStats>,
    pub temperature_trend: Trend,
    pub precipitation: Option<EnsembleStats>,
    /// Statistics of the derived per-member snowfall (cm).
    pub snowfall: Option<EnsembleStats>,
    pub snow_level: Option<f64>,
    pub wind: WindReport,
    pub freezing_level: Option<f64>,
    pub probabilities: HourlyProbabilities,
    pub model_agreement: Vec<AgreementSnapshot>,
}

/// Runs `f` only if `variable` is in the table; otherwise every timestep
/// is undefined.
fn if_present<T: Clone>(
    table: &EnsembleTable,
    variable: Variable,
    f: impl FnOnce() -> Result<Vec<Option<T>>, EnsembleError>,
) -> Result<Vec<Option<T>>, EnsembleError> {
    if table.contains_variable(variable) {
        f()
    } else {
        debug!(variable = %variable, "variable absent, leaving undefined");
        Ok(vec![None; table.n_timesteps()])
    }
}

/// Freezing level at timestep `idx`: the model field when it is positive,
/// otherwise extrapolated from the 2 m temperature.
fn freezing_level_at(
    table: &EnsembleTable,
    idx: usize,
    temperature: Option<&EnsembleStats>,
    location: &Location,
    config: &ForecastConfig,
) -> Option<f64> {
    if let Some(fl) = summarize(&table.values_at(FREEZING_LEVEL, idx))
        && fl.mean > 0.0
    {
        return Some(fl.mean);
    }
    let surface = temperature?.mean;
    let lapse = match summarize(&table.values_at(TEMPERATURE_850, idx)) {
        Some(t850) => profile_lapse_rate(
            surface,
            t850.mean,
            config.height_850hpa(),
            config.lapse_rate(),
        ),
        None => config.lapse_rate(),
    };
    Some(estimate_freezing_level(surface, location.elevation_m, lapse))
}

/// Builds one [`HourlyRecord`] per timestep of `table`.
///
/// `comparisons` supply the per-timestep model agreement snapshots.
/// Variables the table lacks leave their fields undefined.
pub fn hourly_records(
    table: &EnsembleTable,
    location: &Location,
    config: &ForecastConfig,
    comparisons: &[ModelComparison],
) -> Result<Vec<HourlyRecord>, ForecastError> {
    let thresholds = config.thresholds();
    let temperature = if_present(table, TEMPERATURE, || calculate_statistics(table, TEMPERATURE))?;
    let precipitation =
        if_present(table, PRECIPITATION, || calculate_statistics(table, PRECIPITATION))?;
    let snowfall = if_present(table, SNOWFALL_CALCULATED, || {
        calculate_statistics(table, SNOWFALL_CALCULATED)
    })?;

    let precip_probs = if_present(table, PRECIPITATION, || {
        precipitation_probabilities(table, thresholds)
    })?;
    let temp_probs = if_present(table, TEMPERATURE, || {
        temperature_probabilities(table, thresholds)
    })?;
    let snow_probs = if_present(table, SNOWFALL_CALCULATED, || {
        snow_probabilities(table, SNOWFALL_CALCULATED, thresholds)
    })?;
    let wind_80m_probs = if_present(table, SPEED_80M, || {
        wind_probabilities(table, SPEED_80M, 1.0, thresholds)
    })?;
    let wind_10m_probs = if_present(table, SPEED_10M, || {
        wind_probabilities(table, SPEED_10M, config.terrain_factor(), thresholds)
    })?;

    let means: Vec<Option<f64>> = temperature.iter().map(|s| s.map(|s| s.mean)).collect();
    let trends = calculate_trend(&means, config.trend_window());

    let records = table
        .times()
        .iter()
        .enumerate()
        .map(|(i, &time)| {
            let temp = temperature[i];
            let wind = wind_at(table, i, config.terrain_factor());
            let wind_probs = match wind.height {
                WindHeight::Hub80m => wind_80m_probs[i],
                WindHeight::Adjusted10m => wind_10m_probs[i],
                WindHeight::Unavailable => None,
            };
            HourlyRecord {
                time,
                temperature: temp,
                temperature_trend: trends[i],
                precipitation: precipitation[i],
                snowfall: snowfall[i],
                snow_level: temp.map(|t| {
                    snow_level(
                        t.mean,
                        location.elevation_m,
                        config.lapse_rate(),
                        config.snow_level_offset(),
                    )
                }),
                freezing_level: freezing_level_at(table, i, temp.as_ref(), location, config),
                wind,
                probabilities: HourlyProbabilities {
                    precipitation: precip_probs[i],
                    temperature: temp_probs[i],
                    snow: snow_probs[i],
                    wind: wind_probs,
                },
                model_agreement: comparisons
                    .iter()
                    .filter_map(|c| c.snapshot(i, config.agreement()))
                    .collect(),
            }
        })
        .collect();
    Ok(records)
}
