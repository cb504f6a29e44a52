//! Per-day forecast records.
//!
//! Day totals are aggregated per member first and only then averaged
//! across members, so a single member's heavy burst survives into the
//! daily peak rate.

use std::ops::Range;

use chrono::NaiveDate;
use serde::Serialize;
use snowcast_snow::SNOWFALL_CALCULATED;
use snowcast_stats::{mean, min_max};
use snowcast_table::{Aggregation, EnsembleTable, Origin, Quantity, Variable};

use crate::config::{ForecastConfig, Location};
use crate::hourly::{FREEZING_LEVEL, PRECIPITATION, TEMPERATURE};
use crate::levels::estimate_freezing_level;
use crate::wind::{SPEED_80M, WindHeight, circular_mean_deg};

const TEMP_MIN: Variable = Variable::aggregated(Quantity::Temperature2m, Aggregation::Min);
const TEMP_MAX: Variable = Variable::aggregated(Quantity::Temperature2m, Aggregation::Max);
const TEMP_MEAN: Variable = Variable::aggregated(Quantity::Temperature2m, Aggregation::Mean);
const PRECIP_SUM: Variable = Variable::aggregated(Quantity::Precipitation, Aggregation::Sum);
const WIND_MEAN_10M: Variable = Variable::aggregated(Quantity::WindSpeed10m, Aggregation::Mean);
const WIND_DIR_10M: Variable =
    Variable::aggregated(Quantity::WindDirection10m, Aggregation::Dominant);

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyTemperature {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailySnowfall {
    /// Member day sums, averaged (cm).
    pub total: Option<f64>,
    /// Member hourly peaks, averaged (cm/h).
    pub max_hourly: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyWind {
    pub speed: Option<f64>,
    pub direction: Option<f64>,
    pub height: WindHeight,
}

/// Forecast for one calendar day (UTC).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub day_of_week: String,
    pub temperature: DailyTemperature,
    pub precipitation_total: Option<f64>,
    pub snowfall: DailySnowfall,
    pub wind: DailyWind,
    pub freezing_level: Option<f64>,
    pub summary: String,
}

/// Mean of every defined value of `variable` within `range`, across all
/// series. Used for tables that already hold one row per day.
fn mean_over(table: &EnsembleTable, variable: Variable, range: Range<usize>) -> Option<f64> {
    let values: Vec<f64> = table
        .variable_series(variable)
        .flat_map(|(_, s)| s.valid_in(range.clone()))
        .collect();
    mean(&values)
}

/// Reduces each genuine member over `range`, then averages across members.
/// Members with no defined value in the range are left out.
fn member_reduce(
    table: &EnsembleTable,
    variable: Variable,
    range: Range<usize>,
    reduce: impl Fn(&[f64]) -> Option<f64>,
) -> Option<f64> {
    let per_member: Vec<f64> = table
        .variable_series(variable)
        .filter(|(k, _)| table.origin(k) == Some(Origin::Member))
        .filter_map(|(_, s)| reduce(&s.valid_in(range.clone())))
        .collect();
    mean(&per_member)
}

fn sum(v: &[f64]) -> Option<f64> {
    if v.is_empty() { None } else { Some(v.iter().sum()) }
}

fn max(v: &[f64]) -> Option<f64> {
    min_max(v).map(|(_, hi)| hi)
}

fn min(v: &[f64]) -> Option<f64> {
    min_max(v).map(|(lo, _)| lo)
}

/// Daily value from the daily table, falling back to a member-wise
/// aggregate of the hourly table.
fn daily_or_hourly(
    daily: Option<(&EnsembleTable, Range<usize>)>,
    daily_variable: Variable,
    hourly: &EnsembleTable,
    hours: &Range<usize>,
    hourly_variable: Variable,
    reduce: impl Fn(&[f64]) -> Option<f64>,
) -> Option<f64> {
    daily
        .and_then(|(d, r)| mean_over(d, daily_variable, r))
        .or_else(|| member_reduce(hourly, hourly_variable, hours.clone(), reduce))
}

/// Daily 10 m mean wind when positive, else the member-wise 80 m daily
/// maximum. A calm 10 m day with no 80 m data stays a measured zero.
fn daily_wind(
    daily: Option<(&EnsembleTable, Range<usize>)>,
    hourly: &EnsembleTable,
    hours: &Range<usize>,
    config: &ForecastConfig,
) -> DailyWind {
    let ten_metre = daily.and_then(|(d, r)| {
        let speed = mean_over(d, WIND_MEAN_10M, r.clone())?;
        let directions: Vec<f64> = d
            .variable_series(WIND_DIR_10M)
            .flat_map(|(_, s)| s.valid_in(r.clone()))
            .collect();
        Some(DailyWind {
            speed: Some(speed * config.terrain_factor()),
            direction: circular_mean_deg(&directions),
            height: WindHeight::Adjusted10m,
        })
    });
    if let Some(w) = ten_metre
        && w.speed.is_some_and(|s| s > 0.0)
    {
        return w;
    }
    let hub = member_reduce(hourly, SPEED_80M, hours.clone(), max).map(|speed| DailyWind {
        speed: Some(speed),
        direction: None,
        height: WindHeight::Hub80m,
    });
    hub.or(ten_metre).unwrap_or(DailyWind {
        speed: None,
        direction: None,
        height: WindHeight::Unavailable,
    })
}

/// Mean freezing level over the day, or an estimate from the mean of the
/// member daily maximum temperatures.
fn daily_freezing_level(
    hourly: &EnsembleTable,
    hours: &Range<usize>,
    location: &Location,
    config: &ForecastConfig,
) -> Option<f64> {
    if let Some(fl) = mean_over(hourly, FREEZING_LEVEL, hours.clone())
        && fl > 0.0
    {
        return Some(fl);
    }
    let t_max = member_reduce(hourly, TEMPERATURE, hours.clone(), max)?;
    Some(estimate_freezing_level(t_max, location.elevation_m, config.lapse_rate()))
}

fn fmt_temp(v: Option<f64>) -> String {
    v.map_or_else(|| "n/a".to_string(), |t| format!("{t:.1}"))
}

/// One-line description of the day's weather.
pub fn daily_summary(
    temperature: &DailyTemperature,
    precipitation_total: Option<f64>,
    snowfall: &DailySnowfall,
) -> String {
    let temps = format!(
        "Temps {} to {}°C. ",
        fmt_temp(temperature.min),
        fmt_temp(temperature.max)
    );
    let Some(precip) = precipitation_total else {
        return temps + "No precipitation data.";
    };
    let snow = snowfall.total.unwrap_or(0.0);
    let cold = temperature.max.is_some_and(|t| t < 2.0);
    let weather = if precip < 0.1 {
        "Dry conditions expected.".to_string()
    } else if cold || snow > 0.1 {
        if snow > 20.0 {
            format!("Heavy snow expected ({snow:.0}cm).")
        } else if snow > 5.0 {
            format!("Moderate snow expected ({snow:.0}cm).")
        } else {
            "Light snow expected.".to_string()
        }
    } else if precip > 25.0 {
        "Heavy rain expected.".to_string()
    } else if precip > 10.0 {
        "Moderate rain expected.".to_string()
    } else {
        "Light rain expected.".to_string()
    };
    temps + &weather
}

/// Builds one [`DailyRecord`] per day.
///
/// Days are those of the daily table when one is given, otherwise the
/// calendar days covered by the hourly table.
pub fn daily_records(
    hourly: &EnsembleTable,
    daily: Option<&EnsembleTable>,
    location: &Location,
    config: &ForecastConfig,
) -> Vec<DailyRecord> {
    let dates = match daily {
        Some(d) => d.dates(),
        None => hourly.dates(),
    };
    dates
        .into_iter()
        .map(|date| {
            let hours = hourly.day_indices(date);
            let day = daily.map(|d| (d, d.day_indices(date)));

            let temperature = DailyTemperature {
                min: daily_or_hourly(day.clone(), TEMP_MIN, hourly, &hours, TEMPERATURE, min),
                max: daily_or_hourly(day.clone(), TEMP_MAX, hourly, &hours, TEMPERATURE, max),
                mean: daily_or_hourly(day.clone(), TEMP_MEAN, hourly, &hours, TEMPERATURE, mean),
            };
            let precipitation_total =
                daily_or_hourly(day.clone(), PRECIP_SUM, hourly, &hours, PRECIPITATION, sum);
            let snowfall = DailySnowfall {
                total: member_reduce(hourly, SNOWFALL_CALCULATED, hours.clone(), sum),
                max_hourly: member_reduce(hourly, SNOWFALL_CALCULATED, hours.clone(), max),
            };
            let summary = daily_summary(&temperature, precipitation_total, &snowfall);
            DailyRecord {
                date,
                day_of_week: date.format("%A").to_string(),
                temperature,
                precipitation_total,
                snowfall,
                wind: daily_wind(day, hourly, &hours, config),
                freezing_level: daily_freezing_level(hourly, &hours, location, config),
                summary,
            }
        })
        .collect()
}
