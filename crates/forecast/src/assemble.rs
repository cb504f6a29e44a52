//! Forecast assembly over an hourly (and optional daily) ensemble table.

use chrono::Utc;
use snowcast_ensemble::{EnsembleError, ModelComparison, assess_quality, compare_models};
use snowcast_snow::{SNOWFALL_CALCULATED, SnowError, append_snowfall};
use snowcast_table::{EnsembleTable, Interval, TableError};
use tracing::{debug, info, warn};

use crate::alerts::generate_alerts;
use crate::config::{ForecastConfig, Location};
use crate::daily::daily_records;
use crate::error::ForecastError;
use crate::hourly::{FREEZING_LEVEL, TEMPERATURE, hourly_records};
use crate::output::{ComparisonSummary, Forecast, Metadata};
use crate::summary::summarize_forecast;

/// Makes sure the table carries derived snowfall.
///
/// A table that already has `snowfall_calculated` is used as is. A table
/// lacking one of the physics inputs is left without snowfall. Returns
/// whether derived snowfall is available.
pub fn ensure_snowfall(table: &mut EnsembleTable, config: &ForecastConfig) -> Result<bool, ForecastError> {
    if table.contains_variable(SNOWFALL_CALCULATED) {
        debug!("snowfall already present");
        return Ok(true);
    }
    match append_snowfall(table, config.snow_params()) {
        Ok(n) => Ok(n > 0),
        Err(SnowError::NoSuchVariable { variable }) => {
            warn!(%variable, "cannot derive snowfall: input missing");
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

fn require_interval(table: &EnsembleTable, expected: Interval) -> Result<(), ForecastError> {
    if table.interval() == expected {
        Ok(())
    } else {
        Err(ForecastError::IntervalMismatch {
            expected,
            got: table.interval(),
        })
    }
}

/// Compares models for each configured variable. Variables with fewer than
/// two models, or absent from the table, are skipped.
fn comparisons(
    table: &EnsembleTable,
    config: &ForecastConfig,
) -> Result<Vec<ModelComparison>, ForecastError> {
    let mut out = Vec::new();
    for &variable in config.comparison_variables() {
        match compare_models(table, variable, config.agreement()) {
            Ok(c) => out.push(c),
            Err(
                e @ (EnsembleError::InsufficientModels { .. }
                | EnsembleError::NoSuchVariable { .. }),
            ) => debug!(variable = %variable, reason = %e, "skipping model comparison"),
            Err(e) => return Err(e.into()),
        }
    }
    Ok(out)
}

fn comparison_summary(c: &ModelComparison, config: &ForecastConfig) -> ComparisonSummary {
    let means = c.model_means();
    let outlier_counts = means
        .models()
        .map(|m| {
            let n = c
                .deviations()
                .iter()
                .flatten()
                .filter(|d| d.outlier && d.model == m)
                .count();
            (m.to_string(), n)
        })
        .collect();
    ComparisonSummary {
        variable: means.variable(),
        models: means.models().map(str::to_string).collect(),
        overall_agreement: c.overall_agreement(config.agreement()),
        outlier_counts,
    }
}

/// Assembles the full forecast.
///
/// Derived snowfall is appended to `hourly` when the physics inputs are
/// present. `daily`, when given, supplies daily temperature, precipitation
/// and wind aggregates; the hourly table fills in what it lacks.
///
/// # Errors
///
/// - [`ForecastError::InvalidConfig`] (or a wrapped engine error) if
///   `config` or `location` fail validation
/// - [`ForecastError::IntervalMismatch`] if `hourly` is not hourly or
///   `daily` is not daily
/// - Any engine error other than a missing variable or too few models
#[tracing::instrument(skip_all, fields(location = %location.name))]
pub fn assemble_forecast(
    mut hourly: EnsembleTable,
    daily: Option<&EnsembleTable>,
    location: &Location,
    config: &ForecastConfig,
) -> Result<Forecast, ForecastError> {
    config.validate()?;
    location.validate()?;
    require_interval(&hourly, Interval::Hourly)?;
    if let Some(d) = daily {
        require_interval(d, Interval::Daily)?;
    }

    let has_snowfall = ensure_snowfall(&mut hourly, config)?;
    let comparisons = comparisons(&hourly, config)?;
    let hourly_out = hourly_records(&hourly, location, config, &comparisons)?;
    let daily_out = daily_records(&hourly, daily, location, config);
    let alerts = generate_alerts(&hourly_out, config.alert_rules());
    let summary = summarize_forecast(&hourly_out, &daily_out, config.alert_rules());

    let mut calculations_included = Vec::new();
    if has_snowfall {
        calculations_included.push("snowfall");
    }
    calculations_included.push("wind_adjustment");
    if !hourly.contains_variable(FREEZING_LEVEL) {
        calculations_included.push("freezing_level_estimation");
    }

    let (Some(&forecast_start), Some(&forecast_end)) = (hourly.times().first(), hourly.times().last())
    else {
        return Err(TableError::EmptyTimeAxis.into());
    };
    let metadata = Metadata {
        generated_at: Utc::now(),
        location: location.clone(),
        forecast_start,
        forecast_end,
        models: hourly.models().into_iter().map(str::to_string).collect(),
        ensemble_members: hourly.member_count(TEMPERATURE),
        calculations_included,
    };

    let model_comparison = comparisons
        .iter()
        .map(|c| comparison_summary(c, config))
        .collect();

    info!(
        n_hours = hourly_out.len(),
        n_days = daily_out.len(),
        n_alerts = alerts.len(),
        "forecast assembled"
    );
    Ok(Forecast {
        metadata,
        summary,
        hourly: hourly_out,
        daily: daily_out,
        alerts,
        model_comparison,
        quality: assess_quality(&hourly),
    })
}
