//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Context, Result, bail};

use crate::config::*;

use snowcast_ensemble::{AgreementConfig, ProbabilityThresholds, Tiers};
use snowcast_forecast::{AlertRules, ForecastConfig, Location};
use snowcast_snow::SnowParams;
use snowcast_table::Variable;

/// Parses a threshold preset name into its default thresholds.
pub fn parse_preset(s: &str) -> Result<ProbabilityThresholds> {
    match s.to_lowercase().as_str() {
        "standard" => Ok(ProbabilityThresholds::new()),
        "mountain" => Ok(ProbabilityThresholds::mountain()),
        other => bail!("unknown probability preset: {other:?}"),
    }
}

/// Parses variable names, rejecting anything outside the vocabulary.
pub fn parse_variables(names: &[String]) -> Result<Vec<Variable>> {
    names
        .iter()
        .map(|n| {
            n.parse::<Variable>()
                .with_context(|| format!("invalid comparison variable {n:?}"))
        })
        .collect()
}

/// Builds [`SnowParams`] from the TOML snow configuration.
pub fn build_snow_params(snow: &SnowToml) -> SnowParams {
    SnowParams::new()
        .with_alpha(snow.alpha)
        .with_beta(snow.beta)
        .with_slr_range(snow.r_min, snow.r_max)
        .with_t_peak(snow.t_peak)
        .with_sigma(snow.sigma)
        .with_gamma(snow.gamma)
        .with_delta(snow.delta)
}

/// Builds [`ProbabilityThresholds`] from a preset plus overrides.
pub fn build_thresholds(prob: &ProbabilityToml) -> Result<ProbabilityThresholds> {
    let tiers = |t: [f64; 3]| Tiers::new(t[0], t[1], t[2]);
    let mut th = parse_preset(&prob.preset)?;
    if let Some(t) = prob.precipitation {
        th = th.with_precipitation(tiers(t));
    }
    if let Some(t) = prob.snow {
        th = th.with_snow(tiers(t));
    }
    if let Some(t) = prob.wind {
        th = th.with_wind(tiers(t));
    }
    if let Some([freezing, hard_freeze, hot]) = prob.temperature {
        th = th.with_temperature(freezing, hard_freeze, hot);
    }
    Ok(th)
}

/// Builds an [`AgreementConfig`] from the TOML comparison configuration.
pub fn build_agreement_config(cmp: &ComparisonToml) -> AgreementConfig {
    AgreementConfig::new()
        .with_outlier_threshold(cmp.outlier_threshold)
        .with_cv_bounds(cmp.high_cv, cmp.moderate_cv)
}

/// Builds [`AlertRules`] from the TOML forecast configuration. Concern
/// thresholds keep their defaults.
pub fn build_alert_rules(fc: &ForecastToml) -> AlertRules {
    AlertRules {
        window_hours: fc.alert_window_hours,
        heavy_snow_cm: fc.heavy_snow_cm,
        high_wind_kmh: fc.high_wind_kmh,
        freezing_level_change_m: fc.freezing_level_change_m,
        ..AlertRules::default()
    }
}

/// Builds the full [`ForecastConfig`] and validates it.
pub fn build_forecast_config(cfg: &SnowcastConfig) -> Result<ForecastConfig> {
    let fc = &cfg.forecast;
    let config = ForecastConfig::new()
        .with_snow_params(build_snow_params(&cfg.snow))
        .with_thresholds(build_thresholds(&cfg.probability)?)
        .with_agreement(build_agreement_config(&cfg.comparison))
        .with_comparison_variables(parse_variables(&cfg.comparison.variables)?)
        .with_alert_rules(build_alert_rules(fc))
        .with_trend_window(fc.trend_window)
        .with_lapse_rate(fc.lapse_rate)
        .with_snow_level_offset(fc.snow_level_offset_m)
        .with_height_850hpa(fc.height_850hpa_m)
        .with_terrain_factor(fc.terrain_factor);
    config.validate().context("invalid forecast configuration")?;
    Ok(config)
}

/// Builds a [`Location`] from the TOML location section.
pub fn build_location(loc: &LocationToml) -> Location {
    Location::new(&loc.name, loc.latitude, loc.longitude, loc.elevation_m)
}
