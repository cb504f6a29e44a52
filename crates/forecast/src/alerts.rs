//! Threshold alerts over the first hours of a forecast.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::AlertRules;
use crate::hourly::HourlyRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertKind {
    HeavySnow,
    HighWind,
    FreezingLevelChange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Moderate,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub severity: Severity,
    pub message: String,
    pub valid_from: DateTime<Utc>,
    pub valid_to: DateTime<Utc>,
}

/// Largest ensemble maximum wind speed among `records`.
pub(crate) fn peak_wind(records: &[HourlyRecord]) -> Option<f64> {
    records
        .iter()
        .filter_map(|r| r.wind.speed.map(|s| s.max))
        .reduce(f64::max)
}

/// Largest member snowfall among `records`.
pub(crate) fn peak_snowfall(records: &[HourlyRecord]) -> Option<f64> {
    records
        .iter()
        .filter_map(|r| r.snowfall.map(|s| s.max))
        .reduce(f64::max)
}

/// Raises heavy-snow, high-wind and freezing-level-change alerts from the
/// first `rules.window_hours` records.
///
/// The freezing-level rule needs a full window with a defined level at both
/// ends.
pub fn generate_alerts(hourly: &[HourlyRecord], rules: &AlertRules) -> Vec<Alert> {
    let window = &hourly[..hourly.len().min(rules.window_hours)];
    let (Some(first), Some(last)) = (window.first(), window.last()) else {
        return Vec::new();
    };
    let alert = |kind, severity, message| Alert {
        kind,
        severity,
        message,
        valid_from: first.time,
        valid_to: last.time,
    };

    let mut alerts = Vec::new();
    let snow_total: f64 = window.iter().filter_map(|r| r.snowfall.map(|s| s.mean)).sum();
    if snow_total > rules.heavy_snow_cm {
        alerts.push(alert(
            AlertKind::HeavySnow,
            Severity::High,
            format!(
                "Heavy snow warning: {snow_total:.0}cm expected in next {} hours",
                window.len()
            ),
        ));
    }

    if let Some(wind) = peak_wind(window)
        && wind > rules.high_wind_kmh
    {
        alerts.push(alert(
            AlertKind::HighWind,
            Severity::High,
            format!("High wind warning: gusts to {wind:.0} km/h expected"),
        ));
    }

    if window.len() == rules.window_hours
        && let (Some(start), Some(end)) = (first.freezing_level, last.freezing_level)
    {
        let change = end - start;
        if change.abs() > rules.freezing_level_change_m {
            let direction = if change > 0.0 { "rise" } else { "drop" };
            alerts.push(alert(
                AlertKind::FreezingLevelChange,
                Severity::Moderate,
                format!(
                    "Significant freezing level {direction}: {:.0}m change",
                    change.abs()
                ),
            ));
        }
    }
    alerts
}
