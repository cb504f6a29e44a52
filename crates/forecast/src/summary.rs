//! Operational rating and executive summary.

use serde::Serialize;

use crate::alerts::{peak_snowfall, peak_wind};
use crate::config::AlertRules;
use crate::daily::DailyRecord;
use crate::hourly::HourlyRecord;

/// Number of leading days the executive summary covers.
const SUMMARY_DAYS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Concern {
    #[serde(rename = "Heavy snowfall")]
    HeavySnowfall,
    #[serde(rename = "Strong winds")]
    StrongWinds,
    #[serde(rename = "Poor visibility likely")]
    PoorVisibility,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rating {
    Good,
    Fair,
    Poor,
}

impl Rating {
    /// Rating for a number of concerns.
    pub fn from_concerns(n: usize) -> Self {
        match n {
            0 => Rating::Good,
            1 => Rating::Fair,
            _ => Rating::Poor,
        }
    }

    pub fn rationale(self) -> &'static str {
        match self {
            Rating::Good => "Generally favorable conditions",
            Rating::Fair => "Some challenging conditions",
            Rating::Poor => "Multiple hazardous conditions",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationalConditions {
    pub rating: Rating,
    pub rationale: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastSummary {
    /// `None` when there are no daily records.
    pub executive_summary: Option<String>,
    pub key_concerns: Vec<Concern>,
    pub operational_conditions: OperationalConditions,
}

/// Concerns raised by the first `rules.window_hours` records.
pub fn key_concerns(hourly: &[HourlyRecord], rules: &AlertRules) -> Vec<Concern> {
    let window = &hourly[..hourly.len().min(rules.window_hours)];
    let snow = peak_snowfall(window).unwrap_or(0.0);
    let wind = peak_wind(window).unwrap_or(0.0);
    let mut concerns = Vec::new();
    if snow > rules.concern_snow_cm {
        concerns.push(Concern::HeavySnowfall);
    }
    if wind > rules.concern_wind_kmh {
        concerns.push(Concern::StrongWinds);
    }
    if snow > rules.visibility_snow_cm && wind > rules.visibility_wind_kmh {
        concerns.push(Concern::PoorVisibility);
    }
    concerns
}

fn executive_summary(daily: &[DailyRecord]) -> Option<String> {
    let first = daily.first()?;
    let fmt = |v: Option<f64>| v.map_or_else(|| "n/a".to_string(), |t| format!("{t:.1}"));
    let range = format!(
        "{} to {}°C",
        fmt(first.temperature.min),
        fmt(first.temperature.max)
    );
    let days = &daily[..daily.len().min(SUMMARY_DAYS)];
    let snow: f64 = days.iter().filter_map(|d| d.snowfall.total).sum();
    let precip: f64 = days.iter().filter_map(|d| d.precipitation_total).sum();
    let text = if snow > 30.0 {
        format!(
            "Temps {range}. Significant snow accumulation ({snow:.0}cm over {} days).",
            days.len()
        )
    } else if snow > 5.0 {
        format!("Temps {range}. Moderate snow expected ({snow:.0}cm total).")
    } else if precip > 10.0 {
        format!("Temps {range}. Wet conditions expected.")
    } else {
        format!("Temps {range}. Generally dry conditions.")
    };
    Some(text)
}

pub fn summarize_forecast(
    hourly: &[HourlyRecord],
    daily: &[DailyRecord],
    rules: &AlertRules,
) -> ForecastSummary {
    let key_concerns = key_concerns(hourly, rules);
    let rating = Rating::from_concerns(key_concerns.len());
    ForecastSummary {
        executive_summary: executive_summary(daily),
        key_concerns,
        operational_conditions: OperationalConditions {
            rating,
            rationale: rating.rationale().to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_by_concern_count() {
        assert_eq!(Rating::from_concerns(0), Rating::Good);
        assert_eq!(Rating::from_concerns(1), Rating::Fair);
        assert_eq!(Rating::from_concerns(3), Rating::Poor);
    }

    #[test]
    fn no_records_no_concerns() {
        let s = summarize_forecast(&[], &[], &AlertRules::default());
        assert!(s.key_concerns.is_empty());
        assert!(s.executive_summary.is_none());
        assert_eq!(s.operational_conditions.rating, Rating::Good);
    }

    #[test]
    fn concern_serializes_as_text() {
        assert_eq!(
            serde_json::to_string(&Concern::PoorVisibility).unwrap(),
            "\"Poor visibility likely\""
        );
        assert_eq!(serde_json::to_string(&Rating::Fair).unwrap(), "\"FAIR\"");
    }
}
