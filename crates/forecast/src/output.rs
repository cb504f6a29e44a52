//! Forecast document and JSON serialization.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use snowcast_ensemble::{AgreementLevel, QualityReport};
use snowcast_table::Variable;

use crate::alerts::Alert;
use crate::config::Location;
use crate::daily::DailyRecord;
use crate::error::ForecastError;
use crate::hourly::HourlyRecord;
use crate::summary::ForecastSummary;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metadata {
    pub generated_at: DateTime<Utc>,
    pub location: Location,
    pub forecast_start: DateTime<Utc>,
    pub forecast_end: DateTime<Utc>,
    pub models: Vec<String>,
    /// Genuine temperature members across all models.
    pub ensemble_members: usize,
    pub calculations_included: Vec<&'static str>,
}

/// Whole-period comparison of one variable across models.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonSummary {
    pub variable: Variable,
    pub models: Vec<String>,
    pub overall_agreement: Option<AgreementLevel>,
    /// Number of timesteps at which each model was flagged as an outlier.
    pub outlier_counts: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    pub metadata: Metadata,
    pub summary: ForecastSummary,
    pub hourly: Vec<HourlyRecord>,
    pub daily: Vec<DailyRecord>,
    pub alerts: Vec<Alert>,
    pub model_comparison: Vec<ComparisonSummary>,
    pub quality: QualityReport,
}

/// Serializes a [`Forecast`] to pretty-printed JSON. Undefined values are
/// written as `null`.
pub fn to_json(forecast: &Forecast) -> Result<String, ForecastError> {
    serde_json::to_string_pretty(forecast).map_err(|e| ForecastError::Serialization {
        reason: e.to_string(),
    })
}
