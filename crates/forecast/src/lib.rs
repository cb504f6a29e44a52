//! # snowcast-forecast
//!
//! Builds a structured mountain forecast from an hourly ensemble table and
//! an optional daily one:
//!
//! - per-hour statistics, temperature trend, snow and freezing levels, wind
//!   with a 10 m fallback, event probabilities and model agreement
//! - per-day aggregates computed member-wise before averaging
//! - alerts, an operational rating and an executive summary
//! - metadata, model comparison and a data-quality report
//!
//! [`assemble_forecast`] runs the whole pipeline; the record builders are
//! public for callers that need a single part.

mod alerts;
mod assemble;
mod config;
mod daily;
mod error;
mod hourly;
mod levels;
mod output;
mod summary;
mod wind;

pub use alerts::{Alert, AlertKind, Severity, generate_alerts};
pub use assemble::{assemble_forecast, ensure_snowfall};
pub use config::{AlertRules, ForecastConfig, Location};
pub use daily::{DailyRecord, DailySnowfall, DailyTemperature, DailyWind, daily_records, daily_summary};
pub use error::ForecastError;
pub use hourly::{HourlyProbabilities, HourlyRecord, hourly_records};
pub use levels::{estimate_freezing_level, profile_lapse_rate, snow_level};
pub use output::{ComparisonSummary, Forecast, Metadata, to_json};
pub use summary::{Concern, ForecastSummary, OperationalConditions, Rating, key_concerns, summarize_forecast};
pub use wind::{WindHeight, WindReport, circular_mean_deg, scale_stats, wind_at};
