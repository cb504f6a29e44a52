//! JSON ensemble table files.
//!
//! ```json
//! {
//!   "interval": "hourly",
//!   "times": ["2025-01-10T00:00:00Z", "2025-01-10T01:00:00Z"],
//!   "series": [
//!     {"model": "ecmwf_ifs025", "variable": "temperature_2m", "member": 0,
//!      "values": [-4.2, null]}
//!   ]
//! }
//! ```
//!
//! `null` marks a missing value. Daily files set `"aggregate": true` on
//! series that are per-model aggregates rather than ensemble members.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use snowcast_table::{EnsembleTable, Interval, Series, SeriesKey, Variable};
use tracing::info;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableFile {
    pub interval: Interval,
    pub times: Vec<DateTime<Utc>>,
    pub series: Vec<SeriesRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeriesRecord {
    pub model: String,
    pub variable: Variable,
    #[serde(default)]
    pub member: u32,
    #[serde(default)]
    pub aggregate: bool,
    pub values: Vec<Option<f64>>,
}

/// Builds a table from a parsed file.
pub fn build_table(file: TableFile) -> Result<EnsembleTable> {
    let mut table =
        EnsembleTable::new(file.times, file.interval).context("invalid time axis")?;
    for rec in file.series {
        let key = SeriesKey::new(rec.model, rec.variable, rec.member);
        let series = Series::from_options(rec.values);
        let inserted = if rec.aggregate {
            table.insert_aggregate(key, series)
        } else {
            table.insert(key, series)
        };
        inserted.context("invalid series")?;
    }
    Ok(table)
}

/// Reads and builds a table from a JSON file.
pub fn read_table(path: &Path) -> Result<EnsembleTable> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read table file: {}", path.display()))?;
    let file: TableFile = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse table file: {}", path.display()))?;
    let table = build_table(file)?;
    info!(
        path = %path.display(),
        n_timesteps = table.n_timesteps(),
        n_series = table.n_series(),
        "table loaded"
    );
    Ok(table)
}
