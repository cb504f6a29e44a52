//! Wind source selection with a 10 m fallback.

use serde::Serialize;
use snowcast_ensemble::{EnsembleStats, Percentiles, summarize};
use snowcast_table::{EnsembleTable, Quantity, Variable};

pub(crate) const SPEED_80M: Variable = Variable::new(Quantity::WindSpeed80m);
pub(crate) const DIRECTION_80M: Variable = Variable::new(Quantity::WindDirection80m);
pub(crate) const SPEED_10M: Variable = Variable::new(Quantity::WindSpeed10m);
pub(crate) const DIRECTION_10M: Variable = Variable::new(Quantity::WindDirection10m);

/// Which level a wind figure comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WindHeight {
    #[serde(rename = "80m")]
    Hub80m,
    /// 10 m wind scaled by the terrain factor.
    #[serde(rename = "10m_adjusted")]
    Adjusted10m,
    #[serde(rename = "unavailable")]
    Unavailable,
}

/// Wind at one timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindReport {
    pub speed: Option<EnsembleStats>,
    /// Circular mean of member directions (degrees, 0..360).
    pub direction: Option<f64>,
    pub height: WindHeight,
}

impl WindReport {
    pub(crate) fn unavailable() -> Self {
        Self {
            speed: None,
            direction: None,
            height: WindHeight::Unavailable,
        }
    }
}

/// Multiplies every location statistic by `factor`.
pub fn scale_stats(s: &EnsembleStats, factor: f64) -> EnsembleStats {
    EnsembleStats {
        min: s.min * factor,
        max: s.max * factor,
        mean: s.mean * factor,
        median: s.median * factor,
        std: s.std * factor.abs(),
        percentiles: Percentiles {
            p10: s.percentiles.p10 * factor,
            p25: s.percentiles.p25 * factor,
            p75: s.percentiles.p75 * factor,
            p90: s.percentiles.p90 * factor,
        },
        count: s.count,
    }
}

/// Circular mean of directions in degrees, or `None` if no value is finite
/// or the directions cancel out.
pub fn circular_mean_deg(directions: &[f64]) -> Option<f64> {
    let (mut s, mut c, mut n) = (0.0_f64, 0.0_f64, 0usize);
    for d in directions.iter().filter(|d| d.is_finite()) {
        let r = d.to_radians();
        s += r.sin();
        c += r.cos();
        n += 1;
    }
    if n == 0 || (s.hypot(c) / n as f64) < 1e-9 {
        return None;
    }
    Some(s.atan2(c).to_degrees().rem_euclid(360.0))
}

/// Selects the wind source at timestep `idx`: 80 m wind when it has a
/// positive mean, otherwise 10 m wind scaled by `terrain_factor`. Calm 80 m
/// wind with no 10 m values is still reported at 80 m.
pub fn wind_at(table: &EnsembleTable, idx: usize, terrain_factor: f64) -> WindReport {
    let hub = summarize(&table.values_at(SPEED_80M, idx));
    let hub_report = |s: EnsembleStats| WindReport {
        speed: Some(s),
        direction: circular_mean_deg(&table.values_at(DIRECTION_80M, idx)),
        height: WindHeight::Hub80m,
    };
    if let Some(s) = hub
        && s.mean > 0.0
    {
        return hub_report(s);
    }
    match (summarize(&table.values_at(SPEED_10M, idx)), hub) {
        (Some(s), _) => WindReport {
            speed: Some(scale_stats(&s, terrain_factor)),
            direction: circular_mean_deg(&table.values_at(DIRECTION_10M, idx)),
            height: WindHeight::Adjusted10m,
        },
        (None, Some(s)) => hub_report(s),
        (None, None) => WindReport::unavailable(),
    }
}
