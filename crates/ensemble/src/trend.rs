//! Windowed trend classification.

use serde::Serialize;

/// Default trailing window, in timesteps.
pub const DEFAULT_TREND_WINDOW: usize = 3;

/// Direction and speed of change over a trailing window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Stable,
    Rising,
    RapidlyRising,
    Falling,
    RapidlyFalling,
}

/// Classifies an average per-step rate of change.
///
/// The stable band is open: a rate of exactly ±0.5 counts as rising or
/// falling.
pub fn classify_rate(rate: f64) -> Trend {
    if rate > 2.0 {
        Trend::RapidlyRising
    } else if rate >= 0.5 {
        Trend::Rising
    } else if rate < -2.0 {
        Trend::RapidlyFalling
    } else if rate <= -0.5 {
        Trend::Falling
    } else {
        Trend::Stable
    }
}

/// Labels every point of `series` by `(v[i] - v[i - window]) / window`.
///
/// The first `window` points, and any point whose current or lagged value
/// is missing, are [`Trend::Stable`]. A window of 0 is treated as 1.
pub fn calculate_trend(series: &[Option<f64>], window: usize) -> Vec<Trend> {
    let w = window.max(1);
    (0..series.len())
        .map(|i| {
            if i < w {
                return Trend::Stable;
            }
            match (series[i - w], series[i]) {
                (Some(start), Some(end)) => classify_rate((end - start) / w as f64),
                _ => Trend::Stable,
            }
        })
        .collect()
}
