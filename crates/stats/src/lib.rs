//! Statistical helper functions for snowcast ensemble reductions.
//!
//! Every reduction here treats an empty input as "no data" and returns
//! `None` instead of a numeric sentinel: for snow and precipitation a
//! measured zero and a missing value mean different things.

use std::cmp::Ordering;

/// Copies the finite values of `data`, dropping NaN and infinities.
pub fn finite_values(data: &[f64]) -> Vec<f64> {
    data.iter().copied().filter(|v| v.is_finite()).collect()
}

/// Sorts a slice ascending in place. NaN values compare as equal and should
/// be filtered out beforehand with [`finite_values`].
pub fn sort_ascending(data: &mut [f64]) {
    data.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
}

/// Arithmetic mean. Returns `None` if empty.
pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    Some(data.iter().sum::<f64>() / data.len() as f64)
}

/// Sample variance with N-1 denominator.
///
/// Returns `None` if empty and `Some(0.0)` for a single value, so a lone
/// ensemble member reports zero spread rather than an undefined one.
pub fn variance(data: &[f64]) -> Option<f64> {
    let n = data.len();
    match n {
        0 => None,
        1 => Some(0.0),
        _ => {
            let nf = n as f64;
            let m = data.iter().sum::<f64>() / nf;
            Some(data.iter().map(|&x| (x - m) * (x - m)).sum::<f64>() / (nf - 1.0))
        }
    }
}

/// Sample standard deviation with N-1 denominator. See [`variance`].
pub fn sd(data: &[f64]) -> Option<f64> {
    variance(data).map(f64::sqrt)
}

/// Type-7 quantile (linear interpolation between order statistics).
///
/// **Expects pre-sorted input.** Returns `None` if `sorted` is empty.
/// `p` is clamped to `[0, 1]`.
pub fn quantile_type7(sorted: &[f64], p: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    let p = p.clamp(0.0, 1.0);
    let h = (n - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    Some(sorted[lo] + (h - h.floor()) * (sorted[hi] - sorted[lo]))
}

/// Median of pre-sorted data. For even length, averages the middle two values.
pub fn median(sorted: &[f64]) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    if n % 2 == 1 {
        Some(sorted[n / 2])
    } else {
        Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0)
    }
}

/// Minimum and maximum of a slice, or `None` if empty.
pub fn min_max(data: &[f64]) -> Option<(f64, f64)> {
    let mut iter = data.iter().copied();
    let first = iter.next()?;
    Some(iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
}

/// Pearson correlation coefficient.
///
/// Filters to indices where both `x[i]` and `y[i]` are finite.
/// Returns `None` if fewer than 3 finite pairs or if either input is
/// constant over those pairs.
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y.iter())
        .filter(|(xi, yi)| xi.is_finite() && yi.is_finite())
        .map(|(xi, yi)| (*xi, *yi))
        .collect();

    if pairs.len() < 3 {
        return None;
    }

    let n = pairs.len() as f64;
    let mx: f64 = pairs.iter().map(|(xi, _)| xi).sum::<f64>() / n;
    let my: f64 = pairs.iter().map(|(_, yi)| yi).sum::<f64>() / n;

    let (mut sum_xy, mut sum_xx, mut sum_yy) = (0.0, 0.0, 0.0);
    for &(xi, yi) in &pairs {
        let dx = xi - mx;
        let dy = yi - my;
        sum_xy += dx * dy;
        sum_xx += dx * dx;
        sum_yy += dy * dy;
    }

    let denom = (sum_xx * sum_yy).sqrt();
    if denom == 0.0 {
        return None;
    }

    Some(sum_xy / denom)
}
