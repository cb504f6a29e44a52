//! Scalar snow physics.
//!
//! Each stage is a pure function of finite inputs. Out-of-range humidity is
//! clamped and the final depth is floored at zero, so no finite input can
//! produce an error or a negative snowfall.

use crate::config::SnowParams;

/// Wet-bulb temperature (°C) from air temperature (°C) and relative
/// humidity (%), using Stull's (2011) closed-form fit.
///
/// `rh` is clamped to `[0, 100]`. Accurate to about 0.5 °C for
/// temperatures from -20 to 50 °C.
pub fn wet_bulb_temperature(temp_c: f64, rh_pct: f64) -> f64 {
    let rh = rh_pct.clamp(0.0, 100.0);
    temp_c * (0.151977 * (rh + 8.313659).sqrt()).atan() + (temp_c + rh).atan()
        - (rh - 1.676331).atan()
        + 0.00391838 * rh.powf(1.5) * (0.023101 * rh).atan()
        - 4.686035
}

/// Probability (0 to 1) that precipitation falls as snow at wet-bulb
/// temperature `tw`: `1 / (1 + exp(alpha * (tw - beta)))`.
pub fn snow_probability(tw: f64, params: &SnowParams) -> f64 {
    1.0 / (1.0 + (params.alpha() * (tw - params.beta())).exp())
}

/// Base snow-to-liquid ratio, a Gaussian in temperature peaking at
/// `t_peak` and bounded by `[r_min, r_max]`.
pub fn base_slr(temp_c: f64, params: &SnowParams) -> f64 {
    let d = temp_c - params.t_peak();
    let s = params.sigma();
    params.r_min() + (params.r_max() - params.r_min()) * (-(d * d) / (2.0 * s * s)).exp()
}

/// Humidity adjustment of the SLR, clamped to `[0.8, 1.2]`.
///
/// Humid air gives denser snow (factor below 1), dry air fluffier snow.
pub fn humidity_factor(rh_pct: f64, params: &SnowParams) -> f64 {
    let rh = rh_pct.clamp(0.0, 100.0);
    (1.0 + params.gamma() * (50.0 - rh) / 50.0).clamp(0.8, 1.2)
}

/// Precipitation-rate adjustment of the SLR: `1 / (1 + delta * rate)`.
///
/// The rate is `precip / duration` in mm/h, taken as zero when either is
/// not positive.
pub fn rate_factor(precip_mm: f64, duration_h: f64, params: &SnowParams) -> f64 {
    let rate = if duration_h > 0.0 && precip_mm > 0.0 {
        precip_mm / duration_h
    } else {
        0.0
    };
    1.0 / (1.0 + params.delta() * rate)
}

/// Every intermediate of one snowfall evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnowBreakdown {
    pub wet_bulb_c: f64,
    pub snow_probability: f64,
    pub base_slr: f64,
    pub humidity_factor: f64,
    pub rate_factor: f64,
    /// `base_slr * humidity_factor * rate_factor`.
    pub effective_slr: f64,
    /// Final depth in cm, never negative.
    pub snowfall_cm: f64,
}

/// Runs the full model and returns every stage.
///
/// Without a duration no rate adjustment is applied.
pub fn snowfall_breakdown(
    temp_c: f64,
    rh_pct: f64,
    precip_mm: f64,
    duration_h: Option<f64>,
    params: &SnowParams,
) -> SnowBreakdown {
    let wet_bulb_c = wet_bulb_temperature(temp_c, rh_pct);
    let p_snow = snow_probability(wet_bulb_c, params);
    let slr = base_slr(temp_c, params);
    let f_rh = humidity_factor(rh_pct, params);
    let f_rate = duration_h.map_or(1.0, |h| rate_factor(precip_mm, h, params));
    let effective_slr = slr * f_rh * f_rate;
    // mm of snow -> cm
    let snowfall_cm = (precip_mm * effective_slr * p_snow / 10.0).max(0.0);

    SnowBreakdown {
        wet_bulb_c,
        snow_probability: p_snow,
        base_slr: slr,
        humidity_factor: f_rh,
        rate_factor: f_rate,
        effective_slr,
        snowfall_cm,
    }
}

/// Snowfall depth (cm) from temperature (°C), relative humidity (%) and
/// liquid-equivalent precipitation (mm) over an optional duration (h).
pub fn calculate_snowfall(
    temp_c: f64,
    rh_pct: f64,
    precip_mm: f64,
    duration_h: Option<f64>,
    params: &SnowParams,
) -> f64 {
    snowfall_breakdown(temp_c, rh_pct, precip_mm, duration_h, params).snowfall_cm
}
