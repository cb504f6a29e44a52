//! Snow-level and freezing-level estimates by linear lapse-rate
//! extrapolation from the station.
//!
//! All heights are metres above sea level.

/// Lowest elevation at which precipitation is expected to fall as snow.
///
/// At or below 0 °C at the station this is the station itself; otherwise
/// it sits `offset_m` below the extrapolated freezing level, never below
/// the station.
pub fn snow_level(temp_c: f64, elevation_m: f64, lapse_rate: f64, offset_m: f64) -> f64 {
    if temp_c <= 0.0 {
        return elevation_m;
    }
    let freezing = elevation_m + temp_c / lapse_rate;
    elevation_m.max(freezing - offset_m)
}

/// Lapse rate between the surface and the 850 hPa level.
///
/// Falls back to `standard` when the profile is isothermal or inverted,
/// since a non-positive rate cannot be extrapolated to a freezing level.
pub fn profile_lapse_rate(surface_c: f64, t850_c: f64, height_850_m: f64, standard: f64) -> f64 {
    let rate = (surface_c - t850_c) / height_850_m;
    if rate.is_finite() && rate > 0.0 { rate } else { standard }
}

/// Height of the 0 °C isotherm extrapolated from the surface temperature.
///
/// A station at or below freezing has its freezing level at the station.
pub fn estimate_freezing_level(surface_c: f64, elevation_m: f64, lapse_rate: f64) -> f64 {
    elevation_m + surface_c.max(0.0) / lapse_rate
}
