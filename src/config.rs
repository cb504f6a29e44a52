use serde::Deserialize;

/// Top-level Snowcast configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct SnowcastConfig {
    /// Forecast location. Required by `forecast`.
    #[serde(default)]
    pub location: Option<LocationToml>,

    /// Snow model parameters.
    #[serde(default)]
    pub snow: SnowToml,

    /// Event probability thresholds.
    #[serde(default)]
    pub probability: ProbabilityToml,

    /// Assembler settings.
    #[serde(default)]
    pub forecast: ForecastToml,

    /// Cross-model comparison settings.
    #[serde(default)]
    pub comparison: ComparisonToml,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocationToml {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation_m: f64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SnowToml {
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    #[serde(default = "default_beta")]
    pub beta: f64,
    #[serde(default = "default_r_min")]
    pub r_min: f64,
    #[serde(default = "default_r_max")]
    pub r_max: f64,
    #[serde(default = "default_t_peak")]
    pub t_peak: f64,
    #[serde(default = "default_sigma")]
    pub sigma: f64,
    #[serde(default = "default_gamma")]
    pub gamma: f64,
    #[serde(default = "default_delta")]
    pub delta: f64,
}

impl Default for SnowToml {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
            beta: default_beta(),
            r_min: default_r_min(),
            r_max: default_r_max(),
            t_peak: default_t_peak(),
            sigma: default_sigma(),
            gamma: default_gamma(),
            delta: default_delta(),
        }
    }
}

fn default_alpha() -> f64 {
    1.2
}
fn default_beta() -> f64 {
    0.5
}
fn default_r_min() -> f64 {
    6.0
}
fn default_r_max() -> f64 {
    18.0
}
fn default_t_peak() -> f64 {
    -12.0
}
fn default_sigma() -> f64 {
    7.0
}
fn default_gamma() -> f64 {
    0.2
}
fn default_delta() -> f64 {
    0.05
}

/// Probability thresholds: a named preset, optionally overridden per
/// family. Tiers are `[low, mid, high]`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProbabilityToml {
    #[serde(default = "default_preset")]
    pub preset: String,
    #[serde(default)]
    pub precipitation: Option<[f64; 3]>,
    #[serde(default)]
    pub snow: Option<[f64; 3]>,
    #[serde(default)]
    pub wind: Option<[f64; 3]>,
    /// `[freezing, hard_freeze, hot]` in °C.
    #[serde(default)]
    pub temperature: Option<[f64; 3]>,
}

impl Default for ProbabilityToml {
    fn default() -> Self {
        Self {
            preset: default_preset(),
            precipitation: None,
            snow: None,
            wind: None,
            temperature: None,
        }
    }
}

fn default_preset() -> String {
    "mountain".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForecastToml {
    #[serde(default = "default_trend_window")]
    pub trend_window: usize,
    #[serde(default = "default_lapse_rate")]
    pub lapse_rate: f64,
    #[serde(default = "default_snow_level_offset")]
    pub snow_level_offset_m: f64,
    #[serde(default = "default_height_850hpa")]
    pub height_850hpa_m: f64,
    #[serde(default = "default_terrain_factor")]
    pub terrain_factor: f64,
    #[serde(default = "default_alert_window")]
    pub alert_window_hours: usize,
    #[serde(default = "default_heavy_snow")]
    pub heavy_snow_cm: f64,
    #[serde(default = "default_high_wind")]
    pub high_wind_kmh: f64,
    #[serde(default = "default_freezing_level_change")]
    pub freezing_level_change_m: f64,
}

impl Default for ForecastToml {
    fn default() -> Self {
        Self {
            trend_window: default_trend_window(),
            lapse_rate: default_lapse_rate(),
            snow_level_offset_m: default_snow_level_offset(),
            height_850hpa_m: default_height_850hpa(),
            terrain_factor: default_terrain_factor(),
            alert_window_hours: default_alert_window(),
            heavy_snow_cm: default_heavy_snow(),
            high_wind_kmh: default_high_wind(),
            freezing_level_change_m: default_freezing_level_change(),
        }
    }
}

fn default_trend_window() -> usize {
    3
}
fn default_lapse_rate() -> f64 {
    0.0065
}
fn default_snow_level_offset() -> f64 {
    300.0
}
fn default_height_850hpa() -> f64 {
    1500.0
}
fn default_terrain_factor() -> f64 {
    1.4
}
fn default_alert_window() -> usize {
    24
}
fn default_heavy_snow() -> f64 {
    30.0
}
fn default_high_wind() -> f64 {
    80.0
}
fn default_freezing_level_change() -> f64 {
    500.0
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComparisonToml {
    #[serde(default = "default_comparison_variables")]
    pub variables: Vec<String>,
    #[serde(default = "default_outlier_threshold")]
    pub outlier_threshold: f64,
    #[serde(default = "default_high_cv")]
    pub high_cv: f64,
    #[serde(default = "default_moderate_cv")]
    pub moderate_cv: f64,
}

impl Default for ComparisonToml {
    fn default() -> Self {
        Self {
            variables: default_comparison_variables(),
            outlier_threshold: default_outlier_threshold(),
            high_cv: default_high_cv(),
            moderate_cv: default_moderate_cv(),
        }
    }
}

fn default_comparison_variables() -> Vec<String> {
    ["temperature_2m", "precipitation", "snowfall_calculated"]
        .map(String::from)
        .to_vec()
}
fn default_outlier_threshold() -> f64 {
    1.5
}
fn default_high_cv() -> f64 {
    0.1
}
fn default_moderate_cv() -> f64 {
    0.3
}
