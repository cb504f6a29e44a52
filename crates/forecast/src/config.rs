//! Forecast location and assembler configuration.

use serde::Serialize;
use snowcast_ensemble::{AgreementConfig, DEFAULT_TREND_WINDOW, ProbabilityThresholds};
use snowcast_snow::{SNOWFALL_CALCULATED, SnowParams};
use snowcast_table::{Quantity, Variable};

use crate::error::ForecastError;

/// Where the forecast is for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Station elevation (m above sea level).
    pub elevation_m: f64,
}

impl Location {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64, elevation_m: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
            elevation_m,
        }
    }

    /// Validates coordinate ranges and elevation.
    pub fn validate(&self) -> Result<(), ForecastError> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(ForecastError::InvalidConfig {
                reason: format!("latitude must be in [-90, 90], got {}", self.latitude),
            });
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(ForecastError::InvalidConfig {
                reason: format!("longitude must be in [-180, 180], got {}", self.longitude),
            });
        }
        if !self.elevation_m.is_finite() {
            return Err(ForecastError::InvalidConfig {
                reason: format!("elevation must be finite, got {}", self.elevation_m),
            });
        }
        Ok(())
    }
}

/// Thresholds of the alert and operational-rating rules.
///
/// Rules look at the first `window_hours` hourly records.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertRules {
    pub window_hours: usize,
    /// Summed mean snowfall (cm) above which a heavy-snow alert is raised.
    pub heavy_snow_cm: f64,
    /// Maximum wind (km/h) above which a high-wind alert is raised.
    pub high_wind_kmh: f64,
    /// Freezing-level change (m) across the window that raises an alert.
    pub freezing_level_change_m: f64,
    /// Peak member snowfall (cm/h) counted as a heavy-snowfall concern.
    pub concern_snow_cm: f64,
    /// Peak wind (km/h) counted as a strong-wind concern.
    pub concern_wind_kmh: f64,
    /// Snowfall (cm/h) and wind (km/h) that together suggest poor visibility.
    pub visibility_snow_cm: f64,
    pub visibility_wind_kmh: f64,
}

impl Default for AlertRules {
    fn default() -> Self {
        Self {
            window_hours: 24,
            heavy_snow_cm: 30.0,
            high_wind_kmh: 80.0,
            freezing_level_change_m: 500.0,
            concern_snow_cm: 5.0,
            concern_wind_kmh: 60.0,
            visibility_snow_cm: 2.0,
            visibility_wind_kmh: 40.0,
        }
    }
}

/// Configuration of the forecast assembler.
#[derive(Debug, Clone)]
pub struct ForecastConfig {
    snow: SnowParams,
    thresholds: ProbabilityThresholds,
    agreement: AgreementConfig,
    alerts: AlertRules,
    /// Variables compared across models.
    comparison_variables: Vec<Variable>,
    /// Trailing window of the temperature trend, in hours.
    trend_window: usize,
    /// Environmental lapse rate (°C per m).
    lapse_rate: f64,
    /// Snow level sits this far (m) below the freezing level.
    snow_level_offset_m: f64,
    /// Assumed height (m) of the 850 hPa surface above the station.
    height_850hpa_m: f64,
    /// Multiplier bringing 10 m wind to exposed-terrain speed.
    terrain_factor: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            snow: SnowParams::default(),
            thresholds: ProbabilityThresholds::mountain(),
            agreement: AgreementConfig::default(),
            alerts: AlertRules::default(),
            comparison_variables: vec![
                Variable::new(Quantity::Temperature2m),
                Variable::new(Quantity::Precipitation),
                SNOWFALL_CALCULATED,
            ],
            trend_window: DEFAULT_TREND_WINDOW,
            lapse_rate: 0.0065,
            snow_level_offset_m: 300.0,
            height_850hpa_m: 1500.0,
            terrain_factor: 1.4,
        }
    }
}

impl ForecastConfig {
    /// Creates a configuration with mountain defaults.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snow_params(mut self, params: SnowParams) -> Self {
        self.snow = params;
        self
    }

    pub fn with_thresholds(mut self, thresholds: ProbabilityThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_agreement(mut self, agreement: AgreementConfig) -> Self {
        self.agreement = agreement;
        self
    }

    pub fn with_alert_rules(mut self, alerts: AlertRules) -> Self {
        self.alerts = alerts;
        self
    }

    pub fn with_comparison_variables(mut self, variables: Vec<Variable>) -> Self {
        self.comparison_variables = variables;
        self
    }

    pub fn with_trend_window(mut self, window: usize) -> Self {
        self.trend_window = window;
        self
    }

    pub fn with_lapse_rate(mut self, lapse_rate: f64) -> Self {
        self.lapse_rate = lapse_rate;
        self
    }

    pub fn with_snow_level_offset(mut self, offset_m: f64) -> Self {
        self.snow_level_offset_m = offset_m;
        self
    }

    pub fn with_height_850hpa(mut self, height_m: f64) -> Self {
        self.height_850hpa_m = height_m;
        self
    }

    pub fn with_terrain_factor(mut self, factor: f64) -> Self {
        self.terrain_factor = factor;
        self
    }

    // --- Accessors ---

    pub fn snow_params(&self) -> &SnowParams {
        &self.snow
    }

    pub fn thresholds(&self) -> &ProbabilityThresholds {
        &self.thresholds
    }

    pub fn agreement(&self) -> &AgreementConfig {
        &self.agreement
    }

    pub fn alert_rules(&self) -> &AlertRules {
        &self.alerts
    }

    pub fn comparison_variables(&self) -> &[Variable] {
        &self.comparison_variables
    }

    pub fn trend_window(&self) -> usize {
        self.trend_window
    }

    pub fn lapse_rate(&self) -> f64 {
        self.lapse_rate
    }

    pub fn snow_level_offset(&self) -> f64 {
        self.snow_level_offset_m
    }

    pub fn height_850hpa(&self) -> f64 {
        self.height_850hpa_m
    }

    pub fn terrain_factor(&self) -> f64 {
        self.terrain_factor
    }

    /// Validates the whole configuration, nested engine configs included.
    pub fn validate(&self) -> Result<(), ForecastError> {
        self.snow.validate()?;
        self.thresholds.validate()?;
        self.agreement.validate()?;
        let positive = [
            ("lapse_rate", self.lapse_rate),
            ("height_850hpa", self.height_850hpa_m),
            ("terrain_factor", self.terrain_factor),
        ];
        for (name, v) in positive {
            if !v.is_finite() || v <= 0.0 {
                return Err(ForecastError::InvalidConfig {
                    reason: format!("{name} must be finite and > 0, got {v}"),
                });
            }
        }
        if !self.snow_level_offset_m.is_finite() || self.snow_level_offset_m < 0.0 {
            return Err(ForecastError::InvalidConfig {
                reason: format!(
                    "snow_level_offset must be finite and >= 0, got {}",
                    self.snow_level_offset_m
                ),
            });
        }
        if self.alerts.window_hours == 0 {
            return Err(ForecastError::InvalidConfig {
                reason: "alert window must be at least one hour".to_string(),
            });
        }
        Ok(())
    }
}
