//! Configuration types for probabilities and model agreement.

use crate::error::EnsembleError;

/// Three increasing exceedance thresholds for one event family.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tiers {
    pub low: f64,
    pub mid: f64,
    pub high: f64,
}

impl Tiers {
    pub const fn new(low: f64, mid: f64, high: f64) -> Self {
        Self { low, mid, high }
    }

    fn validate(&self, family: &str) -> Result<(), EnsembleError> {
        let ok = self.low.is_finite()
            && self.mid.is_finite()
            && self.high.is_finite()
            && self.low < self.mid
            && self.mid < self.high;
        if ok {
            Ok(())
        } else {
            Err(EnsembleError::InvalidConfig {
                reason: format!(
                    "{family} thresholds must be finite and strictly increasing, got {}/{}/{}",
                    self.low, self.mid, self.high
                ),
            })
        }
    }
}

/// Thresholds for the named event probabilities.
///
/// One value object feeds every consumer, so plain and mountain outputs
/// differ only by which preset they are built from.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityThresholds {
    /// Measurable / heavy / very heavy precipitation (mm).
    precipitation: Tiers,
    /// Any / moderate / heavy snowfall (cm).
    snow: Tiers,
    /// Breezy / windy / very windy (km/h).
    wind: Tiers,
    /// Freezing: temperature below this (°C).
    freezing: f64,
    /// Hard freeze: temperature below this (°C).
    hard_freeze: f64,
    /// Hot: temperature above this (°C).
    hot: f64,
}

impl Default for ProbabilityThresholds {
    fn default() -> Self {
        Self {
            precipitation: Tiers::new(0.1, 5.0, 10.0),
            snow: Tiers::new(0.1, 5.0, 10.0),
            wind: Tiers::new(25.0, 40.0, 60.0),
            freezing: 0.0,
            hard_freeze: -5.0,
            hot: 30.0,
        }
    }
}

impl ProbabilityThresholds {
    /// General-purpose thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hourly thresholds tuned for mountain forecasts: precipitation
    /// 0.1/2.5/10 mm, snow 0.1/5/15 cm, wind 40/60/80 km/h.
    pub fn mountain() -> Self {
        Self {
            precipitation: Tiers::new(0.1, 2.5, 10.0),
            snow: Tiers::new(0.1, 5.0, 15.0),
            wind: Tiers::new(40.0, 60.0, 80.0),
            ..Self::default()
        }
    }

    pub fn with_precipitation(mut self, tiers: Tiers) -> Self {
        self.precipitation = tiers;
        self
    }

    pub fn with_snow(mut self, tiers: Tiers) -> Self {
        self.snow = tiers;
        self
    }

    pub fn with_wind(mut self, tiers: Tiers) -> Self {
        self.wind = tiers;
        self
    }

    /// Sets the freezing, hard-freeze and hot temperature thresholds.
    pub fn with_temperature(mut self, freezing: f64, hard_freeze: f64, hot: f64) -> Self {
        self.freezing = freezing;
        self.hard_freeze = hard_freeze;
        self.hot = hot;
        self
    }

    pub fn precipitation(&self) -> Tiers {
        self.precipitation
    }

    pub fn snow(&self) -> Tiers {
        self.snow
    }

    pub fn wind(&self) -> Tiers {
        self.wind
    }

    pub fn freezing(&self) -> f64 {
        self.freezing
    }

    pub fn hard_freeze(&self) -> f64 {
        self.hard_freeze
    }

    pub fn hot(&self) -> f64 {
        self.hot
    }

    /// Validates the thresholds.
    pub fn validate(&self) -> Result<(), EnsembleError> {
        self.precipitation.validate("precipitation")?;
        self.snow.validate("snow")?;
        self.wind.validate("wind")?;
        let temps_ok = self.freezing.is_finite()
            && self.hard_freeze.is_finite()
            && self.hot.is_finite()
            && self.hard_freeze < self.freezing
            && self.freezing < self.hot;
        if !temps_ok {
            return Err(EnsembleError::InvalidConfig {
                reason: format!(
                    "need hard_freeze < freezing < hot, got {}/{}/{}",
                    self.hard_freeze, self.freezing, self.hot
                ),
            });
        }
        Ok(())
    }
}

/// Configuration for the model agreement engine.
#[derive(Debug, Clone, PartialEq)]
pub struct AgreementConfig {
    /// |z| above which a model is flagged as an outlier.
    outlier_threshold: f64,
    /// cv below which agreement is high.
    high_cv: f64,
    /// cv below which agreement is moderate.
    moderate_cv: f64,
}

impl Default for AgreementConfig {
    fn default() -> Self {
        Self {
            outlier_threshold: 1.5,
            high_cv: 0.1,
            moderate_cv: 0.3,
        }
    }
}

impl AgreementConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_outlier_threshold(mut self, threshold: f64) -> Self {
        self.outlier_threshold = threshold;
        self
    }

    /// Sets the cv boundaries of the high and moderate agreement classes.
    pub fn with_cv_bounds(mut self, high_cv: f64, moderate_cv: f64) -> Self {
        self.high_cv = high_cv;
        self.moderate_cv = moderate_cv;
        self
    }

    pub fn outlier_threshold(&self) -> f64 {
        self.outlier_threshold
    }

    pub fn high_cv(&self) -> f64 {
        self.high_cv
    }

    pub fn moderate_cv(&self) -> f64 {
        self.moderate_cv
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), EnsembleError> {
        if !self.outlier_threshold.is_finite() || self.outlier_threshold <= 0.0 {
            return Err(EnsembleError::InvalidConfig {
                reason: format!(
                    "outlier_threshold must be finite and > 0, got {}",
                    self.outlier_threshold
                ),
            });
        }
        if !(self.high_cv.is_finite()
            && self.moderate_cv.is_finite()
            && 0.0 < self.high_cv
            && self.high_cv < self.moderate_cv)
        {
            return Err(EnsembleError::InvalidConfig {
                reason: format!(
                    "need 0 < high_cv < moderate_cv, got {}/{}",
                    self.high_cv, self.moderate_cv
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(ProbabilityThresholds::default().validate().is_ok());
        assert!(ProbabilityThresholds::mountain().validate().is_ok());
        assert!(AgreementConfig::default().validate().is_ok());
    }

    #[test]
    fn mountain_differs_only_where_intended() {
        let plain = ProbabilityThresholds::default();
        let mtn = ProbabilityThresholds::mountain();
        assert_eq!(plain.snow().high, 10.0);
        assert_eq!(mtn.snow().high, 15.0);
        assert_eq!(mtn.precipitation().mid, 2.5);
        assert_eq!(plain.freezing(), mtn.freezing());
        assert_eq!(plain.hot(), mtn.hot());
    }

    #[test]
    fn rejects_non_increasing_tiers() {
        let t = ProbabilityThresholds::new().with_snow(Tiers::new(5.0, 5.0, 10.0));
        assert!(matches!(t.validate(), Err(EnsembleError::InvalidConfig { .. })));
    }

    #[test]
    fn rejects_inverted_temperatures() {
        let t = ProbabilityThresholds::new().with_temperature(0.0, 5.0, 30.0);
        assert!(t.validate().is_err());
    }

    #[test]
    fn rejects_bad_agreement_config() {
        assert!(AgreementConfig::new().with_outlier_threshold(0.0).validate().is_err());
        assert!(AgreementConfig::new().with_cv_bounds(0.3, 0.1).validate().is_err());
    }
}
