//! Tunable parameters of the snow model.

use crate::error::SnowError;

/// Parameters of the snow physics model.
///
/// Defaults suit a continental mountain climate. Maritime sites usually want
/// a lower `r_max` (12 to 15).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnowParams {
    /// Steepness of the snow/rain logistic transition.
    alpha: f64,
    /// Wet-bulb temperature (°C) at which snow probability is 0.5.
    beta: f64,
    /// SLR of dense, wet snow.
    r_min: f64,
    /// SLR at the temperature peak.
    r_max: f64,
    /// Temperature (°C) of peak SLR.
    t_peak: f64,
    /// Width (°C) of the SLR Gaussian.
    sigma: f64,
    /// Magnitude of the humidity adjustment.
    gamma: f64,
    /// Densification per mm/h of precipitation rate.
    delta: f64,
}

impl Default for SnowParams {
    fn default() -> Self {
        Self {
            alpha: 1.2,
            beta: 0.5,
            r_min: 6.0,
            r_max: 18.0,
            t_peak: -12.0,
            sigma: 7.0,
            gamma: 0.2,
            delta: 0.05,
        }
    }
}

impl SnowParams {
    /// Creates parameters with default values.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    /// Sets both ends of the SLR range.
    pub fn with_slr_range(mut self, r_min: f64, r_max: f64) -> Self {
        self.r_min = r_min;
        self.r_max = r_max;
        self
    }

    pub fn with_t_peak(mut self, t_peak: f64) -> Self {
        self.t_peak = t_peak;
        self
    }

    pub fn with_sigma(mut self, sigma: f64) -> Self {
        self.sigma = sigma;
        self
    }

    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn with_delta(mut self, delta: f64) -> Self {
        self.delta = delta;
        self
    }

    // --- Accessors ---

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn r_min(&self) -> f64 {
        self.r_min
    }

    pub fn r_max(&self) -> f64 {
        self.r_max
    }

    pub fn t_peak(&self) -> f64 {
        self.t_peak
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Validates the parameters.
    ///
    /// `alpha` and `sigma` must be positive, `0 <= r_min <= r_max`, and
    /// `gamma`, `delta` must be non-negative. Every value must be finite.
    pub fn validate(&self) -> Result<(), SnowError> {
        let named = [
            ("alpha", self.alpha),
            ("beta", self.beta),
            ("r_min", self.r_min),
            ("r_max", self.r_max),
            ("t_peak", self.t_peak),
            ("sigma", self.sigma),
            ("gamma", self.gamma),
            ("delta", self.delta),
        ];
        for (name, v) in named {
            if !v.is_finite() {
                return Err(SnowError::InvalidParams {
                    reason: format!("{name} must be finite, got {v}"),
                });
            }
        }
        if self.alpha <= 0.0 {
            return Err(SnowError::InvalidParams {
                reason: format!("alpha must be > 0, got {}", self.alpha),
            });
        }
        if self.sigma <= 0.0 {
            return Err(SnowError::InvalidParams {
                reason: format!("sigma must be > 0, got {}", self.sigma),
            });
        }
        if self.r_min < 0.0 || self.r_min > self.r_max {
            return Err(SnowError::InvalidParams {
                reason: format!(
                    "need 0 <= r_min <= r_max, got r_min={} r_max={}",
                    self.r_min, self.r_max
                ),
            });
        }
        if self.gamma < 0.0 || self.delta < 0.0 {
            return Err(SnowError::InvalidParams {
                reason: format!(
                    "gamma and delta must be >= 0, got gamma={} delta={}",
                    self.gamma, self.delta
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
        let p = SnowParams::default();
        assert!(p.validate().is_ok());
        assert_eq!(p.alpha(), 1.2);
        assert_eq!(p.beta(), 0.5);
        assert_eq!(p.r_min(), 6.0);
        assert_eq!(p.r_max(), 18.0);
        assert_eq!(p.t_peak(), -12.0);
        assert_eq!(p.sigma(), 7.0);
        assert_eq!(p.gamma(), 0.2);
        assert_eq!(p.delta(), 0.05);
    }

    #[test]
    fn builder_overrides_one_field() {
        let p = SnowParams::new().with_slr_range(6.0, 13.0);
        assert_eq!(p.r_max(), 13.0);
        assert_eq!(p.alpha(), 1.2);
    }

    #[test]
    fn rejects_zero_sigma() {
        let err = SnowParams::new().with_sigma(0.0).validate().unwrap_err();
        assert!(matches!(err, SnowError::InvalidParams { .. }));
    }

    #[test]
    fn rejects_inverted_slr_range() {
        assert!(SnowParams::new().with_slr_range(10.0, 5.0).validate().is_err());
    }

    #[test]
    fn rejects_nan() {
        assert!(SnowParams::new().with_beta(f64::NAN).validate().is_err());
    }
}
