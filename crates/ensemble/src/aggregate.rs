//! Multi-model aggregation strategies.

use std::collections::BTreeMap;

use serde::Serialize;
use snowcast_stats::{finite_values, mean, min_max, quantile_type7, sd, sort_ascending};
use snowcast_table::{EnsembleTable, Quantity, Variable};
use tracing::{debug, warn};

use crate::agreement::model_means;
use crate::error::EnsembleError;
use crate::probability::fraction;
use crate::statistics::require_variable;

/// Added to |mean| before dividing, so consensus never divides by zero.
const CONSENSUS_EPS: f64 = 1e-6;

/// Members above this per-timestamp quantile count as extreme.
const EXTREME_MEMBER_QUANTILE: f64 = 0.9;

/// Ensemble-mean 2 m temperature (°C) below which GEM is preferred.
const COLD_PREFERENCE_C: f64 = -10.0;

/// Longitudes east of this are treated as European, where ICON is preferred.
const EUROPE_WEST_EDGE_DEG: f64 = -30.0;

const TEMPERATURE: Variable = Variable::new(Quantity::Temperature2m);

/// Family of a model id: the text before the first underscore.
fn family(model: &str) -> &str {
    model.split('_').next().unwrap_or(model)
}

/// Relative model weights, keyed by model id or model family.
///
/// A model id such as `ecmwf_ifs025` is looked up exactly first, then by
/// its family, the text before the first underscore (`ecmwf`).
#[derive(Debug, Clone, PartialEq)]
pub struct ModelWeights {
    weights: BTreeMap<String, f64>,
}

impl Default for ModelWeights {
    fn default() -> Self {
        Self::from_iter([("ecmwf", 0.35), ("gfs", 0.25), ("gem", 0.20), ("icon", 0.20)])
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for ModelWeights {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            weights: iter.into_iter().map(|(k, w)| (k.into(), w)).collect(),
        }
    }
}

impl ModelWeights {
    /// Weight of `model`, if it or its family is listed.
    pub fn weight_for(&self, model: &str) -> Option<f64> {
        if let Some(&w) = self.weights.get(model) {
            return Some(w);
        }
        self.weights.get(family(model)).copied()
    }

    /// Validates that every weight is finite and non-negative.
    pub fn validate(&self) -> Result<(), EnsembleError> {
        for (k, &w) in &self.weights {
            if !w.is_finite() || w < 0.0 {
                return Err(EnsembleError::InvalidConfig {
                    reason: format!("weight for {k} must be finite and >= 0, got {w}"),
                });
            }
        }
        Ok(())
    }
}

/// Weighted average of per-model means at every timestamp.
///
/// Models without a weight are ignored. At each timestamp the weights of
/// the models with a defined mean are renormalised; `None` where none is
/// defined.
///
/// # Errors
///
/// - [`EnsembleError::NoSuchVariable`] if no series reports `variable`
/// - [`EnsembleError::InvalidConfig`] if the weights are invalid or none of
///   the models reporting `variable` carries a weight
pub fn weighted_model_mean(
    table: &EnsembleTable,
    variable: Variable,
    weights: &ModelWeights,
) -> Result<Vec<Option<f64>>, EnsembleError> {
    weights.validate()?;
    let means = model_means(table, variable)?;
    let weighted: Vec<(f64, _)> = means
        .iter()
        .filter_map(|(model, s)| {
            let w = weights.weight_for(model);
            if w.is_none() {
                warn!(model, "no weight for model, ignoring");
            }
            w.filter(|&w| w > 0.0).map(|w| (w, s))
        })
        .collect();
    if weighted.is_empty() {
        return Err(EnsembleError::InvalidConfig {
            reason: format!("no model reporting {variable} has a positive weight"),
        });
    }
    Ok((0..table.n_timesteps())
        .map(|i| {
            let (sum, total) = weighted
                .iter()
                .filter_map(|(w, s)| s.get(i).map(|v| (w * v, *w)))
                .fold((0.0, 0.0), |(a, b), (wv, w)| (a + wv, b + w));
            (total > 0.0).then(|| sum / total)
        })
        .collect())
}

/// Cross-member mean, kept only where members agree.
///
/// Agreement means `std / (|mean| + 1e-6) < 1 - threshold` over every
/// member of every model. With the usual `threshold` of 0.7 the members
/// must scatter by less than 30% of their mean.
///
/// # Errors
///
/// - [`EnsembleError::InvalidConfig`] unless `0 <= threshold <= 1`
/// - [`EnsembleError::NoSuchVariable`] if no series reports `variable`
pub fn consensus(
    table: &EnsembleTable,
    variable: Variable,
    threshold: f64,
) -> Result<Vec<Option<f64>>, EnsembleError> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(EnsembleError::InvalidConfig {
            reason: format!("consensus threshold must be in [0, 1], got {threshold}"),
        });
    }
    require_variable(table, variable)?;
    Ok((0..table.n_timesteps())
        .map(|i| {
            let values = table.values_at(variable, i);
            let m = mean(&values)?;
            let cv = sd(&values)? / (m.abs() + CONSENSUS_EPS);
            (cv < 1.0 - threshold).then_some(m)
        })
        .collect())
}

/// Tail statistics across all members at one timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExtremeValues {
    /// Upper type-7 quantile at the requested percentile.
    pub extreme_high: f64,
    /// Lower type-7 quantile at one minus the requested percentile.
    pub extreme_low: f64,
    pub range: f64,
    /// Fraction of members above the timestamp's 90th percentile.
    pub likelihood_extreme: f64,
}

/// Tail statistics of `variable` at every timestamp, for hazard screening.
/// `None` where no member has a value.
///
/// # Errors
///
/// - [`EnsembleError::InvalidConfig`] unless `0.5 <= percentile <= 1`
/// - [`EnsembleError::NoSuchVariable`] if no series reports `variable`
pub fn extreme_values(
    table: &EnsembleTable,
    variable: Variable,
    percentile: f64,
) -> Result<Vec<Option<ExtremeValues>>, EnsembleError> {
    if !(0.5..=1.0).contains(&percentile) {
        return Err(EnsembleError::InvalidConfig {
            reason: format!("extreme percentile must be in [0.5, 1], got {percentile}"),
        });
    }
    require_variable(table, variable)?;
    Ok((0..table.n_timesteps())
        .map(|i| {
            let mut v = finite_values(&table.values_at(variable, i));
            sort_ascending(&mut v);
            let (lo, hi) = min_max(&v)?;
            let p90 = quantile_type7(&v, EXTREME_MEMBER_QUANTILE)?;
            Some(ExtremeValues {
                extreme_high: quantile_type7(&v, percentile)?,
                extreme_low: quantile_type7(&v, 1.0 - percentile)?,
                range: hi - lo,
                likelihood_extreme: fraction(&v, |x| x > p90)?,
            })
        })
        .collect())
}

/// Model family favoured by [`select_by_conditions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferredModel {
    /// Very cold conditions.
    Gem,
    /// European longitudes.
    Icon,
    Ecmwf,
}

impl PreferredModel {
    pub fn family(self) -> &'static str {
        match self {
            PreferredModel::Gem => "gem",
            PreferredModel::Icon => "icon",
            PreferredModel::Ecmwf => "ecmwf",
        }
    }

    /// Preference for one timestamp. An unknown temperature is not cold.
    pub fn for_conditions(temperature: Option<f64>, longitude: f64) -> Self {
        if temperature.is_some_and(|t| t < COLD_PREFERENCE_C) {
            PreferredModel::Gem
        } else if longitude > EUROPE_WEST_EDGE_DEG {
            PreferredModel::Icon
        } else {
            PreferredModel::Ecmwf
        }
    }
}

/// Value chosen at one timestamp by [`select_by_conditions`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelSelection {
    pub preferred: PreferredModel,
    /// `false` when the preferred family had no value and every member was
    /// averaged instead.
    pub used_preferred: bool,
    pub value: f64,
}

/// Picks a model family per timestamp from the conditions and averages its
/// members of `variable`.
///
/// GEM is preferred when the ensemble-mean 2 m temperature is below
/// -10 °C, ICON east of 30° W, ECMWF otherwise. If the preferred family has
/// no value at a timestamp, all members are averaged; `None` where no
/// member has a value.
///
/// # Errors
///
/// [`EnsembleError::NoSuchVariable`] if no series reports `variable`.
pub fn select_by_conditions(
    table: &EnsembleTable,
    variable: Variable,
    longitude: f64,
) -> Result<Vec<Option<ModelSelection>>, EnsembleError> {
    require_variable(table, variable)?;
    let has_temperature = table.contains_variable(TEMPERATURE);
    if !has_temperature {
        debug!("no 2 m temperature, cold-weather preference disabled");
    }
    Ok((0..table.n_timesteps())
        .map(|i| {
            let temperature = if has_temperature {
                mean(&table.values_at(TEMPERATURE, i))
            } else {
                None
            };
            let preferred = PreferredModel::for_conditions(temperature, longitude);
            let chosen: Vec<f64> = table
                .variable_series(variable)
                .filter(|(k, _)| family(k.model()).eq_ignore_ascii_case(preferred.family()))
                .filter_map(|(_, s)| s.get(i))
                .collect();
            match mean(&chosen) {
                Some(value) => Some(ModelSelection {
                    preferred,
                    used_preferred: true,
                    value,
                }),
                None => mean(&table.values_at(variable, i)).map(|value| ModelSelection {
                    preferred,
                    used_preferred: false,
                    value,
                }),
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_lookup_exact_then_family() {
        let w: ModelWeights = [("ecmwf", 0.3), ("ecmwf_aifs025", 0.1)].into_iter().collect();
        assert_eq!(w.weight_for("ecmwf_aifs025"), Some(0.1));
        assert_eq!(w.weight_for("ecmwf_ifs025"), Some(0.3));
        assert_eq!(w.weight_for("gfs_seamless"), None);
    }

    #[test]
    fn default_weights_cover_common_families() {
        let w = ModelWeights::default();
        assert_eq!(w.weight_for("gem_global"), Some(0.20));
        assert_eq!(w.weight_for("gfs_seamless"), Some(0.25));
        assert!(w.validate().is_ok());
    }

    #[test]
    fn preference_order() {
        assert_eq!(PreferredModel::for_conditions(Some(-12.0), 10.0), PreferredModel::Gem);
        assert_eq!(PreferredModel::for_conditions(Some(-10.0), 10.0), PreferredModel::Icon);
        assert_eq!(PreferredModel::for_conditions(None, -29.0), PreferredModel::Icon);
        assert_eq!(PreferredModel::for_conditions(Some(0.0), -30.0), PreferredModel::Ecmwf);
        assert_eq!(PreferredModel::for_conditions(None, -122.9), PreferredModel::Ecmwf);
    }

    #[test]
    fn family_is_prefix_before_underscore() {
        assert_eq!(family("icon_seamless"), "icon");
        assert_eq!(family("gem"), "gem");
    }

    #[test]
    fn negative_weight_is_invalid() {
        let w: ModelWeights = [("gfs", -1.0)].into_iter().collect();
        assert!(w.validate().is_err());
    }
}
