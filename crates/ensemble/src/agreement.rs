//! Cross-model agreement and outlier detection.
//!
//! Members are first averaged within each model. Spread, coefficient of
//! variation and z-scores are then taken across those per-model means, so
//! a model with fifty members weighs the same as one with five.

use std::collections::BTreeMap;

use serde::Serialize;
use snowcast_stats::{finite_values, mean, min_max, sd};
use snowcast_table::{EnsembleTable, Series, Variable};
use tracing::debug;

use crate::config::AgreementConfig;
use crate::error::EnsembleError;
use crate::statistics::require_variable;

/// Below this absolute mean the coefficient of variation is undefined.
const CV_MEAN_EPS: f64 = 1e-9;

/// Per-model mean series of one variable.
#[derive(Debug, Clone)]
pub struct ModelMeans {
    variable: Variable,
    means: BTreeMap<String, Series>,
}

impl ModelMeans {
    pub fn variable(&self) -> Variable {
        self.variable
    }

    /// Model identifiers, sorted.
    pub fn models(&self) -> impl Iterator<Item = &str> {
        self.means.keys().map(String::as_str)
    }

    pub fn get(&self, model: &str) -> Option<&Series> {
        self.means.get(model)
    }

    pub fn n_models(&self) -> usize {
        self.means.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Series)> {
        self.means.iter().map(|(m, s)| (m.as_str(), s))
    }

    /// Defined model means at timestep `idx`.
    fn values_at(&self, idx: usize) -> Vec<f64> {
        self.means.values().filter_map(|s| s.get(idx)).collect()
    }

    fn n_timesteps(&self) -> usize {
        self.means.values().map(Series::len).max().unwrap_or(0)
    }
}

/// Averages each model's members of `variable` at every timestamp.
///
/// # Errors
///
/// [`EnsembleError::NoSuchVariable`] if no series reports `variable`.
pub fn model_means(table: &EnsembleTable, variable: Variable) -> Result<ModelMeans, EnsembleError> {
    require_variable(table, variable)?;
    let n = table.n_timesteps();
    let means = table
        .models_for(variable)
        .into_iter()
        .map(|model| {
            let members: Vec<&Series> = table.model_series(model, variable).map(|(_, s)| s).collect();
            let series: Series = (0..n)
                .map(|i| {
                    let vals: Vec<f64> = members.iter().filter_map(|s| s.get(i)).collect();
                    mean(&vals)
                })
                .collect();
            (model.to_string(), series)
        })
        .collect();
    Ok(ModelMeans { variable, means })
}

/// Cross-model spread at one timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelSpread {
    pub mean: f64,
    /// Sample standard deviation of the model means.
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    /// `std / |mean|`; `None` when the mean is effectively zero.
    pub cv: Option<f64>,
    /// Number of models with a defined mean, always at least two.
    pub n_models: usize,
}

/// Spread of the defined model means, or `None` when fewer than two models
/// have a value: one model alone is not a comparison.
fn spread_of(values: &[f64]) -> Option<ModelSpread> {
    let v = finite_values(values);
    if v.len() < 2 {
        return None;
    }
    let m = mean(&v)?;
    let std = sd(&v)?;
    let (min, max) = min_max(&v)?;
    let cv = if m.abs() < CV_MEAN_EPS {
        None
    } else {
        Some(std / m.abs())
    };
    Some(ModelSpread {
        mean: m,
        std,
        min,
        max,
        range: max - min,
        cv,
        n_models: v.len(),
    })
}

/// How closely the models agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AgreementLevel {
    High,
    Moderate,
    Low,
}

impl AgreementLevel {
    /// Classifies a coefficient of variation.
    pub fn from_cv(cv: f64, config: &AgreementConfig) -> Self {
        if cv < config.high_cv() {
            AgreementLevel::High
        } else if cv < config.moderate_cv() {
            AgreementLevel::Moderate
        } else {
            AgreementLevel::Low
        }
    }

    /// Classifies one timestamp's spread. Identical models agree highly
    /// even around a zero mean; any other spread with undefined cv is low.
    pub fn from_spread(spread: &ModelSpread, config: &AgreementConfig) -> Self {
        match spread.cv {
            _ if spread.std == 0.0 => AgreementLevel::High,
            Some(cv) => Self::from_cv(cv, config),
            None => AgreementLevel::Low,
        }
    }
}

/// One model's deviation from the cross-model mean at one timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelDeviation {
    pub model: String,
    pub value: Option<f64>,
    /// `(value - mean) / std`; zero when the models do not spread, `None`
    /// when fewer than two models have a value.
    pub z_score: Option<f64>,
    pub outlier: bool,
}

/// Flags models whose mean lies more than `threshold` standard deviations
/// from the cross-model mean. Returns one row per timestamp, one entry per
/// model in sorted order.
///
/// # Errors
///
/// [`EnsembleError::InsufficientModels`] with fewer than two models.
pub fn identify_outliers(
    means: &ModelMeans,
    threshold: f64,
) -> Result<Vec<Vec<ModelDeviation>>, EnsembleError> {
    require_models(means)?;
    Ok((0..means.n_timesteps())
        .map(|i| {
            let spread = spread_of(&means.values_at(i));
            means
                .iter()
                .map(|(model, series)| {
                    let value = series.get(i);
                    let z_score = match (value, spread) {
                        (Some(v), Some(s)) if s.std > 0.0 => Some((v - s.mean) / s.std),
                        (Some(_), Some(_)) => Some(0.0),
                        _ => None,
                    };
                    ModelDeviation {
                        model: model.to_string(),
                        value,
                        z_score,
                        outlier: z_score.is_some_and(|z| z.abs() > threshold),
                    }
                })
                .collect()
        })
        .collect())
}

fn require_models(means: &ModelMeans) -> Result<(), EnsembleError> {
    if means.n_models() < 2 {
        return Err(EnsembleError::InsufficientModels {
            variable: means.variable.to_string(),
            found: means.n_models(),
        });
    }
    Ok(())
}

/// Full cross-model comparison of one variable.
#[derive(Debug, Clone)]
pub struct ModelComparison {
    means: ModelMeans,
    spread: Vec<Option<ModelSpread>>,
    deviations: Vec<Vec<ModelDeviation>>,
}

/// Agreement summary at one timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgreementSnapshot {
    pub variable: Variable,
    pub agreement_level: Option<AgreementLevel>,
    pub models_in_agreement: Vec<String>,
    pub outlier_models: Vec<String>,
    /// Range of the model means.
    pub spread: Option<f64>,
    pub coefficient_variation: Option<f64>,
    pub model_values: BTreeMap<String, Option<f64>>,
}

/// Compares the models reporting `variable`.
///
/// # Errors
///
/// - [`EnsembleError::InvalidConfig`] if `config` fails validation
/// - [`EnsembleError::NoSuchVariable`] if no series reports `variable`
/// - [`EnsembleError::InsufficientModels`] with fewer than two models
#[tracing::instrument(skip_all, fields(variable = %variable))]
pub fn compare_models(
    table: &EnsembleTable,
    variable: Variable,
    config: &AgreementConfig,
) -> Result<ModelComparison, EnsembleError> {
    config.validate()?;
    let means = model_means(table, variable)?;
    require_models(&means)?;
    let deviations = identify_outliers(&means, config.outlier_threshold())?;
    let spread = (0..table.n_timesteps())
        .map(|i| spread_of(&means.values_at(i)))
        .collect();
    debug!(n_models = means.n_models(), "models compared");
    Ok(ModelComparison {
        means,
        spread,
        deviations,
    })
}

impl ModelComparison {
    pub fn model_means(&self) -> &ModelMeans {
        &self.means
    }

    /// Cross-model spread per timestamp.
    pub fn spread(&self) -> &[Option<ModelSpread>] {
        &self.spread
    }

    /// Per-model deviations per timestamp.
    pub fn deviations(&self) -> &[Vec<ModelDeviation>] {
        &self.deviations
    }

    /// Agreement class of the mean cv over all timestamps where at least two
    /// models report and cv is defined. `None` if there is no such timestamp.
    pub fn overall_agreement(&self, config: &AgreementConfig) -> Option<AgreementLevel> {
        let cvs: Vec<f64> = self.spread.iter().flatten().filter_map(|s| s.cv).collect();
        mean(&cvs).map(|cv| AgreementLevel::from_cv(cv, config))
    }

    /// Agreement summary at timestep `idx`, or `None` out of range.
    ///
    /// With fewer than two models reporting, level, spread and cv are
    /// `None` and no model is classified.
    pub fn snapshot(&self, idx: usize, config: &AgreementConfig) -> Option<AgreementSnapshot> {
        let spread = *self.spread.get(idx)?;
        let row = self.deviations.get(idx)?;
        let mut models_in_agreement = Vec::new();
        let mut outlier_models = Vec::new();
        for d in row.iter().filter(|d| d.z_score.is_some()) {
            if d.outlier {
                outlier_models.push(d.model.clone());
            } else {
                models_in_agreement.push(d.model.clone());
            }
        }
        Some(AgreementSnapshot {
            variable: self.means.variable,
            agreement_level: spread.as_ref().map(|s| AgreementLevel::from_spread(s, config)),
            models_in_agreement,
            outlier_models,
            spread: spread.map(|s| s.range),
            coefficient_variation: spread.and_then(|s| s.cv),
            model_values: row.iter().map(|d| (d.model.clone(), d.value)).collect(),
        })
    }
}
