//! Forecast data-quality assessment.

use std::collections::BTreeMap;

use serde::Serialize;
use snowcast_stats::{mean, pearson_correlation, sd};
use snowcast_table::{EnsembleTable, Origin, Quantity, Series, Variable};

/// Agreement score assumed when member correlation cannot be computed.
const NEUTRAL_AGREEMENT: f64 = 0.5;

/// Spread (in variable units) at which the spread penalty saturates.
const SPREAD_SCALE: f64 = 10.0;

const COMPLETENESS_VARIABLES: [Quantity; 4] = [
    Quantity::Temperature2m,
    Quantity::Precipitation,
    Quantity::WindSpeed80m,
    Quantity::WindSpeed10m,
];

const SPREAD_VARIABLES: [Quantity; 2] = [Quantity::Temperature2m, Quantity::Precipitation];

/// Summary of how complete and coherent an ensemble is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityReport {
    /// Fraction of defined member values, per variable present.
    pub data_completeness: BTreeMap<Variable, f64>,
    /// Mean cross-member standard deviation, per variable present.
    pub ensemble_spread: BTreeMap<Variable, f64>,
    /// Average pairwise correlation of the temperature members.
    pub model_agreement: Option<f64>,
    /// `0.3 * completeness + 0.4 * agreement + 0.3 * (1 - min(0.5, spread / 10))`.
    pub confidence_score: f64,
}

fn members(table: &EnsembleTable, variable: Variable) -> Vec<&Series> {
    table
        .variable_series(variable)
        .filter(|(k, _)| table.origin(k) == Some(Origin::Member))
        .map(|(_, s)| s)
        .collect()
}

fn completeness(series: &[&Series]) -> Option<f64> {
    let total: usize = series.iter().map(|s| s.len()).sum();
    if total == 0 {
        return None;
    }
    let valid: usize = series.iter().map(|s| s.valid_count()).sum();
    Some(valid as f64 / total as f64)
}

/// Mean over timestamps of the member standard deviation, using only
/// timestamps with at least two defined members.
fn mean_spread(series: &[&Series], n_timesteps: usize) -> Option<f64> {
    let per_step: Vec<f64> = (0..n_timesteps)
        .filter_map(|i| {
            let v: Vec<f64> = series.iter().filter_map(|s| s.get(i)).collect();
            if v.len() < 2 { None } else { sd(&v) }
        })
        .collect();
    mean(&per_step)
}

fn mean_pairwise_correlation(series: &[&Series]) -> Option<f64> {
    let mut corrs = Vec::new();
    for (i, a) in series.iter().enumerate() {
        for b in &series[i + 1..] {
            if let Some(r) = pearson_correlation(a.values(), b.values()) {
                corrs.push(r);
            }
        }
    }
    mean(&corrs)
}

/// Assesses completeness, spread and member coherence of `table`.
///
/// Only genuine ensemble members are considered. Variables absent from the
/// table are left out of the report rather than counted as empty.
#[tracing::instrument(skip_all, fields(n_series = table.n_series()))]
pub fn assess_quality(table: &EnsembleTable) -> QualityReport {
    let mut data_completeness = BTreeMap::new();
    for q in COMPLETENESS_VARIABLES {
        let v = Variable::new(q);
        if let Some(c) = completeness(&members(table, v)) {
            data_completeness.insert(v, c);
        }
    }

    let mut ensemble_spread = BTreeMap::new();
    for q in SPREAD_VARIABLES {
        let v = Variable::new(q);
        if let Some(s) = mean_spread(&members(table, v), table.n_timesteps()) {
            ensemble_spread.insert(v, s);
        }
    }

    let model_agreement =
        mean_pairwise_correlation(&members(table, Variable::new(Quantity::Temperature2m)));

    let completeness_score =
        mean(&data_completeness.values().copied().collect::<Vec<_>>()).unwrap_or(0.0);
    let agreement_score = model_agreement.unwrap_or(NEUTRAL_AGREEMENT);
    let spread_penalty = mean(&ensemble_spread.values().copied().collect::<Vec<_>>())
        .map_or(1.0, |s| 1.0 - (s / SPREAD_SCALE).min(0.5));

    QualityReport {
        data_completeness,
        ensemble_spread,
        model_agreement,
        confidence_score: 0.3 * completeness_score + 0.4 * agreement_score + 0.3 * spread_penalty,
    }
}
