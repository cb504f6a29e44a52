//! Integration tests for the statistics, probability and agreement engines.

use approx::assert_relative_eq;
use chrono::{TimeDelta, TimeZone, Utc};
use snowcast_ensemble::{
    AgreementConfig, AgreementLevel, EnsembleError, ModelWeights, PreferredModel,
    ProbabilityThresholds, Trend, assess_quality, calculate_statistics, calculate_trend,
    compare_models, consensus, extreme_values, identify_outliers, model_means,
    precipitation_probabilities, probability, select_by_conditions, snow_probabilities,
    weighted_model_mean,
};
use snowcast_snow::{SNOWFALL_CALCULATED, SnowParams, append_snowfall, compute_snowfall};
use snowcast_table::{EnsembleTable, Interval, Quantity, Series, SeriesKey, Variable};

const TEMP: Variable = Variable::new(Quantity::Temperature2m);
const PRECIP: Variable = Variable::new(Quantity::Precipitation);

fn empty_table(n: i64) -> EnsembleTable {
    let t0 = Utc.with_ymd_and_hms(2025, 1, 20, 0, 0, 0).unwrap();
    let times = (0..n).map(|h| t0 + TimeDelta::hours(h)).collect();
    EnsembleTable::new(times, Interval::Hourly).unwrap()
}

fn insert(table: &mut EnsembleTable, model: &str, v: Variable, member: u32, values: &[f64]) {
    table
        .insert(SeriesKey::new(model, v, member), Series::new(values.to_vec()))
        .unwrap();
}

/// Three models with a handful of members each; the last timestamp has no
/// defined temperature anywhere.
fn ensemble() -> EnsembleTable {
    let nan = f64::NAN;
    let mut t = empty_table(4);
    for m in 0..5 {
        let d = m as f64 * 0.5;
        insert(&mut t, "ecmwf_ifs025", TEMP, m, &[-4.0 + d, -3.0 + d, -6.0 + d, nan]);
        insert(&mut t, "ecmwf_ifs025", PRECIP, m, &[0.0, 1.0 + d, 6.0 + d, 0.2]);
    }
    for m in 0..3 {
        let d = m as f64;
        insert(&mut t, "gem_global", TEMP, m, &[-5.0 + d, -2.0, -7.0 - d, nan]);
        insert(&mut t, "gem_global", PRECIP, m, &[0.0, 0.5, 12.0, nan]);
    }
    insert(&mut t, "gfs_seamless", TEMP, 0, &[-3.0, nan, -5.0, nan]);
    insert(&mut t, "gfs_seamless", PRECIP, 0, &[0.0, 2.0, 4.0, nan]);
    t
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

#[test]
fn percentiles_are_ordered_at_every_defined_timestamp() {
    let stats = calculate_statistics(&ensemble(), TEMP).unwrap();
    for s in stats.iter().flatten() {
        let p = s.percentiles;
        assert!(s.min <= p.p10);
        assert!(p.p10 <= p.p25);
        assert!(p.p25 <= s.median);
        assert!(s.median <= p.p75);
        assert!(p.p75 <= p.p90);
        assert!(p.p90 <= s.max);
    }
}

#[test]
fn timestamp_without_values_is_undefined_not_zero() {
    let stats = calculate_statistics(&ensemble(), TEMP).unwrap();
    assert_eq!(stats.len(), 4);
    assert!(stats[3].is_none());
    assert_eq!(stats[0].unwrap().count, 9);
    assert_eq!(stats[1].unwrap().count, 8);
}

#[test]
fn unknown_variable_is_no_such_variable() {
    let err = calculate_statistics(&ensemble(), Quantity::CloudCover.into()).unwrap_err();
    assert!(matches!(err, EnsembleError::NoSuchVariable { .. }));
}

#[test]
fn trend_over_ensemble_mean() {
    let stats = calculate_statistics(&ensemble(), PRECIP).unwrap();
    let means: Vec<Option<f64>> = stats.iter().map(|s| s.map(|s| s.mean)).collect();
    let trend = calculate_trend(&means, 2);
    assert_eq!(trend[0], Trend::Stable);
    assert_eq!(trend[2], Trend::RapidlyRising);
}

// ---------------------------------------------------------------------------
// Probability
// ---------------------------------------------------------------------------

#[test]
fn probabilities_lie_in_unit_interval() {
    let t = ensemble();
    for threshold in [-10.0, -5.0, -3.0, 0.0] {
        for p in probability(&t, TEMP, |v| v < threshold).unwrap().into_iter().flatten() {
            assert!((0.0..=1.0).contains(&p));
        }
    }
}

#[test]
fn always_true_predicate_gives_one_and_empty_row_gives_none() {
    let p = probability(&ensemble(), TEMP, |_| true).unwrap();
    assert_eq!(p[0], Some(1.0));
    assert_eq!(p[1], Some(1.0));
    assert_eq!(p[3], None);
}

#[test]
fn missing_members_are_excluded_from_denominator() {
    // t=3: five ecmwf members at 0.2, everything else missing
    let p = probability(&ensemble(), PRECIP, |v| v > 0.1).unwrap();
    assert_eq!(p[3], Some(1.0));
}

#[test]
fn named_precipitation_probabilities() {
    let rows = precipitation_probabilities(&ensemble(), &ProbabilityThresholds::default()).unwrap();
    let r = rows[2].unwrap();
    // ecmwf 6..8, gem 12 x3, gfs 4 -> 8 of 9 above 5 mm, 3 of 9 above 10 mm
    assert_eq!(r.measurable, 1.0);
    assert_relative_eq!(r.heavy, 8.0 / 9.0, epsilon = 1e-12);
    assert_relative_eq!(r.very_heavy, 3.0 / 9.0, epsilon = 1e-12);
}

#[test]
fn probability_of_unknown_variable_is_error() {
    let err = probability(&ensemble(), Quantity::Snowfall.into(), |_| true).unwrap_err();
    assert!(matches!(err, EnsembleError::NoSuchVariable { .. }));
}

// ---------------------------------------------------------------------------
// Model agreement
// ---------------------------------------------------------------------------

#[test]
fn two_identical_models_agree_with_no_outliers() {
    let mut t = empty_table(3);
    for model in ["a", "b"] {
        insert(&mut t, model, TEMP, 0, &[-2.0, -4.0, -6.0]);
        insert(&mut t, model, TEMP, 1, &[-4.0, -6.0, -8.0]);
    }
    let config = AgreementConfig::default();
    let cmp = compare_models(&t, TEMP, &config).unwrap();
    for s in cmp.spread().iter().flatten() {
        assert_relative_eq!(s.cv.unwrap(), 0.0, epsilon = 1e-12);
    }
    let outliers = identify_outliers(&model_means(&t, TEMP).unwrap(), 1.5).unwrap();
    assert!(outliers.iter().flatten().all(|d| !d.outlier));
    assert_eq!(cmp.overall_agreement(&config), Some(AgreementLevel::High));
}

#[test]
fn single_model_is_insufficient() {
    let mut t = empty_table(2);
    insert(&mut t, "a", TEMP, 0, &[1.0, 2.0]);
    insert(&mut t, "a", TEMP, 1, &[1.5, 2.5]);
    let err = compare_models(&t, TEMP, &AgreementConfig::default()).unwrap_err();
    assert!(matches!(err, EnsembleError::InsufficientModels { found: 1, .. }));
    let means = model_means(&t, TEMP).unwrap();
    assert!(matches!(
        identify_outliers(&means, 1.5),
        Err(EnsembleError::InsufficientModels { .. })
    ));
}

#[test]
fn distant_model_is_flagged() {
    let mut t = empty_table(1);
    for (i, v) in [10.0, 10.2, 9.8, 10.1, 9.9].into_iter().enumerate() {
        insert(&mut t, &format!("m{i}"), TEMP, 0, &[v]);
    }
    insert(&mut t, "far", TEMP, 0, &[20.0]);
    let config = AgreementConfig::default();
    let cmp = compare_models(&t, TEMP, &config).unwrap();
    let snap = cmp.snapshot(0, &config).unwrap();
    assert_eq!(snap.outlier_models, vec!["far".to_string()]);
    assert_eq!(snap.models_in_agreement.len(), 5);
    assert_eq!(snap.model_values["far"], Some(20.0));
    assert_relative_eq!(snap.spread.unwrap(), 10.2, epsilon = 1e-12);
}

#[test]
fn model_means_average_within_model_first() {
    let means = model_means(&ensemble(), TEMP).unwrap();
    assert_eq!(means.n_models(), 3);
    // ecmwf members at t=0: -4, -3.5, -3, -2.5, -2
    assert_relative_eq!(means.get("ecmwf_ifs025").unwrap().get(0).unwrap(), -3.0, epsilon = 1e-12);
    assert_eq!(means.get("gfs_seamless").unwrap().get(1), None);
}

#[test]
fn snapshot_skips_models_without_value() {
    let config = AgreementConfig::default();
    let cmp = compare_models(&ensemble(), TEMP, &config).unwrap();
    let snap = cmp.snapshot(1, &config).unwrap();
    let listed = snap.models_in_agreement.len() + snap.outlier_models.len();
    assert_eq!(listed, 2);
    assert_eq!(snap.model_values["gfs_seamless"], None);
    let empty = cmp.snapshot(3, &config).unwrap();
    assert!(empty.agreement_level.is_none());
    assert!(cmp.snapshot(99, &config).is_none());
}

#[test]
fn lone_reporting_model_is_not_compared() {
    let mut t = empty_table(2);
    insert(&mut t, "ecmwf", TEMP, 0, &[-5.0, -5.0]);
    insert(&mut t, "gfs", TEMP, 0, &[-4.0, f64::NAN]);
    let config = AgreementConfig::default();
    let cmp = compare_models(&t, TEMP, &config).unwrap();

    assert!(cmp.spread()[1].is_none());
    let snap = cmp.snapshot(1, &config).unwrap();
    assert!(snap.agreement_level.is_none());
    assert!(snap.coefficient_variation.is_none());
    assert!(snap.spread.is_none());
    assert!(snap.models_in_agreement.is_empty());
    assert!(snap.outlier_models.is_empty());
    assert_eq!(snap.model_values["ecmwf"], Some(-5.0));
    assert!(cmp.deviations()[1].iter().all(|d| d.z_score.is_none()));

    // only t=0 counts: cv = 0.7071 / 4.5
    let cv = cmp.spread()[0].unwrap().cv.unwrap();
    assert_relative_eq!(cv, 0.5_f64.sqrt() / 4.5, epsilon = 1e-12);
    assert_eq!(cmp.overall_agreement(&config), Some(AgreementLevel::Moderate));
}

// ---------------------------------------------------------------------------
// Aggregation and quality
// ---------------------------------------------------------------------------

#[test]
fn weighted_mean_renormalises_over_present_models() {
    let mut t = empty_table(2);
    insert(&mut t, "ecmwf_ifs025", TEMP, 0, &[0.0, 0.0]);
    insert(&mut t, "gfs_seamless", TEMP, 0, &[10.0, f64::NAN]);
    let w = weighted_model_mean(&t, TEMP, &ModelWeights::default()).unwrap();
    assert_relative_eq!(w[0].unwrap(), 10.0 * 0.25 / 0.60, epsilon = 1e-12);
    assert_eq!(w[1], Some(0.0));
}

#[test]
fn weighted_mean_without_weighted_models_is_error() {
    let mut t = empty_table(1);
    insert(&mut t, "mystery", TEMP, 0, &[1.0]);
    assert!(matches!(
        weighted_model_mean(&t, TEMP, &ModelWeights::default()),
        Err(EnsembleError::InvalidConfig { .. })
    ));
}

#[test]
fn consensus_keeps_only_agreeing_timestamps() {
    let mut t = empty_table(2);
    insert(&mut t, "a", TEMP, 0, &[10.0, 1.0]);
    insert(&mut t, "b", TEMP, 0, &[10.5, 9.0]);
    let c = consensus(&t, TEMP, 0.7).unwrap();
    assert_relative_eq!(c[0].unwrap(), 10.25, epsilon = 1e-12);
    assert_eq!(c[1], None);
    assert!(consensus(&t, TEMP, 1.5).is_err());
}

#[test]
fn extreme_values_over_members() {
    let mut t = empty_table(2);
    for m in 0..10 {
        insert(&mut t, "ecmwf_ifs025", PRECIP, m, &[f64::from(m + 1), f64::NAN]);
    }
    let ex = extreme_values(&t, PRECIP, 0.95).unwrap();
    let e = ex[0].unwrap();
    // type 7 over 1..=10
    assert_relative_eq!(e.extreme_high, 9.55, epsilon = 1e-12);
    assert_relative_eq!(e.extreme_low, 1.45, epsilon = 1e-12);
    assert_relative_eq!(e.range, 9.0, epsilon = 1e-12);
    // only the member at 10 lies above p90 = 9.1
    assert_relative_eq!(e.likelihood_extreme, 0.1, epsilon = 1e-12);
    assert!(ex[1].is_none());

    assert!(matches!(
        extreme_values(&t, PRECIP, 0.3),
        Err(EnsembleError::InvalidConfig { .. })
    ));
    assert!(matches!(
        extreme_values(&t, TEMP, 0.95),
        Err(EnsembleError::NoSuchVariable { .. })
    ));
}

#[test]
fn model_selection_follows_conditions() {
    let nan = f64::NAN;
    let mut t = empty_table(2);
    insert(&mut t, "ecmwf_ifs025", TEMP, 0, &[-15.0, 0.0]);
    insert(&mut t, "gem_global", PRECIP, 0, &[2.0, 2.0]);
    insert(&mut t, "icon_seamless", PRECIP, 0, &[4.0, nan]);
    insert(&mut t, "ecmwf_ifs025", PRECIP, 0, &[6.0, 6.0]);

    let alps = select_by_conditions(&t, PRECIP, 11.4).unwrap();
    let cold = alps[0].unwrap();
    assert_eq!(cold.preferred, PreferredModel::Gem);
    assert!(cold.used_preferred);
    assert_eq!(cold.value, 2.0);
    // ICON has no value: every member is averaged
    let mild = alps[1].unwrap();
    assert_eq!(mild.preferred, PreferredModel::Icon);
    assert!(!mild.used_preferred);
    assert_relative_eq!(mild.value, 4.0, epsilon = 1e-12);

    let rockies = select_by_conditions(&t, PRECIP, -120.0).unwrap();
    let r = rockies[1].unwrap();
    assert_eq!(r.preferred, PreferredModel::Ecmwf);
    assert_eq!(r.value, 6.0);
}

#[test]
fn model_selection_without_temperature_is_not_cold() {
    let mut t = empty_table(1);
    insert(&mut t, "gem_global", PRECIP, 0, &[1.0]);
    insert(&mut t, "ecmwf_ifs025", PRECIP, 0, &[3.0]);
    let s = select_by_conditions(&t, PRECIP, -100.0).unwrap()[0].unwrap();
    assert_eq!(s.preferred, PreferredModel::Ecmwf);
    assert_eq!(s.value, 3.0);
    assert!(matches!(
        select_by_conditions(&t, TEMP, 0.0),
        Err(EnsembleError::NoSuchVariable { .. })
    ));
}

#[test]
fn quality_report_on_complete_coherent_ensemble() {
    let mut t = empty_table(4);
    insert(&mut t, "a", TEMP, 0, &[1.0, 2.0, 3.0, 4.0]);
    insert(&mut t, "b", TEMP, 0, &[1.0, 2.0, 3.0, 4.0]);
    let r = assess_quality(&t);
    assert_eq!(r.data_completeness[&TEMP], 1.0);
    assert_eq!(r.ensemble_spread[&TEMP], 0.0);
    assert_relative_eq!(r.model_agreement.unwrap(), 1.0, epsilon = 1e-12);
    assert_relative_eq!(r.confidence_score, 1.0, epsilon = 1e-12);
}

// ---------------------------------------------------------------------------
// Snowfall round trip
// ---------------------------------------------------------------------------

#[test]
fn derived_snowfall_reads_back_unchanged() {
    let mut t = empty_table(3);
    for (model, m, temp) in [("a", 0, -6.0), ("a", 1, -2.0), ("b", 0, 1.0)] {
        insert(&mut t, model, TEMP, m, &[temp, temp + 1.0, temp - 1.0]);
        insert(&mut t, model, Quantity::RelativeHumidity2m.into(), m, &[90.0, 80.0, 95.0]);
        insert(&mut t, model, PRECIP, m, &[2.0, 0.0, 4.0]);
    }
    let params = SnowParams::default();
    let direct = compute_snowfall(&t, &params).unwrap();
    append_snowfall(&mut t, &params).unwrap();

    for (key, series) in &direct {
        assert_eq!(t.get(key), Some(series));
    }
    let stats = calculate_statistics(&t, SNOWFALL_CALCULATED).unwrap();
    for (i, s) in stats.iter().enumerate() {
        let mut expected: Vec<f64> = direct.iter().filter_map(|(_, s)| s.get(i)).collect();
        expected.sort_by(f64::total_cmp);
        let s = s.unwrap();
        assert_eq!(s.min, expected[0]);
        assert_eq!(s.max, expected[expected.len() - 1]);
        assert_eq!(s.count, expected.len());
    }
    let probs = snow_probabilities(&t, SNOWFALL_CALCULATED, &ProbabilityThresholds::mountain())
        .unwrap();
    assert_eq!(probs[1].unwrap().any, 0.0);
}
