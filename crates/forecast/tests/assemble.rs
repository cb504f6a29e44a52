use approx::assert_relative_eq;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use snowcast_forecast::{
    AlertKind, Concern, ForecastConfig, ForecastError, Location, Rating, WindHeight,
    assemble_forecast, to_json,
};
use snowcast_table::{Aggregation, EnsembleTable, Interval, Quantity, Series, SeriesKey, Variable};

fn hours(n: usize) -> Vec<DateTime<Utc>> {
    let t0 = Utc.with_ymd_and_hms(2025, 1, 10, 0, 0, 0).unwrap();
    (0..n).map(|h| t0 + TimeDelta::hours(h as i64)).collect()
}

fn constant(
    table: &mut EnsembleTable,
    model: &str,
    quantity: Quantity,
    member: u32,
    value: f64,
) {
    let n = table.n_timesteps();
    table
        .insert(SeriesKey::new(model, quantity, member), Series::new(vec![value; n]))
        .unwrap();
}

fn location() -> Location {
    Location::new("Test Peak", 50.1, -122.9, 1000.0)
}

/// Two models with two members each, cold and snowing lightly.
fn snowy_table(n: usize) -> EnsembleTable {
    let mut t = EnsembleTable::new(hours(n), Interval::Hourly).unwrap();
    for (model, temps) in [("ecmwf", [-5.0, -6.0]), ("gfs", [-4.0, -5.0])] {
        for (member, temp) in temps.into_iter().enumerate() {
            let m = member as u32;
            constant(&mut t, model, Quantity::Temperature2m, m, temp);
            constant(&mut t, model, Quantity::RelativeHumidity2m, m, 90.0);
            constant(&mut t, model, Quantity::Precipitation, m, 1.0);
            constant(&mut t, model, Quantity::WindSpeed10m, m, 20.0);
        }
    }
    t
}

#[test]
fn assembles_hourly_and_daily_records() {
    let forecast =
        assemble_forecast(snowy_table(48), None, &location(), &ForecastConfig::default()).unwrap();

    assert_eq!(forecast.hourly.len(), 48);
    assert_eq!(forecast.daily.len(), 2);
    assert_eq!(forecast.metadata.models, vec!["ecmwf", "gfs"]);
    assert_eq!(forecast.metadata.ensemble_members, 4);
    assert_eq!(
        forecast.metadata.calculations_included,
        vec!["snowfall", "wind_adjustment", "freezing_level_estimation"]
    );

    let h = &forecast.hourly[0];
    assert!(h.snowfall.is_some_and(|s| s.mean > 0.0));
    assert_eq!(h.snow_level, Some(1000.0));
    // surface below freezing: freezing level at the station
    assert_eq!(h.freezing_level, Some(1000.0));
    assert_eq!(h.wind.height, WindHeight::Adjusted10m);
    assert_relative_eq!(h.wind.speed.unwrap().mean, 28.0, epsilon = 1e-9);
    assert_eq!(h.probabilities.temperature.unwrap().freezing, 1.0);
    assert_eq!(h.model_agreement.len(), 3);

    let d = &forecast.daily[0];
    assert_eq!(d.day_of_week, "Friday");
    assert_relative_eq!(d.precipitation_total.unwrap(), 24.0, epsilon = 1e-9);
    assert_relative_eq!(d.temperature.min.unwrap(), -5.0, epsilon = 1e-9);
    assert_eq!(d.wind.height, WindHeight::Unavailable);
    assert!(d.snowfall.total.is_some_and(|t| t > 0.0));

    let compared: Vec<String> = forecast
        .model_comparison
        .iter()
        .map(|c| c.variable.to_string())
        .collect();
    assert_eq!(
        compared,
        vec!["temperature_2m", "precipitation", "snowfall_calculated"]
    );
}

#[test]
fn daily_peak_rate_is_aggregated_per_member_first() {
    let mut t = EnsembleTable::new(hours(24), Interval::Hourly).unwrap();
    let snowfall = Variable::new(Quantity::SnowfallCalculated);
    let mut a = vec![0.0; 24];
    a[3] = 10.0;
    let mut b = vec![0.0; 24];
    b[5] = 10.0;
    t.insert(SeriesKey::new("ecmwf", snowfall, 0), Series::new(a)).unwrap();
    t.insert(SeriesKey::new("ecmwf", snowfall, 1), Series::new(b)).unwrap();

    let forecast = assemble_forecast(t, None, &location(), &ForecastConfig::default()).unwrap();
    let day = &forecast.daily[0];
    assert_relative_eq!(day.snowfall.total.unwrap(), 10.0, epsilon = 1e-12);
    // averaging first would give 5
    assert_relative_eq!(day.snowfall.max_hourly.unwrap(), 10.0, epsilon = 1e-12);

    assert_eq!(forecast.summary.key_concerns, vec![Concern::HeavySnowfall]);
    assert_eq!(forecast.summary.operational_conditions.rating, Rating::Fair);
    assert!(forecast.alerts.is_empty());
    assert!(forecast.model_comparison.is_empty());
}

#[test]
fn heavy_snow_alert_over_first_day() {
    let mut t = EnsembleTable::new(hours(30), Interval::Hourly).unwrap();
    constant(&mut t, "ecmwf", Quantity::SnowfallCalculated, 0, 2.0);
    constant(&mut t, "ecmwf", Quantity::SnowfallCalculated, 1, 2.0);

    let forecast = assemble_forecast(t, None, &location(), &ForecastConfig::default()).unwrap();
    assert_eq!(forecast.alerts.len(), 1);
    let alert = &forecast.alerts[0];
    assert_eq!(alert.kind, AlertKind::HeavySnow);
    assert!(alert.message.contains("48cm"), "{}", alert.message);
    assert_eq!(alert.valid_from, forecast.hourly[0].time);
    assert_eq!(alert.valid_to, forecast.hourly[23].time);
}

#[test]
fn freezing_level_rise_alert() {
    let mut t = EnsembleTable::new(hours(24), Interval::Hourly).unwrap();
    let fl: Vec<f64> = (0..24).map(|h| 1000.0 + 50.0 * h as f64).collect();
    t.insert(
        SeriesKey::new("gfs", Quantity::FreezingLevelHeight, 0),
        Series::new(fl),
    )
    .unwrap();

    let forecast = assemble_forecast(t, None, &location(), &ForecastConfig::default()).unwrap();
    let alert = forecast
        .alerts
        .iter()
        .find(|a| a.kind == AlertKind::FreezingLevelChange)
        .unwrap();
    assert!(alert.message.contains("rise"));
    assert!(alert.message.contains("1150m"));
    assert!(
        !forecast
            .metadata
            .calculations_included
            .contains(&"freezing_level_estimation")
    );
}

#[test]
fn missing_humidity_leaves_snowfall_undefined() {
    let mut t = EnsembleTable::new(hours(6), Interval::Hourly).unwrap();
    constant(&mut t, "gfs", Quantity::Temperature2m, 0, -3.0);
    constant(&mut t, "gfs", Quantity::Precipitation, 0, 2.0);

    let forecast = assemble_forecast(t, None, &location(), &ForecastConfig::default()).unwrap();
    assert!(forecast.hourly.iter().all(|h| h.snowfall.is_none()));
    assert!(forecast.daily[0].snowfall.total.is_none());
    assert!(!forecast.metadata.calculations_included.contains(&"snowfall"));
}

#[test]
fn daily_table_supplies_aggregates() {
    let t0 = Utc.with_ymd_and_hms(2025, 1, 10, 0, 0, 0).unwrap();
    let days = vec![t0, t0 + TimeDelta::days(1)];
    let mut daily = EnsembleTable::new(days, Interval::Daily).unwrap();
    let t_min = Variable::aggregated(Quantity::Temperature2m, Aggregation::Min);
    let wind = Variable::aggregated(Quantity::WindSpeed10m, Aggregation::Mean);
    daily
        .insert_aggregate(SeriesKey::new("ecmwf", t_min, 0), Series::new(vec![-10.0, -12.0]))
        .unwrap();
    daily
        .insert_aggregate(SeriesKey::new("gfs", t_min, 0), Series::new(vec![-8.0, -10.0]))
        .unwrap();
    daily
        .insert_aggregate(SeriesKey::new("ecmwf", wind, 0), Series::new(vec![20.0, 0.0]))
        .unwrap();

    let forecast = assemble_forecast(
        snowy_table(48),
        Some(&daily),
        &location(),
        &ForecastConfig::default(),
    )
    .unwrap();
    assert_eq!(forecast.daily.len(), 2);
    assert_relative_eq!(forecast.daily[0].temperature.min.unwrap(), -9.0, epsilon = 1e-12);
    assert_relative_eq!(forecast.daily[1].temperature.min.unwrap(), -11.0, epsilon = 1e-12);
    // absent from the daily table: member-wise hourly maximum
    assert_relative_eq!(forecast.daily[0].temperature.max.unwrap(), -5.0, epsilon = 1e-12);

    assert_eq!(forecast.daily[0].wind.height, WindHeight::Adjusted10m);
    assert_relative_eq!(forecast.daily[0].wind.speed.unwrap(), 28.0, epsilon = 1e-9);
    // calm day, no 80 m data: a measured zero, not missing
    assert_eq!(forecast.daily[1].wind.height, WindHeight::Adjusted10m);
    assert_eq!(forecast.daily[1].wind.speed, Some(0.0));
}

#[test]
fn hourly_table_as_daily_is_rejected() {
    let hourly = snowy_table(24);
    let wrong = snowy_table(24);
    let err = assemble_forecast(hourly, Some(&wrong), &location(), &ForecastConfig::default())
        .unwrap_err();
    assert!(matches!(
        err,
        ForecastError::IntervalMismatch {
            expected: Interval::Daily,
            got: Interval::Hourly
        }
    ));
}

#[test]
fn invalid_config_is_rejected() {
    let config = ForecastConfig::new().with_terrain_factor(0.0);
    let err = assemble_forecast(snowy_table(3), None, &location(), &config).unwrap_err();
    assert!(matches!(err, ForecastError::InvalidConfig { .. }));
}

#[test]
fn json_writes_undefined_as_null() {
    let mut t = EnsembleTable::new(hours(3), Interval::Hourly).unwrap();
    constant(&mut t, "ecmwf", Quantity::SnowfallCalculated, 0, 0.5);
    let forecast = assemble_forecast(t, None, &location(), &ForecastConfig::default()).unwrap();
    let json = to_json(&forecast).unwrap();
    assert!(json.contains("\"temperature\": null"));
    assert!(json.contains("\"height\": \"unavailable\""));
    assert!(json.contains("\"ensemble_members\": 0"));
    assert!(json.contains("\"rating\": \"GOOD\""));
}
