//! # Prediction Scenario Tests
//!
//! End-to-end properties of the harmonic predictor: determinism, behaviour at
//! the epoch, periodicity, tolerance of unknown constituents, tide state and
//! extrema detection, plus loading a catalog from disk and predicting from it.

use chrono::{DateTime, Duration, TimeZone, Utc};
use std::io::Write;
use tempfile::NamedTempFile;
use tide_harmonic::{
    constituents::M2_SPEED, find_high_low_tides, generate_tide_series, get_tide_state,
    predict_tide_height, Station, StationCatalog, StationSource, TideError, TideState,
};

fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap()
}

fn m2_only(phase: f64) -> Station {
    Station::new("M2", "M2 only", 0.0, 0.0, 0.0, [("M2", 1.0, phase)])
}

/// One M2 period as a duration, rounded to the millisecond.
fn m2_period() -> Duration {
    Duration::milliseconds((360.0 / M2_SPEED * 3_600_000.0).round() as i64)
}

fn mixed_station() -> Station {
    Station::new(
        "MIXED",
        "Mixed",
        -32.05,
        115.733,
        0.72,
        [
            ("M2", 0.05, 280.0),
            ("S2", 0.04, 300.0),
            ("K1", 0.16, 310.0),
            ("O1", 0.12, 290.0),
        ],
    )
}

/// Same station and instant always give the same height.
#[test]
fn prediction_is_deterministic() {
    let station = mixed_station();
    let t = Utc.with_ymd_and_hms(2025, 7, 24, 6, 30, 0).unwrap();

    let first = predict_tide_height(&station, t).unwrap();
    for _ in 0..10 {
        assert_eq!(predict_tide_height(&station, t).unwrap(), first);
    }
    assert_eq!(predict_tide_height(&station.clone(), t).unwrap(), first);
}

/// At J2000.0 every angle equals its phase.
#[test]
fn epoch_height_is_amplitude_at_phase() {
    let height = predict_tide_height(&m2_only(0.0), epoch()).unwrap();
    assert!((height - 1.0).abs() < 1e-12, "got {height}");

    let station = mixed_station();
    let expected = 0.72
        + 0.05 * 280f64.to_radians().cos()
        + 0.04 * 300f64.to_radians().cos()
        + 0.16 * 310f64.to_radians().cos()
        + 0.12 * 290f64.to_radians().cos();
    let height = predict_tide_height(&station, epoch()).unwrap();
    assert!((height - expected).abs() < 1e-12);
}

/// A pure M2 station repeats after one M2 period, even decades from the epoch.
#[test]
fn single_constituent_is_periodic() {
    let station = m2_only(37.0);
    for t in [
        epoch() + Duration::hours(5),
        Utc.with_ymd_and_hms(2025, 7, 24, 3, 17, 0).unwrap(),
        Utc.with_ymd_and_hms(1975, 2, 1, 0, 0, 0).unwrap(),
    ] {
        let a = predict_tide_height(&station, t).unwrap();
        let b = predict_tide_height(&station, t + m2_period()).unwrap();
        assert!((a - b).abs() < 1e-6, "{a} vs {b} at {t}");
    }
}

/// Unknown constituent names contribute nothing.
#[test]
fn unknown_constituents_are_ignored() {
    let with_fake = Station::new(
        "A",
        "A",
        0.0,
        0.0,
        0.3,
        [("M2", 0.8, 45.0), ("FAKE99", 5.0, 0.0), ("K1", 0.2, 120.0)],
    );
    let without = Station::new("A", "A", 0.0, 0.0, 0.3, [("M2", 0.8, 45.0), ("K1", 0.2, 120.0)]);

    let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    for hour in 0..48 {
        let t = start + Duration::hours(hour);
        assert_eq!(
            predict_tide_height(&with_fake, t).unwrap(),
            predict_tide_height(&without, t).unwrap()
        );
    }
}

#[test]
fn missing_constituents_fail_fast() {
    let mut station = m2_only(0.0);
    station.constituents = None;

    assert!(matches!(
        predict_tide_height(&station, epoch()),
        Err(TideError::InvalidStation { .. })
    ));
    assert!(matches!(
        generate_tide_series(&station, epoch(), Duration::hours(1), Duration::minutes(10)),
        Err(TideError::InvalidStation { .. })
    ));
}

/// Just after low water the tide must be rising.
#[test]
fn state_is_rising_after_trough() {
    let station = m2_only(0.0);
    // Phase 0 puts low water half a period after the epoch
    let just_after_low = epoch() + m2_period() / 2 + Duration::minutes(30);

    let status = get_tide_state(&station, just_after_low).unwrap();
    assert_eq!(status.state, TideState::Rising);
    assert!(status.movement > 0.0);

    let just_after_high = epoch() + m2_period() + Duration::minutes(30);
    let status = get_tide_state(&station, just_after_high).unwrap();
    assert_eq!(status.state, TideState::Falling);
    assert!(status.movement < 0.0);
}

/// Two full periods of a clean sinusoid hold exactly two highs and two lows.
#[test]
fn two_periods_have_two_highs_and_two_lows() {
    // Phase 90° starts on a zero crossing, keeping every turning point interior
    let station = m2_only(90.0);
    let series =
        generate_tide_series(&station, epoch(), m2_period() * 2, Duration::minutes(10)).unwrap();

    let tides = find_high_low_tides(&series);
    assert_eq!(tides.highs.len(), 2);
    assert_eq!(tides.lows.len(), 2);
    assert!(tides.highs.iter().all(|p| p.height > 0.99));
    assert!(tides.lows.iter().all(|p| p.height < -0.99));
}

/// A day at ten minute steps is 145 samples from start to start + 24 h.
#[test]
fn day_series_has_145_samples() {
    let start = Utc.with_ymd_and_hms(2025, 7, 24, 0, 0, 0).unwrap();
    let series = generate_tide_series(
        &mixed_station(),
        start,
        Duration::hours(24),
        Duration::minutes(10),
    )
    .unwrap();

    assert_eq!(series.len(), 145);
    assert_eq!(series[0].time, start);
    assert_eq!(series[144].time, start + Duration::hours(24));
    assert!(series
        .windows(2)
        .all(|w| w[1].time - w[0].time == Duration::minutes(10)));

    let again = generate_tide_series(
        &mixed_station(),
        start,
        Duration::hours(24),
        Duration::minutes(10),
    )
    .unwrap();
    assert_eq!(series, again);
}

#[test]
fn empty_catalog_has_no_nearest_station() {
    let catalog = StationCatalog::new();
    assert!(catalog.find_nearest_station(-32.05, 115.733).is_none());
    assert!(catalog.find_nearest_station(90.0, -180.0).is_none());
}

/// Load a catalog file, resolve the nearest station and predict from it.
#[tokio::test]
async fn load_resolve_and_predict() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(
        br#"[
            {"id": "ROTTNEST", "name": "Rottnest Island", "latitude": -31.95, "longitude": 115.533,
             "datum": 0.70, "constituents": {"K1": {"amplitude": 0.17, "phase": 305.0},
                                             "O1": {"amplitude": 0.11, "phase": 285.0},
                                             "NEW7": {"amplitude": 0.30, "phase": 10.0}}},
            {"id": "MANDURAH", "name": "Mandurah", "latitude": -32.517, "longitude": 115.7,
             "datum": 0.60, "constituents": {"K1": {"amplitude": 0.12, "phase": 300.0}}}
        ]"#,
    )
    .unwrap();

    let catalog = StationCatalog::new();
    let source = StationSource::File(file.path().to_path_buf());
    catalog.load_stations(&source).await.unwrap();

    let station = catalog.find_nearest_station(-31.99, 115.54).unwrap();
    assert_eq!(station.id, "ROTTNEST");

    let start = Utc.with_ymd_and_hms(2025, 7, 24, 0, 0, 0).unwrap();
    let series =
        generate_tide_series(&station, start, Duration::hours(48), Duration::minutes(10)).unwrap();
    assert!(series
        .iter()
        .all(|p| (0.70 - 0.28 - 1e-9..=0.70 + 0.28 + 1e-9).contains(&p.height)));

    // Diurnal constituents only: roughly one high per day
    let tides = find_high_low_tides(&series);
    assert!((1..=3).contains(&tides.highs.len()), "highs {}", tides.highs.len());
}
