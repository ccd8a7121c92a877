//! # Fallback Tide Model
//!
//! Used when no real station can be resolved: the catalog failed to load, is
//! empty, or the requested station id does not exist. Instead of a separate
//! code path, the fallback is an ordinary [`Station`] with two constituents,
//! so prediction, movement, state and extrema all work unchanged.
//!
//! ## Model Characteristics
//!
//! ### Semidiurnal Pattern
//! - **M2** (12.42 h): amplitude and phase from configuration
//! - **S2** (12.00 h): amplitude from configuration, phase derived from the moon
//!
//! ### Spring–Neap Alignment
//! M2 and S2 drift in and out of phase every 14.77 days. The S2 phase is chosen
//! so both constituents peak together at the most recent mean new moon, which
//! puts spring tides at new and full moon and neaps at the quarters.
//!
//! ### Accuracy Trade-offs
//! - ✅ **Correct period**: matches the real semidiurnal cycle
//! - ✅ **Spring–neap envelope**: range follows the moon phase
//! - ❌ **No diurnal inequality**: both daily highs have the same height
//! - ❌ **Not tied to a location**: high water times are arbitrary
//!
//! Callers should mark anything built from this station as approximate.

use crate::config::FallbackConfig;
use crate::constituents::{M2_SPEED, S2_SPEED};
use crate::lunar::previous_new_moon;
use crate::predictor::hours_since_j2000;
use crate::Station;
use chrono::{DateTime, Utc};

/// Identifier given to the synthetic station.
pub const FALLBACK_STATION_ID: &str = "approximate";

/// Build the two-constituent approximation for the given location.
///
/// `now` anchors the spring–neap alignment to the lunation containing it.
pub fn approximate_station(
    params: &FallbackConfig,
    latitude: f64,
    longitude: f64,
    now: DateTime<Utc>,
) -> Station {
    // S2 and M2 angles coincide at the new moon: S2·t + φS2 = M2·t + φM2
    let t_new_moon = hours_since_j2000(previous_new_moon(now));
    let s2_phase = (params.m2_phase_deg - (S2_SPEED - M2_SPEED) * t_new_moon).rem_euclid(360.0);

    Station::new(
        FALLBACK_STATION_ID,
        "Approximate (offline)",
        latitude,
        longitude,
        params.mean_level_m,
        [
            ("M2", params.m2_amplitude_m, params.m2_phase_deg),
            ("S2", params.s2_amplitude_m, s2_phase),
        ],
    )
}

/// True when `station` is the synthetic fallback rather than a catalog entry.
pub fn is_approximate(station: &Station) -> bool {
    station.id == FALLBACK_STATION_ID
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lunar::SYNODIC_MONTH_DAYS;
    use crate::predictor::{generate_tide_series, predict_tide_height};
    use chrono::{Duration, TimeZone};

    fn daily_range(station: &Station, start: DateTime<Utc>) -> f64 {
        let series =
            generate_tide_series(station, start, Duration::hours(25), Duration::minutes(10))
                .unwrap();
        let (min, max) = series
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), p| {
                (min.min(p.height), max.max(p.height))
            });
        max - min
    }

    #[test]
    fn test_fallback_is_a_regular_station() {
        let now = Utc.with_ymd_and_hms(2025, 7, 24, 0, 0, 0).unwrap();
        let station = approximate_station(&FallbackConfig::default(), -32.05, 115.733, now);

        assert!(is_approximate(&station));
        assert_eq!(station.constituents.as_ref().unwrap().len(), 2);

        let height = predict_tide_height(&station, now).unwrap();
        assert!((0.05 - 1e-9..=1.45 + 1e-9).contains(&height), "height {height}");
    }

    #[test]
    fn test_constituents_in_phase_at_new_moon() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 4, 30, 0).unwrap();
        let params = FallbackConfig::default();
        let station = approximate_station(&params, 0.0, 0.0, now);

        let new_moon = previous_new_moon(now);
        let t = hours_since_j2000(new_moon);
        let m2_angle = (M2_SPEED * t + params.m2_phase_deg).to_radians();
        let expected =
            params.mean_level_m + (params.m2_amplitude_m + params.s2_amplitude_m) * m2_angle.cos();

        let height = predict_tide_height(&station, new_moon).unwrap();
        assert!((height - expected).abs() < 1e-6, "{height} vs {expected}");
    }

    #[test]
    fn test_spring_range_exceeds_neap_range() {
        let now = Utc.with_ymd_and_hms(2025, 7, 24, 19, 0, 0).unwrap();
        let params = FallbackConfig::default();
        let station = approximate_station(&params, 0.0, 0.0, now);

        let spring = previous_new_moon(now);
        let neap = spring + Duration::hours((SYNODIC_MONTH_DAYS * 6.0) as i64);

        let spring_range = daily_range(&station, spring);
        let neap_range = daily_range(&station, neap);
        assert!(spring_range > 1.3, "spring range {spring_range}");
        assert!(neap_range < 0.7, "neap range {neap_range}");
    }
}
