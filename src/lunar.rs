//! Mean lunar phase from the synodic month.
//!
//! Mean values only: the moon age drifts from the true value by up to about
//! 15 hours because the real lunation length varies. Used to align the
//! spring/neap envelope of the offline tide approximation.

use chrono::{DateTime, Duration, Utc};
use std::f64::consts::TAU;

/// Mean length of a lunation in days.
pub const SYNODIC_MONTH_DAYS: f64 = 29.530_588_853;

/// New moon of 2000-01-06 18:14 UTC as a Unix timestamp.
pub const REFERENCE_NEW_MOON_UNIX: i64 = 947_182_440;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Days since the most recent mean new moon, in `[0, SYNODIC_MONTH_DAYS)`.
pub fn moon_age_days(instant: DateTime<Utc>) -> f64 {
    let seconds = (instant.timestamp() - REFERENCE_NEW_MOON_UNIX) as f64
        + f64::from(instant.timestamp_subsec_nanos()) * 1e-9;
    (seconds / SECONDS_PER_DAY).rem_euclid(SYNODIC_MONTH_DAYS)
}

/// Fraction of the lunation elapsed: 0 at new moon, 0.5 at full moon.
pub fn phase_fraction(instant: DateTime<Utc>) -> f64 {
    moon_age_days(instant) / SYNODIC_MONTH_DAYS
}

/// Illuminated fraction of the disc (0–1), cosine approximation.
pub fn illuminated_fraction(instant: DateTime<Utc>) -> f64 {
    (1.0 - (phase_fraction(instant) * TAU).cos()) / 2.0
}

/// The mean new moon at or before `instant`.
pub fn previous_new_moon(instant: DateTime<Utc>) -> DateTime<Utc> {
    let age_ms = (moon_age_days(instant) * SECONDS_PER_DAY * 1000.0).round() as i64;
    instant - Duration::milliseconds(age_ms)
}
