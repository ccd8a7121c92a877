//! # Harmonic Tide Prediction
//!
//! Reconstructs a continuous tide curve from a station's constituents:
//!
//! ```text
//! t      = hours since J2000.0 (2000-01-01T12:00:00Z)
//! height = datum + Σ amplitude_i · cos(speed_i · t + phase_i)
//! ```
//!
//! Speeds come from the fixed table in [`crate::constituents`]; amplitude and
//! phase come from the station. Constituent names missing from the table are
//! skipped so catalogs can grow without code changes.
//!
//! ## Derived quantities
//! - **Movement**: central-difference derivative in meters per hour
//! - **State**: rising / falling / slack, using [`SLACK_THRESHOLD_M_PER_H`]
//! - **Series**: evenly spaced samples over a window, produced lazily by
//!   [`TideSeriesIter`] or collected by [`generate_tide_series`]
//!
//! Everything here is a pure function of the station and the instant. All
//! instants are UTC; conversion to local display time belongs to the caller.
//!
//! ## Example
//! ```
//! use chrono::{TimeZone, Utc};
//! use tide_harmonic::predictor::predict_tide_height;
//! use tide_harmonic::Station;
//!
//! let station = Station::new("demo", "Demo", 0.0, 0.0, 0.0, [("M2", 1.0, 0.0)]);
//! let epoch = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
//! let height = predict_tide_height(&station, epoch).unwrap();
//! assert!((height - 1.0).abs() < 1e-12);
//! ```

use crate::constituents::speed_of;
use crate::{Station, TidePoint};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Unix timestamp of the J2000.0 epoch, 2000-01-01T12:00:00Z.
pub const J2000_UNIX_SECONDS: i64 = 946_728_000;

/// Half-width of the central difference used for movement, in minutes.
pub const DEFAULT_MOVEMENT_DELTA_MINUTES: i64 = 5;

/// Movement below this magnitude (m/h) is reported as slack water.
pub const SLACK_THRESHOLD_M_PER_H: f64 = 0.01;

/// Default spacing between series samples, in minutes.
pub const DEFAULT_SERIES_STEP_MINUTES: i64 = 10;

/// Errors raised by the predictor for invalid arguments.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TideError {
    /// The station has no constituents mapping at all
    #[error("station '{id}' has no constituents")]
    InvalidStation { id: String },

    /// Series step was zero, negative, or below one millisecond
    #[error("series step must be positive")]
    InvalidStep,

    /// Series span was negative
    #[error("series span must not be negative")]
    InvalidSpan,

    /// Movement delta was zero, negative, or below one millisecond
    #[error("movement delta must be positive")]
    InvalidDelta,

    /// An offset instant would fall outside the representable date range
    #[error("instant out of the supported date range")]
    OutOfRange,
}

/// Direction of water level change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TideState {
    Rising,
    Falling,
    Slack,
}

impl TideState {
    /// Classify a rate of change in meters per hour.
    pub fn from_movement(movement: f64) -> Self {
        if movement.abs() < SLACK_THRESHOLD_M_PER_H {
            TideState::Slack
        } else if movement > 0.0 {
            TideState::Rising
        } else {
            TideState::Falling
        }
    }

    /// Single glyph for compact displays.
    pub fn arrow(self) -> char {
        match self {
            TideState::Rising => '↑',
            TideState::Falling => '↓',
            TideState::Slack => '→',
        }
    }
}

impl fmt::Display for TideState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TideState::Rising => "rising",
            TideState::Falling => "falling",
            TideState::Slack => "slack",
        };
        f.write_str(label)
    }
}

/// Tide state together with the movement it was derived from.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TideStatus {
    pub state: TideState,
    /// Meters per hour, positive when rising
    pub movement: f64,
}

/// One resolved constituent: speed from the table, amplitude/phase from the station.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Term {
    speed: f64,
    amplitude: f64,
    phase: f64,
}

/// A station's constituents resolved against the speed table.
///
/// Construction is the only fallible step.
#[derive(Clone, Debug, PartialEq)]
pub struct HarmonicModel {
    datum: f64,
    terms: Vec<Term>,
}

impl HarmonicModel {
    /// Resolve `station` into a model.
    ///
    /// Fails with [`TideError::InvalidStation`] when the station carries no
    /// constituents mapping. Unknown constituent names are skipped.
    pub fn new(station: &Station) -> Result<Self, TideError> {
        let constituents = station
            .constituents
            .as_ref()
            .ok_or_else(|| TideError::InvalidStation {
                id: station.id.clone(),
            })?;

        let terms = constituents
            .iter()
            .filter_map(|(name, value)| {
                speed_of(name).map(|speed| Term {
                    speed,
                    amplitude: value.amplitude,
                    phase: value.phase.rem_euclid(360.0),
                })
            })
            .collect();

        Ok(Self {
            datum: station.datum,
            terms,
        })
    }

    /// Number of constituents that contribute to the prediction.
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Predicted height in meters at `instant`.
    pub fn height_at(&self, instant: DateTime<Utc>) -> f64 {
        let t = hours_since_j2000(instant);
        self.terms.iter().fold(self.datum, |height, term| {
            let angle = term.speed * t + term.phase;
            height + term.amplitude * angle.to_radians().cos()
        })
    }

    /// Rate of change in meters per hour using a central difference of ±`delta`.
    pub fn movement_at(&self, instant: DateTime<Utc>, delta: Duration) -> Result<f64, TideError> {
        let delta_ms = delta.num_milliseconds();
        if delta_ms <= 0 {
            return Err(TideError::InvalidDelta);
        }
        self.central_difference(instant, delta_ms)
    }

    /// Tide state using the default movement delta.
    ///
    /// Fails with [`TideError::OutOfRange`] within the movement delta of the
    /// date range limits.
    pub fn state_at(&self, instant: DateTime<Utc>) -> Result<TideStatus, TideError> {
        let movement =
            self.central_difference(instant, DEFAULT_MOVEMENT_DELTA_MINUTES * 60 * 1000)?;

        Ok(TideStatus {
            state: TideState::from_movement(movement),
            movement,
        })
    }

    fn central_difference(&self, instant: DateTime<Utc>, delta_ms: i64) -> Result<f64, TideError> {
        let delta = Duration::milliseconds(delta_ms);
        let before = instant
            .checked_sub_signed(delta)
            .ok_or(TideError::OutOfRange)?;
        let after = instant
            .checked_add_signed(delta)
            .ok_or(TideError::OutOfRange)?;
        let delta_hours = 2.0 * delta_ms as f64 / 3_600_000.0;

        Ok((self.height_at(after) - self.height_at(before)) / delta_hours)
    }

    /// Lazily sample the curve from `start` over `span` every `step`.
    ///
    /// Yields `floor(span / step) + 1` points; the first is at `start`. Fails
    /// with [`TideError::OutOfRange`] when `start + span` is not representable.
    pub fn series(
        &self,
        start: DateTime<Utc>,
        span: Duration,
        step: Duration,
    ) -> Result<TideSeriesIter<'_>, TideError> {
        let step_ms = step.num_milliseconds();
        if step_ms <= 0 {
            return Err(TideError::InvalidStep);
        }
        let span_ms = span.num_milliseconds();
        if span_ms < 0 {
            return Err(TideError::InvalidSpan);
        }
        start
            .checked_add_signed(span)
            .ok_or(TideError::OutOfRange)?;

        Ok(TideSeriesIter {
            model: self,
            start,
            step_ms,
            index: 0,
            count: (span_ms / step_ms) as usize + 1,
        })
    }
}

/// Evenly spaced samples of a [`HarmonicModel`].
///
/// Holds no state beyond its position; a clone walks the remaining samples
/// independently of its source.
#[derive(Clone, Debug)]
pub struct TideSeriesIter<'a> {
    model: &'a HarmonicModel,
    start: DateTime<Utc>,
    step_ms: i64,
    index: usize,
    count: usize,
}

impl Iterator for TideSeriesIter<'_> {
    type Item = TidePoint;

    fn next(&mut self) -> Option<TidePoint> {
        if self.index >= self.count {
            return None;
        }
        let offset = Duration::milliseconds(self.step_ms.saturating_mul(self.index as i64));
        self.index += 1;
        let time = self.start.checked_add_signed(offset)?;

        Some(TidePoint {
            time,
            height: self.model.height_at(time),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TideSeriesIter<'_> {}

/// Fractional hours elapsed since J2000.0; negative before the epoch.
pub fn hours_since_j2000(instant: DateTime<Utc>) -> f64 {
    let seconds = (instant.timestamp() - J2000_UNIX_SECONDS) as f64
        + f64::from(instant.timestamp_subsec_nanos()) * 1e-9;
    seconds / 3600.0
}

/// Predicted tide height in meters at `instant`.
pub fn predict_tide_height(station: &Station, instant: DateTime<Utc>) -> Result<f64, TideError> {
    Ok(HarmonicModel::new(station)?.height_at(instant))
}

/// Rate of change in meters per hour, central difference over ±`delta`.
///
/// Pass `Duration::minutes(DEFAULT_MOVEMENT_DELTA_MINUTES)` for the usual
/// five-minute half-width; smaller deltas track the instantaneous slope more
/// closely until floating point noise takes over.
pub fn calculate_tide_movement(
    station: &Station,
    instant: DateTime<Utc>,
    delta: Duration,
) -> Result<f64, TideError> {
    HarmonicModel::new(station)?.movement_at(instant, delta)
}

/// Rising, falling or slack at `instant`, with the movement behind it.
pub fn get_tide_state(station: &Station, instant: DateTime<Utc>) -> Result<TideStatus, TideError> {
    HarmonicModel::new(station)?.state_at(instant)
}

/// Sample the tide curve from `start` over `span` every `step`.
///
/// Returns `floor(span / step) + 1` points starting at `start`. Calling again
/// with the same arguments reproduces the same series.
pub fn generate_tide_series(
    station: &Station,
    start: DateTime<Utc>,
    span: Duration,
    step: Duration,
) -> Result<Vec<TidePoint>, TideError> {
    let model = HarmonicModel::new(station)?;
    let series = model.series(start, span, step)?.collect();
    Ok(series)
}
