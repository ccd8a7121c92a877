//! # Tide Harmonic Core Library
//!
//! Harmonic tide prediction for coastal stations. Given a station's tidal
//! constituents (amplitude and phase per named constituent) and a vertical
//! datum, the library reconstructs the tide curve at any instant and derives
//! rates of change, rising/falling/slack state and high/low water times.
//!
//! ## Pieces
//!
//! - [`constituents`]: fixed table of constituent speeds (degrees per hour)
//! - [`station`]: station records as loaded from a JSON catalog
//! - [`catalog`]: loading a catalog from a URL or file and nearest-station lookup
//! - [`predictor`]: the sum-of-cosines model and its derived quantities
//! - [`extrema`]: high/low tide extraction from a sampled series
//! - [`geo`]: great-circle distance used for station lookup
//!
//! The remaining modules ([`config`], [`fallback`], [`lunar`], [`renderer`])
//! belong to the command-line application built on top of the core.
//!
//! ## Data Flow
//! 1. **Load**: fetch the station catalog once and keep the snapshot
//! 2. **Resolve**: pick the station nearest the user's coordinates
//! 3. **Predict**: evaluate heights for "now" or a window of time
//! 4. **Present**: map heights to chart rows or percentages (caller's concern)
//!
//! ## Core Types
//! - [`Station`]: constituents plus datum for one location
//! - [`TidePoint`]: a single predicted height at a UTC instant

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod catalog;
pub mod config;
pub mod constituents;
pub mod extrema;
pub mod fallback;
pub mod geo;
pub mod lunar;
pub mod predictor;
pub mod renderer;
pub mod station;

pub use catalog::{LoadError, StationCatalog, StationSet, StationSource};
pub use extrema::{find_high_low_tides, HighLowTides};
pub use predictor::{
    calculate_tide_movement, generate_tide_series, get_tide_state, predict_tide_height,
    HarmonicModel, TideError, TideState, TideStatus,
};
pub use station::{ConstituentValue, Station};

/// A predicted tide height at a specific instant.
///
/// # Example
/// ```
/// use chrono::{TimeZone, Utc};
/// use tide_harmonic::TidePoint;
///
/// let point = TidePoint {
///     time: Utc.with_ymd_and_hms(2025, 7, 24, 6, 0, 0).unwrap(),
///     height: 0.83,
/// };
/// assert!(point.height > 0.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TidePoint {
    /// Instant of the sample (UTC)
    pub time: DateTime<Utc>,
    /// Height in meters above the station's reference level
    pub height: f64,
}
