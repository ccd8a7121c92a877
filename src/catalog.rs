//! # Station Catalog Loading and Lookup
//!
//! Loads tide stations from a JSON catalog (HTTP or local file) and answers
//! lookups by identifier or by proximity to a coordinate.
//!
//! ## Snapshots
//!
//! A loaded catalog is a [`StationSet`]: an immutable, cheaply clonable list of
//! stations. [`StationCatalog`] is the caller-owned holder for the current
//! snapshot. A reload fetches and validates the complete new set first and
//! only then swaps it in, so readers see either the old set or the new one,
//! never a partial list. A failed reload leaves the previous set active.
//!
//! ## Data Source
//! - **URL**: `http://` or `https://`, fetched with `reqwest` and a request timeout
//! - **File**: anything else is treated as a local path
//!
//! Failures are returned to the caller unchanged; there is no internal retry.
//!
//! ## Validation
//! Each record must carry a `constituents` object, coordinates inside the
//! valid latitude/longitude ranges and non-negative amplitudes for every
//! constituent in the speed table. Entries with other names are never an
//! error: well-formed ones are kept and ignored by the predictor, malformed
//! ones are dropped while parsing.

use crate::constituents::speed_of;
use crate::geo::haversine_km;
use crate::Station;
use std::{
    convert::Infallible,
    fmt, io,
    path::PathBuf,
    str::FromStr,
    sync::{Arc, PoisonError, RwLock},
    time::Duration,
};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur while loading a station catalog.
#[derive(Error, Debug)]
pub enum LoadError {
    /// HTTP request failed (network, timeout, or non-success status)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Local catalog file could not be read
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Payload is not a JSON array of station records
    #[error("malformed station catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// A record has no `constituents` object
    #[error("station '{id}' has no constituents")]
    MissingConstituents { id: String },

    /// Latitude or longitude outside the valid range
    #[error("station '{id}' has coordinates out of range")]
    InvalidCoordinates { id: String },

    /// A constituent with a negative amplitude
    #[error("station '{id}' constituent '{name}' has a negative amplitude")]
    InvalidConstituent { id: String, name: String },
}

/// Where a station catalog is read from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StationSource {
    Url(String),
    File(PathBuf),
}

impl StationSource {
    /// Read the raw catalog bytes.
    async fn fetch(&self, timeout: Duration) -> Result<Vec<u8>, LoadError> {
        match self {
            StationSource::Url(url) => {
                let client = reqwest::Client::builder().timeout(timeout).build()?;
                let body = client
                    .get(url)
                    .send()
                    .await?
                    .error_for_status()?
                    .bytes()
                    .await?;
                Ok(body.to_vec())
            }
            StationSource::File(path) => {
                tokio::fs::read(path)
                    .await
                    .map_err(|source| LoadError::Io {
                        path: path.clone(),
                        source,
                    })
            }
        }
    }
}

impl From<&str> for StationSource {
    fn from(s: &str) -> Self {
        let s = s.trim();
        if s.starts_with("http://") || s.starts_with("https://") {
            StationSource::Url(s.to_string())
        } else {
            StationSource::File(PathBuf::from(s))
        }
    }
}

impl FromStr for StationSource {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for StationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StationSource::Url(url) => f.write_str(url),
            StationSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Parse and validate a JSON station catalog.
pub fn parse_stations(bytes: &[u8]) -> Result<Vec<Station>, LoadError> {
    let stations: Vec<Station> = serde_json::from_slice(bytes)?;

    for station in &stations {
        let constituents =
            station
                .constituents
                .as_ref()
                .ok_or_else(|| LoadError::MissingConstituents {
                    id: station.id.clone(),
                })?;

        if !station.has_valid_coordinates() {
            return Err(LoadError::InvalidCoordinates {
                id: station.id.clone(),
            });
        }

        if let Some((name, _)) = constituents
            .iter()
            .find(|(name, v)| speed_of(name).is_some() && v.amplitude < 0.0)
        {
            return Err(LoadError::InvalidConstituent {
                id: station.id.clone(),
                name: name.clone(),
            });
        }
    }

    Ok(stations)
}

/// Immutable snapshot of loaded stations, in catalog order.
#[derive(Clone, Debug)]
pub struct StationSet {
    stations: Arc<[Station]>,
}

impl Default for StationSet {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl StationSet {
    pub fn new(stations: Vec<Station>) -> Self {
        Self {
            stations: Arc::from(stations),
        }
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Station> {
        self.stations.iter()
    }

    /// Exact lookup by station identifier.
    pub fn find_station(&self, id: &str) -> Option<&Station> {
        self.stations.iter().find(|station| station.id == id)
    }

    /// Station closest to the given point by great-circle distance.
    ///
    /// Returns `None` for an empty set. On equal distances the earlier
    /// station in catalog order wins.
    pub fn find_nearest_station(&self, latitude: f64, longitude: f64) -> Option<&Station> {
        self.nearest_with_distance(latitude, longitude)
            .map(|(station, _)| station)
    }

    /// Nearest station together with its distance in kilometers.
    pub fn nearest_with_distance(&self, latitude: f64, longitude: f64) -> Option<(&Station, f64)> {
        let mut nearest = None;
        let mut min_distance = f64::INFINITY;

        for station in self.stations.iter() {
            let distance = haversine_km(latitude, longitude, station.latitude, station.longitude);
            if distance < min_distance {
                min_distance = distance;
                nearest = Some(station);
            }
        }

        nearest.map(|station| (station, min_distance))
    }
}

/// Caller-owned holder of the active [`StationSet`].
///
/// Starts empty. [`StationCatalog::load_stations`] is the only way the active
/// set changes, and it replaces the whole set at once.
#[derive(Debug)]
pub struct StationCatalog {
    current: RwLock<StationSet>,
    timeout: Duration,
}

impl Default for StationCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl StationCatalog {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Empty catalog whose HTTP loads give up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            current: RwLock::new(StationSet::default()),
            timeout,
        }
    }

    /// Catalog pre-populated with `stations`, skipping any fetch.
    pub fn from_stations(stations: Vec<Station>) -> Self {
        let catalog = Self::new();
        catalog.publish(StationSet::new(stations));
        catalog
    }

    /// Fetch, validate and publish a new station set.
    ///
    /// On success the new set replaces the current one and is returned. On
    /// failure the error is returned and the current set is left untouched.
    pub async fn load_stations(&self, source: &StationSource) -> Result<StationSet, LoadError> {
        let loaded = match source.fetch(self.timeout).await {
            Ok(bytes) => parse_stations(&bytes),
            Err(error) => Err(error),
        };
        let stations = match loaded {
            Ok(stations) => stations,
            Err(error) => {
                warn!(%error, source = %source, "station load failed, keeping previous set");
                return Err(error);
            }
        };
        let set = StationSet::new(stations);

        info!(count = set.len(), source = %source, "loaded tide stations");
        self.publish(set.clone());

        Ok(set)
    }

    /// The active snapshot; empty if nothing was ever loaded.
    pub fn get_stations(&self) -> StationSet {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn find_station(&self, id: &str) -> Option<Station> {
        self.get_stations().find_station(id).cloned()
    }

    /// Nearest station to the point, or `None` when the catalog is empty.
    pub fn find_nearest_station(&self, latitude: f64, longitude: f64) -> Option<Station> {
        let set = self.get_stations();
        let (station, distance_km) = set.nearest_with_distance(latitude, longitude)?;
        debug!(id = %station.id, distance_km, "resolved nearest station");
        Some(station.clone())
    }

    fn publish(&self, set: StationSet) {
        *self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = set;
    }
}
