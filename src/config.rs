//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the tide-config.toml file.
//! It provides a centralized way to configure the station catalog source, the user's
//! location, prediction window, fallback model and terminal display.
//!
//! Every section and field has a default, so a config file only needs the values
//! that differ:
//!
//! ```toml
//! [source]
//! stations = "https://example.org/tide-stations.json"
//!
//! [location]
//! latitude = -31.95
//! longitude = 115.533
//! ```

use crate::catalog::StationSource;
use anyhow::bail;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "tide-config.toml";

/// Longest accepted prediction window, one leap year.
pub const MAX_WINDOW_HOURS: i64 = 24 * 366;

/// Largest accepted sample step and movement delta, one day.
pub const MAX_STEP_MINUTES: i64 = 24 * 60;

/// Application configuration loaded from tide-config.toml
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Where the station catalog comes from
    pub source: SourceConfig,
    /// Coordinates used to pick the nearest station
    pub location: LocationConfig,
    /// Prediction window and sampling
    pub prediction: PredictionConfig,
    /// Two-constituent model used when no station is available
    pub fallback: FallbackConfig,
    /// Terminal chart options
    pub display: DisplayConfig,
}

/// Station catalog source configuration
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct SourceConfig {
    /// URL (http/https) or local path of the JSON station catalog
    pub stations: String,
    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
}

/// User location configuration
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct LocationConfig {
    /// Degrees north
    pub latitude: f64,
    /// Degrees east
    pub longitude: f64,
}

/// Prediction window configuration
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct PredictionConfig {
    /// Length of the predicted window in hours
    pub window_hours: i64,
    /// Minutes between samples
    pub step_minutes: i64,
    /// Half-width of the central difference for tide movement, in minutes
    pub movement_delta_minutes: i64,
}

/// Offline approximation configuration
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// Mean water level in meters
    pub mean_level_m: f64,
    /// Lunar semidiurnal amplitude in meters
    pub m2_amplitude_m: f64,
    /// Solar semidiurnal amplitude in meters
    pub s2_amplitude_m: f64,
    /// M2 phase at the J2000.0 epoch in degrees
    pub m2_phase_deg: f64,
}

/// Terminal display configuration
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Chart height in text rows
    pub rows: usize,
    /// Height shown as 0% on gauges, meters
    pub min_height_m: f64,
    /// Height shown as 100% on gauges, meters
    pub max_height_m: f64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig {
            stations: "data/tide-stations.json".to_string(),
            timeout_secs: 10,
        }
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        // Fremantle, WA
        LocationConfig {
            latitude: -32.05,
            longitude: 115.733,
        }
    }
}

impl Default for PredictionConfig {
    fn default() -> Self {
        PredictionConfig {
            window_hours: 24,
            step_minutes: 10,
            movement_delta_minutes: 5,
        }
    }
}

impl Default for FallbackConfig {
    fn default() -> Self {
        FallbackConfig {
            mean_level_m: 0.75,
            m2_amplitude_m: 0.5,
            s2_amplitude_m: 0.2,
            m2_phase_deg: 0.0,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            rows: 20,
            min_height_m: 0.0,
            max_height_m: 1.5, // typical WA coastal range
        }
    }
}

impl SourceConfig {
    pub fn source(&self) -> StationSource {
        StationSource::from(self.stations.as_str())
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }
}

impl PredictionConfig {
    pub fn window(&self) -> Duration {
        Duration::hours(self.window_hours)
    }

    pub fn step(&self) -> Duration {
        Duration::minutes(self.step_minutes)
    }

    pub fn movement_delta(&self) -> Duration {
        Duration::minutes(self.movement_delta_minutes)
    }
}

impl Config {
    /// Load configuration from tide-config.toml file
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => match config.validate() {
                    Ok(()) => {
                        info!(path = %path.display(), source = %config.source.stations, "loaded configuration");
                        config
                    }
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "config value out of range, using defaults");
                        Self::default()
                    }
                },
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "invalid config file, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                info!(path = %path.display(), "no config file found, using defaults");
                Self::default()
            }
        }
    }

    /// Check the values that become durations or coordinates.
    pub fn validate(&self) -> anyhow::Result<()> {
        let prediction = &self.prediction;
        if !(1..=MAX_WINDOW_HOURS).contains(&prediction.window_hours) {
            bail!("window_hours must be between 1 and {MAX_WINDOW_HOURS}");
        }
        if !(1..=MAX_STEP_MINUTES).contains(&prediction.step_minutes) {
            bail!("step_minutes must be between 1 and {MAX_STEP_MINUTES}");
        }
        if !(1..=MAX_STEP_MINUTES).contains(&prediction.movement_delta_minutes) {
            bail!("movement_delta_minutes must be between 1 and {MAX_STEP_MINUTES}");
        }
        if !(-90.0..=90.0).contains(&self.location.latitude)
            || !(-180.0..=180.0).contains(&self.location.longitude)
        {
            bail!("location is outside the valid latitude/longitude range");
        }
        if self.display.rows < 2 {
            bail!("display rows must be at least 2");
        }
        Ok(())
    }

    /// Write the configuration as pretty TOML
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path.as_ref(), contents)?;
        info!(path = %path.as_ref().display(), "configuration saved");
        Ok(())
    }
}
