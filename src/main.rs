//! # Tide Harmonic Application Entry Point
//!
//! Loads the station catalog, resolves the station for the configured (or
//! requested) location and prints the current tide state, the next high and
//! low water, and an ASCII chart of the prediction window.
//!
//! When the catalog cannot be loaded or has no matching station, a
//! two-constituent approximation is used instead and the report is marked
//! as approximate.

// Test modules
#[cfg(test)]
mod tests;

use anyhow::{bail, Context};
use chrono::{Duration, DurationRound, Utc};
use std::env;
use std::path::PathBuf;
use tide_harmonic::{
    config::Config,
    fallback, find_high_low_tides,
    renderer::{format_summary, render_ascii},
    HarmonicModel, StationCatalog, TidePoint, TideState, TideStatus,
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: tide-harmonic [--config PATH] [--station ID] [--lat DEG --lon DEG]";

/// Command line options; anything left unset comes from the config file.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct Args {
    pub config: Option<PathBuf>,
    pub station_id: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub help: bool,
}

impl Args {
    pub(crate) fn parse<I>(args: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut parsed = Args::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            let mut value = |flag: &str| {
                args.next()
                    .with_context(|| format!("missing value for {flag}"))
            };
            match arg.as_str() {
                "--config" => parsed.config = Some(PathBuf::from(value("--config")?)),
                "--station" => parsed.station_id = Some(value("--station")?),
                "--lat" => {
                    let raw = value("--lat")?;
                    parsed.latitude = Some(raw.parse().with_context(|| format!("bad latitude '{raw}'"))?);
                }
                "--lon" => {
                    let raw = value("--lon")?;
                    parsed.longitude = Some(raw.parse().with_context(|| format!("bad longitude '{raw}'"))?);
                }
                "-h" | "--help" => parsed.help = true,
                other => bail!("unknown argument '{other}'\n{USAGE}"),
            }
        }

        Ok(parsed)
    }
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout carries only the report
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse(env::args().skip(1))?;
    if args.help {
        println!("{USAGE}");
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };
    let latitude = args.latitude.unwrap_or(config.location.latitude);
    let longitude = args.longitude.unwrap_or(config.location.longitude);

    // Create Tokio runtime for the catalog fetch
    let rt = tokio::runtime::Runtime::new()?;
    let catalog = StationCatalog::with_timeout(config.source.timeout());
    let source = config.source.source();

    // A failed load is expected offline; the approximation takes over below
    if let Err(error) = rt.block_on(catalog.load_stations(&source)) {
        debug!(%error, "continuing without a station catalog");
    }

    let now = Utc::now();
    let resolved = match &args.station_id {
        Some(id) => {
            let station = catalog.find_station(id);
            if station.is_none() {
                warn!(id = %id, "station not found in catalog");
            }
            station
        }
        None => catalog.find_nearest_station(latitude, longitude),
    };
    let station = resolved.unwrap_or_else(|| {
        info!(latitude, longitude, "using approximate tide model");
        fallback::approximate_station(&config.fallback, latitude, longitude, now)
    });

    let model = HarmonicModel::new(&station)?;
    let height = model.height_at(now);
    let movement = model.movement_at(now, config.prediction.movement_delta())?;
    let status = TideStatus {
        state: TideState::from_movement(movement),
        movement,
    };

    // Window starts at the previous whole hour so chart ticks line up
    let start = now.duration_trunc(Duration::hours(1))?;
    let series: Vec<TidePoint> = model
        .series(start, config.prediction.window(), config.prediction.step())?
        .collect();
    let tides = find_high_low_tides(&series);

    println!(
        "{}",
        format_summary(
            &station,
            now,
            height,
            status,
            &tides,
            &config.display,
            fallback::is_approximate(&station),
        )
    );
    println!();
    println!("{}", render_ascii(&series, &tides, now, config.display.rows));

    Ok(())
}
