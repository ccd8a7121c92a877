//! # High and Low Tide Extraction
//!
//! Scans a sampled series for strict local maxima (high water) and minima
//! (low water). A sample is a high when it is greater than both neighbours and
//! a low when it is smaller than both.
//!
//! ## Resolution
//! Detection only sees the samples it is given. A turning point that falls
//! between samples is reported at the nearest sample, and a turning point
//! flattened into two equal samples (a plateau) is not reported at all. Pick a
//! step well below the shortest constituent period you care about; ten minutes
//! is fine for semidiurnal and diurnal tides.

use crate::TidePoint;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Whether an event is a high or a low.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TideEventKind {
    High,
    Low,
}

/// A single high or low water event.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TideEvent {
    pub kind: TideEventKind,
    pub time: DateTime<Utc>,
    /// Height in meters
    pub height: f64,
}

/// Highs and lows found in a series, each in chronological order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct HighLowTides {
    pub highs: Vec<TidePoint>,
    pub lows: Vec<TidePoint>,
}

impl HighLowTides {
    /// First high strictly after `instant`.
    pub fn next_high_after(&self, instant: DateTime<Utc>) -> Option<&TidePoint> {
        self.highs.iter().find(|point| point.time > instant)
    }

    /// First low strictly after `instant`.
    pub fn next_low_after(&self, instant: DateTime<Utc>) -> Option<&TidePoint> {
        self.lows.iter().find(|point| point.time > instant)
    }

    /// Highs and lows merged into one chronological list.
    pub fn events(&self) -> Vec<TideEvent> {
        let highs = self.highs.iter().map(|p| TideEvent {
            kind: TideEventKind::High,
            time: p.time,
            height: p.height,
        });
        let lows = self.lows.iter().map(|p| TideEvent {
            kind: TideEventKind::Low,
            time: p.time,
            height: p.height,
        });

        let mut events: Vec<TideEvent> = highs.chain(lows).collect();
        events.sort_by_key(|event| event.time);
        events
    }

    pub fn is_empty(&self) -> bool {
        self.highs.is_empty() && self.lows.is_empty()
    }
}

/// Find strict local maxima and minima in `series`.
///
/// Fewer than three samples yields empty lists; that is not an error, there is
/// simply nothing to compare against.
///
/// # Example
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use tide_harmonic::{extrema::find_high_low_tides, TidePoint};
///
/// let t0 = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
/// let series: Vec<TidePoint> = [0.1, 0.4, 0.2, 0.3]
///     .iter()
///     .enumerate()
///     .map(|(i, &height)| TidePoint { time: t0 + Duration::hours(i as i64), height })
///     .collect();
///
/// let tides = find_high_low_tides(&series);
/// assert_eq!(tides.highs.len(), 1);
/// assert_eq!(tides.lows.len(), 1);
/// ```
pub fn find_high_low_tides(series: &[TidePoint]) -> HighLowTides {
    let mut tides = HighLowTides::default();
    if series.len() < 3 {
        return tides;
    }

    for window in series.windows(3) {
        let (prev, current, next) = (window[0].height, window[1].height, window[2].height);

        if current > prev && current > next {
            tides.highs.push(window[1]);
        }
        if current < prev && current < next {
            tides.lows.push(window[1]);
        }
    }

    tides
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn series_from(heights: &[f64]) -> Vec<TidePoint> {
        let t0 = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        heights
            .iter()
            .enumerate()
            .map(|(i, &height)| TidePoint {
                time: t0 + Duration::minutes(10 * i as i64),
                height,
            })
            .collect()
    }

    #[test]
    fn test_short_series_has_no_extrema() {
        assert!(find_high_low_tides(&[]).is_empty());
        assert!(find_high_low_tides(&series_from(&[1.0])).is_empty());
        assert!(find_high_low_tides(&series_from(&[1.0, 2.0])).is_empty());
    }

    #[test]
    fn test_single_peak_and_trough() {
        let series = series_from(&[0.0, 1.0, 0.5, -0.5, 0.0]);
        let tides = find_high_low_tides(&series);
        assert_eq!(tides.highs, vec![series[1]]);
        assert_eq!(tides.lows, vec![series[3]]);
    }

    #[test]
    fn test_endpoints_are_never_extrema() {
        let series = series_from(&[5.0, 1.0, 2.0, 3.0, -4.0]);
        let tides = find_high_low_tides(&series);
        assert!(tides.highs.iter().all(|p| p.height != 5.0));
        assert_eq!(tides.lows, vec![series[1]]);
        assert_eq!(tides.highs, vec![series[3]]);
    }

    #[test]
    fn test_plateau_is_not_reported() {
        let series = series_from(&[0.0, 1.0, 1.0, 0.0]);
        let tides = find_high_low_tides(&series);
        assert!(tides.highs.is_empty());
        assert!(tides.lows.is_empty());
    }

    #[test]
    fn test_events_are_chronological() {
        let series = series_from(&[0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.5]);
        let events = find_high_low_tides(&series).events();
        let kinds: Vec<_> = events.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TideEventKind::High,
                TideEventKind::Low,
                TideEventKind::High,
                TideEventKind::Low,
                TideEventKind::High,
            ]
        );
        assert!(events.windows(2).all(|w| w[0].time < w[1].time));
    }

    #[test]
    fn test_next_high_and_low_after() {
        let series = series_from(&[0.0, 1.0, 0.0, 1.0, 0.0]);
        let tides = find_high_low_tides(&series);

        let next_high = tides.next_high_after(series[1].time).unwrap();
        assert_eq!(next_high.time, series[3].time);

        let next_low = tides.next_low_after(series[0].time).unwrap();
        assert_eq!(next_low.time, series[2].time);

        assert!(tides.next_high_after(series[4].time).is_none());
    }
}
