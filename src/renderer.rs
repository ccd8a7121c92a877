//! # Tide Data Visualization Rendering
//!
//! Text rendering for the command-line application: an ASCII tide chart with
//! high/low markers and a short status report. Everything returns `String`s so
//! the caller decides where output goes.

use crate::config::DisplayConfig;
use crate::extrema::HighLowTides;
use crate::lunar::{illuminated_fraction, moon_age_days};
use crate::predictor::TideStatus;
use crate::{Station, TidePoint};
use chrono::{DateTime, Timelike, Utc};

/// Width reserved for the y-axis labels and axis line.
const Y_AXIS_WIDTH: usize = 6;

/// Map a height onto 0–100 between `min` and `max`, clamped.
///
/// A missing height maps to the middle of the gauge.
pub fn height_to_percentage(height: Option<f64>, min: f64, max: f64) -> f64 {
    let Some(height) = height else {
        return 50.0;
    };
    if max <= min {
        return 50.0;
    }
    ((height - min) / (max - min) * 100.0).clamp(0.0, 100.0)
}

/// Pick a y-axis label spacing that gives a handful of labels.
fn label_step(range: f64) -> f64 {
    if range > 4.0 {
        1.0
    } else if range > 1.0 {
        0.5
    } else if range > 0.4 {
        0.1
    } else {
        0.05
    }
}

/// Render `series` as a terminal chart, one column per sample.
///
/// Highs are drawn as `H`, lows as `L`, and the sample nearest `now` as `X`
/// when `now` falls inside the series. Returns an empty string for an empty
/// series.
pub fn render_ascii(
    series: &[TidePoint],
    tides: &HighLowTides,
    now: DateTime<Utc>,
    rows: usize,
) -> String {
    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        return String::new();
    };
    let rows = rows.max(2);

    let (min_height, max_height) = series
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), p| {
            (min.min(p.height), max.max(p.height))
        });
    let range = max_height - min_height;

    let height_to_row = |height: f64| {
        let normalized = if range > 0.0 {
            (height - min_height) / range
        } else {
            0.5
        };
        ((1.0 - normalized) * (rows as f64 - 1.0)).round() as usize
    };

    let mut grid = vec![vec![' '; series.len() + Y_AXIS_WIDTH]; rows];

    // Y-axis labels in meters
    let step = label_step(range);
    let mut label_height = (min_height / step).ceil() * step;
    while label_height <= max_height {
        let row = height_to_row(label_height);
        let label = format!("{:<width$.2}", label_height, width = Y_AXIS_WIDTH - 1);
        for (i, ch) in label.chars().take(Y_AXIS_WIDTH - 1).enumerate() {
            grid[row][i] = ch;
        }
        label_height += step;
    }
    for row in grid.iter_mut() {
        row[Y_AXIS_WIDTH - 1] = '│';
    }

    let now_index = if first.time <= now && now <= last.time {
        series
            .iter()
            .enumerate()
            .min_by_key(|(_, p)| (p.time - now).num_milliseconds().abs())
            .map(|(i, _)| i)
    } else {
        None
    };

    for (column, point) in series.iter().enumerate() {
        let glyph = if Some(column) == now_index {
            'X'
        } else if tides.highs.iter().any(|h| h.time == point.time) {
            'H'
        } else if tides.lows.iter().any(|l| l.time == point.time) {
            'L'
        } else {
            '•'
        };
        grid[height_to_row(point.height)][column + Y_AXIS_WIDTH] = glyph;
    }

    let mut lines: Vec<String> = grid.into_iter().map(|row| row.into_iter().collect()).collect();

    // Hour ticks below the chart
    let padding = " ".repeat(Y_AXIS_WIDTH);
    let ticks: String = series
        .iter()
        .map(|p| if p.time.minute() == 0 && p.time.second() == 0 { '|' } else { ' ' })
        .collect();
    lines.push(format!("{padding}{ticks}"));

    let start_label = first.time.format("%H:%M").to_string();
    let end_label = last.time.format("%H:%M UTC").to_string();
    let gap = series
        .len()
        .saturating_sub(start_label.len() + end_label.len())
        .max(1);
    lines.push(format!(
        "{padding}{start_label}{}{end_label}",
        " ".repeat(gap)
    ));

    lines.join("\n")
}

/// Short status report for the current instant.
///
/// Approximate reports add a moon line for judging the spring/neap cycle.
pub fn format_summary(
    station: &Station,
    now: DateTime<Utc>,
    height: f64,
    status: TideStatus,
    tides: &HighLowTides,
    display: &DisplayConfig,
    approximate: bool,
) -> String {
    let mut lines = Vec::new();

    let marker = if approximate { "  ⚠ APPROXIMATE" } else { "" };
    lines.push(format!("Station:   {} ({}){}", station.name, station.id, marker));
    lines.push(format!("Time:      {}", now.format("%Y-%m-%d %H:%M UTC")));

    let percent = height_to_percentage(Some(height), display.min_height_m, display.max_height_m);
    lines.push(format!("Height:    {height:.2} m ({percent:.0}%)"));
    lines.push(format!(
        "State:     {} {} ({:+.3} m/h)",
        status.state,
        status.state.arrow(),
        status.movement
    ));

    let describe = |point: Option<&TidePoint>| match point {
        Some(p) => format!("{}  {:.2} m", p.time.format("%Y-%m-%d %H:%M UTC"), p.height),
        None => "none in window".to_string(),
    };
    lines.push(format!("Next high: {}", describe(tides.next_high_after(now))));
    lines.push(format!("Next low:  {}", describe(tides.next_low_after(now))));

    if approximate {
        lines.push(format!(
            "Moon:      {:.1} days old, {:.0}% illuminated",
            moon_age_days(now),
            illuminated_fraction(now) * 100.0
        ));
    }

    lines.join("\n")
}
