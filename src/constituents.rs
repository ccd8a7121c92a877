//! # Tidal Constituent Speeds
//!
//! Fixed table of the standard tidal constituents understood by the predictor.
//! Speeds are physical constants (degrees per hour) and never come from station
//! data; stations only carry the amplitude and phase for each name.
//!
//! ## Families
//! - **Semidiurnal**: two cycles per day (M2, S2, N2, ...)
//! - **Diurnal**: one cycle per day (K1, O1, P1, ...)
//! - **Shallow water**: overtides and compound tides (M4, MS4, ...)
//! - **Long period**: fortnightly to annual (MF, MM, SA, ...)
//!
//! Lookups are exact and case-sensitive, matching the keys used in station
//! catalogs. Names missing from the table are simply not known here; callers
//! decide whether to skip them.

use serde::Serialize;

/// Broad period class of a constituent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstituentFamily {
    Semidiurnal,
    Diurnal,
    ShallowWater,
    LongPeriod,
}

/// Static description of a known constituent.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ConstituentInfo {
    /// Standard constituent name (e.g. "M2")
    pub name: &'static str,
    /// Angular speed in degrees per hour
    pub speed: f64,
    pub family: ConstituentFamily,
}

impl ConstituentInfo {
    const fn new(name: &'static str, speed: f64, family: ConstituentFamily) -> Self {
        Self {
            name,
            speed,
            family,
        }
    }

    /// Period of one full cycle in hours.
    pub fn period_hours(&self) -> f64 {
        360.0 / self.speed
    }
}

use ConstituentFamily::{Diurnal, LongPeriod, Semidiurnal, ShallowWater};

/// Principal lunar semidiurnal speed, degrees per hour.
pub const M2_SPEED: f64 = 28.984_104_2;

/// Principal solar semidiurnal speed, degrees per hour.
pub const S2_SPEED: f64 = 30.0;

/// Every constituent the predictor recognises.
pub const CONSTITUENTS: &[ConstituentInfo] = &[
    // Semidiurnal
    ConstituentInfo::new("M2", M2_SPEED, Semidiurnal), // principal lunar
    ConstituentInfo::new("S2", S2_SPEED, Semidiurnal), // principal solar
    ConstituentInfo::new("N2", 28.439_729_5, Semidiurnal), // larger lunar elliptic
    ConstituentInfo::new("K2", 30.082_137_3, Semidiurnal), // lunisolar
    ConstituentInfo::new("L2", 29.528_478_9, Semidiurnal), // smaller lunar elliptic
    ConstituentInfo::new("T2", 29.958_933_3, Semidiurnal), // larger solar elliptic
    // Diurnal
    ConstituentInfo::new("K1", 15.041_068_6, Diurnal),
    ConstituentInfo::new("O1", 13.943_035_6, Diurnal),
    ConstituentInfo::new("P1", 14.958_931_4, Diurnal),
    ConstituentInfo::new("Q1", 13.398_660_9, Diurnal),
    ConstituentInfo::new("J1", 15.585_443_3, Diurnal),
    ConstituentInfo::new("OO1", 16.139_101_7, Diurnal),
    // Shallow water
    ConstituentInfo::new("M4", 57.968_208_4, ShallowWater),
    ConstituentInfo::new("M6", 86.952_312_7, ShallowWater),
    ConstituentInfo::new("M8", 115.936_416_9, ShallowWater),
    ConstituentInfo::new("MK3", 44.025_172_9, ShallowWater),
    ConstituentInfo::new("S4", 60.0, ShallowWater),
    ConstituentInfo::new("MN4", 57.423_833_7, ShallowWater),
    ConstituentInfo::new("MS4", 58.984_104_2, ShallowWater),
    // Long period
    ConstituentInfo::new("MM", 0.544_374_7, LongPeriod),
    ConstituentInfo::new("SSA", 0.082_137_3, LongPeriod),
    ConstituentInfo::new("SA", 0.041_068_6, LongPeriod),
    ConstituentInfo::new("MSF", 1.015_895_8, LongPeriod),
    ConstituentInfo::new("MF", 1.098_033_1, LongPeriod),
    // Additional
    ConstituentInfo::new("NU2", 28.512_583_1, Semidiurnal), // larger lunar evectional
    ConstituentInfo::new("LAM2", 29.455_625_3, Semidiurnal), // smaller lunar evectional
    ConstituentInfo::new("MU2", 27.968_208_4, Semidiurnal), // variational
    ConstituentInfo::new("2N2", 27.895_354_8, Semidiurnal),
    ConstituentInfo::new("2SM2", 31.015_895_8, ShallowWater),
];

/// Look up a constituent by its exact name.
pub fn lookup(name: &str) -> Option<&'static ConstituentInfo> {
    CONSTITUENTS.iter().find(|info| info.name == name)
}

/// Angular speed in degrees per hour, or `None` for an unknown name.
///
/// # Example
/// ```
/// use tide_harmonic::constituents::speed_of;
///
/// assert_eq!(speed_of("S2"), Some(30.0));
/// assert_eq!(speed_of("FAKE99"), None);
/// ```
pub fn speed_of(name: &str) -> Option<f64> {
    lookup(name).map(|info| info.speed)
}
