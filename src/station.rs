//! Tide station records as they appear in a station catalog.
//!
//! A catalog is a JSON array of objects shaped like:
//!
//! ```json
//! {
//!   "id": "FREMANTLE",
//!   "name": "Fremantle",
//!   "latitude": -32.05,
//!   "longitude": 115.733,
//!   "datum": 0.72,
//!   "constituents": { "M2": { "amplitude": 0.05, "phase": 280.0 } }
//! }
//! ```
//!
//! `datum` defaults to zero when absent. `constituents` is kept optional at the
//! type level so a record without it can be reported precisely instead of being
//! lost in a generic deserialization error.
//!
//! Entries for constituents outside the speed table are read leniently: one
//! that does not have the `{amplitude, phase}` shape is dropped instead of
//! failing the record. Known constituents must be well formed.

use crate::constituents::speed_of;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Station-specific amplitude and phase for one named constituent.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConstituentValue {
    /// Amplitude in meters
    pub amplitude: f64,
    /// Phase at the J2000.0 epoch in degrees
    pub phase: f64,
}

/// A physical tide observation point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: String,
    pub name: String,
    /// Degrees north, -90 to 90
    pub latitude: f64,
    /// Degrees east, -180 to 180
    pub longitude: f64,
    /// Mean water level in meters added to every prediction
    #[serde(default)]
    pub datum: f64,
    /// Constituent name → amplitude/phase. Ordered so summation order is fixed.
    #[serde(default, deserialize_with = "deserialize_constituents")]
    pub constituents: Option<BTreeMap<String, ConstituentValue>>,
}

impl Station {
    /// Build a station from an iterator of `(name, amplitude, phase)` triples.
    pub fn new<I, S>(
        id: &str,
        name: &str,
        latitude: f64,
        longitude: f64,
        datum: f64,
        constituents: I,
    ) -> Self
    where
        I: IntoIterator<Item = (S, f64, f64)>,
        S: Into<String>,
    {
        let constituents = constituents
            .into_iter()
            .map(|(name, amplitude, phase)| (name.into(), ConstituentValue { amplitude, phase }))
            .collect();

        Self {
            id: id.to_string(),
            name: name.to_string(),
            latitude,
            longitude,
            datum,
            constituents: Some(constituents),
        }
    }

    /// True when both coordinates are inside their valid ranges.
    pub fn has_valid_coordinates(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

fn deserialize_constituents<'de, D>(
    deserializer: D,
) -> Result<Option<BTreeMap<String, ConstituentValue>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<BTreeMap<String, serde_json::Value>>::deserialize(deserializer)? else {
        return Ok(None);
    };

    let mut constituents = BTreeMap::new();
    for (name, value) in raw {
        match serde_json::from_value::<ConstituentValue>(value) {
            Ok(value) => {
                constituents.insert(name, value);
            }
            Err(e) if speed_of(&name).is_some() => {
                return Err(D::Error::custom(format!("constituent '{name}': {e}")));
            }
            Err(_) => {}
        }
    }

    Ok(Some(constituents))
}
