//! Decoding core: bulletin header parsing (C4), SYNOP report parsing (C3),
//! and the shared types produced along the way.

pub mod bulletin;
pub mod report;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::filter::Filters;
use crate::inventory::StationInventory;
use crate::precip::Precipitation;

/// The `BBB` bulletin modifier: amendment, correction, or additional data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ModifierKind {
    /// `AA<x>`: amendment
    Amendment,
    /// `CC<x>`: correction
    Correction,
    /// `RR<x>`: additional data (first-time insert for a new timestamp)
    Additional,
}

impl ModifierKind {
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "AA" => Some(ModifierKind::Amendment),
            "CC" => Some(ModifierKind::Correction),
            "RR" => Some(ModifierKind::Additional),
            _ => None,
        }
    }
}

/// A bulletin modifier: its kind and its single-letter sequence code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Modifier {
    pub kind: ModifierKind,
    pub sequence: char,
}

/// One decoded land-station observation (the persistent record of
/// `spec.md` §3).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    pub station_id: String,
    pub timestamp: DateTime<Utc>,
    pub bulletin_id: String,
    pub bulletin_issuer: String,
    pub modifier: Option<Modifier>,

    pub temperature: Option<f64>,
    pub dew_point_temperature: Option<f64>,
    pub rel_humidity: Option<f64>,
    pub wind_direction: Option<u16>,
    pub wind_speed: Option<f64>,
    pub gust_speed: Option<f64>,
    pub station_pressure: Option<f64>,
    pub pressure: Option<f64>,
    pub cloud_cover: Option<u8>,
    pub sun_duration: Option<f64>,
    pub current_weather: Option<u8>,
    pub snow_depth: Option<f64>,
    pub precipitation: Vec<Precipitation>,
}

/// Immutable configuration threaded through C3/C4, replacing the
/// source's process-wide mutable settings (`spec.md` §9).
pub struct DecoderContext {
    pub filters: Filters,
    pub inventory: StationInventory,
    pub base_date: chrono::NaiveDate,
}

impl DecoderContext {
    pub fn new(
        filters: Filters,
        inventory: StationInventory,
        base_date: chrono::NaiveDate,
    ) -> Self {
        DecoderContext {
            filters,
            inventory,
            base_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifier_kind_from_tag() {
        assert_eq!(ModifierKind::from_tag("AA"), Some(ModifierKind::Amendment));
        assert_eq!(ModifierKind::from_tag("CC"), Some(ModifierKind::Correction));
        assert_eq!(ModifierKind::from_tag("RR"), Some(ModifierKind::Additional));
        assert_eq!(ModifierKind::from_tag("XX"), None);
    }
}
