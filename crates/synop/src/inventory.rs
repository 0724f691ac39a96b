//! Station inventory (C5): a read-only lookup of elevation, latitude and
//! names by WMO station number.
//!
//! Loading the backing CSV is an external collaborator's job (`spec.md`
//! §1); this module only holds the map and the lookup, built from
//! already-parsed [`Station`] records.

use std::collections::HashMap;

/// One row of the station-inventory CSV, keyed externally by `wmo`.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub wmo: String,
    pub icao: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub ele: Option<f64>,
    pub name: String,
    pub int_name: String,
}

/// Read-only WMO-number-keyed station catalog.
#[derive(Debug, Clone, Default)]
pub struct StationInventory {
    stations: HashMap<String, Station>,
}

impl StationInventory {
    pub fn empty() -> Self {
        StationInventory {
            stations: HashMap::new(),
        }
    }

    /// Build an inventory from already-parsed records. A later record
    /// for the same `wmo` overwrites an earlier one.
    pub fn from_records(records: impl IntoIterator<Item = Station>) -> Self {
        let stations = records.into_iter().map(|s| (s.wmo.clone(), s)).collect();
        StationInventory { stations }
    }

    pub fn get(&self, wmo: &str) -> Option<&Station> {
        self.stations.get(wmo)
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(wmo: &str) -> Station {
        Station {
            wmo: wmo.to_string(),
            icao: "EDZW".to_string(),
            lat: Some(50.1),
            lon: Some(8.6),
            ele: Some(112.0),
            name: "Example".to_string(),
            int_name: "Example".to_string(),
        }
    }

    #[test]
    fn missing_station_is_none() {
        let inv = StationInventory::empty();
        assert!(inv.get("10384").is_none());
    }

    #[test]
    fn lookup_by_wmo() {
        let inv = StationInventory::from_records([station("10384")]);
        assert_eq!(inv.get("10384").unwrap().ele, Some(112.0));
        assert_eq!(inv.len(), 1);
    }
}
