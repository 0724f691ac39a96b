//! Station inventory CSV reader (`spec.md` §6): header row with at least
//! `wmo, icao, lat, lon, ele, name, int_name`.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use synop::inventory::{Station, StationInventory};

use crate::error::CliError;

#[derive(Debug, Deserialize)]
struct StationRecord {
    wmo: String,
    icao: String,
    lat: Option<f64>,
    lon: Option<f64>,
    ele: Option<f64>,
    name: String,
    int_name: String,
}

impl From<StationRecord> for Station {
    fn from(record: StationRecord) -> Self {
        Station {
            wmo: record.wmo,
            icao: record.icao,
            lat: record.lat,
            lon: record.lon,
            ele: record.ele,
            name: record.name,
            int_name: record.int_name,
        }
    }
}

pub fn read(path: &Path) -> Result<StationInventory, CliError> {
    let file = File::open(path).map_err(CliError::StationInventory)?;
    parse(file)
}

fn parse(source: impl Read) -> Result<StationInventory, CliError> {
    let mut reader = csv::Reader::from_reader(source);
    let mut stations = Vec::new();
    for record in reader.deserialize() {
        let record: StationRecord = record?;
        stations.push(Station::from(record));
    }
    Ok(StationInventory::from_records(stations))
}
