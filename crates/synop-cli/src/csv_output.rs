//! CSV output driver (`spec.md` §6), reproducing
//! `original_source/output.py`'s `writeCsvOutput` column order. Only the
//! first precipitation reading is written; a report can carry several
//! (section 1 plus climatological), but CSV has no room for more than
//! one.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use synop::decode::ModifierKind;
use synop::store::StoredObservation;

use crate::error::CliError;

type Key = (String, DateTime<Utc>);

#[derive(Serialize)]
struct Row {
    bulletin_id: String,
    bulletin_issuer: String,
    station_id: String,
    timestamp: DateTime<Utc>,
    modifier_type: Option<&'static str>,
    modifier_sequence: Option<char>,
    temperature: Option<f64>,
    dew_point_temperature: Option<f64>,
    rel_humidity: Option<f64>,
    wind_direction: Option<u16>,
    wind_speed: Option<f64>,
    gust_speed: Option<f64>,
    station_pressure: Option<f64>,
    pressure: Option<f64>,
    cloud_cover: Option<u8>,
    sun_duration: Option<f64>,
    precipitation_amount: Option<f64>,
    precipitation_duration: Option<f64>,
    current_weather: Option<u8>,
    snow_depth: Option<f64>,
}

fn modifier_label(kind: ModifierKind) -> &'static str {
    match kind {
        ModifierKind::Amendment => "AA",
        ModifierKind::Correction => "CC",
        ModifierKind::Additional => "RR",
    }
}

pub fn write(path: &Path, primary: &BTreeMap<Key, StoredObservation>) -> Result<(), CliError> {
    let mut writer = csv::Writer::from_path(path)?;
    for stored in primary.values() {
        let observation = &stored.observation;
        let precipitation = observation.precipitation.first();
        writer.serialize(Row {
            bulletin_id: observation.bulletin_id.clone(),
            bulletin_issuer: observation.bulletin_issuer.clone(),
            station_id: observation.station_id.clone(),
            timestamp: observation.timestamp,
            modifier_type: observation.modifier.map(|m| modifier_label(m.kind)),
            modifier_sequence: observation.modifier.map(|m| m.sequence),
            temperature: observation.temperature,
            dew_point_temperature: observation.dew_point_temperature,
            rel_humidity: observation.rel_humidity,
            wind_direction: observation.wind_direction,
            wind_speed: observation.wind_speed,
            gust_speed: observation.gust_speed,
            station_pressure: observation.station_pressure,
            pressure: observation.pressure,
            cloud_cover: observation.cloud_cover,
            sun_duration: observation.sun_duration,
            precipitation_amount: precipitation.map(|p| p.amount_mm),
            precipitation_duration: precipitation.and_then(|p| p.duration_h),
            current_weather: observation.current_weather,
            snow_depth: observation.snow_depth,
        })?;
    }
    writer.flush().map_err(|e| CliError::Csv(csv::Error::from(e)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use synop::decode::{Modifier, Observation};
    use synop::precip::Precipitation;

    fn observation() -> Observation {
        Observation {
            station_id: "10384".to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 6, 3, 12, 0, 0).unwrap(),
            bulletin_id: "SMAA01".to_string(),
            bulletin_issuer: "EDZW".to_string(),
            modifier: Some(Modifier { kind: ModifierKind::Correction, sequence: 'B' }),
            temperature: Some(23.0),
            dew_point_temperature: Some(21.5),
            rel_humidity: None,
            wind_direction: Some(100),
            wind_speed: Some(10.0),
            gust_speed: None,
            station_pressure: Some(1012.3),
            pressure: None,
            cloud_cover: None,
            sun_duration: None,
            current_weather: None,
            snow_depth: None,
            precipitation: vec![Precipitation { amount_mm: 5.0, duration_h: Some(6.0) }],
        }
    }

    #[test]
    fn writes_header_and_one_row_per_observation() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("synop-cli-csv-test-{}.csv", std::process::id()));

        let mut primary = BTreeMap::new();
        let observation = observation();
        primary.insert(
            (observation.station_id.clone(), observation.timestamp),
            StoredObservation {
                observation,
                correction_sequence: Some('B'),
                amendment_sequence: None,
            },
        );

        write(&path, &primary).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let mut lines = contents.lines();
        assert_eq!(
            lines.next().unwrap(),
            "bulletin_id,bulletin_issuer,station_id,timestamp,modifier_type,modifier_sequence,temperature,dew_point_temperature,rel_humidity,wind_direction,wind_speed,gust_speed,station_pressure,pressure,cloud_cover,sun_duration,precipitation_amount,precipitation_duration,current_weather,snow_depth"
        );
        let row = lines.next().unwrap();
        assert!(row.contains("SMAA01"));
        assert!(row.contains("CC,B"));
        assert!(row.contains("5,6"));
    }
}
