//! Sqlite persistence driver (`spec.md` §6, plus the daily-aggregate
//! supplement from `original_source/output.py`'s `writeSqliteOutput`).

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use chrono::{DateTime, Datelike, Timelike, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use synop::decode::Observation;
use synop::inventory::StationInventory;
use synop::store::StoredObservation;

use crate::error::CliError;

type Key = (String, DateTime<Utc>);

pub fn write(
    path: &Path,
    inventory: &StationInventory,
    primary: &BTreeMap<Key, StoredObservation>,
) -> Result<(), CliError> {
    let mut connection = Connection::open(path)?;
    write_to_connection(&mut connection, inventory, primary)
}

fn write_to_connection(
    connection: &mut Connection,
    inventory: &StationInventory,
    primary: &BTreeMap<Key, StoredObservation>,
) -> Result<(), CliError> {
    create_schema(connection)?;

    let transaction = connection.transaction()?;
    {
        let mut insert_station = transaction.prepare(
            "INSERT OR IGNORE INTO station (wmo, icao, lat, lon, ele, name, int_name)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;
        let mut insert_synop = transaction.prepare(
            "INSERT OR REPLACE INTO synop (wmo, timestamp, temperature, dew_point_temperature,
                rel_humidity, wind_direction, wind_speed, gust_speed, station_pressure, pressure,
                cloud_cover, sun_duration, current_weather, snow_depth,
                correction_sequence, amendment_sequence)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        )?;

        let mut seen_stations = HashSet::new();
        for ((station_id, timestamp), stored) in primary {
            if seen_stations.insert(station_id.clone()) {
                if let Some(station) = inventory.get(station_id) {
                    insert_station.execute(params![
                        station.wmo,
                        station.icao,
                        station.lat,
                        station.lon,
                        station.ele,
                        station.name,
                        station.int_name,
                    ])?;
                }
            }

            let observation = &stored.observation;
            insert_synop.execute(params![
                station_id,
                timestamp.to_rfc3339(),
                observation.temperature,
                observation.dew_point_temperature,
                observation.rel_humidity,
                observation.wind_direction,
                observation.wind_speed,
                observation.gust_speed,
                observation.station_pressure,
                observation.pressure,
                observation.cloud_cover,
                observation.sun_duration,
                observation.current_weather,
                observation.snow_depth,
                stored.correction_sequence.map(|c| c.to_string()),
                stored.amendment_sequence.map(|c| c.to_string()),
            ])?;
        }
    }
    transaction.commit()?;

    let transaction = connection.transaction()?;
    for ((station_id, timestamp), stored) in primary {
        upsert_daily(&transaction, station_id, *timestamp, &stored.observation)?;
    }
    transaction.commit()?;

    Ok(())
}

fn create_schema(connection: &Connection) -> Result<(), CliError> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS station (
            wmo TEXT PRIMARY KEY,
            icao TEXT,
            lat REAL,
            lon REAL,
            ele REAL,
            name TEXT,
            int_name TEXT
        );
        CREATE TABLE IF NOT EXISTS synop (
            wmo TEXT,
            timestamp TEXT,
            temperature REAL,
            dew_point_temperature REAL,
            rel_humidity REAL,
            wind_direction INTEGER,
            wind_speed REAL,
            gust_speed REAL,
            station_pressure REAL,
            pressure REAL,
            cloud_cover INTEGER,
            sun_duration REAL,
            current_weather INTEGER,
            snow_depth REAL,
            correction_sequence TEXT,
            amendment_sequence TEXT,
            PRIMARY KEY(wmo, timestamp)
        );
        CREATE TABLE IF NOT EXISTS synop_daily (
            wmo TEXT,
            date TEXT,
            min_temperature REAL,
            max_temperature REAL,
            precipitation REAL,
            sun_duration REAL,
            correction_sequence TEXT,
            amendment_sequence TEXT,
            PRIMARY KEY(wmo, date)
        );",
    )?;
    Ok(())
}

/// The date an observation's daily aggregate belongs to: hours `[0, 12)`
/// fold back onto the prior day, mirroring `writeSqliteOutput`'s
/// handling of `daily_precipitation`/`daily_sun_duration`.
fn daily_date(timestamp: DateTime<Utc>) -> chrono::NaiveDate {
    if timestamp.hour() < 12 {
        timestamp.date_naive() - chrono::Duration::days(1)
    } else {
        timestamp.date_naive()
    }
}

fn upsert_daily(
    transaction: &rusqlite::Transaction,
    station_id: &str,
    timestamp: DateTime<Utc>,
    observation: &Observation,
) -> Result<(), CliError> {
    let date = daily_date(timestamp).to_string();
    let precipitation = if observation.precipitation.is_empty() {
        None
    } else {
        Some(observation.precipitation.iter().map(|p| p.amount_mm).sum())
    };

    let existing: Option<(Option<f64>, Option<f64>, Option<f64>, Option<f64>)> = transaction
        .query_row(
            "SELECT min_temperature, max_temperature, precipitation, sun_duration
             FROM synop_daily WHERE wmo = ?1 AND date = ?2",
            params![station_id, date],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
        )
        .optional()?;

    let (min_temperature, max_temperature, precipitation, sun_duration) = match existing {
        Some((min_t, max_t, stored_precip, stored_sun)) => (
            merge_min(min_t, observation.temperature),
            merge_max(max_t, observation.temperature),
            merge_sum(stored_precip, precipitation),
            observation.sun_duration.or(stored_sun),
        ),
        None => (
            observation.temperature,
            observation.temperature,
            precipitation,
            observation.sun_duration,
        ),
    };

    transaction.execute(
        "INSERT INTO synop_daily (wmo, date, min_temperature, max_temperature, precipitation, sun_duration)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(wmo, date) DO UPDATE SET
            min_temperature = excluded.min_temperature,
            max_temperature = excluded.max_temperature,
            precipitation = excluded.precipitation,
            sun_duration = excluded.sun_duration",
        params![station_id, date, min_temperature, max_temperature, precipitation, sun_duration],
    )?;
    Ok(())
}

fn merge_min(existing: Option<f64>, incoming: Option<f64>) -> Option<f64> {
    match (existing, incoming) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (Some(a), None) => Some(a),
        (None, b) => b,
    }
}

fn merge_max(existing: Option<f64>, incoming: Option<f64>) -> Option<f64> {
    match (existing, incoming) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (Some(a), None) => Some(a),
        (None, b) => b,
    }
}

fn merge_sum(existing: Option<f64>, incoming: Option<f64>) -> Option<f64> {
    match (existing, incoming) {
        (Some(a), Some(b)) => Some(a + b),
        (Some(a), None) => Some(a),
        (None, b) => b,
    }
}
