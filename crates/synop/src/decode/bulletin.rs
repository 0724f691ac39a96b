//! Bulletin decoder (C4): parses the WMO abbreviated header, fans out to
//! per-station report bodies, and reconstructs each observation's
//! timestamp from the bulletin's day/hour digits and the context's base
//! date.

use chrono::{Datelike, NaiveDate, TimeZone, Utc};

use super::report::decode_report;
use super::{DecoderContext, Modifier, ModifierKind, Observation};

/// Decode one bulletin string (the text between two `####<9 digits>####`
/// separator lines) into its admitted land-station observations.
///
/// Non-SYNOP headers, non-land bulletins, and stations excluded by the
/// country/station filters are silently dropped; only administrative
/// rejections are logged (`spec.md` §7.2).
pub fn decode_bulletin(bulletin: &str, ctx: &DecoderContext) -> Vec<Observation> {
    let Some(captures) = ctx.filters.header_pattern().captures(bulletin) else {
        tracing::debug!("discarding non-SYNOP/METAR/TEMP or geographically irrelevant bulletin");
        return Vec::new();
    };

    let bulletin_id = captures[1].to_string();
    let bulletin_issuer = captures[2].to_string();

    // Consume TTAAii CCCC YYGGgg (18 characters) plus the separating space.
    let Some(rest) = bulletin.get(19..) else {
        return Vec::new();
    };

    let (modifier, rest) = take_modifier(rest);

    decode_land_stations(rest, ctx, &bulletin_id, &bulletin_issuer, modifier)
}

fn take_modifier(bulletin: &str) -> (Option<Modifier>, &str) {
    let Some(prefix) = bulletin.get(0..4) else {
        return (None, bulletin);
    };
    let mut chars = prefix.chars();
    let tag: String = chars.by_ref().take(2).collect();
    let Some(kind) = ModifierKind::from_tag(&tag) else {
        return (None, bulletin);
    };
    let sequence = chars.next();
    if chars.next() != Some(' ') {
        return (None, bulletin);
    }
    match sequence {
        Some(sequence) if sequence.is_ascii_uppercase() => {
            (Some(Modifier { kind, sequence }), &bulletin[4..])
        }
        _ => (None, bulletin),
    }
}

fn decode_land_stations(
    bulletin: &str,
    ctx: &DecoderContext,
    bulletin_id: &str,
    bulletin_issuer: &str,
    modifier: Option<Modifier>,
) -> Vec<Observation> {
    // `XX` occurs once per `AAXX` land-indicator group. At most one
    // occurrence means the indicator is shared by the whole bulletin;
    // more than one means every station subsection repeats its own.
    let mixed = bulletin.matches("XX").count() > 1;

    let (shared, bulletin) = if mixed {
        (None, bulletin)
    } else if !bulletin.starts_with("AAXX") {
        tracing::debug!("discarding bulletin not containing data from fixed surface land stations");
        return Vec::new();
    } else {
        match take_land_prefix(bulletin, ctx.base_date) {
            Some((prefix, rest)) => (Some(prefix), rest),
            None => return Vec::new(),
        }
    };

    let mut observations = Vec::new();
    for station in bulletin.split('=') {
        let station = station.trim();
        if station.is_empty() || station.ends_with("NIL") {
            continue;
        }

        let (wind_indicator, timestamp, body) = if mixed {
            if !station.starts_with("AAXX") {
                tracing::debug!(
                    "discarding station report not containing data from fixed surface land stations"
                );
                continue;
            }
            match take_land_prefix(station, ctx.base_date) {
                Some((prefix, rest)) => (prefix.wind_indicator, prefix.timestamp, rest),
                None => continue,
            }
        } else {
            let shared = shared.as_ref().expect("single-scope prefix was consumed above");
            (shared.wind_indicator, shared.timestamp, station)
        };

        let Some(station_id) = body.get(0..5) else {
            continue;
        };
        let Some(body) = body.get(6..) else {
            continue;
        };

        let wmo: Option<u32> = station_id.parse().ok();
        if let Some(wmo) = wmo {
            if !ctx.filters.station_allowed(wmo) {
                tracing::debug!(station_id, "discarding report from station not in the allow-list");
                continue;
            }
        }

        let station_info = ctx.inventory.get(station_id);
        let elevation = station_info.and_then(|s| s.ele);
        let latitude = station_info.and_then(|s| s.lat);

        let decoded = decode_report(body, wind_indicator, elevation, latitude);
        observations.push(Observation {
            station_id: station_id.to_string(),
            timestamp,
            bulletin_id: bulletin_id.to_string(),
            bulletin_issuer: bulletin_issuer.to_string(),
            modifier,
            temperature: decoded.temperature,
            dew_point_temperature: decoded.dew_point_temperature,
            rel_humidity: decoded.rel_humidity,
            wind_direction: decoded.wind_direction,
            wind_speed: decoded.wind_speed,
            gust_speed: decoded.gust_speed,
            station_pressure: decoded.station_pressure,
            pressure: decoded.pressure,
            cloud_cover: decoded.cloud_cover,
            sun_duration: decoded.sun_duration,
            current_weather: decoded.current_weather,
            snow_depth: decoded.snow_depth,
            precipitation: decoded.precipitation,
        });
    }

    observations
}

struct LandPrefix {
    wind_indicator: i8,
    timestamp: chrono::DateTime<Utc>,
}

/// Consume a `AAXX YYGGi ` land-indicator prefix, returning the parsed
/// wind indicator and timestamp alongside the remainder of the string.
fn take_land_prefix(text: &str, base_date: NaiveDate) -> Option<(LandPrefix, &str)> {
    let rest = text.get(4..)?; // strip "AAXX"
    let day: u32 = rest.get(1..3)?.parse().ok()?;
    let hour: u32 = rest.get(3..5)?.parse().ok()?;
    let wind_indicator: i8 = rest.get(5..6)?.parse().unwrap_or(-1);
    let timestamp = reconstruct_timestamp(base_date, day, hour)?;
    let rest = rest.get(7..)?;
    Some((
        LandPrefix {
            wind_indicator,
            timestamp,
        },
        rest,
    ))
}

/// Fix the year and month of a bare day-of-month/hour pair using the
/// supplied base date: if the report's day is after the base date's
/// day, the observation belongs to the prior month (rolling the year
/// back at January). Compared as integers, unlike the source's string
/// comparison (`spec.md` §9).
fn reconstruct_timestamp(
    base_date: NaiveDate,
    day: u32,
    hour: u32,
) -> Option<chrono::DateTime<Utc>> {
    let mut year = base_date.year();
    let mut month = base_date.month();
    if day > base_date.day() {
        if month == 1 {
            month = 12;
            year -= 1;
        } else {
            month -= 1;
        }
    }
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let naive = date.and_hms_opt(hour, 0, 0)?;
    Some(Utc.from_utc_datetime(&naive))
}
