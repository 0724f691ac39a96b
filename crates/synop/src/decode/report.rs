//! SYNOP report decoder (C3): walks a single station report left to
//! right, consuming fixed-width optional groups tagged by their leading
//! digit, and yields the typed fields of an [`super::Observation`].

use serde::Serialize;

use crate::numeric::{reduce_to_sea_level, relative_humidity};
use crate::precip::{decode_precipitation_group, Precipitation};

const KNOTS_TO_MS: f64 = 0.514444;

/// Everything C3 derives from a report body. The caller (C4) merges this
/// with the bulletin header context (station id, timestamp, modifier...)
/// to build a full [`super::Observation`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DecodedReport {
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

/// A cursor over a report body's space-delimited five-character groups.
///
/// Reifies the source's raw-offset cursor as a reader that only advances
/// when a requested tag actually matches (`spec.md` §9's "position-based
/// parsing" redesign note), making the "optional group, cursor stays put
/// on mismatch" policy explicit instead of an off-by-one hazard.
struct GroupReader<'a> {
    tokens: Vec<&'a str>,
    pos: usize,
}

impl<'a> GroupReader<'a> {
    fn new(body: &'a str) -> Self {
        GroupReader {
            tokens: body.split_whitespace().collect(),
            pos: 0,
        }
    }

    /// Consume and return the next group regardless of its tag.
    fn take_any(&mut self) -> Option<&'a str> {
        let token = self.tokens.get(self.pos).copied();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Consume and return the next group only if its first character is
    /// `tag`; otherwise leave the cursor untouched.
    fn take_tagged(&mut self, tag: char) -> Option<&'a str> {
        match self.tokens.get(self.pos) {
            Some(token) if token.starts_with(tag) => {
                self.pos += 1;
                Some(token)
            }
            _ => None,
        }
    }

    fn peek(&self) -> Option<&'a str> {
        self.tokens.get(self.pos).copied()
    }

    /// Advance past every group for which `pred` holds.
    fn skip_while(&mut self, pred: impl Fn(&str) -> bool) {
        while let Some(token) = self.peek() {
            if pred(token) {
                self.pos += 1;
            } else {
                break;
            }
        }
    }
}

fn split_sections(body: &str) -> (&str, &str) {
    match body.split_once(" 333 ") {
        Some((land, rest)) => match rest.find(" 555 ") {
            Some(idx) => (land, &rest[..idx]),
            None => (land, rest),
        },
        None => (body, ""),
    }
}

fn leading_digit_below(token: &str, bound: char) -> bool {
    token
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() && c < bound)
}

/// Apply the wind-indicator unit conversion (knots -> m/s) and the
/// "no indicator" nulling rule shared by wind speed and gust speed.
fn apply_wind_indicator(speed: Option<f64>, wind_indicator: i8) -> Option<f64> {
    if wind_indicator == -1 {
        return None;
    }
    if wind_indicator == 3 || wind_indicator == 4 {
        return speed.map(|v| (v * KNOTS_TO_MS * 100.0).round() / 100.0);
    }
    speed
}

/// Read a two-group wind/gust speed value that may carry a three-digit
/// extension (`99` followed by a `00fff` group), returning the raw speed
/// (before indicator-based unit conversion) and whether an extension
/// group was consumed.
fn read_extended_speed(reader: &mut GroupReader, raw: Option<u32>) -> Option<f64> {
    match raw {
        Some(99) => match reader.peek() {
            Some(next) if next.starts_with("00") && next.len() == 5 => {
                reader.take_any();
                next.get(2..5).and_then(|s| s.parse::<u32>().ok()).map(|v| v as f64)
            }
            _ => Some(99.0),
        },
        Some(v) => Some(v as f64),
        None => None,
    }
}

/// Decode a station report body (everything after the `IIiii` station
/// number) into its typed fields.
///
/// `wind_indicator` is the `iw` digit from the bulletin's `YYGGi` group
/// (`-1` means unknown, nulling all wind/gust fields). `elevation` and
/// `latitude` come from the station inventory and gate the sea-level
/// pressure reduction.
pub fn decode_report(
    body: &str,
    wind_indicator: i8,
    elevation: Option<f64>,
    latitude: Option<f64>,
) -> DecodedReport {
    let (land, clim) = split_sections(body);
    let mut out = DecodedReport::default();
    let mut reader = GroupReader::new(land);

    // iihVV: precipitation/weather indicator, cloud base and visibility
    // (the latter two are not part of the persisted record).
    let precipitation_indicator = reader.take_any().and_then(|g| g.chars().next());

    // Nddff: cloud cover, wind direction and speed.
    if let Some(group) = reader.take_any() {
        out.cloud_cover = match group.chars().next() {
            Some('/') | None => None,
            Some(c) => c.to_digit(10).map(|d| d as u8),
        };
        out.wind_direction = group
            .get(1..3)
            .and_then(|s| s.parse::<u16>().ok())
            .map(|d| d * 10);

        let raw_speed = group.get(3..5).and_then(|s| s.parse::<u32>().ok());
        let speed = read_extended_speed(&mut reader, raw_speed);
        out.wind_speed = apply_wind_indicator(speed, wind_indicator);
        if wind_indicator == -1 {
            out.wind_direction = None;
        }
    }

    // 1sTTT: temperature.
    if let Some(group) = reader.take_tagged('1') {
        out.temperature = decode_signed_tenths(group);
    }

    // 2sTTT (or 29UUU): dew point, or relative humidity reported directly.
    if let Some(group) = reader.take_tagged('2') {
        match group.get(1..2) {
            Some("9") => {
                out.rel_humidity = group.get(2..5).and_then(|s| s.parse::<f64>().ok());
            }
            _ => {
                out.dew_point_temperature = decode_signed_tenths(group);
                out.rel_humidity =
                    relative_humidity(out.temperature, out.dew_point_temperature)
                        .map(|v| (v * 10.0).round() / 10.0);
            }
        }
    }

    // 3PPPP: station pressure, and its reduction to sea level.
    if let Some(group) = reader.take_tagged('3') {
        out.station_pressure = decode_station_pressure(group);
        out.pressure = reduce_to_sea_level(
            out.station_pressure,
            out.temperature,
            elevation,
            latitude,
        );
    }

    // 4PPPP: alternate reduced pressure. Skipped: a consistent QFF/QNH
    // reduction is recomputed above instead (spec.md §1).
    reader.take_tagged('4');

    // 5appp: pressure tendency. Unused.
    reader.take_tagged('5');

    // 6RRRt: precipitation for section 1.
    match precipitation_indicator {
        Some('3') => out.precipitation.push(Precipitation {
            amount_mm: 0.0,
            duration_h: None,
        }),
        Some('4') => out.precipitation.clear(),
        _ => {}
    }
    if let Some(group) = reader.take_tagged('6') {
        out.precipitation = decode_precipitation_group(group).into_iter().collect();
    }

    // 7wwWW: present weather. Past weather (WW) is discarded, matching
    // the source's behavior of never reading it (spec.md §9).
    if let Some(group) = reader.take_tagged('7') {
        out.current_weather = group.get(1..3).and_then(|s| s.parse::<u8>().ok());
    }

    // 8NCCC, 9GGgg: cloud type and observation time. Unused.

    decode_climatological_section(clim, wind_indicator, &mut out);

    out
}

fn decode_signed_tenths(group: &str) -> Option<f64> {
    let sign = group.get(1..2)?;
    if sign == "/" {
        return None;
    }
    let value: f64 = group.get(2..5)?.parse().ok()?;
    let value = value / 10.0;
    Some(if sign == "1" { -value } else { value })
}

fn decode_station_pressure(group: &str) -> Option<f64> {
    let value = if group.get(4..5) == Some("/") {
        group.get(1..4)?.parse::<f64>().ok()?
    } else {
        group.get(1..5)?.parse::<f64>().ok()? / 10.0
    };
    Some(if value < 200.0 { value + 1000.0 } else { value })
}

fn decode_climatological_section(
    clim: &str,
    wind_indicator: i8,
    out: &mut DecodedReport,
) {
    let mut reader = GroupReader::new(clim);
    if reader.peek().is_none() {
        return;
    }

    reader.skip_while(|t| leading_digit_below(t, '4'));

    // 4Esss: snow depth.
    if let Some(group) = reader.take_tagged('4') {
        out.snow_depth = group
            .get(2..5)
            .and_then(|s| s.parse::<u32>().ok())
            .map(|raw| match raw {
                997 => Some(0.5),
                998 => Some(0.01),
                999 => None,
                other => Some(other as f64),
            })
            .unwrap_or(None);
    }

    // 55SSS (daily sunshine, omitted) / 553SS (sunshine in the last hour).
    reader.skip_while(|t| leading_digit_below(t, '6') && !t.starts_with("553"));
    if let Some(group) = reader.peek().filter(|t| t.starts_with("553")) {
        reader.take_any();
        out.sun_duration = group.get(3..5).and_then(|s| s.parse::<f64>().ok()).map(|v| v / 10.0);
    }

    // 6RRRt: precipitation (appended to the section-1 reading, if any).
    reader.skip_while(|t| leading_digit_below(t, '6'));
    if let Some(group) = reader.take_tagged('6') {
        if let Some(p) = decode_precipitation_group(group) {
            out.precipitation.push(p);
        }
    }

    // 7RRRR: 24h precipitation total. Unused.
    reader.skip_while(|t| leading_digit_below(t, '9'));

    // 910ff: highest 10-minute gust.
    reader.skip_while(|t| t.starts_with('9') && !t.starts_with("910"));
    if let Some(group) = reader.peek().filter(|t| t.starts_with("910")) {
        reader.take_any();
        let raw_gust = group.get(3..5).and_then(|s| s.parse::<u32>().ok());
        let speed = read_extended_speed(&mut reader, raw_gust);
        out.gust_speed = apply_wind_indicator(speed, wind_indicator);
    }
    // 911ff: highest gust during the past-weather period. Unused.
}
