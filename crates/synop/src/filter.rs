//! Filter policy (C7): the country allow-list that shapes the bulletin
//! header regex, and the station allow-set consulted when splitting a
//! bulletin into station subsections.

use std::collections::HashSet;

use regex::Regex;

use crate::error::DecodeError;

/// Admission policy for bulletins and station reports.
///
/// Built once per run and threaded immutably through decoding via
/// [`crate::decode::DecoderContext`] — see `spec.md` §9's "global mutable
/// configuration" redesign note.
#[derive(Debug, Clone)]
pub struct Filters {
    country_pattern: String,
    header_pattern: Regex,
    stations: HashSet<u32>,
}

fn compile_header_pattern(country_pattern: &str) -> Result<Regex, DecodeError> {
    Ok(Regex::new(&format!(
        "^(S[IMN](?:{country_pattern})[0-9]{{2}}) ([A-Z]{{4}})"
    ))?)
}

impl Filters {
    /// `countries`: two-letter WMO country codes to admit; `None` or an
    /// empty list admits any country. `stations`: WMO numbers to admit;
    /// `None` or empty admits any station.
    pub fn new(
        countries: Option<Vec<String>>,
        stations: Option<Vec<u32>>,
    ) -> Result<Self, DecodeError> {
        let country_pattern = match countries {
            Some(list) if !list.is_empty() => {
                for code in &list {
                    if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
                        return Err(DecodeError::InvalidCountryCode(code.clone()));
                    }
                }
                list.join("|")
            }
            _ => "[A-Z]{2}".to_string(),
        };

        // Validate eagerly so a bad filter file fails at construction,
        // not on the first bulletin.
        let header_pattern = compile_header_pattern(&country_pattern)?;

        Ok(Filters {
            country_pattern,
            header_pattern,
            stations: stations.unwrap_or_default().into_iter().collect(),
        })
    }

    /// An allow-all policy: any country, any station.
    pub fn allow_all() -> Self {
        let country_pattern = "[A-Z]{2}".to_string();
        let header_pattern = compile_header_pattern(&country_pattern)
            .expect("the built-in country pattern always compiles");
        Filters {
            country_pattern,
            header_pattern,
            stations: HashSet::new(),
        }
    }

    /// The regex alternation used as the `<country-alt>` slot of the
    /// bulletin header pattern.
    pub fn country_pattern(&self) -> &str {
        &self.country_pattern
    }

    /// The full bulletin header pattern: `S[IMN]<country-alt>[0-9]{2} [A-Z]{4}`,
    /// capturing the `TTAAii` prefix and the `CCCC` issuer.
    pub fn header_pattern(&self) -> &Regex {
        &self.header_pattern
    }

    /// Whether a station's WMO number is admitted. An empty allow-set
    /// admits every station.
    pub fn station_allowed(&self, wmo: u32) -> bool {
        self.stations.is_empty() || self.stations.contains(&wmo)
    }
}
