//! Filter file (`spec.md` §6): a YAML document restricting which
//! countries' bulletins and which WMO stations are admitted.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use synop::filter::Filters;

use crate::error::CliError;

#[derive(Debug, Deserialize, Default)]
struct StationFilters {
    #[serde(default)]
    synop: Option<Vec<u32>>,
}

#[derive(Debug, Deserialize, Default)]
pub struct FilterFile {
    #[serde(default)]
    countries: Option<Vec<String>>,
    #[serde(default)]
    stations: Option<StationFilters>,
}

impl FilterFile {
    /// The allow-all filter policy, used when no `-f/--filter` is given.
    pub fn allow_all() -> Filters {
        Filters::allow_all()
    }

    pub fn read(path: &Path) -> Result<Filters, CliError> {
        let text = fs::read_to_string(path).map_err(CliError::FilterFile)?;
        let parsed: FilterFile = serde_yaml::from_str(&text)?;
        let stations = parsed.stations.and_then(|s| s.synop);
        Ok(Filters::new(parsed.countries, stations)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_countries_and_stations() {
        let yaml = "countries: [DE, FR]\nstations:\n  synop: [10384, 10385]\n";
        let parsed: FilterFile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(parsed.countries, Some(vec!["DE".to_string(), "FR".to_string()]));
        assert_eq!(parsed.stations.unwrap().synop, Some(vec![10384, 10385]));
    }

    #[test]
    fn empty_document_admits_everything() {
        let parsed: FilterFile = serde_yaml::from_str("{}").unwrap();
        assert!(parsed.countries.is_none());
        assert!(parsed.stations.is_none());
    }
}
