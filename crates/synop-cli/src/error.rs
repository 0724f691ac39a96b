use std::error::Error;
use std::fmt;

/// Fatal setup errors (`spec.md` §7.1): the run is aborted before any
/// bulletin is decoded.
#[derive(Debug)]
pub enum CliError {
    StationInventory(std::io::Error),
    FilterFile(std::io::Error),
    FilterFileFormat(serde_yaml::Error),
    Input(std::io::Error),
    InputGlob(glob::PatternError),
    BaseDate(chrono::ParseError),
    Output(rusqlite::Error),
    Csv(csv::Error),
    Decode(synop::error::DecodeError),
}

impl Error for CliError {}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CliError::StationInventory(e) => {
                write!(f, "<StationInventory: could not read station inventory: {e}>")
            }
            CliError::FilterFile(e) => {
                write!(f, "<FilterFile: could not read filter file: {e}>")
            }
            CliError::FilterFileFormat(e) => {
                write!(f, "<FilterFileFormat: invalid filter YAML: {e}>")
            }
            CliError::Input(e) => write!(f, "<Input: could not read input: {e}>"),
            CliError::InputGlob(e) => write!(f, "<InputGlob: invalid glob pattern: {e}>"),
            CliError::BaseDate(e) => write!(f, "<BaseDate: could not parse base date: {e}>"),
            CliError::Output(e) => write!(f, "<Output: sqlite output failed: {e}>"),
            CliError::Csv(e) => write!(f, "<Csv: CSV output failed: {e}>"),
            CliError::Decode(e) => write!(f, "<Decode: {e}>"),
        }
    }
}

impl From<serde_yaml::Error> for CliError {
    fn from(e: serde_yaml::Error) -> Self {
        CliError::FilterFileFormat(e)
    }
}

impl From<glob::PatternError> for CliError {
    fn from(e: glob::PatternError) -> Self {
        CliError::InputGlob(e)
    }
}

impl From<chrono::ParseError> for CliError {
    fn from(e: chrono::ParseError) -> Self {
        CliError::BaseDate(e)
    }
}

impl From<rusqlite::Error> for CliError {
    fn from(e: rusqlite::Error) -> Self {
        CliError::Output(e)
    }
}

impl From<csv::Error> for CliError {
    fn from(e: csv::Error) -> Self {
        CliError::Csv(e)
    }
}

impl From<synop::error::DecodeError> for CliError {
    fn from(e: synop::error::DecodeError) -> Self {
        CliError::Decode(e)
    }
}
