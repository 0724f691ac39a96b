use std::error::Error;
use std::fmt;

/// Errors raised while *constructing* core values (filters, inventory).
/// Per-field parse failures inside a report are never represented here —
/// they resolve to `None` on the affected attribute, per the decoder's
/// error-handling design.
#[derive(Debug)]
pub enum DecodeError {
    /// a country code in the allow-list was not exactly two letters
    InvalidCountryCode(String),
    /// the compiled country-allow pattern failed to build
    InvalidCountryPattern(regex::Error),
}

impl Error for DecodeError {}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DecodeError::InvalidCountryCode(code) => {
                write!(f, "<InvalidCountryCode: '{code}' is not a two-letter WMO country code>")
            }
            DecodeError::InvalidCountryPattern(e) => {
                write!(f, "<InvalidCountryPattern: {e}>")
            }
        }
    }
}

impl From<regex::Error> for DecodeError {
    fn from(e: regex::Error) -> Self {
        DecodeError::InvalidCountryPattern(e)
    }
}
