//! Input-text chunking (`spec.md` §6): whitespace normalization followed
//! by splitting on the `####[0-9]{9}####` bulletin separator.

use once_cell::sync::Lazy;
use regex::Regex;

static SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"####[0-9]{9}####").expect("fixed separator pattern compiles"));
static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("fixed whitespace pattern compiles"));

/// Flatten newlines/carriage-returns and collapse whitespace runs, then
/// split on bulletin separator lines. Empty chunks (a leading or
/// trailing separator) are dropped.
pub fn chunks(text: &str) -> Vec<String> {
    SEPARATOR
        .split(text)
        .map(|chunk| WHITESPACE.replace_all(chunk.trim(), " ").into_owned())
        .filter(|chunk| !chunk.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_separator() {
        let text = "####000000001####\nSMAA01 EDZW 031200 AAXX 03121 10384 11010=\n####000000002####\nSMAA01 EDZW 031200 AAXX 03121 10385 11020=";
        let parts = chunks(text);
        assert_eq!(parts.len(), 2);
        assert!(parts[0].starts_with("SMAA01 EDZW 031200"));
        assert!(parts[1].ends_with("10385 11020="));
    }

    #[test]
    fn collapses_interior_whitespace_and_newlines() {
        let text = "####000000001####\nSMAA01   EDZW\r\n031200 AAXX 03121 10384 11010=";
        let parts = chunks(text);
        assert_eq!(parts[0], "SMAA01 EDZW 031200 AAXX 03121 10384 11010=");
    }

    #[test]
    fn text_with_no_separator_is_a_single_chunk() {
        let parts = chunks("SMAA01 EDZW 031200 AAXX 03121 10384 11010=");
        assert_eq!(parts.len(), 1);
    }
}
