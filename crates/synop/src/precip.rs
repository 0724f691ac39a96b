//! Precipitation-group decoder (C2): maps a five-character `6RRRt` group
//! into an amount (mm) and a duration (hours).

use serde::Serialize;

/// A single decoded precipitation reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Precipitation {
    pub amount_mm: f64,
    pub duration_h: Option<f64>,
}

/// Decode a `6RRRt` group (the leading `6` tag is part of `group`, at
/// index 0; `group` must be exactly five characters). Returns `None` on
/// any non-numeric sub-field or on duration code `0`, which the format
/// leaves undefined.
pub fn decode_precipitation_group(group: &str) -> Option<Precipitation> {
    if group.len() != 5 {
        return None;
    }

    let rrr: u32 = group.get(1..4)?.parse().ok()?;
    let amount_mm = if rrr == 990 {
        0.05
    } else if rrr > 990 {
        (rrr - 990) as f64 / 10.0
    } else {
        rrr as f64
    };

    let t: u32 = group.get(4..5)?.parse().ok()?;
    let duration_h = match t {
        0 => return None,
        1 => 6.0,
        2 => 12.0,
        3 => 18.0,
        4 => 24.0,
        5 => 1.0,
        6 => 2.0,
        7 => 3.0,
        8 => 9.0,
        9 => 15.0,
        _ => return None,
    };

    Some(Precipitation {
        amount_mm,
        duration_h: Some(duration_h),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_sentinel() {
        let p = decode_precipitation_group("69901").unwrap();
        assert_eq!(p.amount_mm, 0.05);
        assert_eq!(p.duration_h, Some(6.0));
    }

    #[test]
    fn above_990_scales_by_ten() {
        let p = decode_precipitation_group("69955").unwrap();
        assert_eq!(p.amount_mm, 0.5);
    }

    #[test]
    fn plain_amount() {
        let p = decode_precipitation_group("60051").unwrap();
        assert_eq!(p.amount_mm, 5.0);
        assert_eq!(p.duration_h, Some(6.0));
    }

    #[test]
    fn duration_code_zero_is_invalid() {
        assert_eq!(decode_precipitation_group("60050"), None);
    }

    #[test]
    fn non_numeric_is_none() {
        assert_eq!(decode_precipitation_group("6////"), None);
    }

    #[test]
    fn wrong_length_is_none() {
        assert_eq!(decode_precipitation_group("600"), None);
    }

    #[test]
    fn all_duration_codes() {
        let expect = [
            (1, 6.0),
            (2, 12.0),
            (3, 18.0),
            (4, 24.0),
            (5, 1.0),
            (6, 2.0),
            (7, 3.0),
            (8, 9.0),
            (9, 15.0),
        ];
        for (code, hours) in expect {
            let group = format!("6001{code}");
            let p = decode_precipitation_group(&group).unwrap();
            assert_eq!(p.duration_h, Some(hours));
        }
    }
}
