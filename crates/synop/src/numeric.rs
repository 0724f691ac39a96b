//! Derived-quantity helpers: relative humidity and sea-level pressure
//! reduction (C1).
//!
//! Both functions are total over their `Option` inputs: any missing input
//! yields a missing output rather than a panic, matching the
//! optional-everywhere convention used throughout [`crate::decode`].

/// Magnus-formula approximation of relative humidity from air temperature
/// and dew point, both in degrees Celsius. Returns `None` if either input
/// is missing.
pub fn relative_humidity(
    temperature: Option<f64>,
    dew_point: Option<f64>,
) -> Option<f64> {
    let t = temperature?;
    let td = dew_point?;

    let (a, b) = if t >= 0.0 { (7.5, 237.3) } else { (7.6, 240.7) };

    Some(10f64.powf(2.0 + a * td / (b + td) - a * t / (b + t)))
}

/// Reduce a station-level pressure (hPa) to mean sea level.
///
/// Uses the QFF formula (accounting for virtual temperature and latitude)
/// when `temperature` is available, falling back to the standard-atmosphere
/// QNH formula otherwise. Returns `None` if `pressure`, `elevation` or
/// `latitude` is missing.
///
/// `latitude` is used in degrees, not radians, in the `cos(2 * latitude)`
/// term below. This reproduces the source formula's behavior rather than
/// the textbook one; see `DESIGN.md` for the Open Question this resolves.
pub fn reduce_to_sea_level(
    pressure: Option<f64>,
    temperature: Option<f64>,
    elevation: Option<f64>,
    latitude: Option<f64>,
) -> Option<f64> {
    let pressure = pressure?;
    let elevation = elevation?;
    let latitude = latitude?;

    let reduced = match temperature {
        Some(t) => {
            let virtual_temp = if t < -7.0 {
                0.5 * t + 275.0
            } else if t < 2.0 {
                0.535 * t + 275.6
            } else {
                1.07 * t + 274.5
            };
            pressure
                * (elevation
                    * 0.034163
                    * (1.0 - 0.0026373 * (2.0 * latitude).cos())
                    / virtual_temp)
                    .exp()
        }
        None => {
            pressure * (-5.25588 * (1.0 - 0.000022558 * elevation).ln()).exp()
        }
    };

    Some(round2(reduced))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn humidity_matches_worked_example() {
        let rh = relative_humidity(Some(23.0), Some(21.5)).unwrap();
        assert!((rh - 91.0).abs() < 2.0);
    }

    #[test]
    fn humidity_requires_both_inputs() {
        assert_eq!(relative_humidity(None, Some(1.0)), None);
        assert_eq!(relative_humidity(Some(1.0), None), None);
    }

    #[test]
    fn qff_falls_back_to_qnh_without_temperature() {
        let with_temp =
            reduce_to_sea_level(Some(1000.0), Some(15.0), Some(100.0), Some(48.0));
        let without_temp =
            reduce_to_sea_level(Some(1000.0), None, Some(100.0), Some(48.0));
        assert!(with_temp.is_some());
        assert!(without_temp.is_some());
        assert_ne!(with_temp, without_temp);
    }

    #[test]
    fn qff_missing_inputs_yield_none() {
        assert_eq!(
            reduce_to_sea_level(None, Some(10.0), Some(10.0), Some(10.0)),
            None
        );
        assert_eq!(
            reduce_to_sea_level(Some(1000.0), Some(10.0), None, Some(10.0)),
            None
        );
        assert_eq!(
            reduce_to_sea_level(Some(1000.0), Some(10.0), Some(10.0), None),
            None
        );
    }

    #[test]
    fn qff_is_stable_to_two_decimals() {
        let reduced =
            reduce_to_sea_level(Some(1012.3), Some(23.0), Some(115.0), Some(50.1))
                .unwrap();
        assert_relative_eq!(reduced, round2(reduced), epsilon = 1e-9);
    }
}
