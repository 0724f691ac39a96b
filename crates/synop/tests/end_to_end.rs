//! End-to-end scenarios exercising the full bulletin -> report -> store
//! pipeline together, mirroring the six scenarios used to validate the
//! decoder during design (basic report, negative temperature with a
//! missing station pressure, a correction merge, amendment arrival-order
//! independence, METAR discard, and a mixed bulletin with a non-land
//! subsection discarded).

use chrono::NaiveDate;
use synop::prelude::*;

fn context(base_date: NaiveDate) -> DecoderContext {
    DecoderContext::new(Filters::allow_all(), StationInventory::empty(), base_date)
}

#[test]
fn basic_land_report_is_decoded_and_stored() {
    let ctx = context(NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
    let bulletin =
        "SMAA01 EDZW 031200 AAXX 03121 10384 10000 21010 10230 20215 30123 4///5 60051=";

    let mut store = ObservationStore::new();
    for observation in decode_bulletin(bulletin, &ctx) {
        store.ingest(observation);
    }
    let primary = store.flush();
    let key = (
        "10384".to_string(),
        ctx.base_date.and_hms_opt(12, 0, 0).unwrap().and_utc(),
    );
    let stored = &primary[&key];
    assert_eq!(stored.observation.wind_direction, Some(100));
    assert_eq!(stored.observation.wind_speed, Some(10.0));
    assert_eq!(stored.observation.temperature, Some(23.0));
    assert_eq!(stored.observation.dew_point_temperature, Some(21.5));
    assert_eq!(stored.observation.station_pressure, Some(1012.3));
    assert_eq!(stored.observation.precipitation.len(), 1);
    assert_eq!(stored.observation.precipitation[0].amount_mm, 5.0);
}

#[test]
fn negative_temperature_with_missing_station_pressure() {
    let ctx = context(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    let bulletin =
        "SIXX02 LFPW 150600 AAXX 15061 07150 10000 21010 11055 21032 3//// 333 91015=";

    let obs = decode_bulletin(bulletin, &ctx);
    assert_eq!(obs.len(), 1);
    let o = &obs[0];
    assert_eq!(o.temperature, Some(-5.5));
    assert_eq!(o.dew_point_temperature, Some(-3.2));
    assert_eq!(o.station_pressure, None);
    assert_eq!(o.pressure, None);
    assert_eq!(o.gust_speed, Some(15.0));
}

#[test]
fn correction_modifier_merges_into_the_primary_store() {
    let ctx = context(NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
    let base = "SMAA01 EDZW 031200 AAXX 03121 10384 10000 21010 10230 20215 30123 4///5 60051=";
    let corrected = "SMAA01 EDZW 031200 CCB AAXX 03121 10384 10000 21010 10240 20215 30123 4///5 60051=";

    let mut store = ObservationStore::new();
    for observation in decode_bulletin(base, &ctx) {
        store.ingest(observation);
    }
    for observation in decode_bulletin(corrected, &ctx) {
        store.ingest(observation);
    }

    let primary = store.flush();
    let key = (
        "10384".to_string(),
        ctx.base_date.and_hms_opt(12, 0, 0).unwrap().and_utc(),
    );
    let stored = &primary[&key];
    assert_eq!(stored.correction_sequence, Some('B'));
    // the corrected temperature (24.0) replaces the original (23.0)
    assert_eq!(stored.observation.temperature, Some(24.0));
}

#[test]
fn amendment_sequence_converges_regardless_of_arrival_order() {
    let ctx = context(NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
    let base = "SMAA01 EDZW 031200 AAXX 03121 10384 10000 21010 10230 20215 30123 4///5 60051=";
    let amend_a = "SMAA01 EDZW 031200 AAA AAXX 03121 10384 10000 21010 10230 20215 30123 4///5 60051=";
    let amend_b = "SMAA01 EDZW 031200 AAB AAXX 03121 10384 10000 21010 10230 20215 30123 4///5 60051=";

    let key = (
        "10384".to_string(),
        ctx.base_date.and_hms_opt(12, 0, 0).unwrap().and_utc(),
    );

    let mut forward = ObservationStore::new();
    for bulletin in [base, amend_a, amend_b] {
        for observation in decode_bulletin(bulletin, &ctx) {
            forward.ingest(observation);
        }
    }

    let mut backward = ObservationStore::new();
    for bulletin in [base, amend_b, amend_a] {
        for observation in decode_bulletin(bulletin, &ctx) {
            backward.ingest(observation);
        }
    }

    assert_eq!(
        forward.flush()[&key].amendment_sequence,
        Some('B')
    );
    assert_eq!(
        backward.flush()[&key].amendment_sequence,
        Some('B')
    );
}

#[test]
fn metar_bulletin_is_entirely_discarded() {
    let ctx = context(NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
    let bulletin = "SAUS31 KWBC 031200 METAR KXXX 031200Z 00000KT 9999 SKC 15/10 Q1013=";
    assert!(decode_bulletin(bulletin, &ctx).is_empty());
}

#[test]
fn mixed_bulletin_keeps_land_stations_and_drops_ship_subsection() {
    let ctx = context(NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
    let bulletin = "SMAA01 EDZW 031200 AAXX 03121 10384 11010= BBXX 03121 99999 11010= AAXX 03121 10385 11020=";

    let mut store = ObservationStore::new();
    for observation in decode_bulletin(bulletin, &ctx) {
        store.ingest(observation);
    }
    let primary = store.flush();
    assert_eq!(primary.len(), 2);
    assert!(primary
        .keys()
        .all(|(station_id, _)| station_id == "10384" || station_id == "10385"));
}
