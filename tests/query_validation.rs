// Construction-time validation and error classification.
use chrono::{Duration, TimeZone, Utc};
use statquery::prelude::*;
use statquery::normalize_json;
use test_case::test_case;

fn january() -> Interval {
    Interval::month(2018, 1, &Utc).unwrap()
}

#[test_case(&[] ; "no metrics")]
#[test_case(&[""] ; "empty name")]
#[test_case(&["metric1", " "] ; "blank name")]
#[test_case(&["metric1,metric2"] ; "embedded separator")]
fn invalid_metrics_are_rejected(metrics: &[&str]) {
    let err = Query::new(metrics.iter().copied(), january()).unwrap_err();
    let err: StatQueryError = err.into();
    assert!(matches!(err, StatQueryError::InvalidQuery(_)));
}

#[test]
fn inverted_interval_is_rejected() {
    let start = Utc.with_ymd_and_hms(2018, 2, 1, 0, 0, 0).unwrap();
    let err = Interval::new(start, start - Duration::minutes(1)).unwrap_err();
    assert!(matches!(err, QueryError::InvalidInterval { .. }));
    assert!(!err.is_time_zone_failure());
}

#[test_case("Europe/Budapst" ; "typo")]
#[test_case("" ; "empty")]
#[test_case("CET+1" ; "not iana")]
fn unresolvable_zone_is_fatal(zone: &str) {
    let err: StatQueryError = resolve_time_zone(zone).unwrap_err().into();
    assert!(matches!(err, StatQueryError::TimeZoneResolution(_)));
}

#[test]
fn json_documents_normalize_end_to_end() {
    let params = normalize_json(
        r#"{
            "metrics": ["metric1", "metric2"],
            "interval": { "year": 2018, "month": 1, "timeZone": "Europe/Budapest" },
            "sort": "DESC",
            "sortBy": "metric2",
            "limit": 50
        }"#,
    )
    .unwrap();

    assert_eq!(
        params.to_json(),
        serde_json::json!({
            "select": "metric1,metric2",
            "timeRange": "12/31/2017 23:00~01/31/2018 23:00",
            "tsAscending": "false",
            "sort": "DESC",
            "sortby": "metric2",
            "limit": 50
        })
    );
}

#[test]
fn invalid_json_document_is_an_invalid_query() {
    let err = normalize_json(r#"{"metrics": ["m"], "interval": {"year": 2018, "month": 1}, "topK": 0}"#)
        .unwrap_err();
    assert!(matches!(
        err,
        StatQueryError::InvalidQuery(QueryError::InvalidLimit { field: "topK" })
    ));

    let err = normalize_json(r#"{"metrics": [], "interval": {"year": 2018, "month": 1}}"#)
        .unwrap_err();
    assert_eq!(err.query_error(), Some(&QueryError::EmptyMetrics));
}

#[test_case("Europe/Atlantis" ; "unknown zone")]
#[test_case("" ; "empty zone")]
fn json_document_with_bad_zone_is_a_zone_failure(zone: &str) {
    let document = format!(
        r#"{{"metrics": ["m"], "interval": {{"year": 2018, "month": 1, "timeZone": "{zone}"}}}}"#
    );
    let err = normalize_json(&document).unwrap_err();
    assert!(matches!(
        err,
        StatQueryError::TimeZoneResolution(QueryError::UnknownTimeZone(_))
    ));
}

#[test_case("{" ; "truncated")]
#[test_case(r#"{"metrics": ["m"]}"# ; "missing interval")]
#[test_case(r#"{"metrics": ["m"], "interval": {"year": 2018, "month": 1}, "limit": "ten"}"# ; "wrong type")]
fn malformed_json_is_a_deserialization_error(document: &str) {
    let err = normalize_json(document).unwrap_err();
    assert!(matches!(err, StatQueryError::DeserializationError(_)));
}

#[test]
fn fractional_accuracy_in_json_document() {
    let params = normalize_json(
        r#"{"metrics": ["m"], "interval": {"year": 2018, "month": 1}, "accuracy": 0.5}"#,
    )
    .unwrap();
    assert_eq!(params.to_json()["accuracy"], serde_json::json!(0.5));
}

#[test]
fn named_zone_constant_matches_lookup() {
    let by_name = Interval::month(2018, 1, &resolve_time_zone("Europe/Budapest").unwrap()).unwrap();
    let by_const = Interval::month(2018, 1, &chrono_tz::Europe::Budapest).unwrap();
    assert_eq!(by_name, by_const);
}
