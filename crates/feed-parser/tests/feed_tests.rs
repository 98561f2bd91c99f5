//! Extraction against a full agency-style feed document.

use chrono::{TimeZone, Utc};
use feed_parser::{
    dedup_points, extract_event_ids, extract_name, extract_points_from_str, parse_feed,
};
use test_utils::{assert_approx_eq, JSON_ACTIVE_LIST, JSON_TRACK_CANDIDATES, JSON_TRACK_FEED};

#[test]
fn test_feed_candidates_in_document_order() {
    let points = extract_points_from_str(JSON_TRACK_FEED).unwrap();
    assert_eq!(points.len(), JSON_TRACK_CANDIDATES);

    let paths: Vec<String> = points.iter().map(|(path, _)| path.to_string()).collect();
    assert_eq!(
        paths,
        vec![
            "$.track.analysis[0]",
            "$.track.forecast[0]",
            "$.track.forecast[1]",
            "$.track.forecast[2]",
            "$.latest",
            "$.probabilityCircle",
        ]
    );
}

#[test]
fn test_feed_point_decoding() {
    let points = extract_points_from_str(JSON_TRACK_FEED).unwrap();

    let analysis = &points[0].1;
    assert_eq!(analysis.kind.as_deref(), Some("analysis"));
    assert_eq!(analysis.max_wind_kt, Some(45));
    assert_eq!(analysis.central_pressure_mb, Some(994));
    assert_eq!(analysis.time, Some(Utc.with_ymd_and_hms(2026, 1, 1, 18, 0, 0).unwrap()));

    let suffixed = &points[1].1;
    assert_eq!(suffixed.kind.as_deref(), Some("forecast"));
    assert_approx_eq!(suffixed.latitude, 12.6, 1e-9);
    assert_approx_eq!(suffixed.longitude, 131.1, 1e-9);
    assert_eq!(suffixed.central_pressure_mb, Some(985));

    let degree_minute = &points[2].1;
    assert_approx_eq!(degree_minute.latitude, 13.4, 1e-9);
    assert_approx_eq!(degree_minute.longitude, 129.6, 1e-9);

    let offset_time = &points[3].1;
    assert_eq!(
        offset_time.time,
        Some(Utc.with_ymd_and_hms(2026, 1, 3, 9, 0, 0).unwrap())
    );

    let spurious = &points[5].1;
    assert_eq!(spurious.kind.as_deref(), Some("probabilityCircle"));
    assert!(spurious.time.is_none());
}

#[test]
fn test_feed_dedup_removes_repeated_fix() {
    let points: Vec<_> = extract_points_from_str(JSON_TRACK_FEED)
        .unwrap()
        .into_iter()
        .map(|(_, p)| p)
        .collect();

    let unique = dedup_points(points);
    assert_eq!(unique.len(), JSON_TRACK_CANDIDATES - 1);
    assert!(unique.iter().all(|p| p.kind.as_deref() != Some("latest")));
}

#[test]
fn test_feed_name() {
    let doc = parse_feed(JSON_TRACK_FEED).unwrap();
    assert_eq!(extract_name(&doc).as_deref(), Some("BUALOI"));
}

#[test]
fn test_active_list_ids() {
    let doc = parse_feed(JSON_ACTIVE_LIST).unwrap();
    assert_eq!(
        extract_event_ids(&doc),
        vec!["TC2601".to_string(), "TC2602".to_string()]
    );
}

#[test]
fn test_unparsable_feed_is_error() {
    assert!(extract_points_from_str("<html>maintenance</html>").is_err());
}
