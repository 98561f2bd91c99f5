//! End-to-end feature assembly from deck and feed fixtures.

use atcf_parser::parse_deck;
use feed_parser::{dedup_points, extract_name, extract_points, parse_feed};
use test_utils::{assert_lon_lat_eq, A_DECK, B_DECK, CYCLONE_ID, JSON_TRACK_FEED};
use track_builder::{build_features, records_from_points, FeatureContext, FeedLabels, TrackInputs};
use track_protocol::{FeatureKind, FeatureProperties, TrackGeometry};

fn deck_inputs() -> TrackInputs {
    TrackInputs {
        best: parse_deck(B_DECK),
        forecast: parse_deck(A_DECK),
    }
}

fn ctx() -> FeatureContext {
    FeatureContext::new(CYCLONE_ID, "jtwc").with_name(Some(CYCLONE_ID.to_string()))
}

#[test]
fn test_full_deck_build_for_jtwc() {
    let fc = build_features(&ctx(), &deck_inputs(), Some("JTWC"));

    let kinds: Vec<FeatureKind> = fc.features.iter().map(|f| f.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            FeatureKind::BestTrack,
            FeatureKind::Center,
            FeatureKind::ForecastTrack,
            FeatureKind::ForecastPoint,
            FeatureKind::ForecastPoint,
            FeatureKind::ForecastPoint,
            FeatureKind::ForecastPoint,
        ]
    );

    assert_eq!(
        fc.features[0].geometry,
        TrackGeometry::LineString {
            coordinates: vec![[135.0, 10.0], [134.2, 10.5], [133.3, 11.2], [132.5, 11.8]],
        }
    );
    assert_eq!(fc.features[1].geometry, TrackGeometry::point(132.5, 11.8));
}

#[test]
fn test_forecast_points_carry_tau_and_valid_time() {
    let fc = build_features(&ctx(), &deck_inputs(), Some("JTWC"));

    let taus: Vec<i32> = fc
        .of_kind(FeatureKind::ForecastPoint)
        .map(|f| match &f.properties {
            FeatureProperties::ForecastPoint(p) => {
                assert_eq!(p.time, p.cycle + chrono::Duration::hours(p.tau as i64));
                assert_eq!(p.aid, "JTWC");
                p.tau
            }
            other => panic!("unexpected properties {:?}", other),
        })
        .collect();
    assert_eq!(taus, vec![0, 12, 24, 48]);
}

#[test]
fn test_other_aid_uses_its_own_cycle() {
    let fc = build_features(&ctx(), &deck_inputs(), Some("OFCL"));
    assert_eq!(fc.of_kind(FeatureKind::ForecastTrack).count(), 1);
    assert_eq!(fc.of_kind(FeatureKind::ForecastPoint).count(), 2);
}

#[test]
fn test_forecast_only_gets_stand_in_center() {
    let inputs = TrackInputs {
        best: Vec::new(),
        forecast: parse_deck(A_DECK),
    };
    let fc = build_features(&ctx(), &inputs, Some("JTWC"));
    assert_eq!(fc.len(), 6);

    let center = fc.of_kind(FeatureKind::Center).next().unwrap();
    assert_eq!(center.geometry, TrackGeometry::point(132.5, 11.8));
}

#[test]
fn test_serialized_coordinates_are_lon_lat() {
    let fc = build_features(&ctx(), &deck_inputs(), Some("JTWC"));
    let json = serde_json::to_value(&fc).unwrap();

    assert_eq!(json["type"], "FeatureCollection");
    let center = &json["features"][1];
    assert_eq!(center["properties"]["kind"], "center");
    assert_eq!(center["properties"]["vmaxKt"], 45);
    assert_eq!(center["properties"]["mslpMb"], 994);
    assert_eq!(center["properties"]["time"], "2026-01-01T18:00:00Z");
    assert_eq!(center["geometry"]["coordinates"][0], 132.5);
    assert_eq!(center["geometry"]["coordinates"][1], 11.8);
}

#[test]
fn test_feed_build() {
    let doc = parse_feed(JSON_TRACK_FEED).unwrap();
    let points = dedup_points(extract_points(&doc).into_iter().map(|(_, p)| p).collect());
    let records = records_from_points(&points, &FeedLabels::for_event("TC2601", "WP", "JMA"));
    assert_eq!(records.len(), 4);

    let offsets: Vec<i32> = records.iter().map(|r| r.forecast_offset_hours).collect();
    assert_eq!(offsets, vec![0, 12, 24, 39]);

    let ctx = FeatureContext::new("TC2601", "jma").with_name(extract_name(&doc));
    let inputs = TrackInputs {
        best: records.clone(),
        forecast: records,
    };
    let fc = build_features(&ctx, &inputs, Some("JMA"));

    assert_eq!(fc.of_kind(FeatureKind::BestTrack).count(), 0);
    assert_eq!(fc.of_kind(FeatureKind::ForecastTrack).count(), 1);
    assert_eq!(fc.of_kind(FeatureKind::ForecastPoint).count(), 4);

    let track = fc.of_kind(FeatureKind::ForecastTrack).next().unwrap();
    match &track.geometry {
        TrackGeometry::LineString { coordinates } => {
            assert_eq!(coordinates.len(), 4);
            assert_lon_lat_eq!(coordinates[1], [131.1, 12.6], 1e-9);
            assert_lon_lat_eq!(coordinates[2], [129.6, 13.4], 1e-9);
        }
        other => panic!("unexpected geometry {:?}", other),
    }

    let center = fc.of_kind(FeatureKind::Center).next().unwrap();
    match &center.properties {
        FeatureProperties::Center(p) => {
            assert_eq!(p.name.as_deref(), Some("BUALOI"));
            assert_eq!(p.vmax_kt, Some(45));
            assert_eq!(p.technique, "JMA");
        }
        other => panic!("unexpected properties {:?}", other),
    }
}
