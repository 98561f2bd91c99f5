//! Common test fixtures for cyclone-track tests.
//!
//! Deck and feed samples modelled on real WP basin products, trimmed to the
//! handful of lines the tests need.

use std::io::Write;

use chrono::{TimeZone, Utc};
use cyclone_common::TrackRecord;
use flate2::write::GzEncoder;
use flate2::Compression;

/// Identifier the deck fixtures belong to.
pub const CYCLONE_ID: &str = "WP012026";

/// b-deck for WP012026: four BEST fixes out of order, one CARQ fix, a
/// comment, a short line and a line with a broken latitude.
pub const B_DECK: &str = "\
# best track WP012026
WP, 01, 2026010100,   , BEST,   0, 100N, 1350E,  25, 1006, TD
WP, 01, 2026010112,   , BEST,   0, 112N, 1333E,  35, 1000, TS
WP, 01, 2026010106,   , BEST,   0, 105N, 1342E,  30, 1004, TD
WP, 01, 2026010106,   , CARQ,   0, 106N, 1341E,  30, 1004, TD

WP, 01, 2026010118
WP, 01, 2026010118,   , BEST,   0, 11.8N, 1325E,  45,  994, TS
WP, 01, 2026010118,   , BEST,   0, 118N, 1325E,  45,  994, TS
";

/// Number of records [`B_DECK`] decodes to.
pub const B_DECK_RECORDS: usize = 5;

/// a-deck for WP012026: JTWC on two cycles, OFCL and CARQ on the later one.
pub const A_DECK: &str = "\
WP, 01, 2026010112, 03, JTWC,   0, 112N, 1333E,  35, 1000
WP, 01, 2026010112, 03, JTWC,  12, 120N, 1320E,  45,  995
WP, 01, 2026010112, 03, JTWC,  24, 128N, 1308E,  55,  985
WP, 01, 2026010118, 01, CARQ,   0, 118N, 1325E,  45,  994
WP, 01, 2026010118, 03, JTWC,  24, 134N, 1296E,  65,  975
WP, 01, 2026010118, 03, JTWC,   0, 118N, 1325E,  45,  994
WP, 01, 2026010118, 03, JTWC,  12, 126N, 1311E,  55,  985
WP, 01, 2026010118, 03, JTWC,  48, 150N, 1270E,  80,  960
WP, 01, 2026010118, 03, OFCL,   0, 118N, 1325E,  45,  994
WP, 01, 2026010118, 03, OFCL,  12, 127N, 1310E,  55,
";

/// Number of records [`A_DECK`] decodes to.
pub const A_DECK_RECORDS: usize = 10;

/// Agency track feed for one storm, in the loosely structured shape such
/// feeds use: positions under `position.deg`, `center.dm` and bare
/// `lat`/`lon`, a repeated analysis fix under `latest`, and a coordinate
/// shaped pair without a time under `probabilityCircle`.
pub const JSON_TRACK_FEED: &str = r#"{
  "name": { "en": "BUALOI", "ja": "ブアローイ" },
  "typhoonNumber": "2601",
  "track": {
    "analysis": [
      {
        "validTime": "2026-01-01T18:00:00Z",
        "position": { "deg": { "lat": 11.8, "lon": 132.5 } },
        "pressure": 994,
        "maximumWind": { "sustained": 45 }
      }
    ],
    "forecast": [
      {
        "validTime": "2026-01-02T06:00:00Z",
        "position": { "deg": { "lat": "12.6N", "lon": "131.1E" } },
        "pressure": 985
      },
      {
        "validTime": "2026-01-02T18:00:00Z",
        "center": {
          "dm": {
            "lat": { "degree": 13, "minute": 24 },
            "lon": { "degree": 129, "minute": 36 }
          }
        }
      },
      { "validTime": "2026-01-03T18:00:00+09:00", "lat": 15.0, "lon": 127.0 }
    ]
  },
  "latest": {
    "validTime": "2026-01-01T18:00:00Z",
    "position": { "deg": { "lat": 11.8, "lon": 132.5 } }
  },
  "probabilityCircle": { "radius": 120, "x": 1, "y": 2 }
}"#;

/// Coordinate candidates in [`JSON_TRACK_FEED`] before deduplication.
pub const JSON_TRACK_CANDIDATES: usize = 6;

/// Active storm listing: two usable ids under different keys and one entry
/// without an id.
pub const JSON_ACTIVE_LIST: &str = r#"[
  { "eventId": "TC2601", "name": "BUALOI" },
  { "id": "TC2602" },
  { "title": "no identifier here" }
]"#;

/// Build a record for selector tests.
pub fn record(technique: &str, dtg_hour: u32, tau: i32, lat: f64, lon: f64) -> TrackRecord {
    let day = 1 + dtg_hour / 24;
    let hour = dtg_hour % 24;
    TrackRecord {
        basin: "WP".to_string(),
        storm_number: "01".to_string(),
        cycle_time: Utc
            .with_ymd_and_hms(2026, 1, day, hour, 0, 0)
            .single()
            .unwrap_or_default(),
        technique: technique.to_string(),
        forecast_offset_hours: tau,
        latitude: lat,
        longitude: lon,
        max_wind_kt: None,
        central_pressure_mb: None,
    }
}

/// Gzip a text payload, as served by `.dat.gz` deck endpoints.
pub fn gzip(text: &str) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(text.as_bytes())
        .expect("gzip into memory");
    encoder.finish().expect("gzip into memory")
}
