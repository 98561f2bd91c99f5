//! Line-oriented deck parsing.

use cyclone_common::record::is_valid_position;
use cyclone_common::{parse_dtg, TrackRecord};
use tracing::debug;

use crate::fields::{parse_coordinate, parse_intensity, parse_storm_number, parse_tau};

/// Lines with fewer comma separated fields are skipped.
pub const MIN_FIELDS: usize = 9;

/// Parse a whole deck into track records.
///
/// Blank lines and `#` comments are ignored. Lines that fail to decode are
/// dropped and counted in a debug log.
pub fn parse_deck(text: &str) -> Vec<TrackRecord> {
    let mut records = Vec::new();
    let mut skipped = 0usize;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match parse_line(line) {
            Some(record) => records.push(record),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!(parsed = records.len(), skipped, "Skipped undecodable deck lines");
    }

    records
}

/// Parse a single deck line.
pub fn parse_line(line: &str) -> Option<TrackRecord> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() < MIN_FIELDS {
        return None;
    }

    let cycle_time = parse_dtg(fields[2])?;
    let latitude = parse_coordinate(fields[6])?;
    let longitude = parse_coordinate(fields[7])?;
    if !is_valid_position(latitude, longitude) {
        return None;
    }

    Some(TrackRecord {
        basin: fields[0].to_ascii_uppercase(),
        storm_number: parse_storm_number(fields[1]),
        cycle_time,
        technique: fields[4].to_ascii_uppercase(),
        forecast_offset_hours: parse_tau(fields.get(5).copied()),
        latitude,
        longitude,
        max_wind_kt: parse_intensity(fields.get(8).copied()),
        central_pressure_mb: parse_intensity(fields.get(9).copied()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_b_deck_line() {
        let line = "WP, 01, 2026010100,   , BEST,   0, 125N, 1304E,  35, 1002, TS";
        let r = parse_line(line).unwrap();
        assert_eq!(r.basin, "WP");
        assert_eq!(r.storm_number, "01");
        assert_eq!(r.technique, "BEST");
        assert_eq!(r.forecast_offset_hours, 0);
        assert_eq!(r.latitude, 12.5);
        assert_eq!(r.longitude, 130.4);
        assert_eq!(r.max_wind_kt, Some(35));
        assert_eq!(r.central_pressure_mb, Some(1002));
    }

    #[test]
    fn test_short_line_is_skipped() {
        assert!(parse_line("WP, 01, 2026010100, 03, JTWC, 12, 130N, 1290E").is_none());
    }

    #[test]
    fn test_nine_fields_is_enough() {
        let r = parse_line("wp, 1, 2026010106, 03, jtwc, 12, 130N, 1290E, 40").unwrap();
        assert_eq!(r.basin, "WP");
        assert_eq!(r.storm_number, "01");
        assert_eq!(r.technique, "JTWC");
        assert_eq!(r.forecast_offset_hours, 12);
        assert_eq!(r.central_pressure_mb, None);
    }

    #[test]
    fn test_out_of_range_position_is_dropped() {
        assert!(parse_line("WP, 01, 2026010100, , BEST, 0, 950N, 1304E, 35").is_none());
        assert!(parse_line("WP, 01, 2026010100, , BEST, 0, 125N, 1900W, 35").is_none());
    }
}
