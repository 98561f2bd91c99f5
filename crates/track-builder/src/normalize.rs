//! Conversion of extracted feed points into track records.

use cyclone_common::TrackRecord;
use feed_parser::CandidatePoint;

/// Labels applied to every record normalized from one feed.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedLabels {
    pub basin: String,
    pub storm_number: String,
    /// Technique the feed's records are attributed to, e.g. `JMA`
    pub technique: String,
}

impl FeedLabels {
    /// Labels for a feed event id such as `TC2601`: the storm number is the
    /// id's last two digits, `00` when it has none.
    pub fn for_event(event_id: &str, basin: &str, technique: &str) -> Self {
        let digits: Vec<char> = event_id.chars().filter(|c| c.is_ascii_digit()).collect();
        let storm_number = match digits.as_slice() {
            [.., a, b] => format!("{}{}", a, b),
            [a] => format!("0{}", a),
            [] => "00".to_string(),
        };
        Self {
            basin: basin.to_ascii_uppercase(),
            storm_number,
            technique: technique.to_ascii_uppercase(),
        }
    }
}

/// Turn feed points into records sharing one analysis cycle.
///
/// The earliest timestamp is the cycle time; each point's forecast offset is
/// its distance from it in whole hours (rounded). Points without a time are
/// dropped. Output is ordered by offset, ties keeping input order.
pub fn records_from_points(points: &[CandidatePoint], labels: &FeedLabels) -> Vec<TrackRecord> {
    let timed: Vec<(&CandidatePoint, chrono::DateTime<chrono::Utc>)> = points
        .iter()
        .filter_map(|p| p.time.map(|t| (p, t)))
        .collect();

    let Some(cycle_time) = timed.iter().map(|(_, t)| *t).min() else {
        return Vec::new();
    };

    let mut records: Vec<TrackRecord> = timed
        .into_iter()
        .map(|(p, t)| {
            let seconds = (t - cycle_time).num_seconds() as f64;
            TrackRecord {
                basin: labels.basin.clone(),
                storm_number: labels.storm_number.clone(),
                cycle_time,
                technique: labels.technique.clone(),
                forecast_offset_hours: (seconds / 3600.0).round() as i32,
                latitude: p.latitude,
                longitude: p.longitude,
                max_wind_kt: p.max_wind_kt,
                central_pressure_mb: p.central_pressure_mb,
            }
        })
        .collect();

    records.sort_by_key(|r| r.forecast_offset_hours);
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn point(lat: f64, day: u32, hour: u32, minute: u32) -> CandidatePoint {
        CandidatePoint {
            latitude: lat,
            longitude: 130.0,
            time: Some(Utc.with_ymd_and_hms(2026, 1, day, hour, minute, 0).unwrap()),
            kind: None,
            max_wind_kt: None,
            central_pressure_mb: None,
        }
    }

    #[test]
    fn test_labels_from_event_id() {
        let labels = FeedLabels::for_event("TC2601", "wp", "jma");
        assert_eq!(labels.basin, "WP");
        assert_eq!(labels.storm_number, "01");
        assert_eq!(labels.technique, "JMA");
        assert_eq!(FeedLabels::for_event("T7", "WP", "JMA").storm_number, "07");
        assert_eq!(FeedLabels::for_event("none", "WP", "JMA").storm_number, "00");
    }

    #[test]
    fn test_offsets_from_earliest_time() {
        let labels = FeedLabels::for_event("TC2601", "WP", "JMA");
        let points = vec![point(12.0, 2, 6, 0), point(11.0, 1, 18, 0), point(13.0, 2, 17, 40)];
        let records = records_from_points(&points, &labels);

        let offsets: Vec<i32> = records.iter().map(|r| r.forecast_offset_hours).collect();
        assert_eq!(offsets, vec![0, 12, 24]);
        assert!(records.iter().all(|r| r.cycle_time == points[1].time.unwrap()));
        assert_eq!(records[0].latitude, 11.0);
    }

    #[test]
    fn test_timeless_points_dropped() {
        let labels = FeedLabels::for_event("TC2601", "WP", "JMA");
        let mut timeless = point(12.0, 1, 0, 0);
        timeless.time = None;
        assert!(records_from_points(&[timeless.clone()], &labels).is_empty());

        let records = records_from_points(&[timeless, point(11.0, 1, 0, 0)], &labels);
        assert_eq!(records.len(), 1);
    }
}
