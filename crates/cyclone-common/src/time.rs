//! Time handling for cyclone track data.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Parse an ATCF date-time group (`YYYYMMDDHH`, UTC).
///
/// Only the first 10 characters are read; anything after them (some decks
/// append minutes) is ignored. Shorter or non-numeric input is rejected.
pub fn parse_dtg(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    let dtg = s.get(..10)?;
    if !dtg.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let year: i32 = dtg[0..4].parse().ok()?;
    let month: u32 = dtg[4..6].parse().ok()?;
    let day: u32 = dtg[6..8].parse().ok()?;
    let hour: u32 = dtg[8..10].parse().ok()?;

    let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, 0, 0)?;
    Some(Utc.from_utc_datetime(&naive))
}

/// Parse an ISO 8601 timestamp, normalized to UTC.
///
/// Offsets are honoured (`2025-08-01T00:00:00+09:00`); timestamps without
/// an offset are taken as UTC.
pub fn parse_iso8601(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    // Try full datetime with timezone
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    // Without timezone (assume UTC)
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(Utc.from_utc_datetime(&ndt));
        }
    }

    // Date only
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ndt| Utc.from_utc_datetime(&ndt))
}

/// Valid time of a forecast: cycle time plus the lead time in hours.
pub fn valid_time(cycle_time: DateTime<Utc>, offset_hours: i32) -> DateTime<Utc> {
    cycle_time + Duration::hours(offset_hours as i64)
}
