//! Decoding of coordinate, time and intensity values in their many feed
//! encodings.

use chrono::{DateTime, TimeZone, Utc};
use cyclone_common::parse_iso8601;
use serde_json::{Map, Value};

use crate::keys::{
    lookup, DEGREE_KEYS, LATITUDE_KEYS, LONGITUDE_KEYS, MINUTE_KEYS, TIME_ZONE_KEYS,
    WIND_VALUE_KEYS,
};

/// Which half of a coordinate pair is being decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    /// Sign for a hemisphere letter, `None` if the letter belongs to the
    /// other axis or is not a hemisphere at all.
    fn hemisphere_sign(self, letter: char) -> Option<f64> {
        match (self, letter.to_ascii_uppercase()) {
            (Axis::Latitude, 'N') | (Axis::Longitude, 'E') => Some(1.0),
            (Axis::Latitude, 'S') | (Axis::Longitude, 'W') => Some(-1.0),
            _ => None,
        }
    }
}

/// Decode one coordinate.
///
/// Accepts plain numbers, numeric strings, hemisphere-suffixed strings
/// (`"12.3N"`, `"131.1E"`), degree-minute strings (`"20 30N"`, `"20°30'N"`)
/// and degree-minute objects (`{"degree": 13, "minute": 24}`).
pub fn decode_coordinate(value: &Value, axis: Axis) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => decode_coordinate_str(s, axis),
        Value::Object(map) => decode_degree_minute(map),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

fn decode_coordinate_str(s: &str, axis: Axis) -> Option<f64> {
    let s = s.trim();
    if let Ok(v) = s.parse::<f64>() {
        return Some(v);
    }

    let last = s.chars().last()?;
    let sign = axis.hemisphere_sign(last)?;
    let body = &s[..s.len() - last.len_utf8()];

    let parts: Vec<f64> = body
        .split(|c: char| c.is_whitespace() || matches!(c, '°' | '\'' | '′'))
        .filter(|p| !p.is_empty())
        .map(str::parse)
        .collect::<Result<_, _>>()
        .ok()?;

    let magnitude = match parts.as_slice() {
        [degrees] => *degrees,
        [degrees, minutes] if (0.0..60.0).contains(minutes) => degrees + minutes / 60.0,
        _ => return None,
    };

    if magnitude < 0.0 {
        return None;
    }
    Some(sign * magnitude)
}

fn decode_degree_minute(map: &Map<String, Value>) -> Option<f64> {
    let (_, degrees) = lookup(map, DEGREE_KEYS)?;
    let degrees = number(degrees)?;
    let minutes = match lookup(map, MINUTE_KEYS) {
        Some((_, m)) => number(m)?,
        None => 0.0,
    };
    if !(0.0..60.0).contains(&minutes) {
        return None;
    }
    Some(degrees + degrees.signum() * minutes / 60.0)
}

/// Decode the coordinate pair held directly by `map`, if any.
pub fn decode_pair(map: &Map<String, Value>) -> Option<(f64, f64)> {
    let (_, lat) = lookup(map, LATITUDE_KEYS)?;
    let (_, lon) = lookup(map, LONGITUDE_KEYS)?;
    let latitude = decode_coordinate(lat, Axis::Latitude)?;
    let longitude = decode_coordinate(lon, Axis::Longitude)?;
    Some((latitude, longitude))
}

/// Epoch numbers at or past this magnitude are milliseconds (year 5138 in
/// seconds).
const EPOCH_MILLIS_THRESHOLD: i64 = 100_000_000_000;

/// Decode a timestamp: an ISO 8601 string, an object carrying one under a
/// zone key such as `UTC`, or Unix seconds or milliseconds.
pub fn decode_time(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_iso8601(s),
        Value::Object(map) => lookup(map, TIME_ZONE_KEYS).and_then(|(_, v)| decode_time(v)),
        Value::Number(n) => n.as_i64().and_then(decode_epoch),
        _ => None,
    }
}

fn decode_epoch(value: i64) -> Option<DateTime<Utc>> {
    if value.unsigned_abs() < EPOCH_MILLIS_THRESHOLD as u64 {
        return Utc.timestamp_opt(value, 0).single();
    }
    // Anything that is still past year 5138 as milliseconds is not a time.
    if value.unsigned_abs() / 1000 >= EPOCH_MILLIS_THRESHOLD as u64 {
        return None;
    }
    Utc.timestamp_millis_opt(value).single()
}

/// Decode a wind or pressure value. Non-positive values are absent.
pub fn decode_intensity(value: &Value) -> Option<u32> {
    let v = match value {
        Value::Object(map) => return lookup(map, WIND_VALUE_KEYS).and_then(|(_, v)| decode_intensity(v)),
        other => number(other)?,
    };
    if v > 0.0 && v < u32::MAX as f64 {
        Some(v.round() as u32)
    } else {
        None
    }
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
