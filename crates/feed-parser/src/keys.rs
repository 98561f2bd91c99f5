//! Key alias tables.
//!
//! Lookups against these tables are ASCII case-insensitive, so `validtime`
//! and `validTime` both match.

use serde_json::{Map, Value};

pub const LATITUDE_KEYS: &[&str] = &["lat", "latitude", "centerLat", "y"];

pub const LONGITUDE_KEYS: &[&str] = &["lon", "lng", "longitude", "centerLng", "centerLon", "x"];

pub const TIME_KEYS: &[&str] = &["time", "datetime", "validTime", "date", "dt"];

/// Keys inside a time object that hold the UTC string, e.g.
/// `{"JST": "...", "UTC": "..."}`.
pub const TIME_ZONE_KEYS: &[&str] = &["UTC", "utc", "iso"];

pub const KIND_KEYS: &[&str] = &["type", "kind", "category"];

/// Containers that hold the coordinate pair one level down.
pub const POSITION_KEYS: &[&str] = &["position", "center", "pos"];

/// Encodings a position container may nest its pair under.
pub const POSITION_FORMAT_KEYS: &[&str] = &["deg", "direct", "decimal", "dm"];

pub const DEGREE_KEYS: &[&str] = &["degree", "deg", "d"];

pub const MINUTE_KEYS: &[&str] = &["minute", "min", "m"];

pub const WIND_KEYS: &[&str] = &["maximumWind", "maxWind", "vmax", "windSpeed"];

/// Keys a wind object keeps its value under.
pub const WIND_VALUE_KEYS: &[&str] = &["sustained", "value", "kt"];

pub const PRESSURE_KEYS: &[&str] = &["pressure", "centralPressure", "mslp", "minPressure"];

pub const EVENT_ID_KEYS: &[&str] = &["eventId", "eventID", "id", "event_id"];

pub const NAME_KEYS: &[&str] = &["name", "typhoonName", "title", "stormName", "enName", "jpName"];

/// Language keys inside a nested name object, in preference order.
pub const NAME_LANGUAGE_KEYS: &[&str] = &["en", "ja", "jp"];

/// Find the first alias present in `map`, in alias order.
pub fn lookup<'a>(map: &'a Map<String, Value>, aliases: &[&str]) -> Option<(&'a str, &'a Value)> {
    aliases.iter().find_map(|alias| {
        map.iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(alias))
            .map(|(key, value)| (key.as_str(), value))
    })
}
