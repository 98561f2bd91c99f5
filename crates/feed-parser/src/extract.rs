//! Typed visitor that finds position-bearing objects anywhere in a document.

use chrono::{DateTime, Utc};
use cyclone_common::record::is_valid_position;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{FeedError, FeedResult};
use crate::keys::{
    lookup, KIND_KEYS, POSITION_FORMAT_KEYS, POSITION_KEYS, PRESSURE_KEYS, TIME_KEYS, WIND_KEYS,
};
use crate::path::JsonPath;
use crate::values::{decode_intensity, decode_pair, decode_time};

/// A position recovered from a feed, before it becomes a track record.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidatePoint {
    pub latitude: f64,
    /// Normalized to [-180, 180]
    pub longitude: f64,
    pub time: Option<DateTime<Utc>>,
    /// Nearest enclosing key, or the object's own `type`/`kind`
    pub kind: Option<String>,
    pub max_wind_kt: Option<u32>,
    pub central_pressure_mb: Option<u32>,
}

impl CandidatePoint {
    pub fn lon_lat(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}

/// Parse feed text into a JSON tree.
pub fn parse_feed(text: &str) -> FeedResult<Value> {
    if text.trim().is_empty() {
        return Err(FeedError::EmptyDocument);
    }
    Ok(serde_json::from_str(text)?)
}

/// Walk a document and return every object carrying a usable coordinate
/// pair, in document order.
///
/// An object matches when it holds a latitude and longitude under any known
/// alias, either directly or inside a `position`/`center`/`pos` container
/// (optionally nested once more under `deg`/`dm`). The matched container is
/// not searched again. This is deliberately loose: coordinate-shaped pairs
/// that are not track points may be returned too.
pub fn extract_points(document: &Value) -> Vec<(JsonPath, CandidatePoint)> {
    let mut visitor = PointVisitor::default();
    visitor.visit(document, &JsonPath::root());
    visitor.points
}

/// [`extract_points`] on raw text.
pub fn extract_points_from_str(text: &str) -> FeedResult<Vec<(JsonPath, CandidatePoint)>> {
    let document = parse_feed(text)?;
    let points = extract_points(&document);
    debug!(points = points.len(), "Extracted feed positions");
    Ok(points)
}

#[derive(Default)]
struct PointVisitor {
    points: Vec<(JsonPath, CandidatePoint)>,
}

impl PointVisitor {
    fn visit(&mut self, value: &Value, path: &JsonPath) {
        match value {
            Value::Object(map) => self.visit_object(map, path),
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    self.visit(item, &path.index(i));
                }
            }
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
        }
    }

    fn visit_object(&mut self, map: &Map<String, Value>, path: &JsonPath) {
        let mut consumed: Option<&str> = None;

        if let Some((latitude, longitude, container)) = locate_pair(map) {
            consumed = container;
            match normalize_position(latitude, longitude) {
                Some((latitude, longitude)) => {
                    let point = CandidatePoint {
                        latitude,
                        longitude,
                        time: lookup(map, TIME_KEYS).and_then(|(_, v)| decode_time(v)),
                        kind: kind_hint(map, path),
                        max_wind_kt: lookup(map, WIND_KEYS).and_then(|(_, v)| decode_intensity(v)),
                        central_pressure_mb: lookup(map, PRESSURE_KEYS)
                            .and_then(|(_, v)| decode_intensity(v)),
                    };
                    self.points.push((path.clone(), point));
                }
                None => debug!(path = %path, latitude, longitude, "Position out of range"),
            }
        }

        for (key, child) in map {
            if consumed == Some(key.as_str()) {
                continue;
            }
            self.visit(child, &path.key(key));
        }
    }
}

/// Find a coordinate pair on the object itself or in a position container.
/// Returns the container key used, if any.
fn locate_pair(map: &Map<String, Value>) -> Option<(f64, f64, Option<&str>)> {
    if let Some((lat, lon)) = decode_pair(map) {
        return Some((lat, lon, None));
    }

    POSITION_KEYS.iter().find_map(|alias| {
        let (key, value) = lookup(map, &[*alias])?;
        let container = value.as_object()?;
        let (lat, lon) = decode_pair(container).or_else(|| {
            POSITION_FORMAT_KEYS.iter().find_map(|format| {
                let (_, nested) = lookup(container, &[*format])?;
                decode_pair(nested.as_object()?)
            })
        })?;
        Some((lat, lon, Some(key)))
    })
}

/// Range check, folding 180..360 east longitudes back into [-180, 180].
fn normalize_position(latitude: f64, longitude: f64) -> Option<(f64, f64)> {
    let longitude = if longitude > 180.0 && longitude <= 360.0 {
        longitude - 360.0
    } else {
        longitude
    };
    is_valid_position(latitude, longitude).then_some((latitude, longitude))
}

fn kind_hint(map: &Map<String, Value>, path: &JsonPath) -> Option<String> {
    path.nearest_key().map(str::to_string).or_else(|| {
        lookup(map, KIND_KEYS)
            .and_then(|(_, v)| v.as_str())
            .map(str::to_string)
    })
}
