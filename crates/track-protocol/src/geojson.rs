//! GeoJSON types for track responses.
//!
//! Every response is a FeatureCollection. Coordinates are always
//! `[longitude, latitude]` (RFC 7946 §3.1.1).

use serde::{Deserialize, Serialize};

use crate::properties::{FeatureKind, FeatureProperties};

/// A GeoJSON FeatureCollection of track features.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackFeatureCollection {
    /// Type identifier (always "FeatureCollection").
    #[serde(rename = "type")]
    pub type_: String,

    pub features: Vec<TrackFeature>,
}

impl TrackFeatureCollection {
    /// Create a new empty FeatureCollection.
    pub fn new() -> Self {
        Self {
            type_: "FeatureCollection".to_string(),
            features: Vec::new(),
        }
    }

    /// Append another collection's features.
    pub fn merge(&mut self, other: TrackFeatureCollection) {
        self.features.extend(other.features);
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Features of one kind, in collection order.
    pub fn of_kind(&self, kind: FeatureKind) -> impl Iterator<Item = &TrackFeature> {
        self.features
            .iter()
            .filter(move |f| f.properties.kind() == kind)
    }
}

impl Default for TrackFeatureCollection {
    fn default() -> Self {
        Self::new()
    }
}

/// A GeoJSON Feature.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackFeature {
    /// Type identifier (always "Feature").
    #[serde(rename = "type")]
    pub type_: String,

    pub geometry: TrackGeometry,

    pub properties: FeatureProperties,
}

impl TrackFeature {
    pub fn new(geometry: TrackGeometry, properties: FeatureProperties) -> Self {
        Self {
            type_: "Feature".to_string(),
            geometry,
            properties,
        }
    }

    /// Point feature at `[lon, lat]`.
    pub fn point(coordinates: [f64; 2], properties: FeatureProperties) -> Self {
        Self::new(TrackGeometry::Point { coordinates }, properties)
    }

    /// LineString feature through `[lon, lat]` vertices.
    pub fn line_string(coordinates: Vec<[f64; 2]>, properties: FeatureProperties) -> Self {
        Self::new(TrackGeometry::LineString { coordinates }, properties)
    }

    pub fn kind(&self) -> FeatureKind {
        self.properties.kind()
    }
}

/// GeoJSON geometry types used by track features.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum TrackGeometry {
    Point {
        /// Coordinates as [longitude, latitude].
        coordinates: [f64; 2],
    },

    LineString {
        /// Array of [longitude, latitude] coordinate pairs.
        coordinates: Vec<[f64; 2]>,
    },
}

impl TrackGeometry {
    pub fn point(lon: f64, lat: f64) -> Self {
        TrackGeometry::Point {
            coordinates: [lon, lat],
        }
    }
}
