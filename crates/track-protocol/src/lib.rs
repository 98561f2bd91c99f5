//! Normalized cyclone track features as GeoJSON.
//!
//! A cyclone is described by up to four kinds of feature:
//!
//! - `center`: current position (Point)
//! - `bestTrack`: analysed positions so far (LineString)
//! - `forecastTrack`: one aid's latest forecast cycle (LineString)
//! - `forecastPoint`: each vertex of that forecast with lead and valid time (Point)
//!
//! # Example
//!
//! ```rust
//! use track_protocol::TrackFeatureCollection;
//!
//! let fc = TrackFeatureCollection::new();
//! let body = serde_json::to_string(&fc).unwrap();
//! assert_eq!(body, r#"{"type":"FeatureCollection","features":[]}"#);
//! ```

pub mod geojson;
pub mod properties;

pub use geojson::{TrackFeature, TrackFeatureCollection, TrackGeometry};
pub use properties::{
    BestTrackProperties, CenterProperties, FeatureKind, FeatureProperties,
    ForecastPointProperties, ForecastTrackProperties,
};

/// Media types
pub mod media_types {
    /// GeoJSON (RFC 7946)
    pub const GEO_JSON: &str = "application/geo+json";
}
