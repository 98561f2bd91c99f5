//! Feature properties, one closed variant per feature kind.
//!
//! Serialized internally tagged on `kind`, with camelCase field names and
//! absent optionals omitted:
//!
//! ```json
//! {"kind": "forecastPoint", "eventId": "WP012026", "source": "jtwc",
//!  "aid": "JTWC", "cycle": "2026-01-01T18:00:00Z", "tau": 12,
//!  "time": "2026-01-02T06:00:00Z", "vmaxKt": 55}
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Feature kind tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FeatureKind {
    Center,
    BestTrack,
    ForecastTrack,
    ForecastPoint,
}

impl FeatureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureKind::Center => "center",
            FeatureKind::BestTrack => "bestTrack",
            FeatureKind::ForecastTrack => "forecastTrack",
            FeatureKind::ForecastPoint => "forecastPoint",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FeatureProperties {
    Center(CenterProperties),
    BestTrack(BestTrackProperties),
    ForecastTrack(ForecastTrackProperties),
    ForecastPoint(ForecastPointProperties),
}

impl FeatureProperties {
    pub fn kind(&self) -> FeatureKind {
        match self {
            FeatureProperties::Center(_) => FeatureKind::Center,
            FeatureProperties::BestTrack(_) => FeatureKind::BestTrack,
            FeatureProperties::ForecastTrack(_) => FeatureKind::ForecastTrack,
            FeatureProperties::ForecastPoint(_) => FeatureKind::ForecastPoint,
        }
    }

    pub fn event_id(&self) -> &str {
        match self {
            FeatureProperties::Center(p) => &p.event_id,
            FeatureProperties::BestTrack(p) => &p.event_id,
            FeatureProperties::ForecastTrack(p) => &p.event_id,
            FeatureProperties::ForecastPoint(p) => &p.event_id,
        }
    }

    pub fn source(&self) -> &str {
        match self {
            FeatureProperties::Center(p) => &p.source,
            FeatureProperties::BestTrack(p) => &p.source,
            FeatureProperties::ForecastTrack(p) => &p.source,
            FeatureProperties::ForecastPoint(p) => &p.source,
        }
    }
}

/// Current position of the storm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CenterProperties {
    pub event_id: String,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
    pub time: DateTime<Utc>,
    /// Technique of the fix (BEST, CARQ, or the aid when taken from a forecast)
    pub technique: String,
    /// Set when the center was taken from a forecast cycle
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub aid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub vmax_kt: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub mslp_mb: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BestTrackProperties {
    pub event_id: String,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
    pub technique: String,
    pub point_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastTrackProperties {
    pub event_id: String,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
    pub aid: String,
    pub cycle: DateTime<Utc>,
    pub point_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPointProperties {
    pub event_id: String,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
    pub aid: String,
    pub cycle: DateTime<Utc>,
    /// Forecast lead time (hours)
    pub tau: i32,
    /// Valid time, `cycle + tau`
    pub time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub vmax_kt: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub mslp_mb: Option<u32>,
}
