//! Track observation and forecast records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::time::valid_time;

/// One observation or forecast position of a cyclone.
///
/// Produced by the deck parser and by the JSON feed normalizer. A record
/// is a forecast iff `forecast_offset_hours > 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackRecord {
    /// Uppercase basin code (WP, AL, EP, IO, SH...)
    pub basin: String,
    /// Two digit storm number within the basin season
    pub storm_number: String,
    /// Cycle (issue) time of the record batch, the deck DTG
    pub cycle_time: DateTime<Utc>,
    /// Technique or aid label (BEST, CARQ, JTWC, OFCL...)
    pub technique: String,
    /// Forecast lead time in hours, 0 for analysis
    pub forecast_offset_hours: i32,
    /// Decimal degrees, south negative
    pub latitude: f64,
    /// Decimal degrees, west negative
    pub longitude: f64,
    /// Maximum sustained wind (knots)
    pub max_wind_kt: Option<u32>,
    /// Minimum central pressure (mb)
    pub central_pressure_mb: Option<u32>,
}

impl TrackRecord {
    pub fn is_forecast(&self) -> bool {
        self.forecast_offset_hours > 0
    }

    /// Cycle time plus forecast offset.
    pub fn valid_time(&self) -> DateTime<Utc> {
        valid_time(self.cycle_time, self.forecast_offset_hours)
    }

    /// GeoJSON coordinate pair, `[longitude, latitude]`.
    pub fn lon_lat(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}

/// Check that a position lies within the valid geographic range.
pub fn is_valid_position(latitude: f64, longitude: f64) -> bool {
    latitude.is_finite()
        && longitude.is_finite()
        && (-90.0..=90.0).contains(&latitude)
        && (-180.0..=180.0).contains(&longitude)
}
