//! Assembly of the normalized feature set for one cyclone.

use cyclone_common::TrackRecord;
use track_protocol::{
    BestTrackProperties, CenterProperties, FeatureProperties, ForecastPointProperties,
    ForecastTrackProperties, TrackFeature, TrackFeatureCollection,
};
use tracing::debug;

use crate::select::{select_best_track, select_forecast};

/// Identity stamped on every feature of one cyclone.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureContext {
    pub event_id: String,
    pub source: String,
    pub name: Option<String>,
}

impl FeatureContext {
    pub fn new(event_id: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            event_id: event_id.into(),
            source: source.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }
}

/// Records gathered for one cyclone, split by where they came from.
#[derive(Debug, Clone, Default)]
pub struct TrackInputs {
    /// Best-track source (b-deck, or normalized feed records)
    pub best: Vec<TrackRecord>,
    /// Forecast source (a-deck, or normalized feed records)
    pub forecast: Vec<TrackRecord>,
}

impl TrackInputs {
    pub fn is_empty(&self) -> bool {
        self.best.is_empty() && self.forecast.is_empty()
    }
}

/// Build the feature collection for one cyclone.
///
/// Emits, in order: the best-track line (two or more analysis points), the
/// center (latest analysis point), the forecast line for `technique` (two or
/// more points of its latest cycle) and one point per forecast vertex. When
/// there is no analysis, the forecast's offset-0 point (or its first point)
/// stands in as the center. No technique means no forecast features.
pub fn build_features(
    ctx: &FeatureContext,
    inputs: &TrackInputs,
    technique: Option<&str>,
) -> TrackFeatureCollection {
    let mut fc = TrackFeatureCollection::new();

    let best = select_best_track(&inputs.best);
    if best.len() >= 2 {
        fc.features.push(TrackFeature::line_string(
            best.iter().map(|r| r.lon_lat()).collect(),
            FeatureProperties::BestTrack(BestTrackProperties {
                event_id: ctx.event_id.clone(),
                source: ctx.source.clone(),
                name: ctx.name.clone(),
                technique: best[0].technique.clone(),
                point_count: best.len(),
            }),
        ));
    }

    let center = best.last().copied();
    if let Some(center) = center {
        fc.features.push(center_feature(ctx, center, None));
    }

    let technique = technique.map(str::trim).filter(|t| !t.is_empty());
    if let Some(technique) = technique {
        let forecast = select_forecast(&inputs.forecast, technique);
        let aid = technique.to_ascii_uppercase();

        if let Some(first) = forecast.first() {
            let cycle = first.cycle_time;

            if forecast.len() >= 2 {
                fc.features.push(TrackFeature::line_string(
                    forecast.iter().map(|r| r.lon_lat()).collect(),
                    FeatureProperties::ForecastTrack(ForecastTrackProperties {
                        event_id: ctx.event_id.clone(),
                        source: ctx.source.clone(),
                        name: ctx.name.clone(),
                        aid: aid.clone(),
                        cycle,
                        point_count: forecast.len(),
                    }),
                ));
            }

            for point in &forecast {
                fc.features.push(TrackFeature::point(
                    point.lon_lat(),
                    FeatureProperties::ForecastPoint(ForecastPointProperties {
                        event_id: ctx.event_id.clone(),
                        source: ctx.source.clone(),
                        name: ctx.name.clone(),
                        aid: aid.clone(),
                        cycle,
                        tau: point.forecast_offset_hours,
                        time: point.valid_time(),
                        vmax_kt: point.max_wind_kt,
                        mslp_mb: point.central_pressure_mb,
                    }),
                ));
            }

            if center.is_none() {
                let stand_in = forecast
                    .iter()
                    .find(|r| r.forecast_offset_hours == 0)
                    .unwrap_or(first);
                fc.features.push(center_feature(ctx, stand_in, Some(aid)));
            }
        }
    }

    debug!(
        event_id = %ctx.event_id,
        source = %ctx.source,
        best_points = best.len(),
        features = fc.len(),
        "Built track features"
    );

    fc
}

fn center_feature(ctx: &FeatureContext, record: &TrackRecord, aid: Option<String>) -> TrackFeature {
    TrackFeature::point(
        record.lon_lat(),
        FeatureProperties::Center(CenterProperties {
            event_id: ctx.event_id.clone(),
            source: ctx.source.clone(),
            name: ctx.name.clone(),
            time: record.valid_time(),
            technique: record.technique.clone(),
            aid,
            vmax_kt: record.max_wind_kt,
            mslp_mb: record.central_pressure_mb,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::record;
    use track_protocol::{FeatureKind, TrackGeometry};

    fn ctx() -> FeatureContext {
        FeatureContext::new("WP012026", "jtwc")
    }

    #[test]
    fn test_empty_inputs_give_empty_collection() {
        let fc = build_features(&ctx(), &TrackInputs::default(), Some("JTWC"));
        assert!(fc.is_empty());
    }

    #[test]
    fn test_single_best_point_is_center_only() {
        let inputs = TrackInputs {
            best: vec![record("BEST", 0, 0, 10.0, 135.0)],
            forecast: vec![],
        };
        let fc = build_features(&ctx(), &inputs, None);
        assert_eq!(fc.len(), 1);
        assert_eq!(fc.features[0].kind(), FeatureKind::Center);
        assert_eq!(fc.features[0].geometry, TrackGeometry::point(135.0, 10.0));
    }

    #[test]
    fn test_no_technique_no_forecast() {
        let inputs = TrackInputs {
            best: vec![],
            forecast: vec![record("JTWC", 0, 0, 10.0, 135.0), record("JTWC", 0, 12, 11.0, 134.0)],
        };
        assert!(build_features(&ctx(), &inputs, None).is_empty());
        assert!(build_features(&ctx(), &inputs, Some("  ")).is_empty());
    }

    #[test]
    fn test_single_forecast_point_has_no_line() {
        let inputs = TrackInputs {
            best: vec![record("BEST", 0, 0, 10.0, 135.0)],
            forecast: vec![record("JTWC", 0, 12, 11.0, 134.0)],
        };
        let fc = build_features(&ctx(), &inputs, Some("JTWC"));
        assert_eq!(fc.of_kind(FeatureKind::ForecastTrack).count(), 0);
        assert_eq!(fc.of_kind(FeatureKind::ForecastPoint).count(), 1);
    }

    #[test]
    fn test_stand_in_center_without_offset_zero() {
        let inputs = TrackInputs {
            best: vec![],
            forecast: vec![record("JTWC", 0, 24, 12.0, 133.0), record("JTWC", 0, 12, 11.0, 134.0)],
        };
        let fc = build_features(&ctx(), &inputs, Some("jtwc"));
        let center = fc.of_kind(FeatureKind::Center).next().unwrap();
        assert_eq!(center.geometry, TrackGeometry::point(134.0, 11.0));
        match &center.properties {
            FeatureProperties::Center(p) => {
                assert_eq!(p.aid.as_deref(), Some("JTWC"));
                assert_eq!(p.time, record("JTWC", 0, 12, 11.0, 134.0).valid_time());
            }
            other => panic!("Expected center properties, got {:?}", other),
        }
    }
}
