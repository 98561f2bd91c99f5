//! Cyclone track handlers.
//!
//! Every track endpoint answers 200 with a FeatureCollection; an empty
//! collection is the worst case.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::header,
    response::{IntoResponse, Response},
};
use metrics::counter;
use serde::Deserialize;
use track_protocol::{media_types, TrackFeatureCollection};

use crate::state::AppState;

const EMPTY_COLLECTION: &str = r#"{"type":"FeatureCollection","features":[]}"#;

/// Query parameters shared by the track endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackQuery {
    /// Provider name
    pub source: Option<String>,
    /// Forecast aid, e.g. `OFCL`
    pub aid: Option<String>,
    /// Comma-separated cyclone ids (active endpoint only)
    pub event_ids: Option<String>,
}

impl TrackQuery {
    /// `None` when the parameter is absent, an empty list when it is blank.
    pub fn event_id_list(&self) -> Option<Vec<String>> {
        self.event_ids.as_deref().map(|ids| {
            ids.split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .collect()
        })
    }
}

/// GET /api/cyclone/active
pub async fn active_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<TrackQuery>,
) -> Response {
    counter!("cyclone_requests_total", "endpoint" => "active").increment(1);

    let collection = state
        .service
        .get_active(
            query.event_id_list(),
            query.source.as_deref(),
            query.aid.as_deref(),
        )
        .await;

    geo_json_response(&collection)
}

/// GET /api/cyclone/atcf/:event_id
pub async fn cyclone_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(event_id): Path<String>,
    Query(query): Query<TrackQuery>,
) -> Response {
    counter!("cyclone_requests_total", "endpoint" => "cyclone").increment(1);

    let collection = state
        .service
        .get_cyclone(&event_id, query.source.as_deref(), query.aid.as_deref())
        .await;

    geo_json_response(&collection)
}

/// GET /api/typhoon/active
pub async fn feed_active_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<TrackQuery>,
) -> Response {
    counter!("cyclone_requests_total", "endpoint" => "feed_active").increment(1);

    let collection = state
        .service
        .get_feed_active(query.source.as_deref())
        .await;

    geo_json_response(&collection)
}

fn geo_json_response(collection: &TrackFeatureCollection) -> Response {
    let body = serde_json::to_string(collection).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to serialize feature collection");
        EMPTY_COLLECTION.to_string()
    });

    ([(header::CONTENT_TYPE, media_types::GEO_JSON)], body).into_response()
}
