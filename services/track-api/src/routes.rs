//! Router assembly.

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::handlers;
use crate::state::AppState;

/// All routes with middleware applied.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Cyclone tracks
        .route(
            "/api/cyclone/active",
            get(handlers::cyclone::active_handler),
        )
        .route(
            "/api/cyclone/atcf/:event_id",
            get(handlers::cyclone::cyclone_handler),
        )
        // Agency feed listing
        .route(
            "/api/typhoon/active",
            get(handlers::cyclone::feed_active_handler),
        )
        // Health and metrics
        .route("/health", get(handlers::health::health_handler))
        .route("/ready", get(handlers::health::ready_handler))
        .route("/metrics", get(handlers::health::metrics_handler))
        // Middleware
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
