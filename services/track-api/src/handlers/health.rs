//! Health, readiness and metrics handlers.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::cache::CacheStatsSnapshot;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Serialize)]
pub struct ReadyResponse {
    pub ready: bool,
    pub default_provider: String,
    pub default_technique: String,
    pub providers: Vec<String>,
    pub cache_ttl_secs: u64,
    pub cache_entries: usize,
    pub cache: CacheStatsSnapshot,
}

/// GET /health - Basic health check
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// GET /ready - Configuration summary and cache statistics
pub async fn ready_handler(Extension(state): Extension<Arc<AppState>>) -> Json<ReadyResponse> {
    let service = &state.service;
    let config = service.config();

    Json(ReadyResponse {
        ready: service.registry().default_provider().is_ok(),
        default_provider: config.default_provider.clone(),
        default_technique: config.default_technique.clone(),
        providers: service.registry().provider_names().map(str::to_string).collect(),
        cache_ttl_secs: service.cache().ttl().as_secs(),
        cache_entries: service.cache().len().await,
        cache: service.cache().stats().snapshot(),
    })
}

/// GET /metrics - Prometheus metrics
pub async fn metrics_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    let body = state
        .metrics
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default();

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
        .into_response()
}
