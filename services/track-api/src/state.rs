//! Application state for the track API.

use std::sync::Arc;

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusHandle;

use crate::config::TrackConfig;
use crate::fetch::{HttpFetcher, TargetFetcher};
use crate::service::TrackService;

/// Shared application state.
pub struct AppState {
    /// Track pipeline and its result cache.
    pub service: TrackService,

    /// Prometheus recorder handle, absent when no recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// State backed by the HTTP fetcher.
    pub fn new(config: TrackConfig, metrics: Option<PrometheusHandle>) -> Result<Self> {
        let fetcher = HttpFetcher::new().context("Failed to create HTTP client")?;
        Ok(Self::with_fetcher(config, Arc::new(fetcher), metrics))
    }

    pub fn with_fetcher(
        config: TrackConfig,
        fetcher: Arc<dyn TargetFetcher>,
        metrics: Option<PrometheusHandle>,
    ) -> Self {
        Self {
            service: TrackService::new(config, fetcher),
            metrics,
        }
    }

    pub fn from_service(service: TrackService) -> Self {
        Self {
            service,
            metrics: None,
        }
    }
}
