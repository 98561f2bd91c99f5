//! The track pipeline: resolve, fetch, parse, build, cache.

use std::sync::Arc;

use atcf_parser::parse_deck;
use cyclone_common::CycloneId;
use feed_parser::{dedup_points, extract_event_entries, extract_name, extract_points, parse_feed};
use futures::future::join_all;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use track_builder::{build_features, records_from_points, FeatureContext, FeedLabels, TrackInputs};
use track_protocol::TrackFeatureCollection;

use crate::cache::{ResultCache, TrackCacheKey};
use crate::config::{ProviderConfig, ProviderFormat, TrackConfig};
use crate::error::{TrackApiError, TrackApiResult};
use crate::fetch::{fetch_all, FetchOutcome, FetchedPayload, TargetFetcher};
use crate::registry::{SourceRegistry, TargetKind};

/// Cache key id for a provider's whole active listing.
const ACTIVE_FEED_KEY: &str = "active";

/// Builds and caches track feature collections.
pub struct TrackService {
    config: TrackConfig,
    registry: SourceRegistry,
    fetcher: Arc<dyn TargetFetcher>,
    cache: ResultCache,
}

impl TrackService {
    pub fn new(config: TrackConfig, fetcher: Arc<dyn TargetFetcher>) -> Self {
        let cache = ResultCache::new(config.cache_ttl(), config.cache_max_entries);
        let registry = SourceRegistry::new(&config);
        Self {
            config,
            registry,
            fetcher,
            cache,
        }
    }

    /// Replace the result cache, e.g. to use a sub-second TTL.
    pub fn with_cache(mut self, cache: ResultCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn config(&self) -> &TrackConfig {
        &self.config
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// Pick the provider for a request. Unknown names fall back to the
    /// default provider only when `allow_provider_fallback` is set.
    pub fn resolve_provider(&self, source: Option<&str>) -> TrackApiResult<&ProviderConfig> {
        let Some(name) = source.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(self.registry.default_provider()?);
        };

        match self.registry.provider(name) {
            Ok(provider) => Ok(provider),
            Err(unknown) if self.config.allow_provider_fallback => {
                warn!(
                    provider = %unknown.0,
                    fallback = %self.config.default_provider,
                    "Unknown provider, using default"
                );
                Ok(self.registry.default_provider()?)
            }
            Err(unknown) => Err(unknown.into()),
        }
    }

    /// Feature collection for one cyclone. Invalid ids and unknown providers
    /// give an empty collection without touching the network.
    pub async fn get_cyclone(
        &self,
        event_id: &str,
        source: Option<&str>,
        aid: Option<&str>,
    ) -> Arc<TrackFeatureCollection> {
        let cancel = CancellationToken::new();
        self.get_cyclone_with_cancel(event_id, source, aid, &cancel)
            .await
    }

    #[instrument(skip(self, cancel))]
    pub async fn get_cyclone_with_cancel(
        &self,
        event_id: &str,
        source: Option<&str>,
        aid: Option<&str>,
        cancel: &CancellationToken,
    ) -> Arc<TrackFeatureCollection> {
        match self.cyclone_pipeline(event_id, source, aid, cancel).await {
            Ok(collection) => collection,
            Err(e) => {
                debug!(error = %e, "Request resolved to empty collection");
                Arc::new(TrackFeatureCollection::new())
            }
        }
    }

    async fn cyclone_pipeline(
        &self,
        event_id: &str,
        source: Option<&str>,
        aid: Option<&str>,
        cancel: &CancellationToken,
    ) -> TrackApiResult<Arc<TrackFeatureCollection>> {
        let id = CycloneId::parse(event_id)?;
        let provider = self.resolve_provider(source)?;
        let technique = match provider.format {
            ProviderFormat::Atcf => self.config.technique_for(provider, aid),
            ProviderFormat::Json => provider.technique_label(),
        };

        let key = TrackCacheKey::new(&provider.name, id.as_str(), Some(technique.clone()));
        self.cache
            .get_or_compute(&key, || self.compute_cyclone(provider, &id, &technique, cancel))
            .await
    }

    async fn compute_cyclone(
        &self,
        provider: &ProviderConfig,
        id: &CycloneId,
        technique: &str,
        cancel: &CancellationToken,
    ) -> TrackApiResult<TrackFeatureCollection> {
        let targets = self.registry.resolve(provider, id);
        let payloads = fetch_all(self.fetcher.as_ref(), &targets, provider, cancel).await;
        ensure_not_cancelled(&payloads, cancel)?;

        let mut inputs = TrackInputs::default();
        let mut name = None;

        for payload in payloads.iter().filter(|p| p.outcome.is_ok()) {
            match payload.target.kind {
                TargetKind::BDeck => inputs.best.extend(parse_deck(&payload.body)),
                TargetKind::ADeck => inputs.forecast.extend(parse_deck(&payload.body)),
                TargetKind::Track | TargetKind::Detail | TargetKind::ActiveList => {
                    if let Some(doc) = parse_document(&payload.body, &payload.target.url) {
                        let labels = FeedLabels {
                            basin: id.basin().to_string(),
                            storm_number: id.storm().to_string(),
                            technique: technique.to_string(),
                        };
                        let records = feed_records(&doc, &labels);
                        inputs.best.extend(records.iter().cloned());
                        inputs.forecast.extend(records);
                        name = name.or_else(|| extract_name(&doc));
                    }
                }
            }
        }

        let name = match provider.format {
            ProviderFormat::Atcf => Some(id.to_string()),
            ProviderFormat::Json => name.or_else(|| Some(id.to_string())),
        };
        let ctx = FeatureContext::new(id.as_str(), &provider.name).with_name(name);
        let collection = build_features(&ctx, &inputs, Some(technique));

        info!(
            event_id = %id,
            provider = %provider.name,
            technique = %technique,
            best_records = inputs.best.len(),
            forecast_records = inputs.forecast.len(),
            features = collection.len(),
            "Built cyclone track"
        );
        Ok(collection)
    }

    /// Merged collection for several cyclones. `None` uses the configured
    /// default ids; an explicit empty list gives an empty collection.
    #[instrument(skip(self, event_ids))]
    pub async fn get_active(
        &self,
        event_ids: Option<Vec<String>>,
        source: Option<&str>,
        aid: Option<&str>,
    ) -> TrackFeatureCollection {
        let ids = event_ids.unwrap_or_else(|| self.config.default_active_ids.clone());

        let mut unique: Vec<String> = Vec::new();
        for id in ids.iter().map(|s| s.trim().to_ascii_uppercase()) {
            if !id.is_empty() && !unique.contains(&id) {
                unique.push(id);
            }
        }

        let cancel = CancellationToken::new();
        let collections = join_all(
            unique
                .iter()
                .map(|id| self.get_cyclone_with_cancel(id, source, aid, &cancel)),
        )
        .await;

        let mut merged = TrackFeatureCollection::new();
        for collection in collections {
            merged.merge(collection.as_ref().clone());
        }
        merged
    }

    /// Every event listed by a JSON provider's active feed, merged.
    pub async fn get_feed_active(&self, source: Option<&str>) -> Arc<TrackFeatureCollection> {
        let cancel = CancellationToken::new();
        match self.feed_active_pipeline(source, &cancel).await {
            Ok(collection) => collection,
            Err(e) => {
                debug!(error = %e, "Active feed resolved to empty collection");
                Arc::new(TrackFeatureCollection::new())
            }
        }
    }

    async fn feed_active_pipeline(
        &self,
        source: Option<&str>,
        cancel: &CancellationToken,
    ) -> TrackApiResult<Arc<TrackFeatureCollection>> {
        let provider = self.resolve_provider(source)?;
        if provider.format != ProviderFormat::Json || self.registry.active_list_target(provider).is_none() {
            return Err(TrackApiError::Unsupported {
                provider: provider.name.clone(),
                operation: "active listing",
            });
        }

        let key = TrackCacheKey::new(&provider.name, ACTIVE_FEED_KEY, None);
        self.cache
            .get_or_compute(&key, || self.compute_feed_active(provider, cancel))
            .await
    }

    #[instrument(skip(self, provider, cancel), fields(provider = %provider.name))]
    async fn compute_feed_active(
        &self,
        provider: &ProviderConfig,
        cancel: &CancellationToken,
    ) -> TrackApiResult<TrackFeatureCollection> {
        let Some(list_target) = self.registry.active_list_target(provider) else {
            return Ok(TrackFeatureCollection::new());
        };

        let listing = fetch_all(self.fetcher.as_ref(), &[list_target], provider, cancel).await;
        ensure_not_cancelled(&listing, cancel)?;
        let Some(list_doc) = listing
            .iter()
            .find(|p| p.outcome.is_ok())
            .and_then(|p| parse_document(&p.body, &p.target.url))
        else {
            return Ok(TrackFeatureCollection::new());
        };

        let entries = extract_event_entries(&list_doc);
        let details: Vec<_> = entries
            .iter()
            .filter_map(|(id, _)| self.registry.detail_target(provider, id))
            .collect();
        let detail_payloads = fetch_all(self.fetcher.as_ref(), &details, provider, cancel).await;
        ensure_not_cancelled(&detail_payloads, cancel)?;

        let technique = provider.technique_label();
        let mut merged = TrackFeatureCollection::new();

        for (event_id, entry) in &entries {
            let detail_doc = detail_payloads
                .iter()
                .filter(|p| p.outcome.is_ok())
                .find(|p| self.registry.detail_target(provider, event_id).as_ref() == Some(&p.target))
                .and_then(|p| parse_document(&p.body, &p.target.url));

            let labels = FeedLabels::for_event(event_id, &provider.basin, &technique);
            let mut records = detail_doc
                .as_ref()
                .map(|doc| feed_records(doc, &labels))
                .unwrap_or_default();
            if records.is_empty() {
                records = feed_records(entry, &labels);
            }

            let name = detail_doc
                .as_ref()
                .and_then(extract_name)
                .or_else(|| extract_name(entry));
            let ctx = FeatureContext::new(event_id.as_str(), &provider.name).with_name(name);
            let inputs = TrackInputs {
                best: records.clone(),
                forecast: records,
            };
            merged.merge(build_features(&ctx, &inputs, Some(&technique)));
        }

        info!(
            events = entries.len(),
            features = merged.len(),
            "Built active feed tracks"
        );
        Ok(merged)
    }
}

/// A cancelled request must not leave its partial result in the cache.
fn ensure_not_cancelled(payloads: &[FetchedPayload], cancel: &CancellationToken) -> TrackApiResult<()> {
    let cancelled = cancel.is_cancelled()
        || payloads.iter().any(|p| p.outcome == FetchOutcome::Cancelled);
    if cancelled {
        return Err(TrackApiError::Cancelled);
    }
    Ok(())
}

fn parse_document(body: &str, url: &str) -> Option<Value> {
    match parse_feed(body) {
        Ok(doc) => Some(doc),
        Err(e) => {
            warn!(url = %url, error = %e, "Skipping unreadable feed document");
            None
        }
    }
}

fn feed_records(doc: &Value, labels: &FeedLabels) -> Vec<cyclone_common::TrackRecord> {
    let points = dedup_points(extract_points(doc).into_iter().map(|(_, p)| p).collect());
    records_from_points(&points, labels)
}
