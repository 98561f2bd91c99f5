//! In-process fetcher and configuration shared by the service tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use track_api::config::{ProviderConfig, TrackConfig};
use track_api::fetch::{FetchOutcome, FetchedPayload, TargetFetcher};
use track_api::registry::FetchTarget;
use track_api::service::TrackService;

pub const A_DECK_URL: &str = "http://decks.test/awp012026.dat";
pub const B_DECK_URL: &str = "http://decks.test/bwp012026.dat";
pub const FEED_TRACK_URL: &str = "http://feed.test/TC2601.json";
pub const FEED_LIST_URL: &str = "http://feed.test/list.json";
pub const FEED_DETAIL_URL: &str = "http://feed.test/TC2601.json";

pub const CONFIG_YAML: &str = r#"
default_provider: jtwc
default_technique: JTWC
cache_ttl_secs: 300
default_active_ids: [WP012026]
providers:
  jtwc:
    format: atcf
    a_deck_url_template: "http://decks.test/a{basin}{storm}{year}.dat"
    b_deck_url_template: "http://decks.test/b{basin}{storm}{year}.dat"
  jma:
    format: json
    technique: JMA
    track_url_template: "http://feed.test/TC{yy}{storm}.json"
    active_list_url: "http://feed.test/list.json"
    detail_url_template: "http://feed.test/{event_id}.json"
"#;

pub fn config() -> TrackConfig {
    TrackConfig::from_yaml(CONFIG_YAML).unwrap()
}

/// Serves canned bodies by URL and counts every fetch. Unknown URLs answer
/// 404; a cancelled token after the optional delay answers `Cancelled`.
#[derive(Default)]
pub struct StubFetcher {
    bodies: HashMap<String, String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, url: &str, body: &str) -> Self {
        self.bodies.insert(url.to_string(), body.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TargetFetcher for StubFetcher {
    async fn fetch(
        &self,
        target: &FetchTarget,
        _provider: &ProviderConfig,
        cancel: &CancellationToken,
    ) -> FetchedPayload {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if cancel.is_cancelled() {
            return FetchedPayload::failed(target.clone(), FetchOutcome::Cancelled);
        }
        match self.bodies.get(&target.url) {
            Some(body) => FetchedPayload::ok(target.clone(), body.clone()),
            None => FetchedPayload::failed(target.clone(), FetchOutcome::Status(404)),
        }
    }
}

/// Fetcher serving both decks of the fixture cyclone.
pub fn deck_fetcher() -> Arc<StubFetcher> {
    Arc::new(
        StubFetcher::new()
            .with_body(A_DECK_URL, test_utils::A_DECK)
            .with_body(B_DECK_URL, test_utils::B_DECK),
    )
}

/// Fetcher serving the agency feed: listing plus the TC2601 document.
pub fn feed_fetcher() -> Arc<StubFetcher> {
    Arc::new(
        StubFetcher::new()
            .with_body(FEED_LIST_URL, test_utils::JSON_ACTIVE_LIST)
            .with_body(FEED_DETAIL_URL, test_utils::JSON_TRACK_FEED),
    )
}

pub fn service(fetcher: Arc<StubFetcher>) -> TrackService {
    TrackService::new(config(), fetcher)
}
