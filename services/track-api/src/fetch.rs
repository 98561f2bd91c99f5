//! Fetch orchestration.
//!
//! Every target is fetched concurrently under its provider's timeout and the
//! request's cancellation token. A failed target yields an empty body and
//! never affects its siblings.

use std::io::Read;

use async_trait::async_trait;
use bytes::Bytes;
use flate2::read::MultiGzDecoder;
use futures::future::join_all;
use metrics::counter;
use reqwest::header::{CONTENT_ENCODING, USER_AGENT};
use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use crate::config::ProviderConfig;
use crate::registry::FetchTarget;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// How a single fetch ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Ok,
    Timeout,
    Status(u16),
    Transport(String),
    Decode(String),
    Cancelled,
}

impl FetchOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, FetchOutcome::Ok)
    }

    /// Metric label.
    pub fn label(&self) -> &'static str {
        match self {
            FetchOutcome::Ok => "ok",
            FetchOutcome::Timeout => "timeout",
            FetchOutcome::Status(_) => "status",
            FetchOutcome::Transport(_) => "transport",
            FetchOutcome::Decode(_) => "decode",
            FetchOutcome::Cancelled => "cancelled",
        }
    }
}

/// Body of one target; empty unless `outcome` is `Ok`.
#[derive(Debug, Clone)]
pub struct FetchedPayload {
    pub target: FetchTarget,
    pub outcome: FetchOutcome,
    pub body: String,
}

impl FetchedPayload {
    pub fn ok(target: FetchTarget, body: String) -> Self {
        Self {
            target,
            outcome: FetchOutcome::Ok,
            body,
        }
    }

    pub fn failed(target: FetchTarget, outcome: FetchOutcome) -> Self {
        Self {
            target,
            outcome,
            body: String::new(),
        }
    }
}

/// Retrieves one target. Implementations must not fail: every problem is
/// reported through [`FetchOutcome`].
#[async_trait]
pub trait TargetFetcher: Send + Sync {
    async fn fetch(
        &self,
        target: &FetchTarget,
        provider: &ProviderConfig,
        cancel: &CancellationToken,
    ) -> FetchedPayload;
}

/// Fetch all targets concurrently; results keep the order of `targets`.
pub async fn fetch_all(
    fetcher: &dyn TargetFetcher,
    targets: &[FetchTarget],
    provider: &ProviderConfig,
    cancel: &CancellationToken,
) -> Vec<FetchedPayload> {
    join_all(
        targets
            .iter()
            .map(|target| fetcher.fetch(target, provider, cancel)),
    )
    .await
}

/// HTTP fetcher over one shared reqwest client. Provider settings (user
/// agent, timeout) are applied per request.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> reqwest::Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    async fn get(&self, target: &FetchTarget, provider: &ProviderConfig) -> Result<String, FetchOutcome> {
        let response = self
            .client
            .get(&target.url)
            .header(USER_AGENT, provider.user_agent.as_str())
            .send()
            .await
            .map_err(|e| FetchOutcome::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchOutcome::Status(status.as_u16()));
        }

        let gzip_header = response
            .headers()
            .get(CONTENT_ENCODING)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.to_ascii_lowercase().contains("gzip"));
        let compressed = gzip_header || target.url.to_ascii_lowercase().ends_with(".gz");

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchOutcome::Transport(e.to_string()))?;

        decode_body(bytes, compressed)
    }
}

#[async_trait]
impl TargetFetcher for HttpFetcher {
    #[instrument(skip(self, provider, cancel), fields(provider = %provider.name, kind = %target.kind))]
    async fn fetch(
        &self,
        target: &FetchTarget,
        provider: &ProviderConfig,
        cancel: &CancellationToken,
    ) -> FetchedPayload {
        let result = tokio::select! {
            _ = cancel.cancelled() => Err(FetchOutcome::Cancelled),
            timed = tokio::time::timeout(provider.timeout(), self.get(target, provider)) => {
                timed.unwrap_or(Err(FetchOutcome::Timeout))
            }
        };

        let payload = match result {
            Ok(body) => {
                debug!(url = %target.url, bytes = body.len(), "Fetched target");
                FetchedPayload::ok(target.clone(), body)
            }
            Err(outcome) => {
                warn!(url = %target.url, outcome = ?outcome, "Fetch failed, continuing without this target");
                FetchedPayload::failed(target.clone(), outcome)
            }
        };

        counter!(
            "cyclone_fetch_total",
            "provider" => provider.name.clone(),
            "outcome" => payload.outcome.label()
        )
        .increment(1);

        payload
    }
}

/// Decompress (when flagged and the gzip magic is present) and decode as
/// lossy UTF-8. Servers that already inflated a `.gz` URL pass through.
pub fn decode_body(bytes: Bytes, compressed: bool) -> Result<String, FetchOutcome> {
    if compressed && bytes.starts_with(&GZIP_MAGIC) {
        let mut inflated = Vec::new();
        MultiGzDecoder::new(bytes.as_ref())
            .read_to_end(&mut inflated)
            .map_err(|e| FetchOutcome::Decode(e.to_string()))?;
        return Ok(String::from_utf8_lossy(&inflated).into_owned());
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
