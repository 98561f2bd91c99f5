//! Source registry and URL resolution.

use std::collections::BTreeMap;
use std::fmt;

use cyclone_common::CycloneId;
use thiserror::Error;

use crate::config::{ProviderConfig, ProviderFormat, TrackConfig};

/// A provider name that is not configured.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown provider: {0}")]
pub struct UnknownProvider(pub String);

/// What a fetched payload is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    /// ATCF forecast deck
    ADeck,
    /// ATCF best-track deck
    BDeck,
    /// JSON track document for one cyclone
    Track,
    /// JSON listing of active events
    ActiveList,
    /// JSON document for one listed event
    Detail,
}

impl TargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::ADeck => "a_deck",
            TargetKind::BDeck => "b_deck",
            TargetKind::Track => "track",
            TargetKind::ActiveList => "active_list",
            TargetKind::Detail => "detail",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One URL to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTarget {
    pub url: String,
    pub kind: TargetKind,
}

impl FetchTarget {
    pub fn new(url: impl Into<String>, kind: TargetKind) -> Self {
        Self {
            url: url.into(),
            kind,
        }
    }
}

/// Read-only view of the configured providers.
#[derive(Debug, Clone)]
pub struct SourceRegistry {
    providers: BTreeMap<String, ProviderConfig>,
    default_provider: String,
}

impl SourceRegistry {
    pub fn new(config: &TrackConfig) -> Self {
        Self {
            providers: config.providers.clone(),
            default_provider: config.default_provider.clone(),
        }
    }

    /// Look up a provider by name (case-insensitive).
    pub fn provider(&self, name: &str) -> Result<&ProviderConfig, UnknownProvider> {
        let name = name.trim();
        self.providers
            .get(name)
            .or_else(|| {
                self.providers
                    .iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(name))
                    .map(|(_, p)| p)
            })
            .ok_or_else(|| UnknownProvider(name.to_string()))
    }

    pub fn default_provider(&self) -> Result<&ProviderConfig, UnknownProvider> {
        self.provider(&self.default_provider)
    }

    pub fn provider_names(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }

    /// Fetch targets for one cyclone. ATCF providers yield the b-deck then
    /// the a-deck (whichever are configured); JSON providers yield the track
    /// document.
    pub fn resolve(&self, provider: &ProviderConfig, id: &CycloneId) -> Vec<FetchTarget> {
        let render = |template: &Option<String>, kind| {
            template
                .as_deref()
                .filter(|t| !t.trim().is_empty())
                .map(|t| FetchTarget::new(render_template(t, id), kind))
        };

        match provider.format {
            ProviderFormat::Atcf => [
                render(&provider.b_deck_url_template, TargetKind::BDeck),
                render(&provider.a_deck_url_template, TargetKind::ADeck),
            ]
            .into_iter()
            .flatten()
            .collect(),
            ProviderFormat::Json => render(&provider.track_url_template, TargetKind::Track)
                .into_iter()
                .collect(),
        }
    }

    /// The active-event listing of a JSON provider.
    pub fn active_list_target(&self, provider: &ProviderConfig) -> Option<FetchTarget> {
        provider
            .active_list_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .map(|u| FetchTarget::new(u, TargetKind::ActiveList))
    }

    /// The detail document of one listed event. Ids that are not plain
    /// `[A-Za-z0-9_-]` tokens are refused so they cannot alter the URL path.
    pub fn detail_target(&self, provider: &ProviderConfig, event_id: &str) -> Option<FetchTarget> {
        if !is_safe_event_id(event_id) {
            return None;
        }
        provider
            .detail_url_template
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .map(|t| FetchTarget::new(t.replace("{event_id}", event_id), TargetKind::Detail))
    }
}

/// Substitute cyclone placeholders into a URL template.
///
/// | placeholder | value for `WP012026` |
/// |---|---|
/// | `{basin}` | `wp` |
/// | `{BASIN}` | `WP` |
/// | `{storm}` | `01` |
/// | `{year}` | `2026` |
/// | `{yy}` | `26` |
pub fn render_template(template: &str, id: &CycloneId) -> String {
    template
        .replace("{basin}", &id.basin().to_ascii_lowercase())
        .replace("{BASIN}", id.basin())
        .replace("{storm}", id.storm())
        .replace("{year}", id.year())
        .replace("{yy}", id.short_year())
}

fn is_safe_event_id(event_id: &str) -> bool {
    !event_id.is_empty()
        && event_id.len() <= 64
        && event_id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}
