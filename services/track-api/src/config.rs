//! Provider configuration loading and types.
//!
//! Loaded once at startup from `config/providers.yaml` (or `--config`).
//! `${VAR}` and `${VAR:-default}` are substituted from the environment
//! before the YAML is parsed. A missing file falls back to built-in
//! providers.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

/// Fetch timeouts are clamped to this range.
pub const MIN_TIMEOUT_SECS: u64 = 3;
pub const MAX_TIMEOUT_SECS: u64 = 30;

/// Service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackConfig {
    /// Provider used when a request names none
    #[serde(default = "default_provider_name")]
    pub default_provider: String,

    /// Forecast aid used when a request names none
    #[serde(default = "default_technique")]
    pub default_technique: String,

    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    #[serde(default = "default_cache_max_entries")]
    pub cache_max_entries: usize,

    /// Cyclones served by the active endpoint when the request lists none
    #[serde(default)]
    pub default_active_ids: Vec<String>,

    /// Serve unknown provider names from the default provider instead of
    /// returning an empty collection
    #[serde(default)]
    pub allow_provider_fallback: bool,

    #[serde(default)]
    pub providers: BTreeMap<String, ProviderConfig>,
}

/// Payload format of a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderFormat {
    /// ATCF a-deck / b-deck text
    Atcf,
    /// Agency JSON feed
    Json,
}

/// Settings for one upstream provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Map key in the config file
    #[serde(skip)]
    pub name: String,

    pub format: ProviderFormat,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Forecast deck, e.g. `https://host/a{basin}{storm}{year}.dat.gz`
    #[serde(default)]
    pub a_deck_url_template: Option<String>,

    /// Best-track deck, e.g. `https://host/b{basin}{storm}{year}.dat`
    #[serde(default)]
    pub b_deck_url_template: Option<String>,

    /// Per-cyclone JSON track document
    #[serde(default)]
    pub track_url_template: Option<String>,

    /// JSON listing of active events
    #[serde(default)]
    pub active_list_url: Option<String>,

    /// Per-event JSON detail document, `{event_id}` placeholder
    #[serde(default)]
    pub detail_url_template: Option<String>,

    /// Technique label for records normalized from a JSON feed
    #[serde(default)]
    pub technique: Option<String>,

    /// Overrides the global default aid for this provider
    #[serde(default)]
    pub default_technique: Option<String>,

    /// Basin label for JSON feed records
    #[serde(default = "default_basin")]
    pub basin: String,
}

fn default_provider_name() -> String {
    "jtwc".to_string()
}

fn default_technique() -> String {
    "JTWC".to_string()
}

fn default_cache_ttl_secs() -> u64 {
    120
}

fn default_cache_max_entries() -> usize {
    1024
}

fn default_user_agent() -> String {
    concat!("cyclone-track/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_timeout_secs() -> u64 {
    12
}

fn default_basin() -> String {
    "WP".to_string()
}

impl ProviderConfig {
    fn new(format: ProviderFormat) -> Self {
        Self {
            name: String::new(),
            format,
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            a_deck_url_template: None,
            b_deck_url_template: None,
            track_url_template: None,
            active_list_url: None,
            detail_url_template: None,
            technique: None,
            default_technique: None,
            basin: default_basin(),
        }
    }

    /// ATCF provider with deck templates.
    pub fn atcf(a_deck: impl Into<String>, b_deck: impl Into<String>) -> Self {
        Self {
            a_deck_url_template: Some(a_deck.into()),
            b_deck_url_template: Some(b_deck.into()),
            ..Self::new(ProviderFormat::Atcf)
        }
    }

    /// JSON feed provider with a per-cyclone track template.
    pub fn json(track: impl Into<String>, technique: impl Into<String>) -> Self {
        Self {
            track_url_template: Some(track.into()),
            technique: Some(technique.into()),
            ..Self::new(ProviderFormat::Json)
        }
    }

    pub fn with_active_feed(mut self, list_url: impl Into<String>, detail: impl Into<String>) -> Self {
        self.active_list_url = Some(list_url.into());
        self.detail_url_template = Some(detail.into());
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Per-fetch timeout, clamped to 3..=30 seconds.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.clamp(MIN_TIMEOUT_SECS, MAX_TIMEOUT_SECS))
    }

    /// Label stamped on records from a JSON feed.
    pub fn technique_label(&self) -> String {
        self.technique
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_ascii_uppercase)
            .unwrap_or_else(|| self.name.to_ascii_uppercase())
    }
}

impl Default for TrackConfig {
    /// Built-in providers: NHC and JTWC decks, JMA JSON feed.
    fn default() -> Self {
        let mut providers = BTreeMap::new();
        providers.insert(
            "nhc".to_string(),
            ProviderConfig::atcf(
                "https://ftp.nhc.noaa.gov/atcf/aid_public/a{basin}{storm}{year}.dat.gz",
                "https://ftp.nhc.noaa.gov/atcf/btk/b{basin}{storm}{year}.dat",
            ),
        );
        providers.insert(
            "jtwc".to_string(),
            ProviderConfig::atcf(
                "https://www.ssd.noaa.gov/PS/TROP/DATA/ATCF/JTWC/a{basin}{storm}{year}.dat",
                "https://www.ssd.noaa.gov/PS/TROP/DATA/ATCF/JTWC/b{basin}{storm}{year}.dat",
            ),
        );
        providers.insert(
            "jma".to_string(),
            ProviderConfig::json(
                "https://www.jma.go.jp/bosai/typhoon/data/TC{yy}{storm}/specifications.json",
                "JMA",
            )
            .with_active_feed(
                "https://www.jma.go.jp/bosai/information/data/typhoon.json",
                "https://www.jma.go.jp/bosai/typhoon/data/{event_id}/specifications.json",
            ),
        );

        let mut config = Self {
            default_provider: default_provider_name(),
            default_technique: default_technique(),
            cache_ttl_secs: default_cache_ttl_secs(),
            cache_max_entries: default_cache_max_entries(),
            default_active_ids: Vec::new(),
            allow_provider_fallback: false,
            providers,
        };
        config.assign_names();
        config
    }
}

impl TrackConfig {
    /// Load configuration from a YAML file, or built-in defaults if the file
    /// does not exist.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "Provider config not found, using built-in providers"
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read provider config from {:?}", path))?;

        let config = Self::from_yaml(&content)
            .with_context(|| format!("Invalid provider config {:?}", path))?;

        tracing::info!(
            path = %path.display(),
            providers = config.providers.len(),
            default_provider = %config.default_provider,
            "Loaded provider config"
        );

        Ok(config)
    }

    /// Parse and validate YAML text, expanding environment variables first.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let expanded = expand_env_vars(content)?;

        let mut config: TrackConfig =
            serde_yaml::from_str(&expanded).context("Failed to parse provider config YAML")?;

        config.assign_names();
        validate_config(&config)?;
        Ok(config)
    }

    fn assign_names(&mut self) {
        for (name, provider) in self.providers.iter_mut() {
            provider.name = name.clone();
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Aid for an ATCF request: the requested one, else the provider's
    /// default, else the global default.
    pub fn technique_for(&self, provider: &ProviderConfig, requested: Option<&str>) -> String {
        requested
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .or(provider.default_technique.as_deref())
            .unwrap_or(self.default_technique.as_str())
            .to_ascii_uppercase()
    }
}

// ============================================================================
// Environment Variable Expansion
// ============================================================================

/// Expand environment variables in YAML content.
/// Supports `${VAR}` and `${VAR:-default}` syntax.
pub fn expand_env_vars(content: &str) -> Result<String> {
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '$' || chars.peek() != Some(&'{') {
            result.push(ch);
            continue;
        }
        chars.next();

        let mut expr = String::new();
        loop {
            match chars.next() {
                Some('}') => break,
                Some(c) => expr.push(c),
                None => anyhow::bail!("Unclosed variable substitution: ${{{}", expr),
            }
        }

        result.push_str(&resolve_var_expr(&expr)?);
    }

    Ok(result)
}

fn resolve_var_expr(expr: &str) -> Result<String> {
    match expr.split_once(":-") {
        Some((name, default)) => match std::env::var(name.trim()) {
            Ok(val) if !val.is_empty() => Ok(val),
            _ => Ok(default.to_string()),
        },
        None => std::env::var(expr.trim())
            .with_context(|| format!("Environment variable {} not set", expr)),
    }
}

// ============================================================================
// Validation
// ============================================================================

fn validate_config(config: &TrackConfig) -> Result<()> {
    anyhow::ensure!(!config.providers.is_empty(), "No providers configured");
    anyhow::ensure!(
        config.providers.contains_key(&config.default_provider),
        "Default provider '{}' is not configured",
        config.default_provider
    );
    anyhow::ensure!(config.cache_ttl_secs > 0, "cache_ttl_secs must be greater than 0");
    anyhow::ensure!(
        config.cache_max_entries > 0,
        "cache_max_entries must be greater than 0"
    );
    anyhow::ensure!(
        !config.default_technique.trim().is_empty(),
        "default_technique cannot be empty"
    );

    for (name, provider) in &config.providers {
        let has = |t: &Option<String>| t.as_deref().is_some_and(|s| !s.trim().is_empty());

        match provider.format {
            ProviderFormat::Atcf => anyhow::ensure!(
                has(&provider.a_deck_url_template) || has(&provider.b_deck_url_template),
                "ATCF provider '{}' needs a_deck_url_template or b_deck_url_template",
                name
            ),
            ProviderFormat::Json => {
                anyhow::ensure!(
                    has(&provider.track_url_template) || has(&provider.active_list_url),
                    "JSON provider '{}' needs track_url_template or active_list_url",
                    name
                );
                anyhow::ensure!(
                    !has(&provider.active_list_url) || has(&provider.detail_url_template),
                    "JSON provider '{}' has active_list_url but no detail_url_template",
                    name
                );
            }
        }
        anyhow::ensure!(
            !provider.user_agent.trim().is_empty(),
            "Provider '{}' user_agent cannot be empty",
            name
        );
    }

    Ok(())
}
