//! Situation-feed client with a single-slot cache.
//!
//! The feed is not route-specific, so one shared snapshot serves every route
//! and filtering happens per request. On refresh failure the last snapshot
//! is kept; callers never see an error, at worst an empty list.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue};
use tokio::sync::RwLock;
use tracing::warn;

use super::error::SituationError;
use super::normalize::{Disruption, normalize, sort_by_start_time};
use super::types::SiriDocument;

/// Default base URL for the situation-exchange feed.
const DEFAULT_BASE_URL: &str = "https://api.entur.io/realtime/v1/rest/sx";

/// Client identification header required by the feed's terms of use.
const DEFAULT_CLIENT_NAME: &str = "goransle-ferjetider";

/// Default snapshot TTL.
const DEFAULT_TTL: Duration = Duration::from_secs(60);

/// Configuration for the situation-feed client.
#[derive(Debug, Clone)]
pub struct SituationConfig {
    /// Base URL for the feed (defaults to production).
    pub base_url: String,
    /// Value for the ET-Client-Name identification header.
    pub client_name: String,
    /// How long a fetched snapshot stays fresh.
    pub ttl: Duration,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl SituationConfig {
    /// Create a config with production defaults.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            client_name: DEFAULT_CLIENT_NAME.to_string(),
            ttl: DEFAULT_TTL,
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set a custom snapshot TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

impl Default for SituationConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// One cached feed snapshot.
struct Slot {
    fetched_at: Instant,
    situations: Arc<Vec<Disruption>>,
}

/// Situation-feed client.
///
/// Cloning shares the cache slot; all clones see the same snapshot.
#[derive(Clone)]
pub struct SituationClient {
    http: reqwest::Client,
    base_url: String,
    ttl: Duration,
    slot: Arc<RwLock<Option<Slot>>>,
    upstream_calls: Arc<AtomicU64>,
}

impl SituationClient {
    /// Create a new client with the given configuration.
    pub fn new(config: SituationConfig) -> Result<Self, SituationError> {
        let mut headers = HeaderMap::new();

        let client_name =
            HeaderValue::from_str(&config.client_name).map_err(|_| SituationError::ApiError {
                status: 0,
                message: "Invalid client name format".to_string(),
            })?;
        headers.insert(HeaderName::from_static("et-client-name"), client_name);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            ttl: config.ttl,
            slot: Arc::new(RwLock::new(None)),
            upstream_calls: Arc::new(AtomicU64::new(0)),
        })
    }

    /// The normalized, sorted snapshot of all current situations.
    ///
    /// Served from the slot while fresh; refreshed otherwise. On refresh
    /// failure the previous snapshot is returned if one exists, else empty.
    pub async fn fetch_situations(&self) -> Arc<Vec<Disruption>> {
        {
            let guard = self.slot.read().await;
            if let Some(slot) = guard.as_ref()
                && slot.fetched_at.elapsed() < self.ttl
            {
                return Arc::clone(&slot.situations);
            }
        }

        match self.fetch_remote().await {
            Ok(mut situations) => {
                sort_by_start_time(&mut situations);
                let situations = Arc::new(situations);

                let mut guard = self.slot.write().await;
                *guard = Some(Slot {
                    fetched_at: Instant::now(),
                    situations: Arc::clone(&situations),
                });

                situations
            }
            Err(e) => {
                warn!("situation feed refresh failed, keeping previous snapshot: {e}");

                let guard = self.slot.read().await;
                guard
                    .as_ref()
                    .map(|slot| Arc::clone(&slot.situations))
                    .unwrap_or_default()
            }
        }
    }

    /// Situations affecting any of the given stop ids.
    ///
    /// Empty and duplicate ids are dropped first; an effectively empty input
    /// returns without touching the feed at all.
    pub async fn fetch_for_stops(&self, stop_ids: &[&str]) -> Vec<Disruption> {
        let wanted: HashSet<&str> = stop_ids
            .iter()
            .copied()
            .filter(|s| !s.is_empty())
            .collect();

        if wanted.is_empty() {
            return Vec::new();
        }

        self.fetch_situations()
            .await
            .iter()
            .filter(|d| d.affects_any_stop(wanted.iter().copied()))
            .cloned()
            .collect()
    }

    /// Number of upstream feed requests issued (for monitoring and tests).
    pub fn upstream_call_count(&self) -> u64 {
        self.upstream_calls.load(Ordering::SeqCst)
    }

    /// Fetch and normalize the live feed.
    async fn fetch_remote(&self) -> Result<Vec<Disruption>, SituationError> {
        self.upstream_calls.fetch_add(1, Ordering::SeqCst);

        let response = self.http.get(&self.base_url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SituationError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let document: SiriDocument =
            serde_json::from_str(&body).map_err(|e| SituationError::Json {
                message: e.to_string(),
            })?;

        Ok(document
            .into_situations()
            .into_iter()
            .map(normalize)
            .collect())
    }
}
