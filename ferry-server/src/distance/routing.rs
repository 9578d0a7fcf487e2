//! Road-distance client for the directions provider.
//!
//! Requires an API credential; without one every lookup is `None` and the
//! caller falls back to great-circle distance. Provider failures are
//! absorbed the same way, so this client never surfaces an error.

use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::places::Coordinates;

/// Default base URL for the directions API (driving profile).
const DEFAULT_BASE_URL: &str = "https://api.openrouteservice.org/v2/directions/driving-car";

/// Configuration for the routing client.
#[derive(Debug, Clone)]
pub struct RoutingConfig {
    /// API key; road distance is skipped entirely when absent.
    pub api_key: Option<String>,
    /// Base URL for the API (defaults to production).
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl RoutingConfig {
    /// Create a config with the given (possibly absent) API key.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

/// Route length and travel time as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct RouteSummary {
    /// Road distance in meters.
    #[serde(default)]
    pub distance: f64,
    /// Travel time in seconds.
    #[serde(default)]
    pub duration: f64,
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    /// Empty when no road route exists between the points.
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
struct Route {
    summary: RouteSummary,
}

/// Directions API client.
#[derive(Debug, Clone)]
pub struct RoutingClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl RoutingClient {
    /// Create a new client with the given configuration.
    pub fn new(config: RoutingConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url,
            api_key: config.api_key,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Whether a credential is configured at all.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Road distance between two coordinates.
    ///
    /// `None` when no credential is configured, the provider errors, or no
    /// road route exists between the points.
    pub async fn road_distance(&self, from: Coordinates, to: Coordinates) -> Option<RouteSummary> {
        let api_key = self.api_key.as_deref()?;

        let body = serde_json::json!({
            "coordinates": [
                [from.longitude, from.latitude],
                [to.longitude, to.latitude],
            ]
        });

        let response = self
            .http
            .post(&self.base_url)
            .header(AUTHORIZATION, api_key)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| warn!("directions request failed: {e}"))
            .ok()?;

        let status = response.status();
        if !status.is_success() {
            warn!("directions API returned {status}");
            return None;
        }

        let parsed: DirectionsResponse = response
            .json()
            .await
            .inspect_err(|e| warn!("directions response decode failed: {e}"))
            .ok()?;

        parsed.routes.into_iter().next().map(|r| r.summary)
    }
}
