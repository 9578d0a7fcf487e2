//! Journey-planner HTTP client.
//!
//! Issues transit searches for a from/to stop pair, filtered to car-ferry
//! departures, and transparently follows continuation cursors.

use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;

use crate::places::{Coordinates, Place};

use super::error::EnturError;
use super::types::{Trip, TripPattern, TripResponse};

/// Default base URL for the transit search API.
const DEFAULT_BASE_URL: &str = "https://api.entur.io/client/search/v1/transit";

/// Client identification header required by the API terms of use.
const DEFAULT_CLIENT_NAME: &str = "goransle-ferjetider";

/// How many continuation pages to follow after the first response.
///
/// The API returns at most one extra page for this domain; raise this if the
/// search window ever grows.
const DEFAULT_MAX_EXTRA_PAGES: usize = 1;

/// Configuration for the journey-planner client.
#[derive(Debug, Clone)]
pub struct EnturConfig {
    /// Base URL for the API (defaults to production).
    pub base_url: String,
    /// Value for the ET-Client-Name identification header.
    pub client_name: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Upper bound on cursor follow-ups per search.
    pub max_extra_pages: usize,
}

impl EnturConfig {
    /// Create a config with production defaults.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            client_name: DEFAULT_CLIENT_NAME.to_string(),
            timeout_secs: 30,
            max_extra_pages: DEFAULT_MAX_EXTRA_PAGES,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set how many continuation pages to follow.
    pub fn with_max_extra_pages(mut self, n: usize) -> Self {
        self.max_extra_pages = n;
        self
    }
}

impl Default for EnturConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Search payload for the first request of a trip search.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TripQuery<'a> {
    from: PlaceRef<'a>,
    to: PlaceRef<'a>,
    search_date: String,
    trip_mode: &'static str,
    arrive_by: bool,
    search_preset: &'static str,
    walk_speed: f64,
    minimum_transfer_time: u32,
    search_filter: [&'static str; 1],
}

/// A stop reference in a search payload.
#[derive(Debug, Serialize)]
struct PlaceRef<'a> {
    place: &'a str,
    name: &'a str,
    coordinates: Coordinates,
}

impl<'a> From<&'a Place> for PlaceRef<'a> {
    fn from(p: &'a Place) -> Self {
        Self {
            place: p.stop_place,
            name: p.name,
            coordinates: p.coordinates,
        }
    }
}

/// Follow-up payload carrying only a continuation cursor.
#[derive(Debug, Serialize)]
struct CursorQuery<'a> {
    cursor: &'a str,
}

/// Journey-planner API client.
#[derive(Debug, Clone)]
pub struct EnturClient {
    http: reqwest::Client,
    base_url: String,
    max_extra_pages: usize,
}

impl EnturClient {
    /// Create a new client with the given configuration.
    pub fn new(config: EnturConfig) -> Result<Self, EnturError> {
        let mut headers = HeaderMap::new();

        let client_name =
            HeaderValue::from_str(&config.client_name).map_err(|_| EnturError::ApiError {
                status: 0,
                message: "Invalid client name format".to_string(),
            })?;
        headers.insert(HeaderName::from_static("et-client-name"), client_name);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            max_extra_pages: config.max_extra_pages,
        })
    }

    /// Fetch upcoming car-ferry departures from `from` to `to`.
    ///
    /// Searches from the current instant, follows continuation cursors up to
    /// the configured page bound, and returns trips in upstream order with
    /// every leg's service notices flattened onto the trip.
    pub async fn next_ferries(&self, from: &Place, to: &Place) -> Result<Vec<Trip>, EnturError> {
        let query = TripQuery {
            from: from.into(),
            to: to.into(),
            search_date: Utc::now().to_rfc3339(),
            trip_mode: "oneway",
            arrive_by: false,
            search_preset: "RECOMMENDED",
            walk_speed: 1.4,
            minimum_transfer_time: 120,
            search_filter: ["car_ferry"],
        };

        let mut page = self.post_page(&query).await?;
        let mut trips: Vec<Trip> = page
            .trip_patterns
            .drain(..)
            .map(TripPattern::into_trip)
            .collect();

        let mut followed = 0;
        while followed < self.max_extra_pages {
            let Some(cursor) = page.next_cursor.take() else {
                break;
            };

            page = self.post_page(&CursorQuery { cursor: &cursor }).await?;
            trips.extend(page.trip_patterns.drain(..).map(TripPattern::into_trip));
            followed += 1;
        }

        Ok(trips)
    }

    /// Issue one search request and decode the response page.
    async fn post_page<B: Serialize>(&self, body: &B) -> Result<TripResponse, EnturError> {
        let response = self.http.post(&self.base_url).json(body).send().await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EnturError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| EnturError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }
}


#[cfg(test)]
mod pagination_tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::extract::State;
    use axum::routing::post;
    use axum::{Json, Router};

    use super::*;
    use crate::places::{PlaceId, place};

    /// Serve two result pages: the first with a cursor, the second without.
    /// Cursor-only requests get the second page.
    async fn two_page_handler(
        State(calls): State<Arc<AtomicUsize>>,
        Json(body): Json<serde_json::Value>,
    ) -> Json<serde_json::Value> {
        calls.fetch_add(1, Ordering::SeqCst);

        if body.get("cursor").is_some() {
            Json(serde_json::json!({
                "tripPatterns": [
                    {"startTime": "2024-05-05T11:20:00+02:00"}
                ]
            }))
        } else {
            Json(serde_json::json!({
                "tripPatterns": [
                    {"startTime": "2024-05-05T08:10:00+02:00"},
                    {"startTime": "2024-05-05T09:40:00+02:00"}
                ],
                "nextCursor": "page-two"
            }))
        }
    }

    async fn spawn_stub(calls: Arc<AtomicUsize>) -> String {
        let app = Router::new()
            .route("/", post(two_page_handler))
            .with_state(calls);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/")
    }

    #[tokio::test]
    async fn pagination_concatenates_pages_in_order() {
        let calls = Arc::new(AtomicUsize::new(0));
        let base_url = spawn_stub(calls.clone()).await;

        let client =
            EnturClient::new(EnturConfig::new().with_base_url(base_url)).unwrap();

        let trips = client
            .next_ferries(place(PlaceId::Vangsnes), place(PlaceId::Hella))
            .await
            .unwrap();

        let times: Vec<&str> = trips.iter().map(|t| t.start_time.as_str()).collect();
        assert_eq!(
            times,
            [
                "2024-05-05T08:10:00+02:00",
                "2024-05-05T09:40:00+02:00",
                "2024-05-05T11:20:00+02:00",
            ]
        );
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn pagination_stops_at_page_bound() {
        let calls = Arc::new(AtomicUsize::new(0));
        let base_url = spawn_stub(calls.clone()).await;

        let client = EnturClient::new(
            EnturConfig::new()
                .with_base_url(base_url)
                .with_max_extra_pages(0),
        )
        .unwrap();

        let trips = client
            .next_ferries(place(PlaceId::Vangsnes), place(PlaceId::Hella))
            .await
            .unwrap();

        assert_eq!(trips.len(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
