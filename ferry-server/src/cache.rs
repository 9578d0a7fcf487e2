//! Ferry-data aggregation with a per-route trip cache.
//!
//! `FerryService` is the single entry point the web layer calls: it merges
//! cached-or-fresh departures with current disruptions into one `FerryData`
//! and never fails outright: worst case it returns stale or empty data.
//!
//! The trip cache deliberately carries no store-level TTL: entries embed
//! their own fetch instant, so a stale entry stays readable as the fallback
//! when a refresh fails ("prefer stale over absent").

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use moka::future::Cache as MokaCache;
use serde::Serialize;
use tracing::warn;

use crate::entur::{EnturClient, EnturError, Trip};
use crate::places::{Place, PlaceId, place};
use crate::situations::{Disruption, SituationClient};

/// Cache key for trip lists. Directional: `(a, b)` and `(b, a)` are cached
/// independently.
type RouteKey = (PlaceId, PlaceId);

/// A cached trip list with its fetch instant.
#[derive(Debug, Clone)]
pub struct CachedTrips {
    pub trips: Arc<Vec<Trip>>,
    pub fetched_at: Instant,
}

/// Configuration for the trip cache.
#[derive(Debug, Clone)]
pub struct TripCacheConfig {
    /// How long a fetched trip list stays fresh.
    pub ttl: Duration,

    /// Maximum number of cached routes. The route space is closed, so this
    /// is a formality.
    pub max_capacity: u64,
}

impl Default for TripCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(120),
            max_capacity: 64,
        }
    }
}

/// Per-route trip cache.
///
/// Entries are superseded on refresh, never explicitly evicted; staleness
/// is judged at read time against the configured TTL.
pub struct TripCache {
    entries: MokaCache<RouteKey, Arc<CachedTrips>>,
    ttl: Duration,
}

impl TripCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &TripCacheConfig) -> Self {
        let entries = MokaCache::builder()
            .max_capacity(config.max_capacity)
            .build();

        Self {
            entries,
            ttl: config.ttl,
        }
    }

    /// Get the entry for a route, fresh or stale.
    pub async fn get(&self, key: &RouteKey) -> Option<Arc<CachedTrips>> {
        self.entries.get(key).await
    }

    /// Whether an entry is still within its TTL window.
    pub fn is_fresh(&self, entry: &CachedTrips) -> bool {
        entry.fetched_at.elapsed() < self.ttl
    }

    /// Store a freshly fetched trip list, superseding any prior entry.
    pub async fn insert(&self, key: RouteKey, trips: Vec<Trip>) -> Arc<CachedTrips> {
        let entry = Arc::new(CachedTrips {
            trips: Arc::new(trips),
            fetched_at: Instant::now(),
        });
        self.entries.insert(key, Arc::clone(&entry)).await;
        entry
    }

    /// Number of cached routes (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.entries.entry_count()
    }
}

/// Source of scheduled departures for a route.
///
/// Seam over the journey-planner client so the aggregation core can be
/// exercised against stubs.
pub trait TripSource: Send + Sync {
    fn next_ferries(
        &self,
        from: &Place,
        to: &Place,
    ) -> impl Future<Output = Result<Vec<Trip>, EnturError>> + Send;
}

/// Source of disruptions for a set of stops.
pub trait SituationSource: Send + Sync {
    fn fetch_for_stops(&self, stop_ids: &[&str]) -> impl Future<Output = Vec<Disruption>> + Send;
}

impl TripSource for EnturClient {
    fn next_ferries(
        &self,
        from: &Place,
        to: &Place,
    ) -> impl Future<Output = Result<Vec<Trip>, EnturError>> + Send {
        EnturClient::next_ferries(self, from, to)
    }
}

impl SituationSource for SituationClient {
    fn fetch_for_stops(&self, stop_ids: &[&str]) -> impl Future<Output = Vec<Disruption>> + Send {
        SituationClient::fetch_for_stops(self, stop_ids)
    }
}

/// The aggregation result handed to the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct FerryData {
    pub from: String,
    pub to: String,

    /// Upcoming departures; `None` when the route is invalid or no fetch
    /// has ever succeeded for it.
    pub ferries: Option<Vec<Trip>>,

    /// Disruptions affecting either end of the route.
    pub driftsmeldinger: Vec<Disruption>,
}

impl FerryData {
    fn empty(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            ferries: None,
            driftsmeldinger: Vec::new(),
        }
    }
}

/// Ferry-data aggregation service.
///
/// Orchestrates the trip source and the situation source behind a per-route
/// cache. Two concurrent misses for the same route may both hit the trip
/// source and race on the insert; the last writer wins, which is acceptable
/// at this traffic level.
pub struct FerryService<T, S> {
    trips: T,
    situations: S,
    cache: TripCache,
}

impl<T: TripSource, S: SituationSource> FerryService<T, S> {
    /// Create a new service over the given sources.
    pub fn new(trips: T, situations: S, cache_config: &TripCacheConfig) -> Self {
        Self {
            trips,
            situations,
            cache: TripCache::new(cache_config),
        }
    }

    /// Fetch the full ferry board for a route.
    ///
    /// Unknown place ids yield an empty result without any upstream call.
    /// A fresh cache entry skips the trip fetch; a failed refresh falls back
    /// to the stale entry when one exists. Disruptions are always resolved
    /// through the situation source, whose own cache governs their
    /// freshness.
    pub async fn fetch_ferries_cached(&self, from: &str, to: &str) -> FerryData {
        let (Ok(from_id), Ok(to_id)) = (PlaceId::parse(from), PlaceId::parse(to)) else {
            return FerryData::empty(from, to);
        };

        let key = (from_id, to_id);
        let cached = self.cache.get(&key).await;

        let ferries = match cached {
            Some(entry) if self.cache.is_fresh(&entry) => Some(entry.trips.as_ref().clone()),
            stale => match self.trips.next_ferries(place(from_id), place(to_id)).await {
                Ok(trips) => {
                    let entry = self.cache.insert(key, trips).await;
                    Some(entry.trips.as_ref().clone())
                }
                Err(e) => {
                    warn!("trip fetch for {from_id}-{to_id} failed: {e}");
                    stale.map(|entry| entry.trips.as_ref().clone())
                }
            },
        };

        let stops = [place(from_id).stop_place, place(to_id).stop_place];
        let driftsmeldinger = self.situations.fetch_for_stops(&stops).await;

        FerryData {
            from: from_id.as_str().to_string(),
            to: to_id.as_str().to_string(),
            ferries,
            driftsmeldinger,
        }
    }

    /// Disruptions for an arbitrary stop set, bypassing the trip cache.
    pub async fn fetch_disruptions_for_stops(&self, stop_ids: &[&str]) -> Vec<Disruption> {
        self.situations.fetch_for_stops(stop_ids).await
    }

    /// Number of cached routes (for monitoring).
    pub fn cached_route_count(&self) -> u64 {
        self.cache.entry_count()
    }
}
