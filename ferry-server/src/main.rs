use std::net::SocketAddr;
use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use ferry_server::cache::{FerryService, TripCacheConfig};
use ferry_server::distance::{DistanceEstimator, RoutingClient, RoutingConfig};
use ferry_server::entur::{EnturClient, EnturConfig};
use ferry_server::places::{FerryLine, ferry_lines};
use ferry_server::situations::{SituationClient, SituationConfig};
use ferry_server::web::{AppState, create_router};

/// How often the departure boards are refreshed in the background.
const PREWARM_INTERVAL: Duration = Duration::from_secs(60 * 60);

const DEFAULT_BIND_ADDR: SocketAddr = SocketAddr::new(
    std::net::IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
    3000,
);

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Road routing is optional; without a key the nearest-crossing lookup
    // falls back to great-circle distance.
    let ors_api_key = std::env::var("ORS_API_KEY").ok();
    if ors_api_key.is_none() {
        warn!("ORS_API_KEY not set, distances use great-circle fallback");
    }

    let entur = EnturClient::new(EnturConfig::new()).expect("Failed to create transit client");
    let situations =
        SituationClient::new(SituationConfig::new()).expect("Failed to create situation client");
    let ferries = FerryService::new(entur, situations, &TripCacheConfig::default());
    let distance = DistanceEstimator::new(RoutingClient::new(RoutingConfig::new(ors_api_key)));

    let state = AppState::new(ferries, distance);

    // Keep every configured crossing warm so page loads rarely wait on the
    // upstream search. Failures are logged by the service itself.
    let prewarm = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(PREWARM_INTERVAL);
        loop {
            interval.tick().await;

            let fetches = ferry_lines()
                .iter()
                .flat_map(|&FerryLine(a, b)| [(a, b), (b, a)])
                .map(|(from, to)| {
                    prewarm
                        .ferries
                        .fetch_ferries_cached(from.as_str(), to.as_str())
                });
            futures::future::join_all(fetches).await;

            info!(
                routes = prewarm.ferries.cached_route_count(),
                "pre-warm pass complete"
            );
        }
    });

    let app = create_router(state);

    let addr = match std::env::var("BIND_ADDR") {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("BIND_ADDR {raw:?} is not a socket address, using default");
            DEFAULT_BIND_ADDR
        }),
        Err(_) => DEFAULT_BIND_ADDR,
    };

    info!("Ferjetider listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
