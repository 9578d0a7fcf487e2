//! Distance estimation between user coordinates and ferry stops.
//!
//! Road distance from the directions provider is preferred; great-circle
//! (Haversine) distance is the always-available fallback. Closest-stop
//! resolution is all-or-nothing: if any stop's road lookup fails, the whole
//! pass falls back to Haversine so the distances stay comparable.

mod routing;

pub use routing::{RouteSummary, RoutingClient, RoutingConfig};

use crate::places::{Coordinates, FerryLine, PlaceId, ferry_lines, place, places};

/// Mean earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two coordinates, in kilometers.
pub fn haversine(a: Coordinates, b: Coordinates) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos() * b.latitude.to_radians().cos() * (d_lon / 2.0).sin().powi(2);

    EARTH_RADIUS_KM * 2.0 * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Parse a `"lon,lat"` coordinate string.
pub fn parse_lon_lat(s: &str) -> Option<Coordinates> {
    let (lon, lat) = s.split_once(',')?;
    Some(Coordinates {
        latitude: lat.trim().parse().ok()?,
        longitude: lon.trim().parse().ok()?,
    })
}

/// Distance queries against the stop registry.
#[derive(Debug, Clone)]
pub struct DistanceEstimator {
    routing: RoutingClient,
}

impl DistanceEstimator {
    pub fn new(routing: RoutingClient) -> Self {
        Self { routing }
    }

    /// Road distance from a `"lon,lat"` coordinate to a named stop.
    ///
    /// `None` when the stop is unrecognized, the coordinate is malformed,
    /// or the routing provider is unavailable.
    pub async fn estimate_distance(&self, stop: &str, coord: &str) -> Option<RouteSummary> {
        let id = PlaceId::parse(stop).ok()?;
        let user = parse_lon_lat(coord)?;
        self.routing
            .road_distance(user, place(id).coordinates)
            .await
    }

    /// The configured stop closest to the given coordinate.
    ///
    /// Uses road distance when it can be obtained for every stop, otherwise
    /// Haversine for all of them. Ties go to the first stop in registry
    /// order.
    pub async fn closest_stop(&self, user: Coordinates) -> PlaceId {
        let distances = match self.road_distances(user).await {
            Some(road) => road,
            None => places()
                .iter()
                .map(|p| haversine(user, p.coordinates))
                .collect(),
        };

        let mut best = (places()[0].id, distances[0]);
        for (p, d) in places().iter().zip(&distances).skip(1) {
            if *d < best.1 {
                best = (p.id, *d);
            }
        }
        best.0
    }

    /// The configured crossing closest to the given coordinate, oriented so
    /// the nearest stop is the departure side. `None` when the nearest stop
    /// is in no configured line.
    pub async fn closest_line(&self, user: Coordinates) -> Option<(PlaceId, PlaceId)> {
        let stop = self.closest_stop(user).await;

        let line = ferry_lines().iter().find(|line| line.contains(stop))?;
        let FerryLine(a, b) = *line;

        if stop == b {
            Some((b, a))
        } else {
            Some((a, b))
        }
    }

    /// Road distance to every stop, or `None` if any single lookup fails.
    async fn road_distances(&self, user: Coordinates) -> Option<Vec<f64>> {
        if !self.routing.is_configured() {
            return None;
        }

        let mut distances = Vec::with_capacity(places().len());
        for p in places() {
            // Meters from the provider, kilometers everywhere else here.
            let summary = self.routing.road_distance(user, p.coordinates).await?;
            distances.push(summary.distance / 1000.0);
        }
        Some(distances)
    }
}
