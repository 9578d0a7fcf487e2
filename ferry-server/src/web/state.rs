//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::FerryService;
use crate::distance::DistanceEstimator;
use crate::entur::EnturClient;
use crate::situations::SituationClient;

/// The aggregation service over the live upstream clients.
pub type LiveFerryService = FerryService<EnturClient, SituationClient>;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Cached ferry-data aggregation service
    pub ferries: Arc<LiveFerryService>,

    /// Distance queries against the stop registry
    pub distance: Arc<DistanceEstimator>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(ferries: LiveFerryService, distance: DistanceEstimator) -> Self {
        Self {
            ferries: Arc::new(ferries),
            distance: Arc::new(distance),
        }
    }
}
