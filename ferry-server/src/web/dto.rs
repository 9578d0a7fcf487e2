//! Query-string types for the web layer.

use serde::Deserialize;

/// Query for the JSON ferry endpoint.
#[derive(Debug, Deserialize)]
pub struct FerryQuery {
    pub from: String,
    pub to: String,
}

/// Query for the nearest-crossing redirect.
#[derive(Debug, Deserialize)]
pub struct NearestQuery {
    pub lat: f64,
    pub lon: f64,
}
