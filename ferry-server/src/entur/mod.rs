//! Journey-planner (transit search) client.
//!
//! Fetches scheduled car-ferry departures for a from/to stop pair. Key
//! characteristics of the API:
//! - results are paginated via an opaque `nextCursor` token; follow-up
//!   requests carry only the cursor
//! - advisory notices hang off each leg's service journey and are flattened
//!   onto the trip here
//! - timestamps are ISO-8601 strings with the operator's local offset

mod client;
mod error;
mod types;

pub use client::{EnturClient, EnturConfig};
pub use error::EnturError;
pub use types::{Notice, Trip, TripPattern, TripResponse};
