//! Situation-exchange (driftsmelding) client.
//!
//! The upstream feed is one document covering every operator and line; this
//! module fetches it, normalizes the optional-everywhere records into
//! `Disruption`, caches the snapshot briefly, and answers "which disruptions
//! affect these stops".

mod client;
mod error;
mod normalize;
mod types;

pub use client::{SituationClient, SituationConfig};
pub use error::SituationError;
pub use normalize::{Disruption, InfoLink, normalize, sort_by_start_time};
pub use types::{PtSituationElement, SiriDocument};
