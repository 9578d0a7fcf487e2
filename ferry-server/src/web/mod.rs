//! Web layer for the ferry departure board.
//!
//! Provides the HTML board pages and a small JSON API over the aggregation
//! service.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::create_router;
pub use state::{AppState, LiveFerryService};
pub use templates::*;
