//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::Redirect,
    routing::get,
};

use crate::cache::FerryData;
use crate::places::{FerryLine, PlaceId, ferry_lines, place};

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/ferjetider", get(index_page))
        .route("/ferjetider/nearest", get(nearest_redirect))
        .route("/ferjetider/:route", get(route_page))
        .route("/ferjeliste", get(line_list))
        .route("/api/ferries", get(api_ferries))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Default view: the Vangsnes crossing, both directions.
async fn index_page(State(state): State<AppState>) -> FerryBoardTemplate {
    board_page(&state, "vangsnes", "hella").await
}

/// Departure boards for a `from-to` route slug.
///
/// Unknown slugs render the empty state rather than an error page.
async fn route_page(
    State(state): State<AppState>,
    Path(route): Path<String>,
) -> FerryBoardTemplate {
    let (from, to) = route.split_once('-').unwrap_or((route.as_str(), ""));
    board_page(&state, from, to).await
}

/// Redirect to the crossing closest to the given position.
async fn nearest_redirect(
    State(state): State<AppState>,
    Query(q): Query<NearestQuery>,
) -> Redirect {
    let user = crate::places::Coordinates {
        latitude: q.lat,
        longitude: q.lon,
    };

    match state.distance.closest_line(user).await {
        Some((from, to)) => Redirect::to(&format!("/ferjetider/{from}-{to}")),
        None => Redirect::to("/ferjetider"),
    }
}

/// List of configured crossings with links to their boards.
async fn line_list() -> FerryListTemplate {
    let lines = ferry_lines()
        .iter()
        .map(|&FerryLine(a, b)| LineView {
            slug: format!("{a}-{b}"),
            label: format!("{} til {}", place(a).name, place(b).name),
        })
        .collect();

    FerryListTemplate { lines }
}

/// Aggregated ferry data as JSON.
async fn api_ferries(
    State(state): State<AppState>,
    Query(q): Query<FerryQuery>,
) -> Json<FerryData> {
    Json(state.ferries.fetch_ferries_cached(&q.from, &q.to).await)
}

/// Build the two-direction board page for a route.
///
/// Both directions share a stop pair, so the disruption list is taken from
/// the outbound result alone.
async fn board_page(state: &AppState, from: &str, to: &str) -> FerryBoardTemplate {
    let outbound = state.ferries.fetch_ferries_cached(from, to).await;
    let inbound = state.ferries.fetch_ferries_cached(to, from).await;

    let disruptions = outbound
        .driftsmeldinger
        .iter()
        .map(DisruptionView::from_disruption)
        .collect();

    FerryBoardTemplate {
        title: page_title(from, to),
        boards: vec![BoardView::from_data(&outbound), BoardView::from_data(&inbound)],
        disruptions,
    }
}

fn page_title(from: &str, to: &str) -> String {
    match (PlaceId::parse(from), PlaceId::parse(to)) {
        (Ok(a), Ok(b)) => format!("Ferjetider {} til {}", place(a).name, place(b).name),
        _ => "Ferjetider".to_string(),
    }
}
