//! Askama templates for the web frontend.

use askama::Template;
use chrono::DateTime;

use crate::cache::FerryData;
use crate::entur::Trip;
use crate::situations::Disruption;

// ============================================================================
// Page Templates
// ============================================================================

/// Departure boards for a crossing, with disruptions above them.
#[derive(Template)]
#[template(path = "ferjetider.html")]
pub struct FerryBoardTemplate {
    pub title: String,
    pub boards: Vec<BoardView>,
    pub disruptions: Vec<DisruptionView>,
}

/// List of configured crossings.
#[derive(Template)]
#[template(path = "ferjeliste.html")]
pub struct FerryListTemplate {
    pub lines: Vec<LineView>,
}

// ============================================================================
// View Models (for templates)
// ============================================================================

/// One crossing in the line list.
#[derive(Debug, Clone)]
pub struct LineView {
    pub slug: String,
    pub label: String,
}

/// One direction's departure board.
#[derive(Debug, Clone)]
pub struct BoardView {
    pub from_name: String,
    pub to_name: String,
    pub departures: Vec<DepartureView>,
}

impl BoardView {
    /// Build a board from aggregated ferry data. A `None` trip list (invalid
    /// route or total upstream failure) renders the same as no departures.
    pub fn from_data(data: &FerryData) -> Self {
        let departures = data
            .ferries
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(DepartureView::from_trip)
            .collect();

        Self {
            from_name: display_name(&data.from),
            to_name: display_name(&data.to),
            departures,
        }
    }
}

/// One departure row.
#[derive(Debug, Clone)]
pub struct DepartureView {
    pub time: String,
    pub notices: Vec<String>,
}

impl DepartureView {
    pub fn from_trip(trip: &Trip) -> Self {
        Self {
            time: format_departure_time(&trip.start_time),
            notices: trip
                .notices
                .iter()
                .filter_map(|n| n.text.clone())
                .filter(|t| !t.trim().is_empty())
                .collect(),
        }
    }
}

/// One disruption notice above the boards.
#[derive(Debug, Clone)]
pub struct DisruptionView {
    pub summary: String,
    pub description: Option<String>,
    pub period: String,
    pub links: Vec<LinkView>,
}

impl DisruptionView {
    pub fn from_disruption(d: &Disruption) -> Self {
        Self {
            summary: d.summary.clone(),
            description: d.description.clone(),
            period: format_period(d),
            links: d
                .info_links
                .iter()
                .map(|l| LinkView {
                    label: l.label.clone().unwrap_or_else(|| l.uri.clone()),
                    uri: l.uri.clone(),
                })
                .collect(),
        }
    }
}

/// A rendered disruption link.
#[derive(Debug, Clone)]
pub struct LinkView {
    pub uri: String,
    pub label: String,
}

/// Rider-facing name for a route slug; unknown slugs render verbatim.
fn display_name(slug: &str) -> String {
    match crate::places::PlaceId::parse(slug) {
        Ok(id) => crate::places::place(id).name.to_string(),
        Err(_) => slug.to_string(),
    }
}

/// `HH:MM` in the timestamp's own offset; unparseable input is shown as-is.
pub fn format_departure_time(start_time: &str) -> String {
    DateTime::parse_from_rfc3339(start_time)
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|_| start_time.to_string())
}

/// `dd.mm.yyyy HH:MM til dd.mm.yyyy HH:MM`, with either end optional.
fn format_period(d: &Disruption) -> String {
    const FORMAT: &str = "%d.%m.%Y %H:%M";

    match (d.start_time, d.end_time) {
        (Some(start), Some(end)) => {
            format!("{} til {}", start.format(FORMAT), end.format(FORMAT))
        }
        (Some(start), None) => format!("Frå {}", start.format(FORMAT)),
        (None, Some(end)) => format!("Til {}", end.format(FORMAT)),
        (None, None) => String::new(),
    }
}
