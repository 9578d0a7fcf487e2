//! Static registry of ferry stops and crossings.
//!
//! The set of stops is fixed at compile time; every other component takes
//! place identifiers that are valid by construction.

use std::fmt;

use serde::Serialize;

/// Error returned when parsing an unknown place id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown place: {0}")]
pub struct UnknownPlace(String);

/// Identifier for one of the configured ferry stops.
///
/// # Examples
///
/// ```
/// use ferry_server::places::PlaceId;
///
/// let stop = PlaceId::parse("vangsnes").unwrap();
/// assert_eq!(stop.as_str(), "vangsnes");
///
/// assert!(PlaceId::parse("nowhere").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceId {
    Vangsnes,
    Hella,
    Dragsvik,
    Mannheller,
    Fodnes,
}

impl PlaceId {
    /// All configured stops, in registry order.
    pub const ALL: [PlaceId; 5] = [
        PlaceId::Vangsnes,
        PlaceId::Hella,
        PlaceId::Dragsvik,
        PlaceId::Mannheller,
        PlaceId::Fodnes,
    ];

    /// Parse a place id from its lowercase route-slug form.
    pub fn parse(s: &str) -> Result<Self, UnknownPlace> {
        match s {
            "vangsnes" => Ok(PlaceId::Vangsnes),
            "hella" => Ok(PlaceId::Hella),
            "dragsvik" => Ok(PlaceId::Dragsvik),
            "mannheller" => Ok(PlaceId::Mannheller),
            "fodnes" => Ok(PlaceId::Fodnes),
            other => Err(UnknownPlace(other.to_string())),
        }
    }

    /// The id in its route-slug form.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaceId::Vangsnes => "vangsnes",
            PlaceId::Hella => "hella",
            PlaceId::Dragsvik => "dragsvik",
            PlaceId::Mannheller => "mannheller",
            PlaceId::Fodnes => "fodnes",
        }
    }
}

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A WGS84 coordinate pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// A ferry stop with its journey-planner stop identifier and position.
#[derive(Debug, Clone)]
pub struct Place {
    pub id: PlaceId,
    /// Stop identifier in the journey-planner's stop register.
    pub stop_place: &'static str,
    /// Rider-facing display name.
    pub name: &'static str,
    pub coordinates: Coordinates,
}

/// A crossing operated in both directions between two stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FerryLine(pub PlaceId, pub PlaceId);

impl FerryLine {
    /// Whether this line calls at the given stop.
    pub fn contains(&self, id: PlaceId) -> bool {
        self.0 == id || self.1 == id
    }
}

// Ordered to match the `PlaceId` discriminants; `place()` indexes into this.
static PLACES: [Place; 5] = [
    Place {
        id: PlaceId::Vangsnes,
        stop_place: "NSR:StopPlace:58339",
        name: "Vangsnes ferjekai",
        coordinates: Coordinates {
            latitude: 61.174909,
            longitude: 6.637196,
        },
    },
    Place {
        id: PlaceId::Hella,
        stop_place: "NSR:StopPlace:58324",
        name: "Hella ferjekai",
        coordinates: Coordinates {
            latitude: 61.207413,
            longitude: 6.597993,
        },
    },
    Place {
        id: PlaceId::Dragsvik,
        stop_place: "NSR:StopPlace:58328",
        name: "Dragsvik ferjekai",
        coordinates: Coordinates {
            latitude: 61.209423,
            longitude: 6.563788,
        },
    },
    Place {
        id: PlaceId::Mannheller,
        stop_place: "NSR:StopPlace:58275",
        name: "Mannheller ferjekai",
        coordinates: Coordinates {
            latitude: 61.164428,
            longitude: 7.336834,
        },
    },
    Place {
        id: PlaceId::Fodnes,
        stop_place: "NSR:StopPlace:58276",
        name: "Fodnes ferjekai",
        coordinates: Coordinates {
            latitude: 61.149735,
            longitude: 7.386763,
        },
    },
];

static FERRY_LINES: [FerryLine; 4] = [
    FerryLine(PlaceId::Vangsnes, PlaceId::Hella),
    FerryLine(PlaceId::Hella, PlaceId::Dragsvik),
    FerryLine(PlaceId::Vangsnes, PlaceId::Dragsvik),
    FerryLine(PlaceId::Fodnes, PlaceId::Mannheller),
];

/// The full stop registry, in tie-break order for distance resolution.
pub fn places() -> &'static [Place] {
    &PLACES
}

/// Look up a stop by id. Total: the registry is closed over `PlaceId`.
pub fn place(id: PlaceId) -> &'static Place {
    &PLACES[id as usize]
}

/// The configured crossings.
pub fn ferry_lines() -> &'static [FerryLine] {
    &FERRY_LINES
}
