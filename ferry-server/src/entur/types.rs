//! Journey-planner API DTOs and the `Trip` domain type.
//!
//! The DTOs map directly to the transit search JSON responses. They use
//! `Option` liberally because the API omits fields rather than sending null
//! values in many cases.

use serde::{Deserialize, Serialize};

/// Response from the transit search endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripResponse {
    /// Matching journeys, ordered by departure time upstream.
    #[serde(default)]
    pub trip_patterns: Vec<TripPattern>,

    /// Continuation token; present when more result pages exist.
    pub next_cursor: Option<String>,
}

/// One journey in the search result.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripPattern {
    /// Departure time as an ISO-8601 timestamp.
    pub start_time: String,

    /// Legs of the journey. A direct ferry crossing has a single leg.
    pub legs: Option<Vec<Leg>>,
}

/// One leg of a journey.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leg {
    /// The operated service behind this leg, absent for walk legs.
    pub service_journey: Option<ServiceJourney>,
}

/// Service journey metadata attached to a leg.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceJourney {
    /// Rider-facing advisory notices.
    pub notices: Option<Vec<NoticeDto>>,
}

/// An advisory notice as returned by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct NoticeDto {
    pub text: Option<String>,
}

/// A scheduled departure with its advisory notices.
///
/// `start_time` is kept verbatim from upstream; ordering within a response
/// is the upstream ordering and is not re-sorted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trip {
    pub start_time: String,
    pub notices: Vec<Notice>,
}

/// A rider-facing advisory notice attached to a trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub text: Option<String>,
}

impl TripPattern {
    /// Flatten this pattern into a `Trip`, collecting the notices of every
    /// leg's service journey. Legs without a service journey and journeys
    /// without notices contribute nothing.
    pub fn into_trip(self) -> Trip {
        let notices = self
            .legs
            .unwrap_or_default()
            .into_iter()
            .filter_map(|leg| leg.service_journey)
            .filter_map(|sj| sj.notices)
            .flatten()
            .map(|n| Notice { text: n.text })
            .collect();

        Trip {
            start_time: self.start_time,
            notices,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_trip_response() {
        let json = r#"{
            "tripPatterns": [
                {
                    "startTime": "2024-05-05T08:10:00+02:00",
                    "legs": [
                        {
                            "serviceJourney": {
                                "notices": [
                                    {"text": "Redusert kapasitet"}
                                ]
                            }
                        }
                    ]
                },
                {
                    "startTime": "2024-05-05T09:40:00+02:00"
                }
            ],
            "nextCursor": "abc123"
        }"#;

        let response: TripResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.trip_patterns.len(), 2);
        assert_eq!(response.next_cursor.as_deref(), Some("abc123"));

        let first = response.trip_patterns[0].clone().into_trip();
        assert_eq!(first.start_time, "2024-05-05T08:10:00+02:00");
        assert_eq!(first.notices.len(), 1);
        assert_eq!(first.notices[0].text.as_deref(), Some("Redusert kapasitet"));
    }

    #[test]
    fn deserialize_empty_response() {
        let response: TripResponse = serde_json::from_str("{}").unwrap();
        assert!(response.trip_patterns.is_empty());
        assert!(response.next_cursor.is_none());
    }

    #[test]
    fn into_trip_skips_absent_legs_and_notices() {
        let json = r#"{
            "startTime": "2024-05-05T10:30:00+02:00",
            "legs": [
                {},
                {"serviceJourney": {}},
                {"serviceJourney": {"notices": [{"text": "A"}, {}]}}
            ]
        }"#;

        let pattern: TripPattern = serde_json::from_str(json).unwrap();
        let trip = pattern.into_trip();

        // Notices without text are kept; absent notice arrays are skipped.
        assert_eq!(trip.notices.len(), 2);
        assert_eq!(trip.notices[0].text.as_deref(), Some("A"));
        assert!(trip.notices[1].text.is_none());
    }

    #[test]
    fn into_trip_without_legs() {
        let pattern: TripPattern =
            serde_json::from_str(r#"{"startTime": "2024-05-05T08:10:00+02:00"}"#).unwrap();
        let trip = pattern.into_trip();
        assert!(trip.notices.is_empty());
    }
}
