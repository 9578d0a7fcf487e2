//! Normalization of raw situation records into `Disruption`.
//!
//! Every accessor is total over "field may be absent at any level" and
//! defaults to empty rather than failing.

use std::collections::BTreeSet;

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use uuid::Uuid;

use super::types::{Affects, PtSituationElement, TextField};

/// A link attached to a disruption. Only links with a usable URI survive
/// normalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfoLink {
    pub uri: String,
    pub label: Option<String>,
}

/// A normalized service-advisory record (driftsmelding).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Disruption {
    /// Upstream situation number, or a generated id when absent so two
    /// records are never conflated.
    pub id: String,
    pub summary: String,
    pub description: Option<String>,
    pub severity: Option<String>,
    pub start_time: Option<DateTime<FixedOffset>>,
    pub end_time: Option<DateTime<FixedOffset>>,
    pub info_links: Vec<InfoLink>,
    /// External stop ids (stop points and stop places) this record affects.
    pub affected_stops: BTreeSet<String>,
    /// Line refs from network-level and vehicle-journey-level affects.
    pub affected_lines: BTreeSet<String>,
}

impl Disruption {
    /// Whether this record affects any of the given stop ids.
    pub fn affects_any_stop<'a, I>(&self, stops: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        stops.into_iter().any(|s| self.affected_stops.contains(s))
    }
}

/// Normalize one situation element.
pub fn normalize(element: PtSituationElement) -> Disruption {
    let id = element
        .situation_number
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    // Only the first validity period is used; later periods are ignored.
    let (start_time, end_time) = element
        .validity_period
        .map(|p| p.into_vec())
        .unwrap_or_default()
        .into_iter()
        .next()
        .map(|p| {
            (
                p.start_time.as_deref().and_then(parse_timestamp),
                p.end_time.as_deref().and_then(parse_timestamp),
            )
        })
        .unwrap_or((None, None));

    let info_links = element
        .info_links
        .map(|l| l.info_link.into_vec())
        .unwrap_or_default()
        .into_iter()
        .filter_map(|link| {
            let uri = link.uri.filter(|u| !u.trim().is_empty())?;
            Some(InfoLink {
                uri,
                label: first_text(link.label.as_ref()),
            })
        })
        .collect();

    let (affected_stops, affected_lines) = element
        .affects
        .map(collect_affects)
        .unwrap_or_default();

    Disruption {
        id,
        summary: first_text(element.summary.as_ref()).unwrap_or_default(),
        description: first_text(element.description.as_ref()),
        severity: element.severity,
        start_time,
        end_time,
        info_links,
        affected_stops,
        affected_lines,
    }
}

/// Sort ascending by start time; records without one sort last. Stable, so
/// upstream order breaks ties.
pub fn sort_by_start_time(disruptions: &mut [Disruption]) {
    disruptions.sort_by_key(|d| (d.start_time.is_none(), d.start_time));
}

/// First trimmed non-empty translation variant.
fn first_text(field: Option<&TextField>) -> Option<String> {
    match field? {
        TextField::One(v) => v.text().map(str::to_string),
        TextField::Many(vs) => vs.iter().find_map(|v| v.text()).map(str::to_string),
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(s).ok()
}

/// Union of stop refs and line refs under an "affects" structure.
fn collect_affects(affects: Affects) -> (BTreeSet<String>, BTreeSet<String>) {
    let mut stops = BTreeSet::new();
    let mut lines = BTreeSet::new();

    if let Some(points) = affects.stop_points {
        for p in points.affected_stop_point.into_vec() {
            if let Some(r) = p.stop_point_ref.as_ref().and_then(|r| r.as_str()) {
                stops.insert(r.to_string());
            }
        }
    }

    if let Some(places) = affects.stop_places {
        for p in places.affected_stop_place.into_vec() {
            if let Some(r) = p.stop_place_ref.as_ref().and_then(|r| r.as_str()) {
                stops.insert(r.to_string());
            }
        }
    }

    if let Some(networks) = affects.networks {
        for network in networks.affected_network.into_vec() {
            for line in network.affected_line.into_vec() {
                if let Some(r) = line.line_ref.as_ref().and_then(|r| r.as_str()) {
                    lines.insert(r.to_string());
                }
            }
        }
    }

    if let Some(journeys) = affects.vehicle_journeys {
        for journey in journeys.affected_vehicle_journey.into_vec() {
            if let Some(r) = journey.line_ref.as_ref().and_then(|r| r.as_str()) {
                lines.insert(r.to_string());
            }
            if let Some(framed) = journey.framed_vehicle_journey_ref
                && let Some(r) = framed.line_ref.as_ref().and_then(|r| r.as_str())
            {
                lines.insert(r.to_string());
            }
        }
    }

    (stops, lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(json: &str) -> PtSituationElement {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn normalize_full_record() {
        let raw = element(
            r#"{
            "SituationNumber": "ENT:42",
            "Summary": [{"value": ""}, "Ferje innstilt"],
            "Description": {"value": "Tekniske problem"},
            "Severity": "severe",
            "ValidityPeriod": [
                {"StartTime": "2024-01-01T00:00:00Z", "EndTime": "2024-01-03T00:00:00Z"},
                {"StartTime": "2024-02-01T00:00:00Z"}
            ],
            "InfoLinks": {
                "InfoLink": [
                    {"Uri": "https://example.no/status", "Label": "Status"},
                    {"Uri": "", "Label": "Dropped"},
                    {"Label": "Also dropped"}
                ]
            },
            "Affects": {
                "StopPoints": {
                    "AffectedStopPoint": [
                        {"StopPointRef": "NSR:Quay:100"},
                        {"StopPointRef": "NSR:Quay:100"}
                    ]
                },
                "StopPlaces": {
                    "AffectedStopPlace": {"StopPlaceRef": "NSR:StopPlace:58339"}
                },
                "Networks": {
                    "AffectedNetwork": {
                        "AffectedLine": {"LineRef": "SOF:Line:1"}
                    }
                },
                "VehicleJourneys": {
                    "AffectedVehicleJourney": {
                        "LineRef": "SOF:Line:2",
                        "FramedVehicleJourneyRef": {"LineRef": "SOF:Line:3"}
                    }
                }
            }
        }"#,
        );

        let d = normalize(raw);

        assert_eq!(d.id, "ENT:42");
        assert_eq!(d.summary, "Ferje innstilt");
        assert_eq!(d.description.as_deref(), Some("Tekniske problem"));
        assert_eq!(d.severity.as_deref(), Some("severe"));

        // Only the first validity period counts.
        assert_eq!(
            d.start_time.unwrap().to_rfc3339(),
            "2024-01-01T00:00:00+00:00"
        );
        assert_eq!(
            d.end_time.unwrap().to_rfc3339(),
            "2024-01-03T00:00:00+00:00"
        );

        assert_eq!(d.info_links.len(), 1);
        assert_eq!(d.info_links[0].uri, "https://example.no/status");
        assert_eq!(d.info_links[0].label.as_deref(), Some("Status"));

        let stops: Vec<&str> = d.affected_stops.iter().map(String::as_str).collect();
        assert_eq!(stops, ["NSR:Quay:100", "NSR:StopPlace:58339"]);

        let lines: Vec<&str> = d.affected_lines.iter().map(String::as_str).collect();
        assert_eq!(lines, ["SOF:Line:1", "SOF:Line:2", "SOF:Line:3"]);
    }

    #[test]
    fn normalize_empty_record() {
        let d = normalize(element("{}"));

        // A missing situation number gets a generated id.
        assert!(!d.id.is_empty());
        assert_eq!(d.summary, "");
        assert!(d.description.is_none());
        assert!(d.start_time.is_none());
        assert!(d.end_time.is_none());
        assert!(d.info_links.is_empty());
        assert!(d.affected_stops.is_empty());
        assert!(d.affected_lines.is_empty());
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = normalize(element("{}"));
        let b = normalize(element("{}"));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn blank_situation_number_gets_generated_id() {
        let d = normalize(element(r#"{"SituationNumber": "  "}"#));
        assert_ne!(d.id.trim(), "");
        assert_ne!(d.id, "  ");
    }

    #[test]
    fn unparseable_times_become_none() {
        let d = normalize(element(
            r#"{"ValidityPeriod": {"StartTime": "not a time", "EndTime": "2024-01-01T00:00:00Z"}}"#,
        ));
        assert!(d.start_time.is_none());
        assert!(d.end_time.is_some());
    }

    #[test]
    fn sort_puts_missing_start_times_last() {
        let mut list = vec![
            Disruption {
                id: "a".into(),
                start_time: None,
                ..blank()
            },
            Disruption {
                id: "b".into(),
                start_time: parse("2024-01-02T00:00:00Z"),
                ..blank()
            },
            Disruption {
                id: "c".into(),
                start_time: parse("2024-01-01T00:00:00Z"),
                ..blank()
            },
        ];

        sort_by_start_time(&mut list);

        let order: Vec<&str> = list.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(order, ["c", "b", "a"]);
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let mut list = vec![
            Disruption {
                id: "first".into(),
                ..blank()
            },
            Disruption {
                id: "second".into(),
                ..blank()
            },
        ];

        sort_by_start_time(&mut list);

        assert_eq!(list[0].id, "first");
        assert_eq!(list[1].id, "second");
    }

    #[test]
    fn affects_any_stop() {
        let mut d = blank();
        d.affected_stops.insert("NSR:StopPlace:58339".into());

        assert!(d.affects_any_stop(["NSR:StopPlace:58339"]));
        assert!(!d.affects_any_stop(["NSR:StopPlace:58324"]));
        assert!(!d.affects_any_stop(std::iter::empty::<&str>()));
    }

    fn parse(s: &str) -> Option<DateTime<FixedOffset>> {
        Some(DateTime::parse_from_rfc3339(s).unwrap())
    }

    fn blank() -> Disruption {
        Disruption {
            id: String::new(),
            summary: String::new(),
            description: None,
            severity: None,
            start_time: None,
            end_time: None,
            info_links: Vec::new(),
            affected_stops: BTreeSet::new(),
            affected_lines: BTreeSet::new(),
        }
    }
}

#[cfg(test)]
mod proptests {
    use proptest::prelude::*;

    use super::*;

    /// JSON fragments that may appear at any optional position.
    fn arbitrary_text_field() -> impl Strategy<Value = serde_json::Value> {
        prop_oneof![
            Just(serde_json::Value::Null),
            "[ -~]{0,20}".prop_map(serde_json::Value::String),
            "[ -~]{0,20}".prop_map(|s| serde_json::json!({ "value": s })),
            proptest::collection::vec("[ -~]{0,20}", 0..3)
                .prop_map(|vs| serde_json::json!(vs)),
        ]
    }

    proptest! {
        /// Normalization never panics on partially-populated records.
        #[test]
        fn normalize_is_total(
            number in proptest::option::of("[ -~]{0,12}"),
            summary in arbitrary_text_field(),
            description in arbitrary_text_field(),
            start in proptest::option::of("[ -~]{0,25}"),
        ) {
            let mut record = serde_json::json!({
                "Summary": summary,
                "Description": description,
            });
            if let Some(n) = number {
                record["SituationNumber"] = serde_json::json!(n);
            }
            if let Some(s) = start {
                record["ValidityPeriod"] = serde_json::json!({ "StartTime": s });
            }

            let element: PtSituationElement = serde_json::from_value(record).unwrap();
            let d = normalize(element);
            prop_assert!(!d.id.is_empty());
        }
    }
}
