//! Situation-exchange feed DTOs.
//!
//! The feed is deeply nested and optional at every level; the structure here
//! mirrors `Siri.ServiceDelivery.SituationExchangeDelivery[].Situations.
//! PtSituationElement[]` and tolerates absence anywhere along that path.
//! Wrapper types accept both single elements and arrays, and text fields
//! accept bare strings as well as translation objects.

use serde::Deserialize;

/// Accepts a single element or an array of elements.
///
/// The feed emits a bare object where exactly one element exists and an
/// array otherwise.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(v) => vec![v],
            OneOrMany::Many(vs) => vs,
        }
    }
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

/// A reference value: either a bare string or an object carrying `value`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RefValue {
    Plain(String),
    Keyed { value: Option<String> },
}

impl RefValue {
    /// The referenced identifier, if non-empty.
    pub fn as_str(&self) -> Option<&str> {
        let s = match self {
            RefValue::Plain(s) => s.as_str(),
            RefValue::Keyed { value } => value.as_deref()?,
        };
        (!s.is_empty()).then_some(s)
    }
}

/// A translated text variant: a bare string or an object carrying `value`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TextVariant {
    Plain(String),
    Translated { value: Option<String> },
}

impl TextVariant {
    /// The trimmed text, if non-empty.
    pub fn text(&self) -> Option<&str> {
        let s = match self {
            TextVariant::Plain(s) => s.as_str(),
            TextVariant::Translated { value } => value.as_deref()?,
        };
        let trimmed = s.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

/// A text field holding one or more translation variants.
pub type TextField = OneOrMany<TextVariant>;

/// Top-level feed document.
#[derive(Debug, Clone, Deserialize)]
pub struct SiriDocument {
    #[serde(rename = "Siri")]
    pub siri: Option<Siri>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Siri {
    #[serde(rename = "ServiceDelivery")]
    pub service_delivery: Option<ServiceDelivery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceDelivery {
    #[serde(rename = "SituationExchangeDelivery", default)]
    pub situation_exchange_delivery: OneOrMany<SituationExchangeDelivery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SituationExchangeDelivery {
    #[serde(rename = "Situations")]
    pub situations: Option<Situations>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Situations {
    #[serde(rename = "PtSituationElement", default)]
    pub pt_situation_element: OneOrMany<PtSituationElement>,
}

/// One situation record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PtSituationElement {
    #[serde(rename = "SituationNumber")]
    pub situation_number: Option<String>,

    #[serde(rename = "Summary")]
    pub summary: Option<TextField>,

    #[serde(rename = "Description")]
    pub description: Option<TextField>,

    #[serde(rename = "Severity")]
    pub severity: Option<String>,

    #[serde(rename = "ValidityPeriod")]
    pub validity_period: Option<OneOrMany<ValidityPeriod>>,

    #[serde(rename = "InfoLinks")]
    pub info_links: Option<InfoLinks>,

    #[serde(rename = "Affects")]
    pub affects: Option<Affects>,
}

/// When a situation applies.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidityPeriod {
    #[serde(rename = "StartTime")]
    pub start_time: Option<String>,

    #[serde(rename = "EndTime")]
    pub end_time: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InfoLinks {
    #[serde(rename = "InfoLink", default)]
    pub info_link: OneOrMany<RawInfoLink>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawInfoLink {
    #[serde(rename = "Uri")]
    pub uri: Option<String>,

    #[serde(rename = "Label")]
    pub label: Option<TextField>,
}

/// The "affects" structure: which stops, lines and journeys a situation hits.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Affects {
    #[serde(rename = "StopPoints")]
    pub stop_points: Option<StopPoints>,

    #[serde(rename = "StopPlaces")]
    pub stop_places: Option<StopPlaces>,

    #[serde(rename = "Networks")]
    pub networks: Option<Networks>,

    #[serde(rename = "VehicleJourneys")]
    pub vehicle_journeys: Option<VehicleJourneys>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StopPoints {
    #[serde(rename = "AffectedStopPoint", default)]
    pub affected_stop_point: OneOrMany<AffectedStopPoint>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AffectedStopPoint {
    #[serde(rename = "StopPointRef")]
    pub stop_point_ref: Option<RefValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StopPlaces {
    #[serde(rename = "AffectedStopPlace", default)]
    pub affected_stop_place: OneOrMany<AffectedStopPlace>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AffectedStopPlace {
    #[serde(rename = "StopPlaceRef")]
    pub stop_place_ref: Option<RefValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Networks {
    #[serde(rename = "AffectedNetwork", default)]
    pub affected_network: OneOrMany<AffectedNetwork>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AffectedNetwork {
    #[serde(rename = "AffectedLine", default)]
    pub affected_line: OneOrMany<AffectedLine>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AffectedLine {
    #[serde(rename = "LineRef")]
    pub line_ref: Option<RefValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VehicleJourneys {
    #[serde(rename = "AffectedVehicleJourney", default)]
    pub affected_vehicle_journey: OneOrMany<AffectedVehicleJourney>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AffectedVehicleJourney {
    #[serde(rename = "LineRef")]
    pub line_ref: Option<RefValue>,

    #[serde(rename = "FramedVehicleJourneyRef")]
    pub framed_vehicle_journey_ref: Option<FramedVehicleJourneyRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FramedVehicleJourneyRef {
    #[serde(rename = "LineRef")]
    pub line_ref: Option<RefValue>,
}

impl SiriDocument {
    /// Walk the delivery path and collect every situation element.
    ///
    /// Total over absence: a document missing any level yields an empty list.
    pub fn into_situations(self) -> Vec<PtSituationElement> {
        self.siri
            .and_then(|s| s.service_delivery)
            .map(|sd| sd.situation_exchange_delivery.into_vec())
            .unwrap_or_default()
            .into_iter()
            .filter_map(|d| d.situations)
            .flat_map(|s| s.pt_situation_element.into_vec())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_no_situations() {
        let doc: SiriDocument = serde_json::from_str("{}").unwrap();
        assert!(doc.into_situations().is_empty());

        let doc: SiriDocument = serde_json::from_str(r#"{"Siri": {}}"#).unwrap();
        assert!(doc.into_situations().is_empty());

        let doc: SiriDocument =
            serde_json::from_str(r#"{"Siri": {"ServiceDelivery": {}}}"#).unwrap();
        assert!(doc.into_situations().is_empty());
    }

    #[test]
    fn single_delivery_object_is_accepted() {
        let json = r#"{
            "Siri": {
                "ServiceDelivery": {
                    "SituationExchangeDelivery": {
                        "Situations": {
                            "PtSituationElement": {
                                "SituationNumber": "ENT:123"
                            }
                        }
                    }
                }
            }
        }"#;

        let doc: SiriDocument = serde_json::from_str(json).unwrap();
        let situations = doc.into_situations();
        assert_eq!(situations.len(), 1);
        assert_eq!(situations[0].situation_number.as_deref(), Some("ENT:123"));
    }

    #[test]
    fn delivery_arrays_are_flattened() {
        let json = r#"{
            "Siri": {
                "ServiceDelivery": {
                    "SituationExchangeDelivery": [
                        {
                            "Situations": {
                                "PtSituationElement": [
                                    {"SituationNumber": "ENT:1"},
                                    {"SituationNumber": "ENT:2"}
                                ]
                            }
                        },
                        {}
                    ]
                }
            }
        }"#;

        let doc: SiriDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.into_situations().len(), 2);
    }

    #[test]
    fn text_variant_forms() {
        let plain: TextVariant = serde_json::from_str(r#""Ferje innstilt""#).unwrap();
        assert_eq!(plain.text(), Some("Ferje innstilt"));

        let keyed: TextVariant =
            serde_json::from_str(r#"{"value": "  Ferje innstilt  "}"#).unwrap();
        assert_eq!(keyed.text(), Some("Ferje innstilt"));

        let empty: TextVariant = serde_json::from_str(r#"{"value": ""}"#).unwrap();
        assert_eq!(empty.text(), None);

        let blank: TextVariant = serde_json::from_str(r#""   ""#).unwrap();
        assert_eq!(blank.text(), None);
    }

    #[test]
    fn ref_value_forms() {
        let plain: RefValue = serde_json::from_str(r#""NSR:Quay:123""#).unwrap();
        assert_eq!(plain.as_str(), Some("NSR:Quay:123"));

        let keyed: RefValue = serde_json::from_str(r#"{"value": "NSR:Quay:123"}"#).unwrap();
        assert_eq!(keyed.as_str(), Some("NSR:Quay:123"));

        let empty: RefValue = serde_json::from_str(r#"{"value": ""}"#).unwrap();
        assert_eq!(empty.as_str(), None);
    }
}
