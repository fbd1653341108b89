//! Normalized traffic reports and the success/failure envelope they travel in.
//!
//! Every report leaving the provider client is an [`Envelope`]: either the
//! normalized payload or an error message. The JSON form is flat, keyed by
//! `success`:
//!
//! ```json
//! {"success": true, "current_speed": 42.0, "free_flow_speed": 60.0, ...}
//! {"success": false, "error": "No traffic data"}
//! ```

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use super::congestion::CongestionLevel;
use super::geo::Coordinate;

/// Message used when the provider answers without a flow-segment payload.
pub const NO_TRAFFIC_DATA: &str = "No traffic data";

/// Why an envelope failed. Not part of the JSON form.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// Well-formed response lacking the expected payload.
    NoData,
    /// The upstream call exceeded its timeout.
    Timeout,
    /// Network error, non-success status, or malformed body.
    Transport,
}

/// Tagged success/failure value returned in place of raising a fault.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope<T> {
    Success(T),
    Failure { error: String, kind: FailureKind },
}

impl<T> Envelope<T> {
    pub fn failure(kind: FailureKind, error: impl Into<String>) -> Self {
        Envelope::Failure {
            error: error.into(),
            kind,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Envelope::Success(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Envelope::Success(data) => Some(data),
            Envelope::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Envelope::Success(_) => None,
            Envelope::Failure { error, .. } => Some(error),
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Envelope::Success(_) => None,
            Envelope::Failure { kind, .. } => Some(*kind),
        }
    }
}

impl<T: Serialize> Serialize for Envelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Wire<'a, T> {
            success: bool,
            #[serde(flatten)]
            data: Option<&'a T>,
            #[serde(skip_serializing_if = "Option::is_none")]
            error: Option<&'a str>,
        }

        Wire {
            success: self.is_success(),
            data: self.data(),
            error: self.error(),
        }
        .serialize(serializer)
    }
}

/// Flow measurement for the road segment nearest a queried point.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrafficFlow {
    #[serde(rename = "current_speed")]
    pub current_speed_kmh: f64,
    #[serde(rename = "free_flow_speed")]
    pub free_flow_speed_kmh: f64,
    #[serde(rename = "current_travel_time")]
    pub current_travel_time_sec: i64,
    #[serde(rename = "free_flow_travel_time")]
    pub free_flow_travel_time_sec: i64,
    pub confidence: f64,
    pub road_closure: bool,
}

impl TrafficFlow {
    pub fn congestion(&self) -> CongestionLevel {
        CongestionLevel::classify(self.current_speed_kmh, self.free_flow_speed_kmh)
    }

    /// Extra seconds over free-flow travel time, if any.
    pub fn travel_time_delay_sec(&self) -> i64 {
        (self.current_travel_time_sec - self.free_flow_travel_time_sec).max(0)
    }
}

pub type FlowReport = Envelope<TrafficFlow>;

/// A normalized traffic incident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub icon_category: i32,
    #[serde(rename = "delay")]
    pub delay_sec: i64,
    #[serde(rename = "magnitude")]
    pub magnitude_of_delay: i32,
    pub from: String,
    pub to: String,
    /// `[longitude, latitude]` pairs in provider order.
    pub coordinates: Vec<[f64; 2]>,
}

impl Incident {
    pub fn category_label(&self) -> &'static str {
        incident_category_label(self.icon_category)
    }
}

/// Incident list whose count always equals its length.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IncidentList {
    incidents: Vec<Incident>,
}

impl IncidentList {
    pub fn new(incidents: Vec<Incident>) -> Self {
        Self { incidents }
    }

    pub fn incident_count(&self) -> usize {
        self.incidents.len()
    }

    pub fn incidents(&self) -> &[Incident] {
        &self.incidents
    }
}

impl Serialize for IncidentList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("IncidentList", 2)?;
        state.serialize_field("incident_count", &self.incident_count())?;
        state.serialize_field("incidents", &self.incidents)?;
        state.end()
    }
}

pub type IncidentsReport = Envelope<IncidentList>;

/// Combined flow and incident report for one location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrafficSummary {
    pub location: Coordinate,
    #[serde(rename = "traffic_flow")]
    pub flow: FlowReport,
    pub incidents: IncidentsReport,
}

/// Incident categories requested from the provider.
pub const INCIDENT_CATEGORY_FILTER: [i32; 13] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 14];

/// Comma-joined form of [`INCIDENT_CATEGORY_FILTER`].
pub fn category_filter_param() -> String {
    INCIDENT_CATEGORY_FILTER
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

pub fn incident_category_label(icon_category: i32) -> &'static str {
    match icon_category {
        0 => "Unknown",
        1 => "Accident",
        2 => "Fog",
        3 => "Dangerous Conditions",
        4 => "Rain",
        5 => "Ice",
        6 => "Jam",
        7 => "Lane Closed",
        8 => "Road Closed",
        9 => "Road Works",
        10 => "Wind",
        11 => "Flooding",
        14 => "Broken Down Vehicle",
        _ => "Traffic Event",
    }
}

/// Map-marker icon name for an incident category.
pub fn incident_category_icon(icon_category: i32) -> &'static str {
    match icon_category {
        1 => "fa-car-crash",
        6 => "fa-car",
        7 => "fa-road",
        8 => "fa-ban",
        9 => "fa-tools",
        14 => "fa-wrench",
        _ => "fa-exclamation-triangle",
    }
}
