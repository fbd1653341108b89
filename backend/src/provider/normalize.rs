//! Mapping from raw provider records to the internal report shapes.

use serde_json::Value;

use super::wire::{RawFlowSegment, RawIncident};
use crate::models::{Incident, TrafficFlow};

pub const DEFAULT_INCIDENT_TYPE: &str = "Unknown";
pub const DEFAULT_INCIDENT_DESCRIPTION: &str = "No description";

/// Apply field-by-field defaults to a flow segment.
pub fn normalize_flow(raw: RawFlowSegment) -> TrafficFlow {
    TrafficFlow {
        current_speed_kmh: raw.current_speed.unwrap_or(0.0),
        free_flow_speed_kmh: raw.free_flow_speed.unwrap_or(0.0),
        current_travel_time_sec: raw.current_travel_time.unwrap_or(0),
        free_flow_travel_time_sec: raw.free_flow_travel_time.unwrap_or(0),
        confidence: raw.confidence.unwrap_or(0.0),
        road_closure: raw.road_closure.unwrap_or(false),
    }
}

/// Normalize one incident record. Missing fields are defaulted, never rejected.
pub fn normalize_incident(raw: RawIncident) -> Incident {
    let props = raw.properties.unwrap_or_default();

    let kind = raw
        .kind
        .filter(|k| !k.is_empty())
        .unwrap_or_else(|| DEFAULT_INCIDENT_TYPE.to_string());

    let description = props
        .events
        .and_then(|events| events.into_iter().next())
        .and_then(|event| event.description)
        .unwrap_or_else(|| DEFAULT_INCIDENT_DESCRIPTION.to_string());

    let coordinates = raw
        .geometry
        .and_then(|g| g.coordinates)
        .map(|c| coordinate_pairs(&c))
        .unwrap_or_default();

    Incident {
        kind,
        description,
        icon_category: props.icon_category.unwrap_or(0),
        delay_sec: props.delay.unwrap_or(0),
        magnitude_of_delay: props.magnitude_of_delay.unwrap_or(0),
        from: props.from.unwrap_or_default(),
        to: props.to.unwrap_or_default(),
        coordinates,
    }
}

/// Flatten geometry coordinates into `[lng, lat]` pairs.
///
/// A point (`[lng, lat]`) yields one pair, a line (`[[lng, lat], ...]`) keeps
/// its order, anything else yields nothing.
fn coordinate_pairs(value: &Value) -> Vec<[f64; 2]> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };

    if let Some(pair) = as_pair(value) {
        return vec![pair];
    }

    items.iter().filter_map(as_pair).collect()
}

fn as_pair(value: &Value) -> Option<[f64; 2]> {
    let items = value.as_array()?;
    if items.len() < 2 {
        return None;
    }
    Some([items[0].as_f64()?, items[1].as_f64()?])
}
