//! Raw TomTom response shapes. Every field is optional; absence is normal.
//!
//! Fields decode leniently: a value of the wrong type reads as absent instead
//! of failing the whole response, so one odd record cannot hide the others.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowResponse {
    #[serde(default, deserialize_with = "lenient")]
    pub flow_segment_data: Option<RawFlowSegment>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFlowSegment {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub current_speed: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub free_flow_speed: Option<f64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub current_travel_time: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub free_flow_travel_time: Option<i64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub confidence: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub road_closure: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IncidentsResponse {
    #[serde(default, deserialize_with = "lenient_seq")]
    pub incidents: Option<Vec<RawIncident>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawIncident {
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub geometry: Option<RawGeometry>,
    #[serde(default, deserialize_with = "lenient")]
    pub properties: Option<RawIncidentProperties>,
}

/// GeoJSON-ish geometry. Coordinates stay untyped because their nesting
/// depends on the geometry type.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawGeometry {
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub kind: Option<String>,
    #[serde(default)]
    pub coordinates: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawIncidentProperties {
    #[serde(default, deserialize_with = "lenient_int")]
    pub icon_category: Option<i32>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub magnitude_of_delay: Option<i32>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub events: Option<Vec<RawIncidentEvent>>,
    #[serde(default, deserialize_with = "lenient")]
    pub from: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub to: Option<String>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub delay: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawIncidentEvent {
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
}

/// Any value that does not decode as `T` (including `null`) reads as `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// A non-array reads as `None`; elements that do not decode are replaced by
/// `T::default()` so the list keeps its length.
fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(None);
    };

    Ok(Some(
        items
            .into_iter()
            .map(|item| serde_json::from_value(item).unwrap_or_default())
            .collect(),
    ))
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number(&Value::deserialize(deserializer)?))
}

/// Integers tolerate fractional values (rounded) and numeric strings.
fn lenient_int<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
{
    let value = Value::deserialize(deserializer)?;
    let int = match &value {
        Value::Number(n) => n.as_i64().or_else(|| number(&value).map(|f| f.round() as i64)),
        _ => number(&value).map(|f| f.round() as i64),
    };
    Ok(int.and_then(|i| T::try_from(i).ok()))
}

fn number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}
