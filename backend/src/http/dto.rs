//! Data Transfer Objects for the HTTP API.
//!
//! Report payloads (`FlowReport`, `IncidentsReport`, `TrafficSummary`) are
//! serialized directly from the models; this module holds query parameters
//! and the few response shapes that only exist at the HTTP boundary.

use serde::{Deserialize, Serialize};

use crate::models::Coordinate;
use crate::services::dashboard::SettingsError;
use crate::services::{DashboardSettings, DashboardState, FailureNotice};

/// Query parameters for the flow endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FlowQuery {
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    /// Provider zoom level (default: 10)
    #[serde(default)]
    pub zoom: Option<u8>,
}

/// Query parameters for the incidents endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct IncidentsQuery {
    /// `min_lng,min_lat,max_lng,max_lat` (required)
    #[serde(default)]
    pub bbox: Option<String>,
    /// Provider zoom level (default: 12)
    #[serde(default)]
    pub zoom: Option<u8>,
}

/// Query parameters for location-keyed endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LocationQuery {
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
}

/// Query parameters for the dashboard view.
///
/// Settings fields are optional; omitted ones take the dashboard defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DashboardQuery {
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    /// Refresh interval in seconds (10-300)
    #[serde(default)]
    pub refresh: Option<u64>,
    /// Map zoom level (8-18)
    #[serde(default)]
    pub zoom: Option<u8>,
    #[serde(default)]
    pub sound_alerts: Option<bool>,
    #[serde(default)]
    pub auto_refresh: Option<bool>,
}

impl DashboardQuery {
    pub fn settings(&self) -> Result<DashboardSettings, SettingsError> {
        let defaults = DashboardSettings::default();
        DashboardSettings::validated(
            self.refresh.unwrap_or(defaults.refresh_interval.as_secs()),
            self.zoom.unwrap_or(defaults.zoom_level),
            self.sound_alerts.unwrap_or(defaults.sound_alerts),
            self.auto_refresh.unwrap_or(defaults.auto_refresh),
        )
    }
}

/// Query parameters for place search.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GeocodeQuery {
    #[serde(default)]
    pub q: Option<String>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// `healthy` with a provider credential, `degraded` without
    pub status: String,
    pub api_configured: bool,
    pub default_location: Option<Coordinate>,
    pub version: String,
}

/// Place search response.
#[derive(Debug, Clone, Serialize)]
pub struct GeocodeResponse {
    pub success: bool,
    pub location: Coordinate,
    pub display_name: String,
}

/// A failure notice as shown to the user.
#[derive(Debug, Clone, Serialize)]
pub struct NoticeDto {
    pub kind: FailureNotice,
    pub message: String,
}

impl From<FailureNotice> for NoticeDto {
    fn from(notice: FailureNotice) -> Self {
        Self {
            kind: notice,
            message: notice.message().to_string(),
        }
    }
}

/// Dashboard view-model response.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardResponse {
    pub state: DashboardState,
    pub notices: Vec<NoticeDto>,
}
