//! Dashboard view-model kept in sync with traffic reports.
//!
//! All presentation state lives in a caller-owned [`DashboardState`]; nothing
//! here is global. A front end renders the state, a refresh loop feeds it.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{
    incident_category_icon, incident_category_label, BoundingBox, CongestionLevel, Coordinate,
    FailureKind, FlowReport, Incident, IncidentsReport, TrafficFlow, TrafficSummary,
    INCIDENT_PANEL_BBOX_OFFSET,
};
use crate::provider::{TrafficProvider, DEFAULT_FLOW_ZOOM, DEFAULT_INCIDENT_ZOOM};

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);
/// How long a dashboard load waits for each panel.
pub const PANEL_LOAD_DEADLINE: Duration = Duration::from_secs(10);
pub const DEFAULT_ZOOM_LEVEL: u8 = 12;
pub const MIN_REFRESH_SECS: u64 = 10;
pub const MAX_REFRESH_SECS: u64 = 300;
pub const MIN_ZOOM_LEVEL: u8 = 8;
pub const MAX_ZOOM_LEVEL: u8 = 18;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("Refresh interval must be between {min} and {max} seconds", min = MIN_REFRESH_SECS, max = MAX_REFRESH_SECS)]
    RefreshInterval(u64),
    #[error("Zoom level must be between {min} and {max}", min = MIN_ZOOM_LEVEL, max = MAX_ZOOM_LEVEL)]
    ZoomLevel(u8),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSettings {
    pub refresh_interval: Duration,
    pub zoom_level: u8,
    pub sound_alerts: bool,
    pub auto_refresh: bool,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            zoom_level: DEFAULT_ZOOM_LEVEL,
            sound_alerts: false,
            auto_refresh: true,
        }
    }
}

impl DashboardSettings {
    /// Build settings from user input, rejecting out-of-range values.
    pub fn validated(
        refresh_secs: u64,
        zoom_level: u8,
        sound_alerts: bool,
        auto_refresh: bool,
    ) -> Result<Self, SettingsError> {
        if !(MIN_REFRESH_SECS..=MAX_REFRESH_SECS).contains(&refresh_secs) {
            return Err(SettingsError::RefreshInterval(refresh_secs));
        }
        if !(MIN_ZOOM_LEVEL..=MAX_ZOOM_LEVEL).contains(&zoom_level) {
            return Err(SettingsError::ZoomLevel(zoom_level));
        }

        Ok(Self {
            refresh_interval: Duration::from_secs(refresh_secs),
            zoom_level,
            sound_alerts,
            auto_refresh,
        })
    }
}

/// Stats panel contents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrafficStatsView {
    pub current_speed_kmh: i64,
    pub free_flow_speed_kmh: i64,
    pub congestion: CongestionLevel,
    pub congestion_color: &'static str,
    pub delay_text: String,
}

impl From<&TrafficFlow> for TrafficStatsView {
    fn from(flow: &TrafficFlow) -> Self {
        let congestion = flow.congestion();
        let delay = flow.travel_time_delay_sec();

        Self {
            current_speed_kmh: flow.current_speed_kmh.round() as i64,
            free_flow_speed_kmh: flow.free_flow_speed_kmh.round() as i64,
            congestion,
            congestion_color: congestion.color(),
            delay_text: if delay > 0 {
                format!("+{}s delay", delay)
            } else {
                "No delay".to_string()
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IncidentSeverity {
    Low,
    High,
}

/// One row of the incident list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncidentListItem {
    pub label: &'static str,
    pub description: String,
    pub location: String,
    pub delay_text: Option<String>,
    pub severity: IncidentSeverity,
}

impl From<&Incident> for IncidentListItem {
    fn from(incident: &Incident) -> Self {
        Self {
            label: incident_category_label(incident.icon_category),
            description: incident.description.clone(),
            location: if incident.from.is_empty() {
                "Unknown location".to_string()
            } else {
                incident.from.clone()
            },
            delay_text: (incident.delay_sec > 0).then(|| format!("{}s delay", incident.delay_sec)),
            severity: if incident.magnitude_of_delay > 2 {
                IncidentSeverity::High
            } else {
                IncidentSeverity::Low
            },
        }
    }
}

/// Map marker for an incident, placed at its first coordinate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncidentMarker {
    pub position: Coordinate,
    pub icon: &'static str,
    pub title: &'static str,
    pub description: String,
    pub delay_sec: i64,
}

impl IncidentMarker {
    /// `None` when the incident carries no coordinates.
    pub fn for_incident(incident: &Incident) -> Option<Self> {
        let [lng, lat] = *incident.coordinates.first()?;
        Some(Self {
            position: Coordinate::new(lat, lng),
            icon: incident_category_icon(incident.icon_category),
            title: incident_category_label(incident.icon_category),
            description: incident.description.clone(),
            delay_sec: incident.delay_sec,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
}

/// User-facing failure notice. Never carries provider error text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureNotice {
    Timeout,
    Generic,
}

impl FailureNotice {
    pub fn from_kind(kind: FailureKind) -> Self {
        match kind {
            FailureKind::Timeout => FailureNotice::Timeout,
            FailureKind::NoData | FailureKind::Transport => FailureNotice::Generic,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            FailureNotice::Timeout => "Request timed out. Please try again.",
            FailureNotice::Generic => "Failed to load traffic data",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardState {
    pub location: Coordinate,
    pub settings: DashboardSettings,
    pub stats: Option<TrafficStatsView>,
    pub incidents: Vec<IncidentListItem>,
    pub markers: Vec<IncidentMarker>,
    pub incidents_visible: bool,
    pub connection: ConnectionStatus,
    pub last_updated: Option<DateTime<Utc>>,
}

impl DashboardState {
    pub fn new(location: Coordinate, settings: DashboardSettings) -> Self {
        Self {
            location,
            settings,
            stats: None,
            incidents: Vec::new(),
            markers: Vec::new(),
            incidents_visible: true,
            connection: ConnectionStatus::Connected,
            last_updated: None,
        }
    }

    pub fn move_to(&mut self, location: Coordinate) {
        self.location = location;
    }

    /// Area the incident panel queries around the current location.
    pub fn incident_bbox(&self) -> BoundingBox {
        BoundingBox::around(self.location, INCIDENT_PANEL_BBOX_OFFSET)
    }

    /// Update the stats panel. Failed reports leave the previous stats in place.
    pub fn apply_flow(&mut self, report: &FlowReport) -> Option<FailureNotice> {
        match report.data() {
            Some(flow) => {
                self.stats = Some(TrafficStatsView::from(flow));
                None
            }
            None => report.failure_kind().map(FailureNotice::from_kind),
        }
    }

    /// Replace the incident list and markers. Failed reports leave both untouched.
    pub fn apply_incidents(&mut self, report: &IncidentsReport) -> Option<FailureNotice> {
        match report.data() {
            Some(list) => {
                self.incidents = list.incidents().iter().map(IncidentListItem::from).collect();
                self.markers = list
                    .incidents()
                    .iter()
                    .filter_map(IncidentMarker::for_incident)
                    .collect();
                None
            }
            None => report.failure_kind().map(FailureNotice::from_kind),
        }
    }

    /// Load the stats panel and the incident panel for the current location.
    ///
    /// Flow is read at the point, incidents over [`Self::incident_bbox`]. A
    /// panel that misses `deadline` leaves the dashboard disconnected with a
    /// timeout notice; panels that did answer are applied either way.
    pub async fn refresh(
        &mut self,
        provider: &dyn TrafficProvider,
        deadline: Duration,
        now: DateTime<Utc>,
    ) -> Vec<FailureNotice> {
        let location = self.location;
        let bbox = self.incident_bbox();

        let (flow, incidents) = tokio::join!(
            tokio::time::timeout(deadline, provider.fetch_flow(location, DEFAULT_FLOW_ZOOM)),
            tokio::time::timeout(deadline, provider.fetch_incidents(&bbox, DEFAULT_INCIDENT_ZOOM)),
        );

        let mut notices = Vec::new();
        let mut missed_deadline = false;

        match flow {
            Ok(report) => notices.extend(self.apply_flow(&report)),
            Err(_) => missed_deadline = true,
        }
        match incidents {
            Ok(report) => notices.extend(self.apply_incidents(&report)),
            Err(_) => missed_deadline = true,
        }

        if missed_deadline {
            self.mark_disconnected();
            notices.push(FailureNotice::Timeout);
        } else {
            self.connection = ConnectionStatus::Connected;
            self.last_updated = Some(now);
        }

        notices.dedup();
        notices
    }

    /// Apply both legs of a summary and stamp the update time.
    ///
    /// Returns a notice per failed leg; successful legs are applied regardless.
    pub fn apply_summary(&mut self, summary: &TrafficSummary, now: DateTime<Utc>) -> Vec<FailureNotice> {
        self.move_to(summary.location);

        let notices: Vec<FailureNotice> = [
            self.apply_flow(&summary.flow),
            self.apply_incidents(&summary.incidents),
        ]
        .into_iter()
        .flatten()
        .collect();

        self.connection = ConnectionStatus::Connected;
        self.last_updated = Some(now);
        notices
    }

    /// Record that the backend itself could not be reached.
    pub fn mark_disconnected(&mut self) {
        self.connection = ConnectionStatus::Disconnected;
    }

    pub fn toggle_incidents(&mut self) -> bool {
        self.incidents_visible = !self.incidents_visible;
        self.incidents_visible
    }

    pub fn visible_markers(&self) -> &[IncidentMarker] {
        if self.incidents_visible {
            &self.markers
        } else {
            &[]
        }
    }
}
