//! HTTP client for the TomTom Traffic API.
//!
//! This is the only module that knows the provider's URLs, query parameters,
//! and response layout. Both operations return envelopes; transport and
//! decoding faults are folded into the failure variant here and never
//! propagate to callers.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use serde::de::DeserializeOwned;

use super::error::ProviderError;
use super::normalize::{normalize_flow, normalize_incident};
use super::wire::{FlowResponse, IncidentsResponse};
use super::TrafficProvider;
use crate::models::{
    category_filter_param, BoundingBox, Coordinate, Envelope, FailureKind, FlowReport,
    IncidentList, IncidentsReport, NO_TRAFFIC_DATA,
};

pub const DEFAULT_BASE_URL: &str = "https://api.tomtom.com/traffic/services";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Field projection sent with incident requests.
pub const INCIDENT_FIELDS: &str = "{incidents{type,geometry{type,coordinates},properties{iconCategory,magnitudeOfDelay,events{description},from,to,delay}}}";

/// Connection settings for the provider.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    /// API credential. Empty when unconfigured; the provider then rejects
    /// requests and callers receive failure envelopes.
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl ProviderSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

pub struct TrafficProviderClient {
    http: reqwest::Client,
    settings: ProviderSettings,
}

impl TrafficProviderClient {
    pub fn new(settings: ProviderSettings) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| ProviderError::Client(e.to_string()))?;

        Ok(Self { http, settings })
    }

    pub fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    fn flow_url(&self, zoom: u8) -> String {
        format!(
            "{}/4/flowSegmentData/absolute/{}/json",
            self.settings.base_url, zoom
        )
    }

    fn incidents_url(&self) -> String {
        format!("{}/5/incidentDetails", self.settings.base_url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let timeout = self.settings.timeout;

        let response = self
            .http
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ProviderError::from_reqwest(e, timeout))?;

        Ok(serde_json::from_slice(&body)?)
    }

    async fn request_flow(&self, coordinate: Coordinate, zoom: u8) -> Result<FlowReport, ProviderError> {
        let params = [
            ("key", self.settings.api_key.clone()),
            ("point", coordinate.to_point_param()),
            ("unit", "KMPH".to_string()),
        ];

        let response: FlowResponse = self.get_json(&self.flow_url(zoom), &params).await?;

        Ok(match response.flow_segment_data {
            Some(segment) => Envelope::Success(normalize_flow(segment)),
            None => Envelope::failure(FailureKind::NoData, NO_TRAFFIC_DATA),
        })
    }

    async fn request_incidents(&self, bbox: &BoundingBox) -> Result<IncidentsReport, ProviderError> {
        let params = [
            ("key", self.settings.api_key.clone()),
            ("bbox", bbox.to_string()),
            ("fields", INCIDENT_FIELDS.to_string()),
            ("language", "en-US".to_string()),
            ("categoryFilter", category_filter_param()),
            ("timeValidityFilter", "present".to_string()),
        ];

        let response: IncidentsResponse = self.get_json(&self.incidents_url(), &params).await?;

        let incidents = response
            .incidents
            .unwrap_or_default()
            .into_iter()
            .map(normalize_incident)
            .collect();

        Ok(Envelope::Success(IncidentList::new(incidents)))
    }
}

#[async_trait]
impl TrafficProvider for TrafficProviderClient {
    async fn fetch_flow(&self, coordinate: Coordinate, zoom: u8) -> FlowReport {
        debug!("Fetching traffic flow at {} (zoom {})", coordinate.to_point_param(), zoom);

        match self.request_flow(coordinate, zoom).await {
            Ok(report) => {
                if let Some(error) = report.error() {
                    debug!("Flow lookup at {} returned no data: {}", coordinate.to_point_param(), error);
                }
                report
            }
            Err(e) => {
                warn!("Flow lookup at {} failed: {}", coordinate.to_point_param(), e);
                e.into_envelope()
            }
        }
    }

    async fn fetch_incidents(&self, bbox: &BoundingBox, zoom: u8) -> IncidentsReport {
        // The incidents endpoint is not zoom-dependent.
        debug!("Fetching incidents in bbox {} (zoom {})", bbox, zoom);

        match self.request_incidents(bbox).await {
            Ok(report) => {
                if let Some(list) = report.data() {
                    debug!("Received {} incidents for bbox {}", list.incident_count(), bbox);
                }
                report
            }
            Err(e) => {
                warn!("Incident lookup for bbox {} failed: {}", bbox, e);
                e.into_envelope()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_trim_trailing_slash() {
        let settings = ProviderSettings::new("k").with_base_url("http://localhost:9000/");
        assert_eq!(settings.base_url, "http://localhost:9000");
    }

    #[test]
    fn test_urls() {
        let client = TrafficProviderClient::new(
            ProviderSettings::new("k").with_base_url("http://upstream"),
        )
        .unwrap();
        assert_eq!(client.flow_url(10), "http://upstream/4/flowSegmentData/absolute/10/json");
        assert_eq!(client.incidents_url(), "http://upstream/5/incidentDetails");
    }

    #[test]
    fn test_default_settings() {
        let settings = ProviderSettings::new("");
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.timeout, Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_failure_envelope() {
        // Port 9 (discard) on localhost is not expected to serve HTTP.
        let client = TrafficProviderClient::new(
            ProviderSettings::new("k")
                .with_base_url("http://127.0.0.1:9")
                .with_timeout(Duration::from_secs(2)),
        )
        .unwrap();

        let report = client.fetch_flow(Coordinate::new(1.0, 2.0), 10).await;
        assert!(!report.is_success());
        assert!(report.error().is_some());
    }
}
