//! Upstream traffic provider access.
//!
//! - `wire`: raw response shapes, all fields optional
//! - `normalize`: raw records to internal reports, with defaulting
//! - `client`: the TomTom HTTP client
//! - `error`: faults on the call path, folded into envelopes

pub mod client;
pub mod error;
pub mod normalize;
pub mod wire;

use async_trait::async_trait;

use crate::models::{BoundingBox, Coordinate, FlowReport, IncidentsReport};

pub use client::{ProviderSettings, TrafficProviderClient};
pub use error::ProviderError;
pub use normalize::{normalize_flow, normalize_incident};

pub const DEFAULT_FLOW_ZOOM: u8 = 10;
pub const DEFAULT_INCIDENT_ZOOM: u8 = 12;

/// Source of flow and incident reports.
///
/// Implementations never fail: every outcome, including transport faults,
/// is reported inside the returned envelope.
#[async_trait]
pub trait TrafficProvider: Send + Sync {
    async fn fetch_flow(&self, coordinate: Coordinate, zoom: u8) -> FlowReport;

    async fn fetch_incidents(&self, bbox: &BoundingBox, zoom: u8) -> IncidentsReport;
}
