//! Public API surface for the backend.
//!
//! This file consolidates the report types returned to callers. All types
//! serialize to the JSON shapes served by the HTTP API.

pub use crate::models::BoundingBox;
pub use crate::models::CongestionLevel;
pub use crate::models::Coordinate;
pub use crate::models::Envelope;
pub use crate::models::FailureKind;
pub use crate::models::FlowReport;
pub use crate::models::Incident;
pub use crate::models::IncidentList;
pub use crate::models::IncidentsReport;
pub use crate::models::TrafficFlow;
pub use crate::models::TrafficSummary;
pub use crate::provider::TrafficProvider;
pub use crate::provider::TrafficProviderClient;
pub use crate::services::TrafficSummaryAggregator;
