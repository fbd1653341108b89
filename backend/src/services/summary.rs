//! Combined flow + incidents report for a single location.

use std::sync::Arc;

use log::debug;

use crate::models::{BoundingBox, Coordinate, TrafficSummary, SUMMARY_BBOX_OFFSET};
use crate::provider::{TrafficProvider, DEFAULT_FLOW_ZOOM, DEFAULT_INCIDENT_ZOOM};

#[derive(Clone)]
pub struct TrafficSummaryAggregator {
    provider: Arc<dyn TrafficProvider>,
}

impl TrafficSummaryAggregator {
    pub fn new(provider: Arc<dyn TrafficProvider>) -> Self {
        Self { provider }
    }

    /// Fetch flow and incidents around `location` concurrently.
    ///
    /// Both legs are always reported; a failure in one does not suppress the
    /// other.
    pub async fn summarize(&self, location: Coordinate) -> TrafficSummary {
        let bbox = BoundingBox::around(location, SUMMARY_BBOX_OFFSET);

        let (flow, incidents) = tokio::join!(
            self.provider.fetch_flow(location, DEFAULT_FLOW_ZOOM),
            self.provider.fetch_incidents(&bbox, DEFAULT_INCIDENT_ZOOM),
        );

        debug!(
            "Summary at {}: flow_ok={} incidents_ok={}",
            location.to_point_param(),
            flow.is_success(),
            incidents.is_success()
        );

        TrafficSummary {
            location,
            flow,
            incidents,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Envelope, FailureKind, FlowReport, IncidentList, IncidentsReport, TrafficFlow,
    };
    use async_trait::async_trait;
    use parking_lot::Mutex;

    /// Records the bbox it was asked for and answers with canned reports.
    struct StubProvider {
        flow: FlowReport,
        incidents: IncidentsReport,
        seen_bbox: Mutex<Option<BoundingBox>>,
    }

    #[async_trait]
    impl TrafficProvider for StubProvider {
        async fn fetch_flow(&self, _coordinate: Coordinate, _zoom: u8) -> FlowReport {
            self.flow.clone()
        }

        async fn fetch_incidents(&self, bbox: &BoundingBox, _zoom: u8) -> IncidentsReport {
            *self.seen_bbox.lock() = Some(*bbox);
            self.incidents.clone()
        }
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_successful_leg() {
        let stub = Arc::new(StubProvider {
            flow: Envelope::failure(FailureKind::Transport, "Request failed with status code 500"),
            incidents: Envelope::Success(IncidentList::default()),
            seen_bbox: Mutex::new(None),
        });
        let aggregator = TrafficSummaryAggregator::new(stub.clone());

        let summary = aggregator.summarize(Coordinate::new(28.6139, 77.2090)).await;

        assert!(!summary.flow.is_success());
        assert!(summary.incidents.is_success());
        assert_eq!(summary.location, Coordinate::new(28.6139, 77.2090));
    }

    #[tokio::test]
    async fn test_uses_summary_offset() {
        let stub = Arc::new(StubProvider {
            flow: Envelope::Success(TrafficFlow::default()),
            incidents: Envelope::Success(IncidentList::default()),
            seen_bbox: Mutex::new(None),
        });
        let aggregator = TrafficSummaryAggregator::new(stub.clone());

        aggregator.summarize(Coordinate::new(10.0, 20.0)).await;

        let bbox = (*stub.seen_bbox.lock()).expect("incidents were requested");
        assert!((bbox.min_lng - 19.955).abs() < 1e-9);
        assert!((bbox.max_lat - 10.045).abs() < 1e-9);
    }
}
