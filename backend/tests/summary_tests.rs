//! TrafficSummaryAggregator over the real client and a fake upstream.

#![cfg(feature = "http-server")]

mod support;

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use traffic_dashboard::models::Coordinate;
use traffic_dashboard::provider::{ProviderSettings, TrafficProviderClient};
use traffic_dashboard::services::TrafficSummaryAggregator;

fn aggregator(base_url: &str, timeout: Duration) -> TrafficSummaryAggregator {
    let client = TrafficProviderClient::new(
        ProviderSettings::new("k")
            .with_base_url(base_url)
            .with_timeout(timeout),
    )
    .unwrap();
    TrafficSummaryAggregator::new(Arc::new(client))
}

#[tokio::test]
async fn test_flow_failure_does_not_discard_incidents() {
    let router = Router::new()
        .route(
            "/4/flowSegmentData/absolute/{zoom}/json",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        )
        .route(
            "/5/incidentDetails",
            get(|| async {
                Json(json!({"incidents": [{"type": "Feature", "properties": {"iconCategory": 9}}]}))
            }),
        );
    let base = support::spawn_upstream(router).await;

    let summary = aggregator(&base, Duration::from_secs(5))
        .summarize(Coordinate::new(28.6139, 77.209))
        .await;

    assert!(!summary.flow.is_success());
    assert!(summary.incidents.is_success());
    assert_eq!(summary.incidents.data().unwrap().incidents()[0].category_label(), "Road Works");

    let value = serde_json::to_value(&summary).unwrap();
    assert_eq!(value["traffic_flow"]["success"], json!(false));
    assert_eq!(value["incidents"]["incident_count"], json!(1));
}

#[tokio::test]
async fn test_slow_leg_does_not_abort_sibling() {
    let router = Router::new()
        .route(
            "/4/flowSegmentData/absolute/{zoom}/json",
            get(|| async {
                Json(json!({"flowSegmentData": {"currentSpeed": 12, "freeFlowSpeed": 48}}))
            }),
        )
        .route(
            "/5/incidentDetails",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({"incidents": []}))
            }),
        );
    let base = support::spawn_upstream(router).await;

    let summary = aggregator(&base, Duration::from_millis(300))
        .summarize(Coordinate::new(1.0, 2.0))
        .await;

    let flow = summary.flow.data().expect("flow leg succeeded");
    assert_eq!(flow.current_speed_kmh, 12.0);
    assert_eq!(
        flow.congestion(),
        traffic_dashboard::models::CongestionLevel::Severe
    );
    assert!(summary.incidents.error().unwrap().contains("timeout"));
}
