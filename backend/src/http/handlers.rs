//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! provider client or the service layer. Upstream outcomes are returned as
//! envelopes with status 200; only caller-input faults are rejected.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    Json,
};
use chrono::Utc;

use super::dto::{
    DashboardQuery, DashboardResponse, FlowQuery, GeocodeQuery, GeocodeResponse, HealthResponse,
    IncidentsQuery, LocationQuery,
};
use super::error::{ApiError, AppError};
use super::state::AppState;
use crate::models::{BoundingBox, FlowReport, IncidentsReport, TrafficSummary};
use crate::provider::{DEFAULT_FLOW_ZOOM, DEFAULT_INCIDENT_ZOOM};
use crate::services::dashboard::PANEL_LOAD_DEADLINE;
use crate::services::location::resolve_location;
use crate::services::DashboardState;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /api/health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = if state.api_configured {
        "healthy"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: status.to_string(),
        api_configured: state.api_configured,
        default_location: state.location.current_location().await.ok(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// Traffic
// =============================================================================

/// GET /api/traffic/flow?lat=&lng=&zoom=
///
/// Flow report for a point. Missing coordinates fall back to the default location.
pub async fn get_flow(
    State(state): State<AppState>,
    query: Result<Query<FlowQuery>, QueryRejection>,
) -> HandlerResult<FlowReport> {
    let query = query_params(query)?;
    let location = resolve_location(query.lat, query.lng, state.location.as_ref()).await?;
    let zoom = query.zoom.unwrap_or(DEFAULT_FLOW_ZOOM);

    Ok(Json(state.provider.fetch_flow(location, zoom).await))
}

/// GET /api/traffic/incidents?bbox=&zoom=
///
/// Incidents inside a bounding box. `bbox` is required.
pub async fn get_incidents(
    State(state): State<AppState>,
    query: Result<Query<IncidentsQuery>, QueryRejection>,
) -> HandlerResult<IncidentsReport> {
    let query = query_params(query)?;
    let raw_bbox = query
        .bbox
        .filter(|b| !b.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("bbox required".to_string()))?;
    let bbox: BoundingBox = raw_bbox.parse()?;
    let zoom = query.zoom.unwrap_or(DEFAULT_INCIDENT_ZOOM);

    Ok(Json(state.provider.fetch_incidents(&bbox, zoom).await))
}

/// GET /api/traffic/summary?lat=&lng=
pub async fn get_summary(
    State(state): State<AppState>,
    query: Result<Query<LocationQuery>, QueryRejection>,
) -> HandlerResult<TrafficSummary> {
    let query = query_params(query)?;
    let location = resolve_location(query.lat, query.lng, state.location.as_ref()).await?;

    Ok(Json(state.aggregator.summarize(location).await))
}

/// GET /api/traffic/dashboard?lat=&lng=&refresh=&zoom=&sound_alerts=&auto_refresh=
///
/// Dashboard view-model (stats panel, incident list, markers) for a location.
/// Out-of-range settings are rejected with 400.
pub async fn get_dashboard(
    State(state): State<AppState>,
    query: Result<Query<DashboardQuery>, QueryRejection>,
) -> HandlerResult<DashboardResponse> {
    let query = query_params(query)?;
    let settings = query.settings()?;
    let location = resolve_location(query.lat, query.lng, state.location.as_ref()).await?;

    let mut dashboard = DashboardState::new(location, settings);
    let notices = dashboard
        .refresh(state.provider.as_ref(), PANEL_LOAD_DEADLINE, Utc::now())
        .await;

    Ok(Json(DashboardResponse {
        state: dashboard,
        notices: notices.into_iter().map(Into::into).collect(),
    }))
}

// =============================================================================
// Geocoding
// =============================================================================

/// GET /api/geocode?q=
pub async fn geocode(
    State(state): State<AppState>,
    query: Result<Query<GeocodeQuery>, QueryRejection>,
) -> HandlerResult<GeocodeResponse> {
    let query = query_params(query)?;
    let place = state
        .geocoder
        .search(query.q.as_deref().unwrap_or_default())
        .await?;

    Ok(Json(GeocodeResponse {
        success: true,
        location: place.location,
        display_name: place.display_name,
    }))
}

// =============================================================================
// Fallback
// =============================================================================

/// Unknown routes: JSON under `/api/`, a plain page elsewhere.
pub async fn not_found(uri: Uri) -> Response {
    if uri.path().starts_with("/api/") {
        (
            StatusCode::NOT_FOUND,
            Json(ApiError::new("NOT_FOUND", "Endpoint not found")),
        )
            .into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            Html("<h1>404 - Page Not Found</h1>"),
        )
            .into_response()
    }
}
