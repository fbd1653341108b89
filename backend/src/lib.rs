//! # Traffic Dashboard Backend
//!
//! Live road-traffic telemetry for a point on the map.
//!
//! This crate fetches flow speed, travel time, and incident data from the
//! TomTom Traffic API, normalizes it into stable report shapes, classifies
//! congestion, and serves the result as a JSON API for the dashboard front
//! end.
//!
//! ## Architecture
//!
//! - [`models`]: coordinates, bounding boxes, congestion levels, and the
//!   success/failure envelopes every report travels in
//! - [`provider`]: the upstream client; the only module that knows the
//!   provider's wire format
//! - [`services`]: summary aggregation, dashboard view-model, polling,
//!   location fallback, and geocoding
//! - [`config`]: environment-driven configuration
//! - [`http`]: Axum-based HTTP server and request handlers
//!
//! ## Failure model
//!
//! Upstream calls never return `Err`. Transport faults, timeouts, and missing
//! payloads are reported inside the envelope (`{"success": false, "error": ..}`)
//! so callers only ever branch on the success flag. Only caller-input faults,
//! such as a missing `bbox`, are rejected outright.

pub mod api;
pub mod config;
pub mod models;
pub mod provider;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
