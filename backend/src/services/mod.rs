//! Service layer: orchestration on top of the provider client.
//!
//! - `summary`: combined flow + incidents report for one location
//! - `dashboard`: caller-owned presentation state fed by reports
//! - `refresh`: polling loop producing summaries on a cadence
//! - `location`: resolving the caller's location with fallbacks
//! - `geocoding`: throttled place-name search

pub mod dashboard;
pub mod geocoding;
pub mod location;
pub mod refresh;
pub mod summary;

pub use dashboard::{DashboardSettings, DashboardState, FailureNotice};
pub use geocoding::{GeocodeError, GeocodedPlace, Geocoder};
pub use location::{DefaultLocation, GeolocationError, LocationSource};
pub use refresh::AutoRefresh;
pub use summary::TrafficSummaryAggregator;
