//! Resolving "where is the user" into a coordinate.
//!
//! A location lookup is a single suspend-and-resolve call returning either a
//! [`Coordinate`] or a typed [`GeolocationError`].

use std::time::Duration;

use async_trait::async_trait;

use crate::models::Coordinate;

pub const DEFAULT_LATITUDE: f64 = 28.6139;
pub const DEFAULT_LONGITUDE: f64 = 77.2090;
pub const LOCATE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GeolocationError {
    #[error("Location access denied")]
    PermissionDenied,
    #[error("Location unavailable")]
    PositionUnavailable,
    #[error("Location request timed out")]
    Timeout,
    #[error("Geolocation not supported")]
    Unsupported,
}

#[async_trait]
pub trait LocationSource: Send + Sync {
    async fn current_location(&self) -> Result<Coordinate, GeolocationError>;
}

/// Fixed, configured fallback location.
#[derive(Debug, Clone, Copy)]
pub struct DefaultLocation(pub Coordinate);

impl Default for DefaultLocation {
    fn default() -> Self {
        DefaultLocation(Coordinate::new(DEFAULT_LATITUDE, DEFAULT_LONGITUDE))
    }
}

#[async_trait]
impl LocationSource for DefaultLocation {
    async fn current_location(&self) -> Result<Coordinate, GeolocationError> {
        Ok(self.0)
    }
}

/// Ask `source` for a location, giving up after `timeout`.
pub async fn locate_within(
    source: &dyn LocationSource,
    timeout: Duration,
) -> Result<Coordinate, GeolocationError> {
    tokio::time::timeout(timeout, source.current_location())
        .await
        .map_err(|_| GeolocationError::Timeout)?
}

/// Fill whichever of `latitude`/`longitude` the caller omitted from `fallback`.
///
/// The fallback is only consulted when at least one component is missing, and
/// is given [`LOCATE_TIMEOUT`] to answer.
pub async fn resolve_location(
    latitude: Option<f64>,
    longitude: Option<f64>,
    fallback: &dyn LocationSource,
) -> Result<Coordinate, GeolocationError> {
    resolve_location_within(latitude, longitude, fallback, LOCATE_TIMEOUT).await
}

pub async fn resolve_location_within(
    latitude: Option<f64>,
    longitude: Option<f64>,
    fallback: &dyn LocationSource,
    timeout: Duration,
) -> Result<Coordinate, GeolocationError> {
    if let (Some(lat), Some(lng)) = (latitude, longitude) {
        return Ok(Coordinate::new(lat, lng));
    }

    let base = locate_within(fallback, timeout).await?;
    Ok(Coordinate::new(
        latitude.unwrap_or(base.latitude),
        longitude.unwrap_or(base.longitude),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Denied;

    #[async_trait]
    impl LocationSource for Denied {
        async fn current_location(&self) -> Result<Coordinate, GeolocationError> {
            Err(GeolocationError::PermissionDenied)
        }
    }

    struct Slow;

    #[async_trait]
    impl LocationSource for Slow {
        async fn current_location(&self) -> Result<Coordinate, GeolocationError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(Coordinate::new(0.0, 0.0))
        }
    }

    #[tokio::test]
    async fn test_resolve_uses_explicit_values() {
        let c = resolve_location(Some(1.0), Some(2.0), &Denied).await.unwrap();
        assert_eq!(c, Coordinate::new(1.0, 2.0));
    }

    #[tokio::test]
    async fn test_resolve_fills_missing_component() {
        let c = resolve_location(Some(1.0), None, &DefaultLocation::default())
            .await
            .unwrap();
        assert_eq!(c, Coordinate::new(1.0, DEFAULT_LONGITUDE));

        let c = resolve_location(None, None, &DefaultLocation::default())
            .await
            .unwrap();
        assert_eq!(c, Coordinate::new(DEFAULT_LATITUDE, DEFAULT_LONGITUDE));
    }

    #[tokio::test]
    async fn test_resolve_propagates_source_error() {
        let err = resolve_location(None, Some(2.0), &Denied).await.unwrap_err();
        assert_eq!(err, GeolocationError::PermissionDenied);
        assert_eq!(err.to_string(), "Location access denied");
    }

    #[tokio::test]
    async fn test_locate_within_times_out() {
        let err = locate_within(&Slow, Duration::from_millis(20)).await.unwrap_err();
        assert_eq!(err, GeolocationError::Timeout);
    }

    #[tokio::test]
    async fn test_slow_fallback_times_out_only_when_consulted() {
        let err = resolve_location_within(Some(1.0), None, &Slow, Duration::from_millis(20))
            .await
            .unwrap_err();
        assert_eq!(err, GeolocationError::Timeout);

        let c = resolve_location_within(Some(1.0), Some(2.0), &Slow, Duration::from_millis(20))
            .await
            .unwrap();
        assert_eq!(c, Coordinate::new(1.0, 2.0));
    }
}
