//! Application state for the HTTP server.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::provider::{ProviderError, TrafficProvider, TrafficProviderClient};
use crate::services::geocoding::{GeocodeError, Geocoder, SEARCH_MIN_INTERVAL};
use crate::services::{DefaultLocation, LocationSource, TrafficSummaryAggregator};

/// Errors raised while assembling [`AppState`].
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Geocoder(#[from] GeocodeError),
}

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Upstream traffic provider
    pub provider: Arc<dyn TrafficProvider>,
    /// Flow + incidents aggregation over `provider`
    pub aggregator: TrafficSummaryAggregator,
    /// Fallback for requests without coordinates
    pub location: Arc<dyn LocationSource>,
    /// Place-name search
    pub geocoder: Arc<Geocoder>,
    /// Whether a provider credential is configured
    pub api_configured: bool,
}

impl AppState {
    /// Build state with the TomTom client described by `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self, StateError> {
        let client = TrafficProviderClient::new(config.provider_settings())?;
        let geocoder = Geocoder::new(config.geocoder_base_url.clone(), SEARCH_MIN_INTERVAL)?;

        Ok(Self::new(
            Arc::new(client),
            Arc::new(DefaultLocation(config.default_location)),
            Arc::new(geocoder),
            config.api_configured(),
        ))
    }

    /// Create a new application state from its parts.
    pub fn new(
        provider: Arc<dyn TrafficProvider>,
        location: Arc<dyn LocationSource>,
        geocoder: Arc<Geocoder>,
        api_configured: bool,
    ) -> Self {
        Self {
            aggregator: TrafficSummaryAggregator::new(provider.clone()),
            provider,
            location,
            geocoder,
            api_configured,
        }
    }
}
