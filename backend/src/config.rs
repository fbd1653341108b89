//! Application configuration and environment variable handling.

use std::env;
use std::time::Duration;

use crate::models::Coordinate;
use crate::provider::client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use crate::provider::ProviderSettings;
use crate::services::geocoding::DEFAULT_GEOCODER_URL;
use crate::services::location::{DEFAULT_LATITUDE, DEFAULT_LONGITUDE};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a number, got '{value}'")]
    InvalidNumber { name: &'static str, value: String },
    #[error("PORT must be a valid port number, got '{0}'")]
    InvalidPort(String),
}

/// Configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Provider credential; `None` runs the server in degraded mode.
    pub api_key: Option<String>,
    /// Location used when a request omits coordinates.
    pub default_location: Coordinate,
    pub host: String,
    pub port: u16,
    pub provider_base_url: String,
    pub provider_timeout: Duration,
    pub geocoder_base_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_location: Coordinate::new(DEFAULT_LATITUDE, DEFAULT_LONGITUDE),
            host: "0.0.0.0".to_string(),
            port: 3000,
            provider_base_url: DEFAULT_BASE_URL.to_string(),
            provider_timeout: DEFAULT_TIMEOUT,
            geocoder_base_url: DEFAULT_GEOCODER_URL.to_string(),
        }
    }
}

impl AppConfig {
    /// Create a new configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `TOMTOM_API_KEY` (optional): provider credential; empty counts as unset
    /// - `DEFAULT_LATITUDE` / `DEFAULT_LONGITUDE` (optional, default: 28.6139 / 77.2090)
    /// - `HOST` (optional, default: 0.0.0.0)
    /// - `PORT` (optional, default: 3000)
    /// - `TRAFFIC_API_BASE_URL` (optional): provider base URL
    /// - `TRAFFIC_TIMEOUT_MS` (optional, default: 10000): per-call timeout
    /// - `GEOCODER_BASE_URL` (optional): Nominatim-compatible search service
    ///
    /// # Errors
    /// Returns an error if a numeric variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let api_key = env::var("TOMTOM_API_KEY")
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        let latitude = parse_f64_var("DEFAULT_LATITUDE")?.unwrap_or(DEFAULT_LATITUDE);
        let longitude = parse_f64_var("DEFAULT_LONGITUDE")?.unwrap_or(DEFAULT_LONGITUDE);

        let host = env::var("HOST").unwrap_or(defaults.host);
        let port = match env::var("PORT") {
            Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            Err(_) => defaults.port,
        };

        let provider_timeout = match env::var("TRAFFIC_TIMEOUT_MS") {
            Ok(raw) => Duration::from_millis(raw.trim().parse().map_err(|_| {
                ConfigError::InvalidNumber {
                    name: "TRAFFIC_TIMEOUT_MS",
                    value: raw.clone(),
                }
            })?),
            Err(_) => defaults.provider_timeout,
        };

        Ok(Self {
            api_key,
            default_location: Coordinate::new(latitude, longitude),
            host,
            port,
            provider_base_url: env::var("TRAFFIC_API_BASE_URL")
                .unwrap_or(defaults.provider_base_url),
            provider_timeout,
            geocoder_base_url: env::var("GEOCODER_BASE_URL").unwrap_or(defaults.geocoder_base_url),
        })
    }

    pub fn api_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn provider_settings(&self) -> ProviderSettings {
        ProviderSettings::new(self.api_key.clone().unwrap_or_default())
            .with_base_url(self.provider_base_url.clone())
            .with_timeout(self.provider_timeout)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_f64_var(name: &'static str) -> Result<Option<f64>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { name, value: raw }),
        Err(_) => Ok(None),
    }
}
