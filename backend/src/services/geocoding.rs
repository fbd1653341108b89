//! Place-name search against a Nominatim-compatible geocoder.
//!
//! Searches are spaced by a [`SearchThrottle`]; calls arriving too soon after
//! the previous accepted one are rejected without touching the network.

use std::time::{Duration, Instant};

use log::{debug, warn};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::models::Coordinate;

pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";
pub const GEOCODER_USER_AGENT: &str = "TrafficDashboard/1.0";
pub const SEARCH_MIN_INTERVAL: Duration = Duration::from_millis(1000);
pub const GEOCODER_TIMEOUT: Duration = Duration::from_millis(10_000);

#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("Please enter a location")]
    EmptyQuery,
    #[error("Please wait before searching again")]
    RateLimited,
    #[error("Location not found")]
    NotFound,
    #[error("Search timed out")]
    Timeout,
    #[error("Search failed: {0}")]
    Transport(String),
    #[error("Search failed: malformed geocoder response ({0})")]
    Decode(String),
}

/// Last-call-timestamp guard.
#[derive(Debug)]
pub struct SearchThrottle {
    min_interval: Duration,
    last_accepted: Mutex<Option<Instant>>,
}

impl SearchThrottle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_accepted: Mutex::new(None),
        }
    }

    /// Accept the call at `now` if enough time passed since the last accepted one.
    pub fn try_acquire(&self, now: Instant) -> bool {
        let mut last = self.last_accepted.lock();
        match *last {
            Some(prev) if now.saturating_duration_since(prev) < self.min_interval => false,
            _ => {
                *last = Some(now);
                true
            }
        }
    }
}

/// A resolved place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeocodedPlace {
    pub location: Coordinate,
    pub display_name: String,
}

#[derive(Debug, Deserialize)]
struct RawPlace {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

pub struct Geocoder {
    http: reqwest::Client,
    base_url: String,
    throttle: SearchThrottle,
}

impl Geocoder {
    pub fn new(base_url: impl Into<String>, min_interval: Duration) -> Result<Self, GeocodeError> {
        let http = reqwest::Client::builder()
            .timeout(GEOCODER_TIMEOUT)
            .user_agent(GEOCODER_USER_AGENT)
            .build()
            .map_err(|e| GeocodeError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            throttle: SearchThrottle::new(min_interval),
        })
    }

    /// Resolve `query` to the provider's best match.
    pub async fn search(&self, query: &str) -> Result<GeocodedPlace, GeocodeError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(GeocodeError::EmptyQuery);
        }
        if !self.throttle.try_acquire(Instant::now()) {
            return Err(GeocodeError::RateLimited);
        }

        debug!("Geocoding '{}'", query);

        let response = self
            .http
            .get(format!("{}/search", self.base_url))
            .query(&[("format", "json"), ("q", query)])
            .send()
            .await
            .map_err(map_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            warn!("Geocoder returned status {}", status);
            return Err(GeocodeError::Transport(format!(
                "Request failed with status code {}",
                status.as_u16()
            )));
        }

        let body = response.bytes().await.map_err(map_reqwest)?;
        let places: Vec<RawPlace> =
            serde_json::from_slice(&body).map_err(|e| GeocodeError::Decode(e.to_string()))?;

        let best = places.into_iter().next().ok_or(GeocodeError::NotFound)?;
        let latitude = best
            .lat
            .parse()
            .map_err(|_| GeocodeError::Decode(format!("bad latitude '{}'", best.lat)))?;
        let longitude = best
            .lon
            .parse()
            .map_err(|_| GeocodeError::Decode(format!("bad longitude '{}'", best.lon)))?;

        Ok(GeocodedPlace {
            location: Coordinate::new(latitude, longitude),
            display_name: best.display_name.unwrap_or_else(|| query.to_string()),
        })
    }
}

fn map_reqwest(err: reqwest::Error) -> GeocodeError {
    if err.is_timeout() {
        GeocodeError::Timeout
    } else {
        GeocodeError::Transport(err.to_string())
    }
}
