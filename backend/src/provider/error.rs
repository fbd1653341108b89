//! Faults on the provider call path.
//!
//! These never escape the client: [`ProviderError::into_envelope`] folds each
//! one into a failure envelope carrying its display text.

use std::time::Duration;

use crate::models::{Envelope, FailureKind};

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The call did not complete within the client timeout.
    #[error("timeout of {}ms exceeded", .0.as_millis())]
    Timeout(Duration),

    /// The provider answered with a non-success status.
    #[error("Request failed with status code {0}")]
    Status(u16),

    /// The body was not the JSON shape we expected.
    #[error("Malformed provider response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Connection, TLS, or other network failure.
    #[error("{0}")]
    Transport(String),

    /// The HTTP client itself could not be built.
    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

impl ProviderError {
    /// Classify a `reqwest` error against the configured timeout.
    pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout(timeout)
        } else if let Some(status) = err.status() {
            ProviderError::Status(status.as_u16())
        } else {
            ProviderError::Transport(err.to_string())
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            ProviderError::Timeout(_) => FailureKind::Timeout,
            _ => FailureKind::Transport,
        }
    }

    pub fn into_envelope<T>(self) -> Envelope<T> {
        Envelope::failure(self.kind(), self.to_string())
    }
}
