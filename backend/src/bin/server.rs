//! Traffic Dashboard HTTP Server Binary
//!
//! This is the main entry point for the traffic REST API server.
//! It loads configuration, builds the provider client, sets up the HTTP
//! router, and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! TOMTOM_API_KEY=... cargo run --bin traffic-server
//! ```
//!
//! # Environment Variables
//!
//! - `TOMTOM_API_KEY`: provider credential (server runs degraded without it)
//! - `DEFAULT_LATITUDE` / `DEFAULT_LONGITUDE`: fallback location
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 3000)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;

use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use traffic_dashboard::config::AppConfig;
use traffic_dashboard::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting Traffic Dashboard server");

    let config = AppConfig::from_env()?;
    if config.api_configured() {
        info!("API key configured");
    } else {
        warn!("TOMTOM_API_KEY missing; provider calls will fail until it is set");
    }
    info!(
        "Default location: {}, {}",
        config.default_location.latitude, config.default_location.longitude
    );

    let state = AppState::from_config(&config)?;
    let app = create_router(state);

    let addr: SocketAddr = config.bind_address().parse()?;
    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/api/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
