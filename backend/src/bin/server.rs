//! Maritime Map HTTP Server Binary
//!
//! This is the main entry point for the maritime map REST API server.
//! It loads configuration, builds the wave overview once, sets up the HTTP
//! router, and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin maritime-server
//!
//! # Abort startup when the overview feed is unreachable
//! OVERVIEW_FALLBACK=fail cargo run --bin maritime-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `GEOJSON_PATH`: Static area file (default: data/wilayah_perairan.json)
//! - `OVERVIEW_URL`: Wave-overview feed URL
//! - `OVERVIEW_TIMEOUT_SECS`: Feed timeout (default: 10)
//! - `OVERVIEW_FALLBACK`: `empty` or `fail` (default: empty)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use maritime_map::config::AppConfig;
use maritime_map::http::{create_router, AppState};
use maritime_map::page::PageShell;
use maritime_map::services::{AreaService, HttpOverviewFetcher};

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

    info!("Starting Maritime Map HTTP Server");

    let config = AppConfig::load()?;
    let fallback = config.overview_fallback()?;

    // The overview is fetched exactly once, before serving.
    let fetcher = HttpOverviewFetcher::new(config.overview.url.clone(), config.overview_timeout())?;
    let page = PageShell::build(&fetcher, fallback, config.map_props()).await?;

    let areas = AreaService::new(config.areas.geojson_path.clone());
    info!("Serving areas from {}", areas.path().display());

    // Create application state
    let state = AppState::new(areas, page);

    // Create router with all endpoints
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    // Start the server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
