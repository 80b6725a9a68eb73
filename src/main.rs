//! Mention Aggregation Service — Binary Entrypoint
//! Boots the Axum HTTP server, wiring routes, shared state, and middleware.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use mention_aggregator::aggregator::Aggregator;
use mention_aggregator::api::{self, AppState};
use mention_aggregator::config::Config;
use mention_aggregator::metrics::Metrics;
use mention_aggregator::rate_limit::MemoryCounterStore;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("mention_aggregator=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = Config::from_env();
    if config.youtube_api_key.is_none() {
        tracing::warn!("YOUTUBE_API_KEY not set; video searches will report misconfiguration");
    }
    if config.serpapi_key.is_none() {
        tracing::warn!("SERPAPI_KEY not set; web searches will report misconfiguration");
    }

    let metrics = Metrics::init();
    let store = Arc::new(MemoryCounterStore::new());
    let aggregator = Arc::new(Aggregator::new(&config, store));

    let app = api::router(AppState { aggregator }).merge(metrics.router());

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "mention aggregator listening");

    axum::serve(listener, app).await?;
    Ok(())
}
