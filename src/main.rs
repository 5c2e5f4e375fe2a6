//! status-pages - public status page viewer
//!
//! Fetches a status page from the status API, aggregates monitor history
//! into uptime and response time statistics, and serves it as an
//! auto-refreshing page.

mod config;
mod fetch;
mod page;
mod refresh;
mod web;

#[cfg(test)]
mod test_support;

use config::ServerConfig;
use fetch::Fetcher;
use refresh::Refresher;
use web::Server;

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("status_pages=info".parse()?))
        .init();

    // Load configuration
    let cfg = ServerConfig::load();
    tracing::info!("Starting status-pages on port {}...", cfg.http_port);
    tracing::info!("Using status API at {}", cfg.api_url);

    let fetcher = Arc::new(Fetcher::new(&cfg.api_url, cfg.request_timeout)?);

    // Start refreshing the configured page
    let refresher = Arc::new(Refresher::new(fetcher.clone(), &cfg.page_key, cfg.refresh_interval));
    refresher.start().await;

    // Start web server
    let server = Server::new(cfg, fetcher, refresher.clone());
    server.start(shutdown_signal()).await?;

    refresher.stop().await;
    tracing::info!("Shut down cleanly");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
