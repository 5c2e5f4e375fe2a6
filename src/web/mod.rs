//! Web server module.

mod handlers;
mod render;

pub use handlers::*;

use crate::config::ServerConfig;
use crate::fetch::Fetcher;
use crate::refresh::Refresher;

use axum::{
    routing::{get, post},
    Router,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: ServerConfig,
    pub fetcher: Arc<Fetcher>,
    pub refresher: Arc<Refresher>,
    pub started: Instant,
}

/// Web server for the status page.
pub struct Server {
    state: AppState,
}

impl Server {
    /// Create a new server with the given dependencies.
    pub fn new(config: ServerConfig, fetcher: Arc<Fetcher>, refresher: Arc<Refresher>) -> Self {
        Self {
            state: AppState {
                config,
                fetcher,
                refresher,
                started: Instant::now(),
            },
        }
    }

    /// Build the router with all routes.
    fn routes(&self) -> Router {
        let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any);

        Router::new()
            // Page
            .route("/", get(handlers::handle_page))
            .route("/refresh", post(handlers::handle_refresh))
            // API endpoints
            .route("/api/status", get(handlers::handle_api_status))
            .route("/api/pages/{key}", get(handlers::handle_api_page))
            .route("/api/health", get(handlers::handle_health))
            // Static assets
            .route("/assets/{*path}", get(handlers::handle_asset))
            .route("/favicon.ico", get(handlers::handle_favicon))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Serve on the configured port until `shutdown` resolves.
    pub async fn start<F>(&self, shutdown: F) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.state.config.http_port));
        let router = self.routes();

        tracing::info!("Web server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }
}
