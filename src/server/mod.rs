//! HTTP API Server
//!
//! Axum-based HTTP server exposing the ingest API.

mod handlers;
mod routes;

pub mod types;

#[cfg(test)]
mod tests;

pub use handlers::AppState;
pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::Method;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::tools::fetch::{HttpRenderClient, RenderCache};

/// HTTP API server
pub struct HttpServer {
    config: Arc<Config>,
}

impl HttpServer {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Run the server until the shutdown channel fires.
    pub async fn run(&self, mut shutdown: broadcast::Receiver<()>) -> Result<()> {
        let addr: SocketAddr = self
            .config
            .listen_addr
            .parse()
            .context("Invalid HTTP listen address")?;

        let backend =
            HttpRenderClient::new(&self.config).context("Failed to build render client")?;
        let state = AppState {
            config: self.config.clone(),
            cache: Arc::new(RenderCache::new(
                self.config.cache_ttl_ms,
                self.config.cache_max_items,
            )),
            backend: Arc::new(backend),
        };

        let mut app = create_router(state);

        if self.config.cors_enabled {
            let cors = CorsLayer::new()
                .allow_methods([Method::GET, Method::OPTIONS])
                .allow_headers(Any)
                .allow_origin(Any);
            app = app.layer(cors);
        }
        app = app.layer(TraceLayer::new_for_http());

        let listener = TcpListener::bind(&addr)
            .await
            .context("Failed to bind HTTP server")?;

        info!("ingest API listening on http://{}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                info!("HTTP server shutting down");
            })
            .await
            .context("HTTP server error")?;

        Ok(())
    }
}
