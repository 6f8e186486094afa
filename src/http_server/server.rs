//! HTTP server.
//!
//! Combines the health and incident routers, applies CORS from config,
//! and serves over a tokio TCP listener.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::observability::Logger;
use crate::service::IncidentService;
use crate::store::IncidentRepository;

use super::config::HttpConfig;
use super::incident_routes::incident_routes;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Health check route at root level
pub fn health_routes() -> Router {
    Router::new().route("/health", get(health_handler))
}

/// Health check handler
async fn health_handler() -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (StatusCode::OK, Json(response))
}

/// HTTP server for the incident API
pub struct HttpServer {
    config: HttpConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server over the given service
    pub fn new<R: IncidentRepository + 'static>(
        service: Arc<IncidentService<R>>,
        config: HttpConfig,
    ) -> Self {
        let router = Self::build_router(service, &config);
        Self { config, router }
    }

    /// Build the combined router
    fn build_router<R: IncidentRepository + 'static>(
        service: Arc<IncidentService<R>>,
        config: &HttpConfig,
    ) -> Router {
        let cors = if config.cors_origins.is_empty() {
            // No origins configured: permissive, for development
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .merge(health_routes())
            .merge(incident_routes(service))
            .layer(cors)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Start the HTTP server (async)
    pub async fn start(self) -> Result<(), io::Error> {
        let addr: SocketAddr = self
            .config
            .socket_addr()
            .parse()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, format!("bad bind address: {}", e)))?;

        let listener = TcpListener::bind(addr).await?;
        Logger::info(
            "HTTP_SERVER_STARTED",
            &[("addr", addr.to_string().as_str())],
        );

        axum::serve(listener, self.router).await?;

        Ok(())
    }
}
