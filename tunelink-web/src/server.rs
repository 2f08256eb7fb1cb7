//! JSON API server for Tunelink
//!
//! Wires the lookup service into an axum router with CORS for the front end.

use std::net::SocketAddr;
use std::time::Instant;

use axum::Router;
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tunelink_search::SongSearchService;

use crate::handlers::{api_health, api_search};

/// Errors raised while configuring or running the server.
#[derive(Debug, Error)]
pub enum WebError {
    /// Server configuration could not be applied.
    #[error("Invalid server configuration: {reason}")]
    InvalidConfiguration {
        /// Why the configuration was rejected
        reason: String,
    },

    /// Binding or serving failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Listener and CORS settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
    /// Origin allowed by CORS, or `*` for any
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            cors_origin: "http://localhost:5173".to_string(),
        }
    }
}

impl ServerConfig {
    /// Creates configuration with environment variable overrides.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(host) = std::env::var("TUNELINK_HOST") {
            config.host = host;
        }

        if let Ok(port) = std::env::var("TUNELINK_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                config.port = port;
            }
        }

        if let Ok(origin) = std::env::var("TUNELINK_CORS_ORIGIN") {
            config.cors_origin = origin;
        }

        config
    }

    /// Socket address to bind.
    ///
    /// # Errors
    /// - `WebError::InvalidConfiguration` - Host and port do not form an address
    pub fn bind_address(&self) -> Result<SocketAddr, WebError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| WebError::InvalidConfiguration {
                reason: format!("bad bind address {}:{}: {e}", self.host, self.port),
            })
    }

    fn cors_layer(&self) -> Result<CorsLayer, WebError> {
        let layer = CorsLayer::new().allow_methods([Method::GET]);

        if self.cors_origin.trim() == "*" {
            return Ok(layer.allow_origin(Any));
        }

        let origin = self.cors_origin.parse::<HeaderValue>().map_err(|e| {
            WebError::InvalidConfiguration {
                reason: format!("bad CORS origin {}: {e}", self.cors_origin),
            }
        })?;
        Ok(layer.allow_origin(origin))
    }
}

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Lookup pipeline
    pub search_service: SongSearchService,
    /// When the server was started
    pub server_started_at: Instant,
}

impl AppState {
    /// Creates state around `search_service`.
    pub fn new(search_service: SongSearchService) -> Self {
        Self {
            search_service,
            server_started_at: Instant::now(),
        }
    }
}

/// Builds the API router.
///
/// # Errors
/// - `WebError::InvalidConfiguration` - CORS origin is not a valid header value
pub fn build_router(state: AppState, config: &ServerConfig) -> Result<Router, WebError> {
    let router = Router::new()
        .route("/search", get(api_search))
        .route("/health", get(api_health))
        .layer(config.cors_layer()?)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(router)
}

/// Serves the API until Ctrl-C.
///
/// # Errors
/// - `WebError::InvalidConfiguration` - Bad bind address or CORS origin
/// - `WebError::Io` - Socket could not be bound or serving failed
pub async fn run_server(
    config: ServerConfig,
    search_service: SongSearchService,
) -> Result<(), WebError> {
    let address = config.bind_address()?;
    let providers = search_service.provider_names();
    let app = build_router(AppState::new(search_service), &config)?;

    let listener = tokio::net::TcpListener::bind(address).await?;
    info!(
        address = %address,
        cors_origin = %config.cors_origin,
        providers = ?providers,
        "Tunelink API running at http://{address}/search"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Could not listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = ServerConfig::default();

        assert_eq!(config.port, 3000);
        assert_eq!(config.cors_origin, "http://localhost:5173");
        assert_eq!(
            config.bind_address().unwrap(),
            "0.0.0.0:3000".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn test_bad_bind_address() {
        let config = ServerConfig {
            host: "not a host".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.bind_address(),
            Err(WebError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_bad_cors_origin() {
        let config = ServerConfig {
            cors_origin: "http://bad\norigin".to_string(),
            ..Default::default()
        };
        assert!(config.cors_layer().is_err());

        let wildcard = ServerConfig {
            cors_origin: "*".to_string(),
            ..Default::default()
        };
        assert!(wildcard.cors_layer().is_ok());
    }

    #[test]
    fn test_env_override() {
        unsafe {
            std::env::set_var("TUNELINK_PORT", "8080");
            std::env::set_var("TUNELINK_CORS_ORIGIN", "https://tunelink.example");
        }

        let config = ServerConfig::from_env();

        assert_eq!(config.port, 8080);
        assert_eq!(config.cors_origin, "https://tunelink.example");

        // Cleanup
        unsafe {
            std::env::remove_var("TUNELINK_PORT");
            std::env::remove_var("TUNELINK_CORS_ORIGIN");
        }
    }
}
