//! API Server
//!
//! Serves the REST API with graceful shutdown.

use crate::error::{Error, Result};
use crate::onboarding::OnboardingService;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::rest::RestRouter;

// =============================================================================
// Server Configuration
// =============================================================================

/// Configuration for the API server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiServerConfig {
    /// REST API bind address
    pub rest_addr: SocketAddr,
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
    /// Allow cross-origin requests from the admin console
    pub cors_enabled: bool,
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self {
            rest_addr: SocketAddr::from(([0, 0, 0, 0], 8090)),
            request_timeout_secs: 60,
            cors_enabled: false,
        }
    }
}

// =============================================================================
// API Server
// =============================================================================

/// REST API server for onboarding queries
pub struct ApiServer {
    config: ApiServerConfig,
    service: Arc<OnboardingService>,
    shutdown_tx: broadcast::Sender<()>,
}

impl ApiServer {
    /// Create a new API server
    pub fn new(config: ApiServerConfig, service: Arc<OnboardingService>) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            config,
            service,
            shutdown_tx,
        }
    }

    /// Bind the configured address and serve until shutdown
    pub async fn run(&self) -> Result<()> {
        let listener = TcpListener::bind(self.config.rest_addr)
            .await
            .map_err(|e| Error::Internal(format!("Failed to bind REST server: {}", e)))?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener until shutdown
    pub async fn serve(&self, listener: TcpListener) -> Result<()> {
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let app = self.app();

        info!("REST API listening on {}", listener.local_addr()?);

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
                info!("REST server shutting down");
            })
            .await
            .map_err(|e| Error::Internal(format!("REST server error: {}", e)))?;

        Ok(())
    }

    /// Trigger graceful shutdown
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }

    fn app(&self) -> axum::Router {
        let app = RestRouter::new(self.service.clone())
            .build()
            .layer(TimeoutLayer::new(Duration::from_secs(
                self.config.request_timeout_secs,
            )))
            .layer(TraceLayer::new_for_http());

        if self.config.cors_enabled {
            app.layer(CorsLayer::permissive())
        } else {
            app
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::{InventoryFactory, InventorySnapshot};
    use crate::settings::FileSettingsRegistry;

    #[test]
    fn test_default_config() {
        let config = ApiServerConfig::default();
        assert_eq!(config.rest_addr.port(), 8090);
        assert_eq!(config.request_timeout_secs, 60);
        assert!(!config.cors_enabled);
    }

    #[tokio::test]
    async fn test_serves_until_shutdown() {
        let (efs, fsx) = InventoryFactory::snapshot(InventorySnapshot::default());
        let registry = Arc::new(FileSettingsRegistry::new("unused.yaml"));
        let service = OnboardingService::new(registry, efs, fsx).unwrap();
        let server = Arc::new(ApiServer::new(ApiServerConfig::default(), service));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = {
            let server = server.clone();
            tokio::spawn(async move { server.serve(listener).await })
        };

        let body = reqwest::get(format!("http://{}/health", addr))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(body, "ok");

        server.shutdown();
        handle.await.unwrap().unwrap();
    }
}
