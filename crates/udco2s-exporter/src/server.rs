//! Server setup and lifecycle management

use crate::api::{create_router, AppState};
use crate::config::ExporterConfig;
use crate::error::{ExporterError, ExporterResult};
use crate::metrics::MetricsRegistry;
use crate::poller::Poller;
use crate::sample::SampleStore;
use crate::serial::{Connector, SerialConnector};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Exporter server: sensor poller plus the HTTP scrape endpoint
pub struct Server {
    config: ExporterConfig,
    store: Arc<SampleStore>,
}

impl Server {
    /// Create a new server with the given configuration
    pub fn new(config: ExporterConfig) -> Self {
        Self {
            config,
            store: Arc::new(SampleStore::new()),
        }
    }

    pub fn store(&self) -> &Arc<SampleStore> {
        &self.store
    }

    /// Router serving `/metrics` and `/health` over this server's store
    pub fn router(&self) -> ExporterResult<Router> {
        let metrics = Arc::new(MetricsRegistry::new(Arc::clone(&self.store))?);
        Ok(create_router(AppState::new(metrics, Arc::clone(&self.store))))
    }

    /// Run against the configured serial device
    pub async fn run(self) -> ExporterResult<()> {
        let connector = SerialConnector::new(self.config.serial.clone());
        self.run_with(connector).await
    }

    /// Start polling through `connector`, then serve HTTP until shutdown.
    /// Sensor startup failures are returned before anything is bound.
    pub async fn run_with<C>(self, connector: C) -> ExporterResult<()>
    where
        C: Connector + 'static,
        C::Source: 'static,
    {
        let poller = Poller::start(connector, Arc::clone(&self.store), &self.config.poller)?;
        poller.spawn()?;

        let app = self.router()?;
        let addr = self.config.server.listen_addr;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("udco2s exporter listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ExporterError::Server(e.to_string()))?;

        tracing::info!("udco2s exporter shutting down");

        Ok(())
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}
