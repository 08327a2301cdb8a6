//! HTTP server wiring.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use odkx_core::{Error, Result, TableDataClient};

use crate::config::Config;
use crate::router::tables_router;
use crate::state::TablesState;

/// The table facade HTTP server.
pub struct Server {
    config: Config,
    client: Arc<dyn TableDataClient>,
}

impl Server {
    /// Creates a server over the given upstream client.
    #[must_use]
    pub fn new(config: Config, client: Arc<dyn TableDataClient>) -> Self {
        Self { config, client }
    }

    /// Builds the router served by this server.
    #[must_use]
    pub fn router(&self) -> Router {
        tables_router(TablesState::with_config(
            Arc::clone(&self.client),
            self.config.tables_config(),
        ))
    }

    /// Binds the configured port and serves until shutdown.
    ///
    /// # Errors
    ///
    /// Returns an error if the port cannot be bound or the server fails.
    pub async fn serve(&self) -> Result<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let router = self.router();

        tracing::info!(
            http_port = self.config.http_port,
            strict_form_definitions = self.config.strict_form_definitions,
            "Starting table facade server"
        );

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Internal {
                message: format!("failed to bind to {addr}: {e}"),
            })?;

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| Error::Internal {
                message: format!("server error: {e}"),
            })?;

        tracing::info!("Table facade server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
