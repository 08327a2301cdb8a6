//! Shared state and configuration for table handlers.

use std::sync::Arc;
use std::time::Duration;

use odkx_core::TableDataClient;

/// Server-side configuration for the table routes.
#[derive(Debug, Clone, Default)]
pub struct TablesConfig {
    /// Optional request timeout for handlers.
    pub request_timeout: Option<Duration>,
    /// Optional concurrency limit for handlers.
    pub concurrency_limit: Option<usize>,
    /// Fail `/questions` with `502` on unreadable form definitions instead of
    /// answering with an empty map.
    pub strict_form_definitions: bool,
}

/// Shared state for table handlers.
#[derive(Clone)]
pub struct TablesState {
    /// Client for the upstream table data service.
    pub client: Arc<dyn TableDataClient>,
    /// Server-side configuration.
    pub config: TablesConfig,
}

impl TablesState {
    /// Creates state with the given client and default configuration.
    #[must_use]
    pub fn new(client: Arc<dyn TableDataClient>) -> Self {
        Self {
            client,
            config: TablesConfig::default(),
        }
    }

    /// Creates state with explicit configuration.
    #[must_use]
    pub fn with_config(client: Arc<dyn TableDataClient>, config: TablesConfig) -> Self {
        Self { client, config }
    }
}

impl std::fmt::Debug for TablesState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TablesState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
