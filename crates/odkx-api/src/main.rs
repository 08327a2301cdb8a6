//! `odkx-api` binary entrypoint.
//!
//! Loads configuration from environment variables and starts the HTTP server
//! over an in-memory table data client seeded from `ODKX_SNAPSHOT_PATH`.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

use std::sync::Arc;

use anyhow::{Context, Result};

use odkx_api::config::Config;
use odkx_api::server::Server;
use odkx_core::MemoryTableClient;
use odkx_core::observability::{LogFormat, init_logging};

fn choose_log_format(config: &Config) -> LogFormat {
    if config.debug {
        LogFormat::Pretty
    } else {
        LogFormat::Json
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env().context("load configuration")?;
    init_logging(choose_log_format(&config));

    let client = if let Some(path) = config.snapshot_path.as_deref() {
        let client = MemoryTableClient::from_snapshot_file(path)
            .with_context(|| format!("load snapshot {}", path.display()))?;
        tracing::info!(
            snapshot = %path.display(),
            tables = client.table_count()?,
            "Loaded table snapshot"
        );
        client
    } else {
        tracing::warn!("ODKX_SNAPSHOT_PATH not set; serving an empty in-memory table client");
        MemoryTableClient::new()
    };

    let server = Server::new(config, Arc::new(client));
    server.serve().await?;
    Ok(())
}
