//! Logging initialization and span helpers.

use std::sync::Once;
use tracing::Span;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON structured logs (for production).
    Json,
    /// Pretty-printed logs (for development).
    #[default]
    Pretty,
}

/// Initializes the logging subsystem.
///
/// Safe to call multiple times; subsequent calls are no-ops.
///
/// `RUST_LOG` controls log levels (e.g. `info`, `odkx_core=debug`); the
/// default is `info`.
pub fn init_logging(format: LogFormat) {
    INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        match format {
            LogFormat::Json => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt::layer().json())
                    .init();
            }
            LogFormat::Pretty => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt::layer().pretty())
                    .init();
            }
        }
    });
}

/// Creates a span for a table-scoped operation.
///
/// ```rust
/// use odkx_core::observability::table_span;
///
/// let span = table_span("get_row", "census");
/// let _guard = span.enter();
/// ```
#[must_use]
pub fn table_span(operation: &str, table_id: &str) -> Span {
    tracing::info_span!("table", op = operation, table_id = table_id)
}

/// Creates a span for a row-scoped operation.
#[must_use]
pub fn row_span(operation: &str, table_id: &str, row_id: &str) -> Span {
    tracing::info_span!(
        "row",
        op = operation,
        table_id = table_id,
        row_id = row_id,
    )
}
