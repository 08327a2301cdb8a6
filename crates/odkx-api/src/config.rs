//! Server configuration.

use std::path::PathBuf;
use std::time::Duration;

use odkx_core::{Error, Result};

use crate::state::TablesConfig;

/// Default HTTP port.
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Configuration for the table facade server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// HTTP server port.
    pub http_port: u16,

    /// Enable debug mode (pretty logs instead of JSON).
    pub debug: bool,

    /// Optional per-request timeout.
    pub request_timeout: Option<Duration>,

    /// Optional cap on in-flight requests.
    pub concurrency_limit: Option<usize>,

    /// Fail `/questions` on unreadable form definitions.
    pub strict_form_definitions: bool,

    /// Snapshot used to seed the in-memory table data client.
    pub snapshot_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_port: DEFAULT_HTTP_PORT,
            debug: false,
            request_timeout: None,
            concurrency_limit: None,
            strict_form_definitions: false,
            snapshot_path: None,
        }
    }
}

impl Config {
    /// Loads configuration from `ODKX_*` environment variables.
    ///
    /// Empty or whitespace-only values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable holds an invalid value.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable holds an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let vars = Vars { lookup };
        let mut config = Self::default();

        if let Some(port) = vars.u16("ODKX_HTTP_PORT")? {
            config.http_port = port;
        }
        if let Some(debug) = vars.bool("ODKX_DEBUG")? {
            config.debug = debug;
        }
        if let Some(secs) = vars.u64("ODKX_REQUEST_TIMEOUT_SECS")? {
            if secs == 0 {
                return Err(Error::InvalidInput(
                    "ODKX_REQUEST_TIMEOUT_SECS must be greater than 0".to_string(),
                ));
            }
            config.request_timeout = Some(Duration::from_secs(secs));
        }
        if let Some(limit) = vars.usize("ODKX_CONCURRENCY_LIMIT")? {
            if limit == 0 {
                return Err(Error::InvalidInput(
                    "ODKX_CONCURRENCY_LIMIT must be greater than 0".to_string(),
                ));
            }
            config.concurrency_limit = Some(limit);
        }
        if let Some(strict) = vars.bool("ODKX_STRICT_FORM_DEFINITIONS")? {
            config.strict_form_definitions = strict;
        }
        config.snapshot_path = vars.string("ODKX_SNAPSHOT_PATH").map(PathBuf::from);

        Ok(config)
    }

    /// Returns the route-level configuration.
    #[must_use]
    pub fn tables_config(&self) -> TablesConfig {
        TablesConfig {
            request_timeout: self.request_timeout,
            concurrency_limit: self.concurrency_limit,
            strict_form_definitions: self.strict_form_definitions,
        }
    }
}

struct Vars<F> {
    lookup: F,
}

impl<F: Fn(&str) -> Option<String>> Vars<F> {
    fn string(&self, name: &str) -> Option<String> {
        (self.lookup)(name).and_then(|v| {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }

    fn u16(&self, name: &str) -> Result<Option<u16>> {
        let Some(v) = self.string(name) else {
            return Ok(None);
        };
        v.parse::<u16>()
            .map(Some)
            .map_err(|e| Error::InvalidInput(format!("{name} must be a u16: {e}")))
    }

    fn u64(&self, name: &str) -> Result<Option<u64>> {
        let Some(v) = self.string(name) else {
            return Ok(None);
        };
        v.parse::<u64>()
            .map(Some)
            .map_err(|e| Error::InvalidInput(format!("{name} must be a u64: {e}")))
    }

    fn usize(&self, name: &str) -> Result<Option<usize>> {
        let Some(v) = self.string(name) else {
            return Ok(None);
        };
        v.parse::<usize>()
            .map(Some)
            .map_err(|e| Error::InvalidInput(format!("{name} must be a usize: {e}")))
    }

    fn bool(&self, name: &str) -> Result<Option<bool>> {
        self.string(name).map(|v| parse_bool(name, &v)).transpose()
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    let value = value.trim().to_ascii_lowercase();
    match value.as_str() {
        "true" | "1" | "yes" | "y" => Ok(true),
        "false" | "0" | "no" | "n" => Ok(false),
        _ => Err(Error::InvalidInput(format!(
            "{name} must be a boolean (true/false/1/0)"
        ))),
    }
}
