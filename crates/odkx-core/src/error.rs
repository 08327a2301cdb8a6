//! Error types and result aliases for odkx-tables.
//!
//! Errors raised by upstream clients flow through the reshaping layer
//! untouched; the HTTP layer maps each variant to a status code.

/// The result type used throughout odkx-core.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while fetching or reshaping upstream resources.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested resource was not found upstream.
    #[error("not found: {resource_type} {id}")]
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: &'static str,
        /// The identifier that was looked up.
        id: String,
    },

    /// A precondition for the operation was not met (e.g. a stale schema ETag).
    #[error("precondition failed: {message}")]
    PreconditionFailed {
        /// Description of the failed precondition.
        message: String,
    },

    /// The upstream service failed or returned an unusable response.
    #[error("upstream error: {message}")]
    Upstream {
        /// Description of the upstream failure.
        message: String,
        /// The underlying cause, if any.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A serialization or deserialization error occurred.
    #[error("serialization error: {message}")]
    Serialization {
        /// Description of the serialization failure.
        message: String,
    },

    /// Invalid input was provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An internal error occurred that should not happen in normal operation.
    #[error("internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl Error {
    /// Creates a new resource not found error.
    #[must_use]
    pub fn resource_not_found(resource_type: &'static str, id: impl std::fmt::Display) -> Self {
        Self::ResourceNotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Creates a new upstream error with the given message.
    #[must_use]
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new upstream error with a source cause.
    #[must_use]
    pub fn upstream_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Upstream {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Returns true if this error means the resource does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ResourceNotFound { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: err.to_string(),
        }
    }
}
