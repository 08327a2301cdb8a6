//! API error types and error response payloads.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error detail carried by every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorDetail {
    /// Stable error code identifier.
    pub error_code: String,
    /// Human readable message.
    pub message: String,
}

/// Error response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// Error detail.
    pub error: ApiErrorDetail,
}

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request was invalid.
    #[error("{message}")]
    BadRequest {
        /// Human readable message.
        message: String,
    },
    /// Resource not found.
    #[error("{message}")]
    NotFound {
        /// Human readable message.
        message: String,
    },
    /// Method not supported on an existing path.
    #[error("{message}")]
    MethodNotAllowed {
        /// Human readable message.
        message: String,
    },
    /// Request conflicts with the current upstream state.
    #[error("{message}")]
    Conflict {
        /// Human readable message.
        message: String,
    },
    /// The upstream service failed or sent an unusable document.
    #[error("{message}")]
    BadGateway {
        /// Human readable message.
        message: String,
    },
    /// Service unavailable (retryable).
    #[error("{message}")]
    ServiceUnavailable {
        /// Human readable message.
        message: String,
    },
    /// Internal error.
    #[error("{message}")]
    Internal {
        /// Human readable message.
        message: String,
    },
}

impl ApiError {
    /// Returns the HTTP status and stable error code for this error.
    #[must_use]
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::BadRequest { .. } => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::MethodNotAllowed { .. } => {
                (StatusCode::METHOD_NOT_ALLOWED, "METHOD_NOT_ALLOWED")
            }
            Self::Conflict { .. } => (StatusCode::CONFLICT, "CONFLICT"),
            Self::BadGateway { .. } => (StatusCode::BAD_GATEWAY, "BAD_GATEWAY"),
            Self::ServiceUnavailable { .. } => {
                (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE")
            }
            Self::Internal { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL"),
        }
    }

    fn to_status_and_payload(&self) -> (StatusCode, ApiErrorResponse) {
        let (status, error_code) = self.status_and_code();
        (
            status,
            ApiErrorResponse {
                error: ApiErrorDetail {
                    error_code: error_code.to_string(),
                    message: self.to_string(),
                },
            },
        )
    }
}

impl From<odkx_core::Error> for ApiError {
    fn from(err: odkx_core::Error) -> Self {
        use odkx_core::Error;

        let message = err.to_string();
        match err {
            Error::ResourceNotFound { .. } => Self::NotFound { message },
            Error::PreconditionFailed { .. } => Self::Conflict { message },
            Error::InvalidInput(_) => Self::BadRequest { message },
            Error::Upstream { .. } | Error::Serialization { .. } => {
                tracing::warn!(error = %message, "upstream request failed");
                Self::BadGateway { message }
            }
            Error::Internal { .. } => {
                tracing::error!(error = %message, "internal error");
                Self::Internal { message }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, payload) = self.to_status_and_payload();
        (status, axum::Json(payload)).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;
