//! Handler for the `OpenAPI` specification.

use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};

use crate::error::{ApiError, ApiErrorResponse};
use crate::openapi::openapi_json;

/// Returns the `OpenAPI` spec as JSON.
#[utoipa::path(
    get,
    path = "/openapi.json",
    tag = "OpenAPI",
    responses(
        (
            status = 200,
            description = "OpenAPI specification for the table facade",
            body = String,
            content_type = "application/json"
        ),
        (
            status = 500,
            description = "Internal error",
            body = ApiErrorResponse
        ),
    )
)]
pub async fn get_openapi_json() -> Response {
    match openapi_json() {
        Ok(spec) => (StatusCode::OK, [(CONTENT_TYPE, "application/json")], spec).into_response(),
        Err(err) => ApiError::Internal {
            message: format!("failed to serialize OpenAPI spec: {err}"),
        }
        .into_response(),
    }
}
