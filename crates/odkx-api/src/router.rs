//! Table facade router setup.

use axum::Router;
use axum::error_handling::HandleErrorLayer;
use axum::extract::OriginalUri;
use axum::http::{Method, StatusCode};
use axum::middleware;
use tower::ServiceBuilder;
use tower::limit::ConcurrencyLimitLayer;
use tower::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::context::context_middleware;
use crate::error::{ApiError, ApiErrorDetail, ApiErrorResponse};
use crate::routes;
use crate::state::TablesState;

/// Creates the table facade router.
pub fn tables_router(state: TablesState) -> Router {
    let request_timeout = state.config.request_timeout;
    let concurrency_limit = state.config.concurrency_limit;

    let router = Router::new()
        .merge(routes::rows::routes())
        .merge(routes::questions::routes())
        .merge(routes::health::routes())
        .route(
            "/openapi.json",
            axum::routing::get(routes::openapi::get_openapi_json),
        )
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(not_found)
        .layer(middleware::from_fn(context_middleware))
        .layer(TraceLayer::new_for_http());

    let router = match concurrency_limit {
        Some(limit) => router.layer(ConcurrencyLimitLayer::new(limit)),
        None => router,
    };

    let router = match request_timeout {
        Some(timeout) => router.layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_timeout_error))
                .layer(TimeoutLayer::new(timeout)),
        ),
        None => router,
    };

    router.with_state(state)
}

async fn not_found(uri: OriginalUri) -> ApiError {
    ApiError::NotFound {
        message: format!("not found: {}", uri.0.path()),
    }
}

async fn method_not_allowed(method: Method, uri: OriginalUri) -> ApiError {
    ApiError::MethodNotAllowed {
        message: format!("{method} is not supported on {}", uri.0.path()),
    }
}

async fn handle_timeout_error(_err: tower::BoxError) -> (StatusCode, axum::Json<ApiErrorResponse>) {
    let response = ApiErrorResponse {
        error: ApiErrorDetail {
            error_code: "SERVICE_UNAVAILABLE".to_string(),
            message: "Request timed out".to_string(),
        },
    };
    (StatusCode::SERVICE_UNAVAILABLE, axum::Json(response))
}
