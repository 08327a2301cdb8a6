//! Liveness endpoint.

use axum::Json;
use axum::Router;
use axum::routing::get;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::TablesState;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
}

/// Health routes.
pub fn routes() -> Router<TablesState> {
    Router::new().route("/health", get(get_health))
}

/// Returns 200 OK if the service is alive.
///
/// This is a shallow check that does not reach the upstream service.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is alive.", body = HealthResponse),
    )
)]
pub async fn get_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
