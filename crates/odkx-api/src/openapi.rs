//! `OpenAPI` specification generation for the table facade.

use std::sync::OnceLock;

use utoipa::OpenApi;

/// `OpenAPI` documentation for the table facade.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "ODK-X tables facade",
        version = env!("CARGO_PKG_VERSION"),
        description = "Read-only views of upstream tables, rows, attachments and survey questions."
    ),
    paths(
        crate::routes::openapi::get_openapi_json,
        crate::routes::health::get_health,
        crate::routes::rows::get_row,
        crate::routes::rows::get_row_map,
        crate::routes::rows::get_row_attachments,
        crate::routes::questions::get_questions,
    ),
    components(
        schemas(
            crate::error::ApiErrorResponse,
            crate::error::ApiErrorDetail,
            crate::routes::health::HealthResponse,
            odkx_core::resource::RowResource,
            odkx_core::resource::DataKeyValue,
            odkx_core::resource::RowFilterScope,
            odkx_core::reshape::AttachmentEntry,
            odkx_core::reshape::SurveyQuestion,
        )
    ),
    tags(
        (name = "OpenAPI", description = "OpenAPI specification endpoint"),
        (name = "Health", description = "Liveness checks"),
        (name = "Rows", description = "Row, row value and attachment views"),
        (name = "Questions", description = "Survey questions from form definitions"),
    ),
)]
pub struct TablesApiDoc;

/// Returns the generated `OpenAPI` spec.
#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    TablesApiDoc::openapi()
}

static OPENAPI_JSON_CACHE: OnceLock<String> = OnceLock::new();

/// Returns the generated `OpenAPI` spec serialized as pretty JSON.
///
/// # Errors
///
/// Returns an error if JSON serialization fails (should not happen).
pub fn openapi_json() -> Result<String, serde_json::Error> {
    if let Some(spec) = OPENAPI_JSON_CACHE.get() {
        return Ok(spec.clone());
    }

    let spec = serde_json::to_string_pretty(&openapi())?;
    let _ = OPENAPI_JSON_CACHE.set(spec.clone());
    Ok(spec)
}
