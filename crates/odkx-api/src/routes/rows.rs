//! Row routes: raw rows, flattened field maps and attachment maps.


use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::routing::get;
use tracing::Instrument;

use odkx_core::observability::row_span;
use odkx_core::reshape::{
    AttachmentEntry, AttachmentMap, RowValueMap, map_attachments, map_row_values,
};
use odkx_core::resource::{FileManifest, RowResource};

use crate::error::{ApiErrorResponse, ApiResult};
use crate::state::TablesState;

/// Row routes.
pub fn routes() -> Router<TablesState> {
    Router::new()
        .route("/tables/:tableId/rows/:rowId", get(get_row))
        .route("/tables/:tableId/rows/:rowId/map", get(get_row_map))
        .route(
            "/tables/:tableId/rows/:rowId/attachments",
            get(get_row_attachments),
        )
}

async fn fetch_row(state: &TablesState, table_id: &str, row_id: &str) -> ApiResult<RowResource> {
    let table = state.client.get_table_resource(table_id).await?;
    let row = state
        .client
        .get_single_row(table_id, &table.schema_etag, row_id)
        .await?;
    Ok(row)
}

async fn fetch_row_attachments(
    state: &TablesState,
    table_id: &str,
    row_id: &str,
) -> ApiResult<FileManifest> {
    let table = state.client.get_table_resource(table_id).await?;
    let manifest = state
        .client
        .get_single_row_attachments(table_id, &table.schema_etag, row_id)
        .await?;
    Ok(manifest)
}

/// Returns a row exactly as served upstream.
///
/// # Errors
///
/// Returns [`crate::error::ApiError`] when the table or row cannot be fetched.
#[utoipa::path(
    get,
    path = "/tables/{tableId}/rows/{rowId}",
    tag = "Rows",
    params(
        ("tableId" = String, Path, description = "Table identifier."),
        ("rowId" = String, Path, description = "Row identifier.")
    ),
    responses(
        (status = 200, description = "The upstream row.", body = RowResource),
        (status = 404, description = "Table or row not found.", body = ApiErrorResponse),
        (status = 409, description = "Schema changed while reading.", body = ApiErrorResponse),
        (status = 502, description = "Upstream failure.", body = ApiErrorResponse),
    )
)]
pub(crate) async fn get_row(
    State(state): State<TablesState>,
    Path((table_id, row_id)): Path<(String, String)>,
) -> ApiResult<Json<RowResource>> {
    let row = fetch_row(&state, &table_id, &row_id)
        .instrument(row_span("get_row", &table_id, &row_id))
        .await?;
    Ok(Json(row))
}

/// Returns a row's values keyed by logical field name.
///
/// `*_contentType` columns are omitted and `*_uriFragment` columns appear
/// under their base name.
///
/// # Errors
///
/// Returns [`crate::error::ApiError`] when the table or row cannot be fetched.
#[utoipa::path(
    get,
    path = "/tables/{tableId}/rows/{rowId}/map",
    tag = "Rows",
    params(
        ("tableId" = String, Path, description = "Table identifier."),
        ("rowId" = String, Path, description = "Row identifier.")
    ),
    responses(
        (status = 200, description = "Field name to value map.", body = BTreeMap<String, Option<String>>),
        (status = 404, description = "Table or row not found.", body = ApiErrorResponse),
        (status = 409, description = "Schema changed while reading.", body = ApiErrorResponse),
        (status = 502, description = "Upstream failure.", body = ApiErrorResponse),
    )
)]
pub(crate) async fn get_row_map(
    State(state): State<TablesState>,
    Path((table_id, row_id)): Path<(String, String)>,
) -> ApiResult<Json<RowValueMap>> {
    let span = row_span("get_row_map", &table_id, &row_id);
    let row = fetch_row(&state, &table_id, &row_id)
        .instrument(span.clone())
        .await?;

    let mapped = map_row_values(row.values());
    span.in_scope(|| {
        tracing::debug!(
            columns = row.values().len(),
            fields = mapped.len(),
            "mapped row values"
        );
    });
    Ok(Json(mapped))
}

/// Returns a row's attachments keyed by filename.
///
/// # Errors
///
/// Returns [`crate::error::ApiError`] when the table or attachment manifest
/// cannot be fetched.
#[utoipa::path(
    get,
    path = "/tables/{tableId}/rows/{rowId}/attachments",
    tag = "Rows",
    params(
        ("tableId" = String, Path, description = "Table identifier."),
        ("rowId" = String, Path, description = "Row identifier.")
    ),
    responses(
        (status = 200, description = "Filename to attachment map.", body = BTreeMap<String, AttachmentEntry>),
        (status = 404, description = "Table or row not found.", body = ApiErrorResponse),
        (status = 409, description = "Schema changed while reading.", body = ApiErrorResponse),
        (status = 502, description = "Upstream failure.", body = ApiErrorResponse),
    )
)]
pub(crate) async fn get_row_attachments(
    State(state): State<TablesState>,
    Path((table_id, row_id)): Path<(String, String)>,
) -> ApiResult<Json<AttachmentMap>> {
    let manifest = fetch_row_attachments(&state, &table_id, &row_id)
        .instrument(row_span("get_row_attachments", &table_id, &row_id))
        .await?;

    Ok(Json(map_attachments(&manifest.files)))
}
