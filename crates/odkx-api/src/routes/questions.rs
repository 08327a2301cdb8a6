//! Survey question route.


use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::routing::get;
use tracing::Instrument;

use odkx_core::observability::table_span;
use odkx_core::reshape::{
    SurveyQuestion, SurveyQuestions, extract_survey_questions, find_form_definition_entry,
};

use crate::error::{ApiError, ApiErrorResponse, ApiResult};
use crate::state::TablesState;

/// Survey question routes.
pub fn routes() -> Router<TablesState> {
    Router::new().route("/tables/:tableId/questions", get(get_questions))
}

async fn load_questions(state: &TablesState, table_id: &str) -> ApiResult<SurveyQuestions> {
    let manifest = state.client.get_table_manifest(table_id).await?;
    let entry = find_form_definition_entry(&manifest).ok_or_else(|| ApiError::NotFound {
        message: format!("form definition not found for table {table_id}"),
    })?;
    let url = entry
        .download_url
        .as_deref()
        .ok_or_else(|| ApiError::BadGateway {
            message: format!("form definition of table {table_id} has no download URL"),
        })?;

    let document = state.client.get_form_definition(url).await?;
    match extract_survey_questions(&document) {
        Ok(questions) => {
            tracing::debug!(questions = questions.len(), "extracted survey questions");
            Ok(questions)
        }
        Err(err) if state.config.strict_form_definitions => Err(ApiError::BadGateway {
            message: format!("form definition of table {table_id} is unreadable: {err}"),
        }),
        Err(err) => {
            tracing::error!(error = %err, url = url, "unreadable form definition; returning no questions");
            Ok(SurveyQuestions::new())
        }
    }
}

/// Returns the survey questions of a table keyed by question name.
///
/// The questions come from the first `formDef.json` in the table manifest.
/// An unreadable form definition answers with an empty map unless strict
/// form definitions are configured.
///
/// # Errors
///
/// Returns [`ApiError`] when the table has no form definition or upstream
/// fetches fail.
#[utoipa::path(
    get,
    path = "/tables/{tableId}/questions",
    tag = "Questions",
    params(
        ("tableId" = String, Path, description = "Table identifier.")
    ),
    responses(
        (status = 200, description = "Question name to question map.", body = BTreeMap<String, SurveyQuestion>),
        (status = 404, description = "Table or form definition not found.", body = ApiErrorResponse),
        (status = 502, description = "Upstream failure or unreadable form definition (strict mode).", body = ApiErrorResponse),
    )
)]
pub(crate) async fn get_questions(
    State(state): State<TablesState>,
    Path(table_id): Path<String>,
) -> ApiResult<Json<SurveyQuestions>> {
    let questions = load_questions(&state, &table_id)
        .instrument(table_span("get_questions", &table_id))
        .await?;
    Ok(Json(questions))
}
