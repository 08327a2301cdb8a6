//! Survey question extraction from form definitions.
//!
//! A table's manifest carries a `formDef.json` document whose `xlsx.survey`
//! array lists the survey's prompts. Each prompt is reduced to a
//! [`SurveyQuestion`] keyed by its name.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::field::{FieldExt, value_as_text};
use crate::reshape::ends_with_ignore_ascii_case;
use crate::resource::{FileManifest, FileManifestEntry};

/// File name suffix identifying a form definition in a table manifest.
pub const FORM_DEFINITION_FILENAME: &str = "formDef.json";

/// Name given to prompts that do not carry one.
pub const DEFAULT_QUESTION_NAME: &str = "_ERROR_DEFAULT";

/// A survey prompt extracted from a form definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SurveyQuestion {
    /// Prompt name (the field it writes to).
    pub name: String,
    /// Display text, or the display image when there is no text.
    pub display_text: String,
    /// Prompt type (`text`, `integer`, `select_one`, ...).
    #[serde(rename = "type")]
    pub question_type: String,
    /// Spreadsheet row the prompt was defined on.
    pub row_num: i64,
}

impl SurveyQuestion {
    /// Extracts a question from one survey node, defaulting missing fields.
    #[must_use]
    pub fn from_node(node: &Value) -> Self {
        Self {
            name: node.text_or("name", DEFAULT_QUESTION_NAME),
            display_text: display_text(node),
            question_type: node.text_or("type", ""),
            row_num: node.int_or("_row_num", 0),
        }
    }
}

/// Question name to question mapping.
pub type SurveyQuestions = BTreeMap<String, SurveyQuestion>;

/// Errors raised while reading a form definition.
#[derive(Debug, thiserror::Error)]
pub enum FormDefinitionError {
    /// The document is not valid JSON.
    #[error("malformed form definition: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Returns the first manifest entry whose filename ends in `formDef.json`,
/// ignoring ASCII case.
#[must_use]
pub fn find_form_definition_entry(manifest: &FileManifest) -> Option<&FileManifestEntry> {
    manifest.files.iter().find(|entry| {
        entry
            .filename
            .as_deref()
            .is_some_and(|name| ends_with_ignore_ascii_case(name, FORM_DEFINITION_FILENAME))
    })
}

/// Extracts survey questions from form definition text.
///
/// A document without an `xlsx.survey` collection yields no questions. On
/// duplicate names the later prompt wins.
///
/// # Errors
///
/// Returns [`FormDefinitionError::Malformed`] if the text is not valid JSON.
pub fn extract_survey_questions(json: &str) -> Result<SurveyQuestions, FormDefinitionError> {
    let root: Value = serde_json::from_str(json)?;
    tracing::debug!(bytes = json.len(), "parsed form definition");

    let mut questions = SurveyQuestions::new();
    for node in survey_nodes(&root) {
        let question = SurveyQuestion::from_node(node);
        if let Some(previous) = questions.insert(question.name.clone(), question) {
            tracing::debug!(
                name = %previous.name,
                row_num = previous.row_num,
                "survey question overwritten by later prompt"
            );
        }
    }
    Ok(questions)
}

/// Extracts survey questions, logging and discarding parse failures.
///
/// Returns an empty map when the document cannot be parsed.
#[must_use]
pub fn extract_survey_questions_lenient(json: &str) -> SurveyQuestions {
    extract_survey_questions(json).unwrap_or_else(|err| {
        tracing::error!(error = %err, "failed to read form definition; returning no questions");
        SurveyQuestions::new()
    })
}

fn survey_nodes(root: &Value) -> Box<dyn Iterator<Item = &Value> + '_> {
    match root.get("xlsx").and_then(|xlsx| xlsx.get("survey")) {
        Some(Value::Array(nodes)) => Box::new(nodes.iter()),
        Some(Value::Object(nodes)) => Box::new(nodes.values()),
        _ => Box::new(std::iter::empty()),
    }
}

fn display_text(node: &Value) -> String {
    node.non_null("display")
        .and_then(|display| display.non_null("text").or_else(|| display.non_null("image")))
        .map(value_as_text)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_all_fields_from_a_prompt() {
        let question = SurveyQuestion::from_node(&json!({
            "name": "q1",
            "type": "text",
            "_row_num": 3,
            "display": {"text": "Q1?"}
        }));

        assert_eq!(
            question,
            SurveyQuestion {
                name: "q1".to_string(),
                display_text: "Q1?".to_string(),
                question_type: "text".to_string(),
                row_num: 3,
            }
        );
    }

    #[test]
    fn missing_fields_take_defaults() {
        let question = SurveyQuestion::from_node(&json!({"display": null}));
        assert_eq!(question.name, DEFAULT_QUESTION_NAME);
        assert_eq!(question.display_text, "");
        assert_eq!(question.question_type, "");
        assert_eq!(question.row_num, 0);
    }

    #[test]
    fn display_falls_back_to_image() {
        let question = SurveyQuestion::from_node(&json!({
            "name": "pic",
            "display": {"text": null, "image": "intro.png"}
        }));
        assert_eq!(question.display_text, "intro.png");

        let question = SurveyQuestion::from_node(&json!({"name": "blank", "display": {}}));
        assert_eq!(question.display_text, "");
    }

    #[test]
    fn serializes_with_camel_case_and_type_key() {
        let question = SurveyQuestion::from_node(&json!({"name": "age", "type": "integer"}));
        let value = serde_json::to_value(&question).unwrap();
        assert_eq!(
            value,
            json!({"name": "age", "displayText": "", "type": "integer", "rowNum": 0})
        );
    }

    #[test]
    fn picks_first_form_definition_entry() {
        let manifest = FileManifest::new(vec![
            FileManifestEntry::new("a.json", "http://sync/a.json"),
            FileManifestEntry::new("formDef.json", "http://sync/formDef.json"),
            FileManifestEntry::new("other/formdef.JSON", "http://sync/other.json"),
        ]);

        let entry = find_form_definition_entry(&manifest).unwrap();
        assert_eq!(entry.filename.as_deref(), Some("formDef.json"));
    }

    #[test]
    fn form_definition_match_ignores_case_and_directories() {
        let manifest = FileManifest::new(vec![
            FileManifestEntry::default(),
            FileManifestEntry::new("tables/census/forms/census/FORMDEF.JSON", "http://sync/f"),
        ]);
        assert!(find_form_definition_entry(&manifest).is_some());

        let manifest = FileManifest::new(vec![FileManifestEntry::new("a.json", "http://sync/a")]);
        assert!(find_form_definition_entry(&manifest).is_none());
    }

    #[test]
    fn duplicate_names_keep_last_prompt() {
        let questions = extract_survey_questions(
            r#"{"xlsx":{"survey":[
                {"name":"q","_row_num":2},
                {"type":"note","_row_num":3},
                {"name":"q","_row_num":4}
            ]}}"#,
        )
        .unwrap();

        assert_eq!(questions.len(), 2);
        assert_eq!(questions["q"].row_num, 4);
        assert_eq!(questions[DEFAULT_QUESTION_NAME].question_type, "note");
    }

    #[test]
    fn documents_without_survey_yield_nothing() {
        assert!(extract_survey_questions(r#"{"xlsx":{}}"#).unwrap().is_empty());
        assert!(extract_survey_questions(r#"{"specification":{}}"#).unwrap().is_empty());
        assert!(extract_survey_questions(r#"{"xlsx":{"survey":7}}"#).unwrap().is_empty());
    }

    #[test]
    fn malformed_json_is_an_error_in_strict_mode() {
        let err = extract_survey_questions("{\"xlsx\": [").unwrap_err();
        assert!(matches!(err, FormDefinitionError::Malformed(_)));
    }

    #[test]
    fn malformed_json_is_empty_in_lenient_mode() {
        assert!(extract_survey_questions_lenient("not json at all").is_empty());
    }
}
