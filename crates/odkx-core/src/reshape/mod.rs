//! Field-level reshaping of upstream resources into response mappings.
//!
//! Every mapper here is a pure function over already fetched resources; the
//! HTTP layer owns fetching.

pub mod attachments;
pub mod row_values;
pub mod survey;

pub use attachments::{AttachmentEntry, AttachmentMap, map_attachments};
pub use row_values::{RowValueMap, map_row_values};
pub use survey::{
    FormDefinitionError, SurveyQuestion, SurveyQuestions, extract_survey_questions,
    extract_survey_questions_lenient, find_form_definition_entry,
};

/// Returns true if `name` ends with `suffix`, ignoring ASCII case.
pub(crate) fn ends_with_ignore_ascii_case(name: &str, suffix: &str) -> bool {
    name.len()
        .checked_sub(suffix.len())
        .and_then(|start| name.get(start..))
        .is_some_and(|tail| tail.eq_ignore_ascii_case(suffix))
}
