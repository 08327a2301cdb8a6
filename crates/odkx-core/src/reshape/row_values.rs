//! Flattening of row values into a field map.

use std::collections::BTreeMap;

use crate::reshape::ends_with_ignore_ascii_case;
use crate::resource::DataKeyValue;

/// Suffix of columns holding an attachment's MIME type.
pub const CONTENT_TYPE_SUFFIX: &str = "_contentType";

/// Suffix of columns holding an attachment's file reference.
pub const URI_FRAGMENT_SUFFIX: &str = "_uriFragment";

/// Field name to value mapping for one row.
pub type RowValueMap = BTreeMap<String, Option<String>>;

/// Maps row values to logical field names.
///
/// `*_contentType` columns are dropped. `*_uriFragment` columns are stored
/// under their base name. Everything else passes through. Suffixes match
/// without regard to ASCII case; on a name collision the later column wins.
#[must_use]
pub fn map_row_values(values: &[DataKeyValue]) -> RowValueMap {
    let mut mapped = RowValueMap::new();
    for value in values {
        let column = value.column.as_str();
        if ends_with_ignore_ascii_case(column, CONTENT_TYPE_SUFFIX) {
            continue;
        }

        let field = if ends_with_ignore_ascii_case(column, URI_FRAGMENT_SUFFIX) {
            &column[..column.len() - URI_FRAGMENT_SUFFIX.len()]
        } else {
            column
        };

        if let Some(previous) = mapped.insert(field.to_string(), value.value.clone()) {
            tracing::debug!(
                field = field,
                column = column,
                previous = ?previous,
                "row field overwritten by later column"
            );
        }
    }
    mapped
}
