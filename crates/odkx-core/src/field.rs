//! Optional-field accessors for loosely structured JSON documents.
//!
//! Form definitions are authored by hand and converted from spreadsheets, so
//! any field may be missing, `null`, or of an unexpected type. These helpers
//! give every lookup an explicit default instead of scattering null checks.

use serde_json::Value;

/// Field lookups with defaults on JSON objects.
pub trait FieldExt {
    /// Returns the field value if it is present and not `null`.
    fn non_null(&self, key: &str) -> Option<&Value>;

    /// Returns the field rendered as text, or `default` when absent or `null`.
    ///
    /// Scalars are rendered as their literal text; arrays and objects render
    /// as the empty string.
    fn text_or(&self, key: &str, default: &str) -> String {
        self.non_null(key)
            .map_or_else(|| default.to_string(), value_as_text)
    }

    /// Returns the field as an integer, or `default` when absent, `null`, or
    /// not interpretable as one.
    fn int_or(&self, key: &str, default: i64) -> i64 {
        self.non_null(key)
            .and_then(value_as_int)
            .unwrap_or(default)
    }
}

impl FieldExt for Value {
    fn non_null(&self, key: &str) -> Option<&Value> {
        self.get(key).filter(|value| !value.is_null())
    }
}

/// Renders a JSON value as text.
#[must_use]
pub fn value_as_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

/// Interprets a JSON value as an integer.
///
/// Floats are truncated toward zero, numeric strings are parsed, and booleans
/// map to `1`/`0`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn value_as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|float| float.trunc() as i64)),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        Value::Bool(flag) => Some(i64::from(*flag)),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
