//! Reading violations out of result records.
//!
//! Test runners store violations either as a native array or, for some
//! older records, as a JSON-encoded string. Both are accepted; anything
//! else degrades to "no violations".

use crate::store::{get_path, FieldPath};
use serde_json::{Map, Value};
use std::borrow::Cow;
use tracing::debug;

pub const UNKNOWN_SECTION_TYPE: &str = "unknown";
pub const UNKNOWN_SECTION_NAME: &str = "Unknown Section";
pub const UNKNOWN_ISSUE_KEY: &str = "unknown";

/// Resolve the violations stored at `path` in `record`.
///
/// Missing path segments, unparseable strings and non-array values all
/// yield an empty list. Entries are returned as-is, including non-objects;
/// callers skip those.
pub fn resolve_violations<'a>(record: &'a Value, path: &FieldPath) -> Cow<'a, [Value]> {
    match get_path(record, path) {
        Some(Value::Array(items)) => Cow::Borrowed(items.as_slice()),
        Some(Value::String(encoded)) => match serde_json::from_str::<Value>(encoded) {
            Ok(Value::Array(items)) => Cow::Owned(items),
            Ok(_) => {
                debug!(path = %path, "Encoded violations are not an array; treating as empty");
                Cow::Owned(Vec::new())
            }
            Err(e) => {
                debug!(path = %path, error = %e, "Unparseable violations string; treating as empty");
                Cow::Owned(Vec::new())
            }
        },
        _ => Cow::Owned(Vec::new()),
    }
}

/// The page section a violation was found in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionInfo {
    pub section_type: String,
    pub section_name: String,
    pub primary: bool,
}

impl SectionInfo {
    /// Read the `section` object of a violation, applying defaults for any
    /// missing or mistyped field.
    pub fn from_violation(violation: &Map<String, Value>) -> Self {
        let section = violation.get("section").and_then(Value::as_object);
        let field = |name: &str| section.and_then(|s| s.get(name));

        Self {
            section_type: field("section_type")
                .and_then(scalar_to_string)
                .unwrap_or_else(|| UNKNOWN_SECTION_TYPE.to_string()),
            section_name: field("section_name")
                .and_then(scalar_to_string)
                .unwrap_or_else(|| UNKNOWN_SECTION_NAME.to_string()),
            primary: field("primary").and_then(Value::as_bool).unwrap_or(false),
        }
    }
}

/// The grouping key of a violation: the value of `issue_identifier`, or
/// `"unknown"` when absent or null.
pub fn issue_key(violation: &Map<String, Value>, issue_identifier: &str) -> String {
    violation
        .get(issue_identifier)
        .and_then(scalar_to_string)
        .unwrap_or_else(|| UNKNOWN_ISSUE_KEY.to_string())
}

// Strings are used verbatim; other non-null values by their JSON text.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
