//! Dotted field paths over JSON documents.
//!
//! Result records are addressed the way a document database addresses nested
//! fields: `results.accessibility.tests.images.images.details.violations`.
//! A [`FieldPath`] is parsed once and then walked segment by segment; any
//! missing segment (or a non-object on the way) resolves to `None`.

use serde_json::{Map, Value};
use std::fmt;

/// A parsed dotted path such as `a.b.c`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Parse a dotted path. Empty segments are dropped, so `"a..b"` and
    /// `".a.b"` both address `a.b`.
    pub fn parse(path: &str) -> Self {
        Self {
            segments: path
                .split('.')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns a new path with `segment` appended.
    pub fn join(&self, segment: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(
            segment
                .split('.')
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        );
        Self { segments }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl From<&str> for FieldPath {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

/// Resolve `path` against `record`, returning `None` on any missing segment.
///
/// An empty path resolves to the record itself.
pub fn get_path<'a>(record: &'a Value, path: &FieldPath) -> Option<&'a Value> {
    path.segments
        .iter()
        .try_fold(record, |current, segment| current.as_object()?.get(segment))
}

/// Copy the value at `path` from `source` into `target`, creating the
/// intermediate objects. Nothing is written when the source has no value
/// at that path.
pub(crate) fn copy_path(source: &Value, target: &mut Map<String, Value>, path: &FieldPath) {
    let Some(value) = get_path(source, path) else {
        return;
    };
    let Some((last, parents)) = path.segments.split_last() else {
        return;
    };

    let mut current = target;
    for segment in parents {
        let entry = current
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        current = match entry {
            Value::Object(map) => map,
            _ => return,
        };
    }
    current.insert(last.clone(), value.clone());
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_splits_on_dots() {
        let path = FieldPath::parse("results.images.details");
        assert_eq!(path.segments(), ["results", "images", "details"]);
        assert_eq!(path.to_string(), "results.images.details");
    }

    #[test]
    fn test_parse_drops_empty_segments() {
        assert_eq!(FieldPath::parse(".a..b."), FieldPath::parse("a.b"));
        assert!(FieldPath::parse("").is_empty());
    }

    #[test]
    fn test_join_accepts_dotted_segment() {
        let base = FieldPath::parse("results.tests");
        let joined = base.join("images.images");
        assert_eq!(joined.to_string(), "results.tests.images.images");
    }

    #[test]
    fn test_get_path_resolves_nested_value() {
        let record = json!({"a": {"b": {"c": 42}}});
        assert_eq!(
            get_path(&record, &FieldPath::parse("a.b.c")),
            Some(&json!(42))
        );
    }

    #[test]
    fn test_get_path_missing_segment_is_none() {
        let record = json!({"a": {"b": {}}});
        assert_eq!(get_path(&record, &FieldPath::parse("a.b.c")), None);
        assert_eq!(get_path(&record, &FieldPath::parse("x.b.c")), None);
    }

    #[test]
    fn test_get_path_through_non_object_is_none() {
        let record = json!({"a": [1, 2, 3]});
        assert_eq!(get_path(&record, &FieldPath::parse("a.b")), None);
    }

    #[test]
    fn test_get_path_keeps_explicit_null() {
        let record = json!({"a": {"b": null}});
        assert_eq!(
            get_path(&record, &FieldPath::parse("a.b")),
            Some(&Value::Null)
        );
    }

    #[test]
    fn test_empty_path_resolves_to_record() {
        let record = json!({"url": "x"});
        assert_eq!(get_path(&record, &FieldPath::parse("")), Some(&record));
    }

    #[test]
    fn test_copy_path_builds_intermediate_objects() {
        let source = json!({"a": {"b": {"c": [1], "d": 2}}, "url": "u"});
        let mut target = Map::new();
        copy_path(&source, &mut target, &FieldPath::parse("a.b.c"));
        copy_path(&source, &mut target, &FieldPath::parse("url"));
        copy_path(&source, &mut target, &FieldPath::parse("missing.path"));

        assert_eq!(
            Value::Object(target),
            json!({"a": {"b": {"c": [1]}}, "url": "u"})
        );
    }
}
