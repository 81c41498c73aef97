use super::{get_path, FieldPath, Filter, Projection, ResultStore};
use crate::errors::StoreError;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// An in-memory collection of result records.
///
/// Loaded from a database export: either a JSON array of documents or JSON
/// Lines with one document per line.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<Value>,
}

impl MemoryStore {
    pub fn new(records: Vec<Value>) -> Self {
        Self { records }
    }

    pub fn from_path(path: &Path) -> Result<Self, StoreError> {
        let contents = fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self::parse_export(&contents, path)?;
        debug!(path = %path.display(), records = store.len(), "Loaded result export");
        Ok(store)
    }

    pub fn from_json_str(contents: &str) -> Result<Self, StoreError> {
        Self::parse_export(contents, Path::new("<memory>"))
    }

    fn parse_export(contents: &str, path: &Path) -> Result<Self, StoreError> {
        let trimmed = contents.trim_start();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }
        if trimmed.starts_with('[') {
            parse_json_array(contents, path).map(Self::new)
        } else {
            parse_json_lines(contents, path).map(Self::new)
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Names of the test categories present under `prefix`, sorted.
    ///
    /// A category `T` is reported when some record has a `T.T` entry below
    /// the prefix, which is how test runners nest their results.
    pub fn test_names(&self, prefix: &FieldPath) -> Vec<String> {
        let mut names = BTreeSet::new();
        for record in &self.records {
            let Some(tests) = get_path(record, prefix).and_then(Value::as_object) else {
                continue;
            };
            for (name, value) in tests {
                if value.get(name).is_some() {
                    names.insert(name.clone());
                }
            }
        }
        names.into_iter().collect()
    }
}

impl ResultStore for MemoryStore {
    fn find(
        &self,
        filter: &Filter,
        projection: Option<&Projection>,
    ) -> Result<Vec<Value>, StoreError> {
        Ok(self
            .records
            .iter()
            .filter(|record| filter.matches(record))
            .map(|record| match projection {
                Some(projection) => projection.apply(record),
                None => record.clone(),
            })
            .collect())
    }

    fn find_one(&self, filter: &Filter) -> Result<Option<Value>, StoreError> {
        Ok(self
            .records
            .iter()
            .find(|record| filter.matches(record))
            .cloned())
    }
}

fn parse_json_array(contents: &str, path: &Path) -> Result<Vec<Value>, StoreError> {
    let value: Value = serde_json::from_str(contents).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        line: None,
        source,
    })?;
    match value {
        Value::Array(items) => {
            if let Some(index) = items.iter().position(|item| !item.is_object()) {
                return Err(StoreError::invalid_format(
                    path,
                    format!("element {index} is not a document"),
                ));
            }
            Ok(items)
        }
        _ => Err(StoreError::invalid_format(path, "expected an array of documents")),
    }
}

fn parse_json_lines(contents: &str, path: &Path) -> Result<Vec<Value>, StoreError> {
    let mut records = Vec::new();
    for (index, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(line).map_err(|source| StoreError::Parse {
            path: PathBuf::from(path),
            line: Some(index + 1),
            source,
        })?;
        if !value.is_object() {
            return Err(StoreError::invalid_format(
                path,
                format!("line {} is not a document", index + 1),
            ));
        }
        records.push(value);
    }
    Ok(records)
}
