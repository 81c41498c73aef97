//! Queryable stores of accessibility result records.
//!
//! The aggregator only needs two capabilities from a store: "all records
//! where a dotted path exists, projected to a few fields" and "any one
//! record matching a filter". [`ResultStore`] captures exactly that, so the
//! aggregation logic can run against an in-memory fake in tests and against
//! a loaded export ([`MemoryStore`]) from the CLI.

mod memory;
pub mod path;

pub use memory::MemoryStore;
pub use path::{get_path, FieldPath};

use crate::errors::StoreError;
use serde_json::{Map, Value};

/// Record filter in the style of document-database queries.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// The path resolves to any value, including `null`
    Exists(FieldPath),
    /// The path resolves to a non-null value
    NotNull(FieldPath),
    /// The path resolves to exactly this value
    Equals(FieldPath, Value),
}

impl Filter {
    pub fn exists(path: impl Into<FieldPath>) -> Self {
        Self::Exists(path.into())
    }

    pub fn not_null(path: impl Into<FieldPath>) -> Self {
        Self::NotNull(path.into())
    }

    pub fn equals(path: impl Into<FieldPath>, value: impl Into<Value>) -> Self {
        Self::Equals(path.into(), value.into())
    }

    pub fn matches(&self, record: &Value) -> bool {
        match self {
            Filter::Exists(path) => get_path(record, path).is_some(),
            Filter::NotNull(path) => get_path(record, path).is_some_and(|v| !v.is_null()),
            Filter::Equals(path, expected) => get_path(record, path) == Some(expected),
        }
    }
}

/// The set of dotted paths to keep when returning records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projection {
    fields: Vec<FieldPath>,
}

impl Projection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, path: impl Into<FieldPath>) -> Self {
        let path = path.into();
        if !path.is_empty() && !self.fields.contains(&path) {
            self.fields.push(path);
        }
        self
    }

    pub fn fields(&self) -> &[FieldPath] {
        &self.fields
    }

    /// Build a new document holding only the projected fields of `record`.
    pub fn apply(&self, record: &Value) -> Value {
        let mut projected = Map::new();
        for field in &self.fields {
            path::copy_path(record, &mut projected, field);
        }
        Value::Object(projected)
    }
}

/// Read-only access to a collection of result records.
pub trait ResultStore {
    /// Return every record matching `filter`, projected when a projection is
    /// given.
    fn find(
        &self,
        filter: &Filter,
        projection: Option<&Projection>,
    ) -> Result<Vec<Value>, StoreError>;

    /// Return one record matching `filter`, if any.
    fn find_one(&self, filter: &Filter) -> Result<Option<Value>, StoreError> {
        Ok(self.find(filter, None)?.into_iter().next())
    }
}

impl<S: ResultStore + ?Sized> ResultStore for &S {
    fn find(
        &self,
        filter: &Filter,
        projection: Option<&Projection>,
    ) -> Result<Vec<Value>, StoreError> {
        (**self).find(filter, projection)
    }

    fn find_one(&self, filter: &Filter) -> Result<Option<Value>, StoreError> {
        (**self).find_one(filter)
    }
}
