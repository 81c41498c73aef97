// Test utility module for a11ymap integration tests
#![allow(dead_code)]

use a11ymap::MemoryStore;
use serde_json::{json, Value};
use std::path::PathBuf;

pub const PREFIX: &str = "results.accessibility.tests";

/// Builder for one tested page.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    url: String,
    tests: Vec<(String, Value)>,
}

impl RecordBuilder {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            tests: Vec::new(),
        }
    }

    /// Attach a `details` object for `test`.
    pub fn with_details(mut self, test: &str, details: Value) -> Self {
        self.tests.push((test.to_string(), details));
        self
    }

    pub fn with_violations(self, test: &str, violations: Value) -> Self {
        self.with_details(test, json!({ "violations": violations }))
    }

    /// Violations plus a non-null `section_statistics` marker.
    pub fn with_section_violations(self, test: &str, violations: Value) -> Self {
        self.with_details(
            test,
            json!({ "violations": violations, "section_statistics": {"computed": true} }),
        )
    }

    pub fn build(self) -> Value {
        let mut tests = serde_json::Map::new();
        for (name, details) in self.tests {
            tests.insert(name.clone(), json!({ name: { "details": details } }));
        }
        json!({
            "url": self.url,
            "results": { "accessibility": { "tests": Value::Object(tests) } }
        })
    }
}

pub fn store(records: Vec<Value>) -> MemoryStore {
    MemoryStore::new(records)
}

pub fn violation(element: &str, section_type: &str) -> Value {
    json!({
        "element": element,
        "section": {
            "section_type": section_type,
            "section_name": section_type.to_uppercase(),
            "primary": section_type == "header"
        }
    })
}

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(name)
}

// Helper to create temporary export files
pub fn create_export_file(content: &str, extension: &str) -> (tempfile::TempDir, PathBuf) {
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join(format!("export.{}", extension));
    std::fs::write(&file_path, content).expect("Failed to write export file");
    (temp_dir, file_path)
}
