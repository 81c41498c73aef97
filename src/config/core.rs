use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::aggregation::{TestRequest, DEFAULT_FIELD_PREFIX, DEFAULT_ISSUE_IDENTIFIER};

/// Root configuration structure for a11ymap
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct A11ymapConfig {
    /// Where test results live inside each record
    #[serde(default)]
    pub store: Option<StoreConfig>,

    /// Aggregation defaults
    #[serde(default)]
    pub aggregation: Option<AggregationConfig>,

    /// Per-test overrides, keyed by test category name
    #[serde(default)]
    pub tests: BTreeMap<String, TestConfig>,

    /// Output configuration
    #[serde(default)]
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreConfig {
    /// Dotted path under which `T.T.details` is found for each test `T`
    pub field_prefix: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AggregationConfig {
    pub default_issue_identifier: Option<String>,
    /// Set to false to always use flat aggregation
    #[serde(default)]
    pub section_aware: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct TestConfig {
    pub issue_identifier: Option<String>,
    #[serde(default)]
    pub extra_fields: Vec<String>,
    pub section_aware: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutputConfig {
    pub default_format: Option<String>,
    /// Number of issues listed in ranked tables
    pub top_issues: Option<usize>,
    /// Enable colored output (default: auto-detect based on TTY)
    #[serde(default)]
    pub use_color: Option<bool>,
}

pub const DEFAULT_TOP_ISSUES: usize = 10;

impl A11ymapConfig {
    pub fn field_prefix(&self) -> &str {
        self.store
            .as_ref()
            .and_then(|s| s.field_prefix.as_deref())
            .unwrap_or(DEFAULT_FIELD_PREFIX)
    }

    pub fn default_issue_identifier(&self) -> &str {
        self.aggregation
            .as_ref()
            .and_then(|a| a.default_issue_identifier.as_deref())
            .unwrap_or(DEFAULT_ISSUE_IDENTIFIER)
    }

    fn default_section_aware(&self) -> bool {
        self.aggregation
            .as_ref()
            .and_then(|a| a.section_aware)
            .unwrap_or(true)
    }

    pub fn top_issues(&self) -> usize {
        self.output
            .as_ref()
            .and_then(|o| o.top_issues)
            .unwrap_or(DEFAULT_TOP_ISSUES)
    }

    pub fn default_format(&self) -> Option<&str> {
        self.output.as_ref().and_then(|o| o.default_format.as_deref())
    }

    pub fn use_color(&self) -> Option<bool> {
        self.output.as_ref().and_then(|o| o.use_color)
    }

    /// Names of the tests with a `[tests.<name>]` table.
    pub fn configured_tests(&self) -> Vec<String> {
        self.tests.keys().cloned().collect()
    }

    /// Build the aggregation request for `test_name`, applying per-test
    /// overrides over the global defaults.
    ///
    /// # Examples
    ///
    /// ```
    /// use a11ymap::config::A11ymapConfig;
    /// let config = A11ymapConfig::default();
    /// let request = config.request_for("color_contrast");
    /// assert_eq!(request.issue_identifier, "element");
    /// assert!(request.section_aware);
    /// ```
    pub fn request_for(&self, test_name: &str) -> TestRequest {
        let overrides = self.tests.get(test_name);
        let issue_identifier = overrides
            .and_then(|t| t.issue_identifier.as_deref())
            .unwrap_or_else(|| self.default_issue_identifier());
        let section_aware = overrides
            .and_then(|t| t.section_aware)
            .unwrap_or_else(|| self.default_section_aware());
        let extra_fields = overrides.map(|t| t.extra_fields.clone()).unwrap_or_default();

        TestRequest::new(test_name)
            .with_issue_identifier(issue_identifier)
            .with_extra_fields(extra_fields)
            .section_aware(section_aware)
    }
}
