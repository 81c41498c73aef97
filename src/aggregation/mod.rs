//! Issue aggregation over accessibility test results.
//!
//! [`IssueAggregator`] reads the violations recorded for one test category
//! and tallies them by page-section type and issue key. When none of the
//! records for that category carry section statistics it falls back to flat
//! per-issue counting.
//!
//! ```
//! use a11ymap::aggregation::IssueAggregator;
//! use a11ymap::store::MemoryStore;
//! use serde_json::json;
//!
//! let store = MemoryStore::new(vec![json!({
//!     "url": "https://example.org/",
//!     "results": {"accessibility": {"tests": {"images": {"images": {"details": {
//!         "violations": [{"element": "img"}]
//!     }}}}}}
//! })]);
//!
//! let result = IssueAggregator::default()
//!     .aggregate_by_section(&store, "images", "element", &[])
//!     .unwrap();
//! assert!(!result.has_section_data());
//! assert_eq!(result.total_issues(), 1);
//! ```

mod accumulator;
pub mod domain;
mod flat;
mod section;
pub mod types;
pub mod violations;

pub use domain::extract_domain;
pub use types::{
    DomainIssueStatistic, DomainSectionStatistic, FlatAggregation, FlatIssueStatistic,
    IssueAggregation, IssueStatistic, RankedIssue, SectionAggregation, SectionStatistic,
    TestSummary,
};

use crate::errors::StoreError;
use crate::store::{FieldPath, Filter, Projection, ResultStore};
use flat::FlatAggregator;
use section::SectionAggregator;
use tracing::{debug, info, info_span};

pub const DEFAULT_FIELD_PREFIX: &str = "results.accessibility.tests";
pub const DEFAULT_ISSUE_IDENTIFIER: &str = "element";

/// What to aggregate for one test category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestRequest {
    pub test_name: String,
    pub issue_identifier: String,
    pub extra_fields: Vec<String>,
    /// When false, skip the section probe and aggregate flat
    pub section_aware: bool,
}

impl TestRequest {
    pub fn new(test_name: impl Into<String>) -> Self {
        Self {
            test_name: test_name.into(),
            issue_identifier: DEFAULT_ISSUE_IDENTIFIER.to_string(),
            extra_fields: Vec::new(),
            section_aware: true,
        }
    }

    pub fn with_issue_identifier(mut self, issue_identifier: impl Into<String>) -> Self {
        self.issue_identifier = issue_identifier.into();
        self
    }

    pub fn with_extra_fields(mut self, extra_fields: Vec<String>) -> Self {
        self.extra_fields = extra_fields;
        self
    }

    pub fn section_aware(mut self, section_aware: bool) -> Self {
        self.section_aware = section_aware;
        self
    }
}

/// Aggregates violations for test categories stored under a field prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueAggregator {
    prefix: FieldPath,
}

impl Default for IssueAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_FIELD_PREFIX)
    }
}

impl IssueAggregator {
    pub fn new(prefix: impl Into<FieldPath>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// `<prefix>.T.T.details`
    fn details_path(&self, test_name: &str) -> FieldPath {
        self.prefix.join(test_name).join(test_name).join("details")
    }

    pub fn violations_path(&self, test_name: &str) -> FieldPath {
        self.details_path(test_name).join("violations")
    }

    pub fn section_statistics_path(&self, test_name: &str) -> FieldPath {
        self.details_path(test_name).join("section_statistics")
    }

    /// Aggregate `test_name` by page section, falling back to
    /// [`aggregate_flat`](Self::aggregate_flat) when no record for this test
    /// has section statistics.
    pub fn aggregate_by_section<S: ResultStore + ?Sized>(
        &self,
        store: &S,
        test_name: &str,
        issue_identifier: &str,
        extra_fields: &[String],
    ) -> Result<IssueAggregation, StoreError> {
        let _span = info_span!("aggregate_by_section", test = test_name, issue_identifier)
            .entered();

        let probe = Filter::not_null(self.section_statistics_path(test_name));
        if store.find_one(&probe)?.is_none() {
            info!(test = test_name, "No section statistics found; using flat aggregation");
            return self
                .aggregate_flat(store, test_name, issue_identifier, extra_fields)
                .map(IssueAggregation::Flat);
        }

        let violations_path = self.violations_path(test_name);
        let records = self.fetch_records(store, &violations_path, extra_fields)?;

        let mut aggregator = SectionAggregator::new();
        for record in &records {
            aggregator.add_record(record, &violations_path, issue_identifier);
        }
        let result = aggregator.finish();

        info!(
            records = records.len(),
            sections = result.section_statistics.len(),
            total_issues = result.total_issues,
            unique_issues = result.unique_issues,
            "Section-aware aggregation complete"
        );
        Ok(IssueAggregation::Sectioned(result))
    }

    /// Aggregate `test_name` by issue key only.
    pub fn aggregate_flat<S: ResultStore + ?Sized>(
        &self,
        store: &S,
        test_name: &str,
        issue_identifier: &str,
        extra_fields: &[String],
    ) -> Result<FlatAggregation, StoreError> {
        let _span = info_span!("aggregate_flat", test = test_name, issue_identifier).entered();

        let violations_path = self.violations_path(test_name);
        let records = self.fetch_records(store, &violations_path, extra_fields)?;

        let mut aggregator = FlatAggregator::new();
        for record in &records {
            aggregator.add_record(record, &violations_path, issue_identifier);
        }
        let result = aggregator.finish();

        info!(
            records = records.len(),
            total_issues = result.total_issues,
            unique_issues = result.unique_issues,
            "Flat aggregation complete"
        );
        Ok(result)
    }

    /// Run one request, honouring its `section_aware` switch.
    pub fn aggregate<S: ResultStore + ?Sized>(
        &self,
        store: &S,
        request: &TestRequest,
    ) -> Result<IssueAggregation, StoreError> {
        if request.section_aware {
            self.aggregate_by_section(
                store,
                &request.test_name,
                &request.issue_identifier,
                &request.extra_fields,
            )
        } else {
            self.aggregate_flat(
                store,
                &request.test_name,
                &request.issue_identifier,
                &request.extra_fields,
            )
            .map(IssueAggregation::Flat)
        }
    }

    /// Aggregate several test categories and keep their headline numbers.
    ///
    /// Stops at the first store failure.
    pub fn aggregate_many<S: ResultStore + ?Sized>(
        &self,
        store: &S,
        requests: &[TestRequest],
    ) -> Result<Vec<TestSummary>, StoreError> {
        requests
            .iter()
            .map(|request| {
                self.aggregate(store, request).map(|aggregation| {
                    TestSummary::from_aggregation(
                        &request.test_name,
                        &request.issue_identifier,
                        &aggregation,
                    )
                })
            })
            .collect()
    }

    fn fetch_records<S: ResultStore + ?Sized>(
        &self,
        store: &S,
        violations_path: &FieldPath,
        extra_fields: &[String],
    ) -> Result<Vec<serde_json::Value>, StoreError> {
        let projection = extra_fields.iter().fold(
            Projection::new().field("url").field(violations_path.clone()),
            |projection, field| projection.field(field.as_str()),
        );
        let records = store.find(&Filter::Exists(violations_path.clone()), Some(&projection))?;
        debug!(path = %violations_path, records = records.len(), "Fetched records");
        Ok(records)
    }
}
