//! Report envelopes handed to the output writers.

use crate::aggregation::{IssueAggregation, RankedIssue, TestSummary};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportMetadata {
    pub a11ymap_version: String,
    pub generated_at: DateTime<Utc>,
    pub source: String,
}

impl ReportMetadata {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            a11ymap_version: env!("CARGO_PKG_VERSION").to_string(),
            generated_at: Utc::now(),
            source: source.into(),
        }
    }
}

/// One test category's aggregation plus its ranked issues.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationReport {
    pub metadata: ReportMetadata,
    pub test_name: String,
    pub issue_identifier: String,
    pub top_issues: Vec<RankedIssue>,
    pub aggregation: IssueAggregation,
}

impl AggregationReport {
    pub fn new(
        metadata: ReportMetadata,
        test_name: impl Into<String>,
        issue_identifier: impl Into<String>,
        aggregation: IssueAggregation,
        top: usize,
    ) -> Self {
        Self {
            metadata,
            test_name: test_name.into(),
            issue_identifier: issue_identifier.into(),
            top_issues: aggregation.top_issues(top),
            aggregation,
        }
    }
}

/// Headline numbers for several test categories.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryReport {
    pub metadata: ReportMetadata,
    pub tests: Vec<TestSummary>,
    pub total_issues: usize,
    pub unique_issues: usize,
}

impl SummaryReport {
    pub fn new(metadata: ReportMetadata, tests: Vec<TestSummary>) -> Self {
        let total_issues = tests.iter().map(|t| t.total_issues).sum();
        let unique_issues = tests.iter().map(|t| t.unique_issues).sum();
        Self {
            metadata,
            tests,
            total_issues,
            unique_issues,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(name: &str, total: usize, unique: usize) -> TestSummary {
        TestSummary {
            test_name: name.into(),
            issue_identifier: "element".into(),
            has_section_data: false,
            total_issues: total,
            unique_issues: unique,
            domains: 1,
        }
    }

    #[test]
    fn test_summary_report_totals() {
        let report = SummaryReport::new(
            ReportMetadata::new("export.json"),
            vec![summary("images", 5, 2), summary("forms", 3, 3)],
        );
        assert_eq!(report.total_issues, 8);
        assert_eq!(report.unique_issues, 5);
    }

    #[test]
    fn test_metadata_carries_crate_version() {
        let metadata = ReportMetadata::new("export.json");
        assert_eq!(metadata.a11ymap_version, env!("CARGO_PKG_VERSION"));
        assert_eq!(metadata.source, "export.json");
    }
}
