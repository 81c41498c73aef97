//! Flat accumulation, used when a test category carries no section data.

use super::accumulator::IssueAccumulator;
use super::domain::extract_domain;
use super::types::{DomainIssueStatistic, FlatAggregation, FlatIssueStatistic};
use super::violations::{issue_key, resolve_violations};
use crate::store::FieldPath;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Default)]
struct DomainIssueAccumulator {
    count: usize,
    pages: BTreeSet<String>,
}

#[derive(Debug, Default)]
pub(crate) struct FlatAggregator {
    issues: BTreeMap<String, IssueAccumulator>,
    by_domain: BTreeMap<String, BTreeMap<String, DomainIssueAccumulator>>,
}

impl FlatAggregator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_record(
        &mut self,
        record: &Value,
        violations_path: &FieldPath,
        issue_identifier: &str,
    ) {
        let url = record.get("url").and_then(Value::as_str).unwrap_or_default();
        let domain = extract_domain(url);

        for violation in resolve_violations(record, violations_path).iter() {
            if let Value::Object(violation) = violation {
                self.add_violation(violation, url, domain, issue_identifier);
            }
        }
    }

    fn add_violation(
        &mut self,
        violation: &Map<String, Value>,
        url: &str,
        domain: &str,
        issue_identifier: &str,
    ) {
        let key = issue_key(violation, issue_identifier);

        self.issues
            .entry(key.clone())
            .or_insert_with(|| IssueAccumulator::new(violation))
            .record(domain, url);

        let domain_issue = self
            .by_domain
            .entry(domain.to_string())
            .or_default()
            .entry(key)
            .or_default();
        domain_issue.count += 1;
        domain_issue.pages.insert(url.to_string());
    }

    pub(crate) fn finish(self) -> FlatAggregation {
        let issue_statistics: BTreeMap<String, FlatIssueStatistic> = self
            .issues
            .into_iter()
            .map(|(key, acc)| (key, acc.finish()))
            .collect();

        let issues_by_domain: BTreeMap<String, BTreeMap<String, DomainIssueStatistic>> = self
            .by_domain
            .into_iter()
            .map(|(domain, issues)| {
                let issues = issues
                    .into_iter()
                    .map(|(key, acc)| {
                        (
                            key,
                            DomainIssueStatistic {
                                count: acc.count,
                                pages: acc.pages.into_iter().collect(),
                            },
                        )
                    })
                    .collect();
                (domain, issues)
            })
            .collect();

        let total_issues = issue_statistics.values().map(|i| i.count).sum();
        let unique_issues = issue_statistics.len();
        let domain_unique_issues = issues_by_domain
            .iter()
            .map(|(domain, issues)| (domain.clone(), issues.len()))
            .collect();

        FlatAggregation {
            issue_statistics,
            issues_by_domain,
            total_issues,
            unique_issues,
            domain_unique_issues,
            has_section_data: false,
        }
    }
}
