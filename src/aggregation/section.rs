//! Section-aware accumulation.
//!
//! Violations are grouped by page-section type and issue key so that an
//! issue in a shared header repeated on every page shows up as one distinct
//! issue with many occurrences rather than many distinct issues.

use super::accumulator::IssueAccumulator;
use super::domain::extract_domain;
use super::types::{DomainSectionStatistic, SectionAggregation, SectionStatistic};
use super::violations::{issue_key, resolve_violations, SectionInfo};
use crate::store::FieldPath;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug)]
struct SectionAccumulator {
    name: String,
    is_primary: bool,
    total_count: usize,
    issues: BTreeMap<String, IssueAccumulator>,
    domains: BTreeSet<String>,
    pages: BTreeSet<String>,
}

impl SectionAccumulator {
    fn new(info: &SectionInfo) -> Self {
        Self {
            name: info.section_name.clone(),
            is_primary: info.primary,
            total_count: 0,
            issues: BTreeMap::new(),
            domains: BTreeSet::new(),
            pages: BTreeSet::new(),
        }
    }
}

#[derive(Debug)]
struct DomainSectionAccumulator {
    name: String,
    is_primary: bool,
    count: usize,
    issues: BTreeSet<String>,
    pages: BTreeSet<String>,
}

/// Single-pass builder for a [`SectionAggregation`].
#[derive(Debug, Default)]
pub(crate) struct SectionAggregator {
    sections: BTreeMap<String, SectionAccumulator>,
    by_domain: BTreeMap<String, BTreeMap<String, DomainSectionAccumulator>>,
}

impl SectionAggregator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Add every violation of one (projected) record.
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
        let info = SectionInfo::from_violation(violation);
        let key = issue_key(violation, issue_identifier);

        let section = self
            .sections
            .entry(info.section_type.clone())
            .or_insert_with(|| SectionAccumulator::new(&info));
        section.total_count += 1;
        section.domains.insert(domain.to_string());
        section.pages.insert(url.to_string());

        section
            .issues
            .entry(key.clone())
            .or_insert_with(|| IssueAccumulator::new(violation))
            .record(domain, url);

        let domain_section = self
            .by_domain
            .entry(domain.to_string())
            .or_default()
            .entry(info.section_type.clone())
            .or_insert_with(|| DomainSectionAccumulator {
                name: info.section_name.clone(),
                is_primary: info.primary,
                count: 0,
                issues: BTreeSet::new(),
                pages: BTreeSet::new(),
            });
        domain_section.count += 1;
        domain_section.issues.insert(key);
        domain_section.pages.insert(url.to_string());
    }

    pub(crate) fn finish(self) -> SectionAggregation {
        let section_statistics: BTreeMap<String, SectionStatistic> = self
            .sections
            .into_iter()
            .map(|(section_type, acc)| {
                let issues = acc
                    .issues
                    .into_iter()
                    .map(|(key, issue)| (key, issue.finish()))
                    .collect();
                (
                    section_type,
                    SectionStatistic {
                        name: acc.name,
                        is_primary: acc.is_primary,
                        total_count: acc.total_count,
                        issues,
                        domains: acc.domains.into_iter().collect(),
                        pages: acc.pages.into_iter().collect(),
                    },
                )
            })
            .collect();

        let sections_by_domain: BTreeMap<String, BTreeMap<String, DomainSectionStatistic>> = self
            .by_domain
            .into_iter()
            .map(|(domain, sections)| {
                let sections = sections
                    .into_iter()
                    .map(|(section_type, acc)| {
                        (
                            section_type,
                            DomainSectionStatistic {
                                name: acc.name,
                                is_primary: acc.is_primary,
                                count: acc.count,
                                issues: acc.issues.into_iter().collect(),
                                pages: acc.pages.into_iter().collect(),
                            },
                        )
                    })
                    .collect();
                (domain, sections)
            })
            .collect();

        let total_issues = section_statistics.values().map(|s| s.total_count).sum();
        let unique_issues = section_statistics.values().map(|s| s.issues.len()).sum();
        let domain_unique_issues = sections_by_domain
            .iter()
            .map(|(domain, sections)| {
                (
                    domain.clone(),
                    sections.values().map(|s| s.issues.len()).sum(),
                )
            })
            .collect();

        SectionAggregation {
            section_statistics,
            sections_by_domain,
            total_issues,
            unique_issues,
            domain_unique_issues,
            has_section_data: true,
        }
    }
}
