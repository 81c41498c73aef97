use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Occurrences of one issue key within one section type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueStatistic {
    pub count: usize,
    pub domains: Vec<String>,
    pub pages: Vec<String>,
    /// First violation seen for this key
    pub sample: Value,
}

/// All violations sharing a `section_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionStatistic {
    pub name: String,
    pub is_primary: bool,
    pub total_count: usize,
    pub issues: BTreeMap<String, IssueStatistic>,
    pub domains: Vec<String>,
    pub pages: Vec<String>,
}

impl SectionStatistic {
    /// Distinct issue keys seen in this section.
    pub fn unique_issues(&self) -> usize {
        self.issues.len()
    }
}

/// Violations of one section type on one domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainSectionStatistic {
    pub name: String,
    pub is_primary: bool,
    pub count: usize,
    pub issues: Vec<String>,
    pub pages: Vec<String>,
}

/// Section-aware aggregation of one test category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionAggregation {
    pub section_statistics: BTreeMap<String, SectionStatistic>,
    /// domain -> section type -> statistic
    pub sections_by_domain: BTreeMap<String, BTreeMap<String, DomainSectionStatistic>>,
    pub total_issues: usize,
    pub unique_issues: usize,
    pub domain_unique_issues: BTreeMap<String, usize>,
    pub has_section_data: bool,
}

/// Occurrences of one issue key when no section data is available.
pub type FlatIssueStatistic = IssueStatistic;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainIssueStatistic {
    pub count: usize,
    pub pages: Vec<String>,
}

/// Flat (non-section-aware) aggregation of one test category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatAggregation {
    pub issue_statistics: BTreeMap<String, FlatIssueStatistic>,
    /// domain -> issue key -> statistic
    pub issues_by_domain: BTreeMap<String, BTreeMap<String, DomainIssueStatistic>>,
    pub total_issues: usize,
    pub unique_issues: usize,
    pub domain_unique_issues: BTreeMap<String, usize>,
    pub has_section_data: bool,
}

/// Result of aggregating one test category.
///
/// Serializes as the inner aggregation; the `has_section_data` field tells
/// the two shapes apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IssueAggregation {
    Sectioned(SectionAggregation),
    Flat(FlatAggregation),
}

/// One issue key ranked by occurrence count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedIssue {
    pub issue_key: String,
    /// Section type, `None` for flat aggregations
    pub section_type: Option<String>,
    pub count: usize,
    pub domains: usize,
    pub pages: usize,
}

impl IssueAggregation {
    pub fn has_section_data(&self) -> bool {
        match self {
            IssueAggregation::Sectioned(s) => s.has_section_data,
            IssueAggregation::Flat(f) => f.has_section_data,
        }
    }

    pub fn total_issues(&self) -> usize {
        match self {
            IssueAggregation::Sectioned(s) => s.total_issues,
            IssueAggregation::Flat(f) => f.total_issues,
        }
    }

    pub fn unique_issues(&self) -> usize {
        match self {
            IssueAggregation::Sectioned(s) => s.unique_issues,
            IssueAggregation::Flat(f) => f.unique_issues,
        }
    }

    pub fn domain_unique_issues(&self) -> &BTreeMap<String, usize> {
        match self {
            IssueAggregation::Sectioned(s) => &s.domain_unique_issues,
            IssueAggregation::Flat(f) => &f.domain_unique_issues,
        }
    }

    pub fn as_sectioned(&self) -> Option<&SectionAggregation> {
        match self {
            IssueAggregation::Sectioned(s) => Some(s),
            IssueAggregation::Flat(_) => None,
        }
    }

    pub fn as_flat(&self) -> Option<&FlatAggregation> {
        match self {
            IssueAggregation::Flat(f) => Some(f),
            IssueAggregation::Sectioned(_) => None,
        }
    }

    /// The `limit` most frequent issues, highest count first. Ties are broken
    /// by section type, then issue key.
    pub fn top_issues(&self, limit: usize) -> Vec<RankedIssue> {
        let mut ranked: Vec<RankedIssue> = match self {
            IssueAggregation::Sectioned(s) => s
                .section_statistics
                .iter()
                .flat_map(|(section_type, section)| {
                    section.issues.iter().map(move |(key, issue)| RankedIssue {
                        issue_key: key.clone(),
                        section_type: Some(section_type.clone()),
                        count: issue.count,
                        domains: issue.domains.len(),
                        pages: issue.pages.len(),
                    })
                })
                .collect(),
            IssueAggregation::Flat(f) => f
                .issue_statistics
                .iter()
                .map(|(key, issue)| RankedIssue {
                    issue_key: key.clone(),
                    section_type: None,
                    count: issue.count,
                    domains: issue.domains.len(),
                    pages: issue.pages.len(),
                })
                .collect(),
        };

        ranked.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.section_type.cmp(&b.section_type))
                .then_with(|| a.issue_key.cmp(&b.issue_key))
        });
        ranked.truncate(limit);
        ranked
    }
}

impl From<SectionAggregation> for IssueAggregation {
    fn from(value: SectionAggregation) -> Self {
        IssueAggregation::Sectioned(value)
    }
}

impl From<FlatAggregation> for IssueAggregation {
    fn from(value: FlatAggregation) -> Self {
        IssueAggregation::Flat(value)
    }
}

/// Headline numbers for one test category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestSummary {
    pub test_name: String,
    pub issue_identifier: String,
    pub has_section_data: bool,
    pub total_issues: usize,
    pub unique_issues: usize,
    pub domains: usize,
}

impl TestSummary {
    pub fn from_aggregation(
        test_name: &str,
        issue_identifier: &str,
        aggregation: &IssueAggregation,
    ) -> Self {
        Self {
            test_name: test_name.to_string(),
            issue_identifier: issue_identifier.to_string(),
            has_section_data: aggregation.has_section_data(),
            total_issues: aggregation.total_issues(),
            unique_issues: aggregation.unique_issues(),
            domains: aggregation.domain_unique_issues().len(),
        }
    }
}
