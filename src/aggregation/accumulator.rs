use super::types::IssueStatistic;
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Running tally for one issue key, shared by both aggregation modes.
#[derive(Debug)]
pub(crate) struct IssueAccumulator {
    count: usize,
    domains: BTreeSet<String>,
    pages: BTreeSet<String>,
    sample: Value,
}

impl IssueAccumulator {
    /// Start a tally; `first` is kept as the sample.
    pub(crate) fn new(first: &Map<String, Value>) -> Self {
        Self {
            count: 0,
            domains: BTreeSet::new(),
            pages: BTreeSet::new(),
            sample: Value::Object(first.clone()),
        }
    }

    pub(crate) fn record(&mut self, domain: &str, url: &str) {
        self.count += 1;
        self.domains.insert(domain.to_string());
        self.pages.insert(url.to_string());
    }

    pub(crate) fn finish(self) -> IssueStatistic {
        IssueStatistic {
            count: self.count,
            domains: self.domains.into_iter().collect(),
            pages: self.pages.into_iter().collect(),
            sample: self.sample,
        }
    }
}
