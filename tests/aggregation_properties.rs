//! Property-based tests for issue aggregation
//!
//! These tests verify invariants that should hold for all inputs:
//! - Unique issues never exceed total occurrences
//! - Totals equal the number of object violations fed in
//! - Per-domain unique counts never exceed that domain's occurrences
//! - Domain extraction ignores the scheme

mod common;

use a11ymap::{extract_domain, IssueAggregator};
use common::{store, RecordBuilder};
use proptest::prelude::*;
use serde_json::{json, Value};
use std::collections::{BTreeMap, BTreeSet};

const SECTION_TYPES: &[&str] = &["header", "footer", "navigation", "main"];
const ELEMENTS: &[&str] = &["a", "button", "img", "input", "h2"];
const DOMAINS: &[&str] = &["a.com", "b.org", "c.net"];

/// A violation drawn from a small vocabulary so keys collide often.
fn violation_strategy() -> impl Strategy<Value = Value> {
    (
        prop::option::of(prop::sample::select(SECTION_TYPES)),
        prop::option::of(prop::sample::select(ELEMENTS)),
    )
        .prop_map(|(section_type, element)| {
            let mut violation = serde_json::Map::new();
            if let Some(element) = element {
                violation.insert("element".into(), json!(element));
            }
            if let Some(section_type) = section_type {
                violation.insert(
                    "section".into(),
                    json!({"section_type": section_type, "section_name": section_type}),
                );
            }
            Value::Object(violation)
        })
}

/// (domain, page, violations) per record; entries may include non-objects.
fn pages_strategy() -> impl Strategy<Value = Vec<(&'static str, u8, Vec<Value>)>> {
    prop::collection::vec(
        (
            prop::sample::select(DOMAINS),
            0u8..4,
            prop::collection::vec(
                prop_oneof![
                    4 => violation_strategy(),
                    1 => Just(json!("stray string")),
                ],
                0..8,
            ),
        ),
        0..10,
    )
}

fn build_records(pages: &[(&str, u8, Vec<Value>)], with_sections: bool) -> Vec<Value> {
    pages
        .iter()
        .map(|(domain, page, violations)| {
            let url = format!("https://{domain}/page{page}");
            let builder = RecordBuilder::new(&url);
            let builder = if with_sections {
                builder.with_section_violations("t", Value::Array(violations.clone()))
            } else {
                builder.with_violations("t", Value::Array(violations.clone()))
            };
            builder.build()
        })
        .collect()
}

fn object_count(pages: &[(&str, u8, Vec<Value>)]) -> usize {
    pages
        .iter()
        .flat_map(|(_, _, v)| v.iter())
        .filter(|v| v.is_object())
        .count()
}

proptest! {
    /// Property: deduplication can only shrink counts
    #[test]
    fn prop_unique_never_exceeds_total(pages in pages_strategy(), with_sections in any::<bool>()) {
        let store = store(build_records(&pages, with_sections));
        let result = IssueAggregator::default()
            .aggregate_by_section(&store, "t", "element", &[])
            .unwrap();

        prop_assert!(result.unique_issues() <= result.total_issues());
        prop_assert_eq!(result.total_issues(), object_count(&pages));
        prop_assert_eq!(result.has_section_data(), with_sections && !pages.is_empty());
    }

    /// Property: unique == total exactly when no (section, key) pair repeats
    #[test]
    fn prop_equality_iff_pairs_are_distinct(pages in pages_strategy()) {
        let store = store(build_records(&pages, true));
        let result = IssueAggregator::default()
            .aggregate_by_section(&store, "t", "element", &[])
            .unwrap();

        let mut pair_counts: BTreeMap<(String, String), usize> = BTreeMap::new();
        for violation in pages.iter().flat_map(|(_, _, v)| v.iter()).filter(|v| v.is_object()) {
            let section = violation["section"]["section_type"].as_str().unwrap_or("unknown");
            let key = violation["element"].as_str().unwrap_or("unknown");
            *pair_counts.entry((section.to_string(), key.to_string())).or_insert(0) += 1;
        }
        let all_distinct = pair_counts.values().all(|&c| c == 1);

        prop_assert_eq!(result.unique_issues(), pair_counts.len());
        prop_assert_eq!(result.unique_issues() == result.total_issues(), all_distinct);
    }

    /// Property: per-domain unique issues never exceed that domain's occurrences
    #[test]
    fn prop_domain_unique_bounded_by_occurrences(pages in pages_strategy()) {
        let store = store(build_records(&pages, true));
        let result = IssueAggregator::default()
            .aggregate_by_section(&store, "t", "element", &[])
            .unwrap();

        if let Some(sectioned) = result.as_sectioned() {
            for (domain, unique) in &sectioned.domain_unique_issues {
                let occurrences: usize = sectioned.sections_by_domain[domain]
                    .values()
                    .map(|s| s.count)
                    .sum();
                prop_assert!(*unique <= occurrences);
            }
            let section_total: usize = sectioned
                .section_statistics
                .values()
                .map(|s| s.issues.values().map(|i| i.count).sum::<usize>())
                .sum();
            prop_assert_eq!(section_total, sectioned.total_issues);
        }
    }

    /// Property: flat aggregation sees every domain that had a violation
    #[test]
    fn prop_flat_domains_match_input(pages in pages_strategy()) {
        let store = store(build_records(&pages, false));
        let result = IssueAggregator::default()
            .aggregate_flat(&store, "t", "element", &[])
            .unwrap();

        let expected: BTreeSet<&str> = pages
            .iter()
            .filter(|(_, _, v)| v.iter().any(Value::is_object))
            .map(|(domain, _, _)| *domain)
            .collect();
        let actual: BTreeSet<&str> = result.domain_unique_issues.keys().map(String::as_str).collect();
        prop_assert_eq!(actual, expected);
    }

    /// Property: domain extraction is scheme-agnostic and idempotent
    #[test]
    fn prop_domain_extraction_scheme_agnostic(
        host in "[a-z]{1,10}\\.(com|org|net)",
        path in "(/[a-z0-9]{0,8}){0,3}"
    ) {
        let http = format!("http://{host}{path}");
        let https = format!("https://{host}{path}");

        prop_assert_eq!(extract_domain(&http), host.as_str());
        prop_assert_eq!(extract_domain(&https), host.as_str());
        prop_assert_eq!(extract_domain(extract_domain(&https)), host.as_str());
    }
}
