use super::aggregate::{apply_formatting, resolve_format, with_output};
use crate::aggregation::{IssueAggregator, TestRequest};
use crate::config::A11ymapConfig;
use crate::io::{create_writer, OutputFormat};
use crate::report::{ReportMetadata, SummaryReport};
use crate::store::{FieldPath, MemoryStore};
use anyhow::Result;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct SummaryConfig {
    pub input: PathBuf,
    pub tests: Vec<String>,
    pub format: Option<OutputFormat>,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub plain: bool,
}

pub fn handle_summary(config: SummaryConfig) -> Result<()> {
    let settings = crate::config::load_config(config.config.as_deref())?;
    let store = MemoryStore::from_path(&config.input)?;

    let tests = select_tests(&config.tests, &settings, &store);
    if tests.is_empty() {
        warn!(input = %config.input.display(), "No test categories found in export");
    }
    info!(tests = tests.len(), "Summarising test categories");

    let requests: Vec<TestRequest> = tests.iter().map(|t| settings.request_for(t)).collect();
    let summaries =
        IssueAggregator::new(settings.field_prefix()).aggregate_many(&store, &requests)?;
    let report = SummaryReport::new(
        ReportMetadata::new(config.input.display().to_string()),
        summaries,
    );

    let format = resolve_format(config.format, &settings);
    apply_formatting(config.plain, config.output.as_deref(), &settings);
    with_output(config.output.as_deref(), |out| {
        create_writer(format, out).write_summary(&report)
    })
}

/// Explicit `--test` flags, else configured tests, else everything present.
fn select_tests(explicit: &[String], settings: &A11ymapConfig, store: &MemoryStore) -> Vec<String> {
    if !explicit.is_empty() {
        return explicit.to_vec();
    }
    let configured = settings.configured_tests();
    if !configured.is_empty() {
        return configured;
    }
    store.test_names(&FieldPath::parse(settings.field_prefix()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use serde_json::json;

    fn store() -> MemoryStore {
        MemoryStore::new(vec![json!({
            "url": "http://a.com/",
            "results": {"accessibility": {"tests": {
                "images": {"images": {"details": {"violations": []}}},
                "forms": {"forms": {"details": {"violations": []}}}
            }}}
        })])
    }

    #[test]
    fn test_select_tests_prefers_explicit() {
        let selected = select_tests(&["links".into()], &A11ymapConfig::default(), &store());
        assert_eq!(selected, vec!["links"]);
    }

    #[test]
    fn test_select_tests_uses_configured() {
        let settings = parse_config("[tests.headings]\n").unwrap();
        assert_eq!(select_tests(&[], &settings, &store()), vec!["headings"]);
    }

    #[test]
    fn test_select_tests_discovers_from_store() {
        let selected = select_tests(&[], &A11ymapConfig::default(), &store());
        assert_eq!(selected, vec!["forms", "images"]);
    }
}
