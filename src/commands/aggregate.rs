use crate::aggregation::{IssueAggregator, TestRequest};
use crate::config::A11ymapConfig;
use crate::formatting::FormattingConfig;
use crate::io::{self, create_writer, OutputFormat};
use crate::report::{AggregationReport, ReportMetadata};
use crate::store::MemoryStore;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone)]
pub struct AggregateConfig {
    pub input: PathBuf,
    pub test: String,
    pub issue_identifier: Option<String>,
    pub flat: bool,
    pub extra_fields: Vec<String>,
    pub top: Option<usize>,
    pub format: Option<OutputFormat>,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub plain: bool,
}

pub fn handle_aggregate(config: AggregateConfig) -> Result<()> {
    let settings = crate::config::load_config(config.config.as_deref())?;
    let store = MemoryStore::from_path(&config.input)?;
    info!(records = store.len(), input = %config.input.display(), "Loaded result export");

    let request = build_request(&config, &settings);
    let aggregator = IssueAggregator::new(settings.field_prefix());
    let aggregation = aggregator
        .aggregate(&store, &request)
        .with_context(|| format!("Failed to aggregate test '{}'", request.test_name))?;

    let report = AggregationReport::new(
        ReportMetadata::new(config.input.display().to_string()),
        &request.test_name,
        &request.issue_identifier,
        aggregation,
        config.top.unwrap_or_else(|| settings.top_issues()),
    );

    let format = resolve_format(config.format, &settings);
    apply_formatting(config.plain, config.output.as_deref(), &settings);
    with_output(config.output.as_deref(), |out| {
        create_writer(format, out).write_aggregation(&report)
    })
}

/// Command-line flags win over per-test config, which wins over defaults.
fn build_request(config: &AggregateConfig, settings: &A11ymapConfig) -> TestRequest {
    let mut request = settings.request_for(&config.test);
    if let Some(issue_identifier) = &config.issue_identifier {
        request.issue_identifier = issue_identifier.clone();
    }
    if config.flat {
        request.section_aware = false;
    }
    request.extra_fields.extend(config.extra_fields.iter().cloned());
    request
}

pub(crate) fn resolve_format(cli: Option<OutputFormat>, settings: &A11ymapConfig) -> OutputFormat {
    cli.or_else(|| settings.default_format().and_then(OutputFormat::parse))
        .unwrap_or(OutputFormat::Terminal)
}

/// Colors only make sense on a terminal: file output is always plain.
pub(crate) fn apply_formatting(plain: bool, output: Option<&Path>, settings: &A11ymapConfig) {
    let formatting = if plain || output.is_some() {
        FormattingConfig::plain()
    } else {
        FormattingConfig::from_env(settings.use_color())
    };
    formatting.apply();
}

pub(crate) fn with_output<F>(output: Option<&Path>, write: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    match output {
        Some(path) => {
            let mut file = io::create_output_file(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            write(&mut file)?;
            file.flush()?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            write(&mut lock)?;
            lock.flush()?;
        }
    }
    Ok(())
}
