use crate::aggregation::{IssueAggregation, RankedIssue, SectionAggregation};
use crate::report::{AggregationReport, SummaryReport};
use colored::*;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "markdown" | "md" => Some(Self::Markdown),
            "terminal" => Some(Self::Terminal),
            _ => None,
        }
    }
}

pub trait OutputWriter {
    fn write_aggregation(&mut self, report: &AggregationReport) -> anyhow::Result<()>;
    fn write_summary(&mut self, report: &SummaryReport) -> anyhow::Result<()>;
}

pub fn create_writer<'a, W: Write + 'a>(
    format: OutputFormat,
    writer: W,
) -> Box<dyn OutputWriter + 'a> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(writer)),
        OutputFormat::Markdown => Box::new(MarkdownWriter::new(writer)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(writer)),
    }
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_aggregation(&mut self, report: &AggregationReport) -> anyhow::Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, report)?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_summary(&mut self, report: &SummaryReport) -> anyhow::Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, report)?;
        writeln!(self.writer)?;
        Ok(())
    }
}

pub struct MarkdownWriter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for MarkdownWriter<W> {
    fn write_aggregation(&mut self, report: &AggregationReport) -> anyhow::Result<()> {
        self.write_header(&format!("Accessibility Issues: {}", report.test_name), report)?;
        self.write_aggregation_summary(report)?;
        if let IssueAggregation::Sectioned(sectioned) = &report.aggregation {
            self.write_sections(sectioned)?;
        }
        self.write_domains(&report.aggregation)?;
        self.write_top_issues(&report.top_issues)?;
        Ok(())
    }

    fn write_summary(&mut self, report: &SummaryReport) -> anyhow::Result<()> {
        writeln!(self.writer, "# Accessibility Test Summary")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "Generated: {}",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(self.writer, "Source: {}", report.metadata.source)?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "| Test | Issue Key | Section-Aware | Occurrences | Unique Issues | Domains |"
        )?;
        writeln!(
            self.writer,
            "|------|-----------|---------------|-------------|---------------|---------|"
        )?;
        for test in &report.tests {
            writeln!(
                self.writer,
                "| {} | {} | {} | {} | {} | {} |",
                escape_cell(&test.test_name),
                escape_cell(&test.issue_identifier),
                yes_no(test.has_section_data),
                test.total_issues,
                test.unique_issues,
                test.domains
            )?;
        }
        writeln!(
            self.writer,
            "| **Total** | | | **{}** | **{}** | |",
            report.total_issues, report.unique_issues
        )?;
        Ok(())
    }
}

impl<W: Write> MarkdownWriter<W> {
    fn write_header(&mut self, title: &str, report: &AggregationReport) -> anyhow::Result<()> {
        writeln!(self.writer, "# {title}")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "Generated: {}",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(self.writer, "Source: {}", report.metadata.source)?;
        writeln!(self.writer, "Version: {}", report.metadata.a11ymap_version)?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_aggregation_summary(&mut self, report: &AggregationReport) -> anyhow::Result<()> {
        let aggregation = &report.aggregation;
        writeln!(self.writer, "## Summary")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Metric | Value |")?;
        writeln!(self.writer, "|--------|-------|")?;
        writeln!(
            self.writer,
            "| Issue key | `{}` |",
            escape_cell(&report.issue_identifier)
        )?;
        writeln!(
            self.writer,
            "| Section-aware | {} |",
            yes_no(aggregation.has_section_data())
        )?;
        writeln!(self.writer, "| Occurrences | {} |", aggregation.total_issues())?;
        writeln!(self.writer, "| Unique issues | {} |", aggregation.unique_issues())?;
        writeln!(
            self.writer,
            "| Domains affected | {} |",
            aggregation.domain_unique_issues().len()
        )?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_sections(&mut self, sectioned: &SectionAggregation) -> anyhow::Result<()> {
        if sectioned.section_statistics.is_empty() {
            return Ok(());
        }

        writeln!(self.writer, "## Issues by Page Section")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "| Section | Type | Primary | Occurrences | Unique Issues | Domains | Pages |"
        )?;
        writeln!(
            self.writer,
            "|---------|------|---------|-------------|---------------|---------|-------|"
        )?;
        for (section_type, section) in &sectioned.section_statistics {
            writeln!(
                self.writer,
                "| {} | `{}` | {} | {} | {} | {} | {} |",
                escape_cell(&section.name),
                escape_cell(section_type),
                yes_no(section.is_primary),
                section.total_count,
                section.unique_issues(),
                section.domains.len(),
                section.pages.len()
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_domains(&mut self, aggregation: &IssueAggregation) -> anyhow::Result<()> {
        let domains = aggregation.domain_unique_issues();
        if domains.is_empty() {
            return Ok(());
        }

        writeln!(self.writer, "## Issues by Domain")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Domain | Unique Issues |")?;
        writeln!(self.writer, "|--------|---------------|")?;
        for (domain, unique) in sorted_domains(aggregation) {
            writeln!(self.writer, "| {} | {} |", escape_cell(domain), unique)?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_top_issues(&mut self, issues: &[RankedIssue]) -> anyhow::Result<()> {
        if issues.is_empty() {
            return Ok(());
        }

        writeln!(self.writer, "## Most Frequent Issues")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "| # | Issue | Section | Occurrences | Domains | Pages |"
        )?;
        writeln!(
            self.writer,
            "|---|-------|---------|-------------|---------|-------|"
        )?;
        for (i, issue) in issues.iter().enumerate() {
            writeln!(
                self.writer,
                "| {} | `{}` | {} | {} | {} | {} |",
                i + 1,
                escape_cell(&issue.issue_key),
                escape_cell(issue.section_type.as_deref().unwrap_or("-")),
                issue.count,
                issue.domains,
                issue.pages
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }
}

pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_aggregation(&mut self, report: &AggregationReport) -> anyhow::Result<()> {
        let aggregation = &report.aggregation;
        let title = format!("Accessibility Issues: {}", report.test_name);
        writeln!(self.writer, "{}", title.bold().blue())?;
        writeln!(self.writer, "{}", "=".repeat(title.len()).blue())?;
        writeln!(self.writer)?;

        writeln!(self.writer, "{}", "Summary:".bold())?;
        writeln!(self.writer, "  Issue key: {}", report.issue_identifier)?;
        writeln!(
            self.writer,
            "  Section-aware: {}",
            yes_no(aggregation.has_section_data())
        )?;
        writeln!(
            self.writer,
            "  Occurrences: {}",
            count_colored(aggregation.total_issues())
        )?;
        writeln!(
            self.writer,
            "  Unique issues: {}",
            count_colored(aggregation.unique_issues())
        )?;
        writeln!(
            self.writer,
            "  Domains affected: {}",
            aggregation.domain_unique_issues().len()
        )?;
        writeln!(self.writer)?;

        if let IssueAggregation::Sectioned(sectioned) = aggregation {
            self.write_sections(sectioned)?;
        }
        self.write_domains(aggregation)?;
        self.write_top_issues(&report.top_issues)?;

        if aggregation.total_issues() == 0 {
            writeln!(self.writer, "{}", "No issues recorded for this test.".green())?;
        }
        Ok(())
    }

    fn write_summary(&mut self, report: &SummaryReport) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", "Accessibility Test Summary".bold().blue())?;
        writeln!(self.writer, "{}", "==========================".blue())?;
        writeln!(self.writer)?;

        let width = report
            .tests
            .iter()
            .map(|t| t.test_name.len())
            .max()
            .unwrap_or(0)
            .max("Test".len());

        writeln!(
            self.writer,
            "  {:<width$}  {:>11}  {:>6}  {:>7}  {}",
            "Test".bold(),
            "Occurrences".bold(),
            "Unique".bold(),
            "Domains".bold(),
            "Sections".bold(),
        )?;
        for test in &report.tests {
            writeln!(
                self.writer,
                "  {:<width$}  {:>11}  {:>6}  {:>7}  {}",
                test.test_name,
                test.total_issues,
                test.unique_issues,
                test.domains,
                yes_no(test.has_section_data),
            )?;
        }
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "  Total: {} occurrences, {} unique issues",
            count_colored(report.total_issues),
            count_colored(report.unique_issues)
        )?;
        Ok(())
    }
}

impl<W: Write> TerminalWriter<W> {
    fn write_sections(&mut self, sectioned: &SectionAggregation) -> anyhow::Result<()> {
        if sectioned.section_statistics.is_empty() {
            return Ok(());
        }

        writeln!(self.writer, "{}", "Issues by page section:".bold())?;
        for (section_type, section) in &sectioned.section_statistics {
            let marker = if section.is_primary { " (primary)" } else { "" };
            writeln!(
                self.writer,
                "  {} [{}]{} - {} occurrences, {} unique, {} pages",
                section.name.yellow(),
                section_type,
                marker,
                section.total_count,
                section.unique_issues(),
                section.pages.len()
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_domains(&mut self, aggregation: &IssueAggregation) -> anyhow::Result<()> {
        if aggregation.domain_unique_issues().is_empty() {
            return Ok(());
        }

        writeln!(self.writer, "{}", "Unique issues by domain:".bold())?;
        for (domain, unique) in sorted_domains(aggregation) {
            writeln!(self.writer, "  {}: {}", domain, count_colored(unique))?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_top_issues(&mut self, issues: &[RankedIssue]) -> anyhow::Result<()> {
        if issues.is_empty() {
            return Ok(());
        }

        writeln!(
            self.writer,
            "{}",
            format!("Most frequent issues (top {}):", issues.len()).bold()
        )?;
        for (i, issue) in issues.iter().enumerate() {
            let section = issue
                .section_type
                .as_deref()
                .map(|s| format!(" in {s}"))
                .unwrap_or_default();
            writeln!(
                self.writer,
                "  {}. {}{} - {} occurrences across {} pages",
                i + 1,
                issue.issue_key.yellow(),
                section,
                issue.count.to_string().red(),
                issue.pages
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }
}

/// Domains ordered by unique issue count, highest first.
fn sorted_domains(aggregation: &IssueAggregation) -> Vec<(&str, usize)> {
    let mut domains: Vec<(&str, usize)> = aggregation
        .domain_unique_issues()
        .iter()
        .map(|(domain, unique)| (domain.as_str(), *unique))
        .collect();
    domains.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    domains
}

fn count_colored(count: usize) -> ColoredString {
    if count == 0 {
        count.to_string().green()
    } else {
        count.to_string().yellow()
    }
}

/// Keep a value inside its Markdown table cell.
fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|")
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::{IssueAggregator, TestSummary};
    use crate::report::ReportMetadata;
    use crate::store::MemoryStore;
    use serde_json::{json, Value};

    fn sectioned_report() -> AggregationReport {
        let store = MemoryStore::new(vec![
            json!({"url": "http://a.com/1", "results": {"accessibility": {"tests": {"links": {"links": {"details": {
                "violations": [
                    {"element": "a", "section": {"section_type": "header", "section_name": "Header", "primary": true}},
                    {"element": "a", "section": {"section_type": "footer", "section_name": "Footer"}}
                ],
                "section_statistics": {"header": 1}
            }}}}}}}),
            json!({"url": "http://b.com/1", "results": {"accessibility": {"tests": {"links": {"links": {"details": {
                "violations": [
                    {"element": "a", "section": {"section_type": "header", "section_name": "Header", "primary": true}}
                ]
            }}}}}}}),
        ]);
        let aggregation = IssueAggregator::default()
            .aggregate_by_section(&store, "links", "element", &[])
            .unwrap();
        AggregationReport::new(ReportMetadata::new("fixture"), "links", "element", aggregation, 5)
    }

    fn render(format: OutputFormat, report: &AggregationReport) -> String {
        colored::control::set_override(false);
        let mut buffer = Vec::new();
        create_writer(format, &mut buffer)
            .write_aggregation(report)
            .unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!(OutputFormat::parse("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("md"), Some(OutputFormat::Markdown));
        assert_eq!(OutputFormat::parse("html"), None);
    }

    #[test]
    fn test_json_writer_emits_aggregation_fields() {
        let output = render(OutputFormat::Json, &sectioned_report());
        let json: Value = serde_json::from_str(&output).unwrap();

        assert_eq!(json["test_name"], "links");
        assert_eq!(json["aggregation"]["has_section_data"], true);
        assert_eq!(json["aggregation"]["total_issues"], 3);
        assert_eq!(json["aggregation"]["unique_issues"], 2);
        assert_eq!(
            json["aggregation"]["section_statistics"]["header"]["issues"]["a"]["count"],
            2
        );
        assert!(json["metadata"]["generated_at"].is_string());
    }

    #[test]
    fn test_markdown_writer_lists_sections_and_domains() {
        let output = render(OutputFormat::Markdown, &sectioned_report());

        assert!(output.contains("# Accessibility Issues: links"));
        assert!(output.contains("## Issues by Page Section"));
        assert!(output.contains("| Header | `header` | yes | 2 | 1 | 2 | 2 |"));
        assert!(output.contains("| a.com | 2 |"));
        assert!(output.contains("## Most Frequent Issues"));
    }

    #[test]
    fn test_terminal_writer_plain_output() {
        let output = render(OutputFormat::Terminal, &sectioned_report());

        assert!(output.contains("Accessibility Issues: links"));
        assert!(output.contains("Header [header] (primary) - 2 occurrences, 1 unique, 2 pages"));
        assert!(output.contains("a.com: 2"));
        assert!(!output.contains("No issues recorded"));
    }

    #[test]
    fn test_summary_writers() {
        let report = SummaryReport::new(
            ReportMetadata::new("fixture"),
            vec![TestSummary {
                test_name: "images".into(),
                issue_identifier: "element".into(),
                has_section_data: true,
                total_issues: 4,
                unique_issues: 2,
                domains: 1,
            }],
        );

        colored::control::set_override(false);
        let mut markdown = Vec::new();
        MarkdownWriter::new(&mut markdown).write_summary(&report).unwrap();
        let markdown = String::from_utf8(markdown).unwrap();
        assert!(markdown.contains("| images | element | yes | 4 | 2 | 1 |"));

        let mut terminal = Vec::new();
        TerminalWriter::new(&mut terminal).write_summary(&report).unwrap();
        let terminal = String::from_utf8(terminal).unwrap();
        assert!(terminal.contains("Total: 4 occurrences, 2 unique issues"));
    }

    #[test]
    fn test_markdown_escapes_pipes_in_cells() {
        let store = MemoryStore::new(vec![json!({
            "url": "http://a.com/",
            "results": {"accessibility": {"tests": {"links": {"links": {"details": {
                "violations": [
                    {"element": "a|b", "section": {"section_type": "nav", "section_name": "Top | Nav"}}
                ],
                "section_statistics": {}
            }}}}}}
        })]);
        let aggregation = IssueAggregator::default()
            .aggregate_by_section(&store, "links", "element", &[])
            .unwrap();
        let report =
            AggregationReport::new(ReportMetadata::new("fixture"), "links", "element", aggregation, 5);

        let output = render(OutputFormat::Markdown, &report);
        assert!(output.contains("| Top \\| Nav | `nav` | no | 1 | 1 | 1 | 1 |"));
        assert!(output.contains("| 1 | `a\\|b` | nav | 1 | 1 | 1 |"));
    }

    #[test]
    fn test_escape_cell() {
        assert_eq!(escape_cell("plain"), "plain");
        assert_eq!(escape_cell("a|b|c"), "a\\|b\\|c");
    }
}

