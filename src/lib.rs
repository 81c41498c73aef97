// Export modules for library usage
pub mod aggregation;
pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;
pub mod formatting;
pub mod io;
pub mod observability;
pub mod report;
pub mod store;

// Re-export commonly used types
pub use crate::aggregation::{
    extract_domain, FlatAggregation, IssueAggregation, IssueAggregator, SectionAggregation,
    SectionStatistic, TestRequest, TestSummary,
};

pub use crate::config::{load_config, A11ymapConfig};

pub use crate::errors::{ConfigError, StoreError};

pub use crate::io::output::{create_writer, OutputFormat, OutputWriter};

pub use crate::report::{AggregationReport, ReportMetadata, SummaryReport};

pub use crate::store::{get_path, FieldPath, Filter, MemoryStore, Projection, ResultStore};
