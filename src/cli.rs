use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "a11ymap")]
#[command(about = "Section-aware aggregation of accessibility test results", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Aggregate the violations of one test category
    Aggregate {
        /// Result export (JSON array or JSON Lines)
        input: PathBuf,

        /// Test category to aggregate
        #[arg(short, long)]
        test: String,

        /// Violation field used as the issue key (default from config, else "element")
        #[arg(short, long)]
        issue_identifier: Option<String>,

        /// Skip section grouping even when section data exists
        #[arg(long)]
        flat: bool,

        /// Additional dotted fields to project from each record
        #[arg(long = "extra-field")]
        extra_fields: Vec<String>,

        /// Number of issues in the "most frequent" list
        #[arg(long)]
        top: Option<usize>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Summarise several test categories at once
    Summary {
        /// Result export (JSON array or JSON Lines)
        input: PathBuf,

        /// Tests to include (default: configured tests, else every test found)
        #[arg(short, long = "test")]
        tests: Vec<String>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// List the test categories present in an export
    Tests {
        /// Result export (JSON array or JSON Lines)
        input: PathBuf,

        /// Configuration file (default: search for .a11ymap.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Initialize a11ymap configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(clap::Args, Debug, Clone)]
pub struct CommonArgs {
    /// Output format (default from config, else terminal)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Configuration file (default: search for .a11ymap.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Disable colored output (A11YMAP_PLAIN accepts 1/0, yes/no, true/false)
    #[arg(long, env = "A11YMAP_PLAIN", value_parser = clap::builder::FalseyValueParser::new())]
    pub plain: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

impl From<OutputFormat> for crate::io::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => crate::io::OutputFormat::Json,
            OutputFormat::Markdown => crate::io::OutputFormat::Markdown,
            OutputFormat::Terminal => crate::io::OutputFormat::Terminal,
        }
    }
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
