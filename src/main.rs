use a11ymap::cli::{CommonArgs, Commands};
use a11ymap::commands::aggregate::AggregateConfig;
use a11ymap::commands::summary::SummaryConfig;
use anyhow::Result;

// Main orchestrator function
fn main() -> Result<()> {
    let cli = a11ymap::cli::parse_args();
    a11ymap::observability::init_tracing(verbosity(&cli.command));

    match cli.command {
        Commands::Aggregate {
            input,
            test,
            issue_identifier,
            flat,
            extra_fields,
            top,
            common,
        } => a11ymap::commands::aggregate::handle_aggregate(AggregateConfig {
            input,
            test,
            issue_identifier,
            flat,
            extra_fields,
            top,
            format: common.format.map(Into::into),
            output: common.output,
            config: common.config,
            plain: common.plain,
        }),
        Commands::Summary {
            input,
            tests,
            common,
        } => a11ymap::commands::summary::handle_summary(SummaryConfig {
            input,
            tests,
            format: common.format.map(Into::into),
            output: common.output,
            config: common.config,
            plain: common.plain,
        }),
        Commands::Tests { input, config } => {
            a11ymap::commands::list_tests::handle_list_tests(&input, config.as_deref())
        }
        Commands::Init { force } => a11ymap::commands::init::init_config(force),
    }
}

// Pure function to pick the log verbosity for a command
fn verbosity(command: &Commands) -> u8 {
    match command {
        Commands::Aggregate {
            common: CommonArgs { verbose, .. },
            ..
        }
        | Commands::Summary {
            common: CommonArgs { verbose, .. },
            ..
        } => *verbose,
        Commands::Tests { .. } | Commands::Init { .. } => 0,
    }
}
