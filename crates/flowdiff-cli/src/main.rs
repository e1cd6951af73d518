//! FlowDiff CLI
//!
//! Command-line entry point of the FlowDiff pull-request gate

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use flowdiff_core::logging_facility::{self, Profile};

mod commands;
mod github;

#[derive(Debug, Parser)]
#[command(name = "flowdiff")]
#[command(about = "FlowDiff - checkstyle and change reports for versioned flows", long_about = None)]
struct Cli {
    /// Logging profile: dev, prod (JSON) or test
    #[arg(long, global = true, env = "FLOWDIFF_LOG_PROFILE", default_value = "dev")]
    log_profile: Profile,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Evaluate changed flows and publish the report
    Diff(commands::diff::DiffArgs),
    /// List the checkstyle rule catalog or validate a rules document
    Rules(commands::rules::RulesArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging_facility::init(cli.log_profile);

    let result = match cli.command {
        Commands::Diff(args) => commands::diff::execute(args),
        Commands::Rules(args) => commands::rules::execute(args),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
