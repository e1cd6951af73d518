//! Rules command
//!
//! Usage: flowdiff rules [--check <FILE>]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use flowdiff_core::RuleId;

#[derive(Debug, Args)]
pub struct RulesArgs {
    /// Rules document to validate
    #[arg(long)]
    pub check: Option<PathBuf>,
}

/// Execute rules command
pub fn execute(args: RulesArgs) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let Some(path) = args.check else {
        for id in RuleId::ALL {
            println!("{}", id);
        }
        return Ok(ExitCode::SUCCESS);
    };

    let config = flowdiff_store::rules::load_rules_config(&path)?;
    let unknown: Vec<&str> = config
        .include
        .iter()
        .flatten()
        .chain(config.exclude.iter().flatten())
        .map(String::as_str)
        .chain(config.rules.keys().map(String::as_str))
        .filter(|id| RuleId::from_id(id).is_none())
        .collect();

    if unknown.is_empty() {
        println!("✓ {} is a valid rules document", path.display());
        Ok(ExitCode::SUCCESS)
    } else {
        for id in unknown {
            eprintln!("Unknown checkstyle rule `{}`", id);
        }
        Ok(ExitCode::FAILURE)
    }
}
