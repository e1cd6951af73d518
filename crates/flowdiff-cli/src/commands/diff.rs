//! Diff command
//!
//! Usage: flowdiff diff --before <PATHS> --after <PATHS> [--differences <PATHS>]
//!        [--checkstyle] [--checkstyle-rules <FILE>] [--checkstyle-fail]
//!
//! Path lists are comma-separated and paired by position. A previous-version
//! path that does not exist marks a new flow. A flow whose previous version
//! loads needs a difference document; without one it fails.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Args;
use flowdiff_core::{
    evaluate_batch, mismatch_report, pair_snapshot_lists, BatchReport, EvaluationOptions, ExError,
    FlowDiffError, FlowInput, RecordedComparator, Result,
};
use flowdiff_store::{differences, rules, snapshot};

use crate::github::{CommentClient, GitHubClient, DEFAULT_API_BASE};

/// At least one flow could not be evaluated, or the inputs did not line up
const EXIT_FAILURE: u8 = 1;
/// Blocking checkstyle violations with `--checkstyle-fail`
const EXIT_VIOLATIONS: u8 = 2;

#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Previous snapshot of each changed flow (comma-separated)
    #[arg(long)]
    pub before: String,

    /// New snapshot of each changed flow (comma-separated)
    #[arg(long)]
    pub after: String,

    /// Recorded difference document of each changed flow (comma-separated)
    #[arg(long)]
    pub differences: Option<String>,

    /// Run the checkstyle rules against the new snapshots
    #[arg(long)]
    pub checkstyle: bool,

    /// Checkstyle rules document (YAML)
    #[arg(long)]
    pub checkstyle_rules: Option<PathBuf>,

    /// Exit with status 2 when checkstyle finds violations
    #[arg(long)]
    pub checkstyle_fail: bool,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Repository as `owner/name`
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub github_repository: Option<String>,

    /// Pull request number
    #[arg(long, env = "GITHUB_ISSUE_NUMBER")]
    pub github_issue_number: Option<u64>,

    /// REST API root, for GitHub Enterprise
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_BASE)]
    pub github_api_url: String,
}

fn split_paths(list: &str) -> Vec<PathBuf> {
    list.split(',').map(str::trim).map(PathBuf::from).collect()
}

fn non_empty(path: &Path) -> Option<&Path> {
    (!path.as_os_str().is_empty()).then_some(path)
}

/// Execute diff command
pub fn execute(args: DiffArgs) -> std::result::Result<ExitCode, Box<dyn std::error::Error>> {
    let befores = split_paths(&args.before);
    let pairs = pair_snapshot_lists(befores, split_paths(&args.after)).and_then(|pairs| {
        let documents = match &args.differences {
            Some(list) => split_paths(list),
            None => vec![PathBuf::new(); pairs.len()],
        };
        let (befores, afters): (Vec<_>, Vec<_>) = pairs.into_iter().unzip();
        let paired_documents = pair_snapshot_lists(afters, documents)?;
        Ok(befores.into_iter().zip(paired_documents).collect::<Vec<_>>())
    });

    let flows = match pairs {
        Ok(flows) => flows,
        Err(err) => {
            tracing::error!(err_code = err.code(), message = %err, "input lists do not line up");
            // Not posted: the pull request keeps its last real report
            write_report(&args, &mismatch_report())?;
            return Ok(ExitCode::from(EXIT_FAILURE));
        }
    };

    let rules_config = if args.checkstyle {
        rules::load_rules_config_or_default(args.checkstyle_rules.as_deref())
    } else {
        None
    };
    let options = EvaluationOptions {
        checkstyle: args.checkstyle,
        rules: rules_config.as_ref(),
    };

    // Comparators outlive the inputs borrowing them
    let comparators: Vec<Result<RecordedComparator>> = flows
        .iter()
        .map(|(_, (_, document))| differences::load_comparator(non_empty(document)))
        .collect();

    let inputs = flows
        .iter()
        .zip(&comparators)
        .map(|((before, (after, document)), comparator)| {
            flow_input(before, after, document, comparator)
        })
        .collect();

    let report = evaluate_batch(inputs, &options);
    let text = report.text();
    write_report(&args, &text)?;
    post_if_configured(&args, &text);
    Ok(exit_code(&report, &args))
}

fn flow_input<'c>(
    before: &Path,
    after: &Path,
    document: &Path,
    comparator: &'c Result<RecordedComparator>,
) -> std::result::Result<FlowInput<'c>, (String, ExError)> {
    let source = after.display().to_string();
    let comparator = comparator
        .as_ref()
        .map_err(|e| (source.clone(), e.clone()))?;
    let after = snapshot::load_snapshot(after).map_err(|e| (source.clone(), e))?;
    let before = snapshot::load_optional_snapshot(non_empty(before));
    if before.is_some() && non_empty(document).is_none() {
        let err = FlowDiffError::MissingDifferences {
            path: source.clone(),
        };
        return Err((source, err.into()));
    }
    Ok(FlowInput {
        source,
        before,
        after,
        comparator,
    })
}

fn exit_code(report: &BatchReport, args: &DiffArgs) -> ExitCode {
    let failures: Vec<_> = report.failures().collect();
    if !failures.is_empty() {
        for (source, err) in &failures {
            eprintln!("Failed to evaluate {}: {}", source, err);
        }
        return ExitCode::from(EXIT_FAILURE);
    }
    if args.checkstyle && args.checkstyle_fail && report.has_blocking_violations() {
        eprintln!("Checkstyle violations found");
        return ExitCode::from(EXIT_VIOLATIONS);
    }
    ExitCode::SUCCESS
}

fn write_report(args: &DiffArgs, text: &str) -> std::io::Result<()> {
    match &args.output {
        Some(path) => std::fs::write(path, text),
        None => {
            print!("{}", text);
            Ok(())
        }
    }
}

/// Replace the pull-request comment when the GitHub settings are complete
fn post_if_configured(args: &DiffArgs, text: &str) {
    let (Some(token), Some(repository), Some(issue_number)) = (
        args.github_token.as_ref(),
        args.github_repository.as_ref(),
        args.github_issue_number,
    ) else {
        tracing::debug!("GitHub settings incomplete, report not posted");
        return;
    };

    // Posting is best effort; the exit status reflects the evaluation only
    let client = match GitHubClient::with_api_base(
        &args.github_api_url,
        token.clone(),
        repository.clone(),
        issue_number,
    ) {
        Ok(client) => client,
        Err(err) => {
            tracing::error!(message = %err, "failed to create GitHub client");
            return;
        }
    };
    post_report(&client, text);
}

fn post_report(client: &dyn CommentClient, text: &str) {
    match client.post_comment(text) {
        Ok(id) => {
            if let Err(err) = client.delete_previous_comments(id) {
                tracing::error!(message = %err, "failed to delete previous report comments");
            }
        }
        Err(err) => tracing::error!(message = %err, "failed to post report comment"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowdiff_core::errors::ExErrorKind;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingClient {
        fail_post: bool,
        calls: RefCell<Vec<String>>,
    }

    impl CommentClient for RecordingClient {
        fn post_comment(&self, body: &str) -> Result<u64> {
            self.calls.borrow_mut().push(format!("post:{}", body.len()));
            if self.fail_post {
                return Err(ExError::new(ExErrorKind::ExternalService));
            }
            Ok(42)
        }

        fn delete_previous_comments(&self, keep: u64) -> Result<usize> {
            self.calls.borrow_mut().push(format!("delete:{}", keep));
            Ok(0)
        }
    }

    #[test]
    fn test_split_paths_keeps_positions() {
        assert_eq!(
            split_paths("a.json, ,c.json"),
            vec![PathBuf::from("a.json"), PathBuf::new(), PathBuf::from("c.json")]
        );
    }

    #[test]
    fn test_previous_comments_deleted_only_after_post() {
        let client = RecordingClient::default();
        post_report(&client, "report");
        assert_eq!(*client.calls.borrow(), vec!["post:6", "delete:42"]);

        let failing = RecordingClient {
            fail_post: true,
            ..Default::default()
        };
        post_report(&failing, "report");
        assert_eq!(*failing.calls.borrow(), vec!["post:6"]);
    }
}
