//! Report assembly for one flow and for a batch of flows
//!
//! A flow report has up to three sections: checkstyle violations (when
//! checkstyle is enabled), flow changes and bundle changes. A batch report
//! prefixes the flow sections with a marker note that identifies the report
//! among pull-request comments.

use std::collections::BTreeSet;
use std::time::Instant;

use crate::checkstyle::{run_checkstyle, RulesConfig};
use crate::comparator::FlowComparator;
use crate::context::EvaluationContext;
use crate::diff::{order_differences, render, FlowDifference, Rendered};
use crate::errors::{ExError, FlowDiffError, Result};
use crate::model::FlowSnapshot;
use crate::{log_op_end, log_op_error, log_op_start};
use flowdiff_core_types::{BatchId, RunId};

/// Hidden marker identifying comments that carry a FlowDiff report
pub const REPORT_MARKER: &str = "<!-- flowdiff-report -->";

const REPORT_NOTE: &str = "> This report is generated by FlowDiff, the flow checkstyle and change report for versioned flows.";

const MISMATCH_MESSAGE: &str =
    "The action didn't properly identify the files to compare. Please check the input files.";

/// Evaluation switches shared by every flow of a run
#[derive(Debug, Clone, Copy, Default)]
pub struct EvaluationOptions<'r> {
    pub checkstyle: bool,
    pub rules: Option<&'r RulesConfig>,
}

/// Everything needed to evaluate one flow
pub struct FlowInput<'c> {
    /// Where the new snapshot came from; used in logs and failure sections
    pub source: String,
    /// Previous version; `None` for the first version of a flow
    pub before: Option<FlowSnapshot>,
    pub after: FlowSnapshot,
    pub comparator: &'c dyn FlowComparator,
}

/// Outcome of evaluating one flow
#[derive(Debug, Clone, PartialEq)]
pub struct FlowReport {
    pub flow_name: Option<String>,
    pub checkstyle: bool,
    pub violations: Vec<String>,
    /// Rendered change lines; `None` when there is no previous version
    pub changes: Option<Vec<String>>,
    /// Sorted, deduplicated bundle change lines
    pub bundle_changes: Vec<String>,
}

impl FlowReport {
    pub fn display_name(&self) -> String {
        crate::context::flow_display_name(self.flow_name.as_deref())
    }

    /// Violations block the gate only when checkstyle ran
    pub fn has_violations(&self) -> bool {
        self.checkstyle && !self.violations.is_empty()
    }

    /// Markdown section for this flow
    pub fn text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "### Executing Flow Diff for flow: {}\n",
            self.display_name()
        ));

        if self.checkstyle {
            if self.violations.is_empty() {
                out.push_str("#### No Checkstyle Violations found\n");
            } else {
                out.push_str("#### Checkstyle Violations\n");
                out.push_str("> [!CAUTION]\n");
                for violation in &self.violations {
                    out.push_str(&format!("> - {}\n", violation));
                }
                out.push('\n');
            }
        }

        match &self.changes {
            None => out.push_str("#### No changes as this is the first version of the flow\n"),
            Some(changes) if changes.is_empty() && self.bundle_changes.is_empty() => {
                out.push_str("#### No relevant changes found in the flow\n")
            }
            Some(changes) => {
                out.push_str("#### Flow Changes\n");
                for line in changes {
                    out.push_str(line);
                    out.push('\n');
                }
                if !self.bundle_changes.is_empty() {
                    out.push('\n');
                    out.push_str("#### Bundle Changes\n");
                    for line in &self.bundle_changes {
                        out.push_str(line);
                        out.push('\n');
                    }
                }
            }
        }
        out
    }
}

/// Flow name used for rule matching and the section header: the previous
/// version's name when there is one, else the new one's.
fn resolve_flow_name(input: &FlowInput<'_>) -> Option<String> {
    input
        .before
        .as_ref()
        .and_then(FlowSnapshot::flow_name)
        .or_else(|| input.after.flow_name())
        .map(str::to_string)
}

/// Evaluate one flow: checkstyle over the new snapshot, then the rendered
/// change list when a previous version exists.
///
/// # Errors
///
/// Fails when the comparator fails or a difference breaks the comparator
/// contract (`ExErrorKind::ContractViolation`).
pub fn evaluate_flow(input: &FlowInput<'_>, options: &EvaluationOptions<'_>) -> Result<FlowReport> {
    let start = Instant::now();
    let flow_name = resolve_flow_name(input);
    let flow_label = flow_name.clone().unwrap_or_else(|| input.source.clone());
    log_op_start!("evaluate_flow", flow_name = flow_label.as_str());

    let result = evaluate_flow_inner(input, options, flow_name);

    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(report) => log_op_end!(
            "evaluate_flow",
            duration_ms = duration_ms,
            flow_name = flow_label.as_str(),
            violation_count = report.violations.len(),
            difference_count = report.changes.as_ref().map_or(0, Vec::len)
        ),
        Err(err) => log_op_error!(
            "evaluate_flow",
            err.clone(),
            duration_ms = duration_ms,
            flow_name = flow_label.as_str()
        ),
    }
    result.map_err(|err| err.with_flow(flow_label))
}

fn evaluate_flow_inner(
    input: &FlowInput<'_>,
    options: &EvaluationOptions<'_>,
    flow_name: Option<String>,
) -> Result<FlowReport> {
    let ctx = EvaluationContext::new(flow_name.as_deref(), &input.after);

    let violations = if options.checkstyle {
        run_checkstyle(&input.after, Some(ctx.pattern_subject()), options.rules)
    } else {
        Vec::new()
    };

    let mut bundle_changes = BTreeSet::new();
    let changes = match &input.before {
        None => None,
        Some(before) => {
            let differences = input
                .comparator
                .compare(before.into(), (&input.after).into())?;
            Some(render_differences(differences, &ctx, &mut bundle_changes)?)
        }
    };

    Ok(FlowReport {
        flow_name,
        checkstyle: options.checkstyle,
        violations,
        changes,
        bundle_changes: bundle_changes.into_iter().collect(),
    })
}

fn render_differences(
    differences: Vec<FlowDifference>,
    ctx: &EvaluationContext<'_>,
    bundle_changes: &mut BTreeSet<String>,
) -> Result<Vec<String>> {
    let start = Instant::now();
    log_op_start!("render_differences", difference_count = differences.len());

    let mut lines = Vec::new();
    for diff in order_differences(differences)? {
        let rendered = render(&diff, ctx).map_err(|err| {
            log_op_error!(
                "render_differences",
                err.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                difference_type = diff.difference_type.as_str()
            );
            err
        })?;
        match rendered {
            Rendered::Lines(rendered) => lines.extend(rendered),
            Rendered::Bundle(line) => {
                bundle_changes.insert(line);
            }
            Rendered::Suppressed => {}
        }
    }

    log_op_end!(
        "render_differences",
        duration_ms = start.elapsed().as_millis() as u64,
        line_count = lines.len()
    );
    Ok(lines)
}

/// Outcome of one flow in a batch
#[derive(Debug, Clone)]
pub enum FlowOutcome {
    Evaluated(FlowReport),
    Failed { source: String, error: ExError },
}

impl FlowOutcome {
    fn text(&self) -> String {
        match self {
            FlowOutcome::Evaluated(report) => report.text(),
            FlowOutcome::Failed { source, error } => format!(
                "### Executing Flow Diff for flow: `{}`\n#### Flow evaluation failed\n> [!WARNING]\n> {}\n",
                source, error
            ),
        }
    }
}

/// Reports for every flow of a pull request
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub flows: Vec<FlowOutcome>,
}

impl BatchReport {
    /// Full comment body
    pub fn text(&self) -> String {
        let mut out = report_header();
        out.push_str(&format!(
            "Identified {} changed flows in this Pull Request.\n",
            self.flows.len()
        ));
        for flow in &self.flows {
            out.push('\n');
            out.push_str(&flow.text());
        }
        out
    }

    /// Whether any successfully evaluated flow has checkstyle violations
    pub fn has_blocking_violations(&self) -> bool {
        self.flows.iter().any(|flow| match flow {
            FlowOutcome::Evaluated(report) => report.has_violations(),
            FlowOutcome::Failed { .. } => false,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &ExError)> {
        self.flows.iter().filter_map(|flow| match flow {
            FlowOutcome::Failed { source, error } => Some((source.as_str(), error)),
            FlowOutcome::Evaluated(_) => None,
        })
    }
}

fn report_header() -> String {
    format!("{}\n> [!NOTE]\n{}\n\n", REPORT_MARKER, REPORT_NOTE)
}

/// Comment body for a run whose old and new snapshot lists do not line up
pub fn mismatch_report() -> String {
    format!("{}{}\n", report_header(), MISMATCH_MESSAGE)
}

/// Pair old and new snapshot entries by position
///
/// # Errors
///
/// Returns `ExErrorKind::InvalidInput` when the lists differ in length.
pub fn pair_snapshot_lists<T>(before: Vec<T>, after: Vec<T>) -> Result<Vec<(T, T)>> {
    if before.len() != after.len() {
        return Err(FlowDiffError::MismatchedSnapshotLists {
            before: before.len(),
            after: after.len(),
        }
        .into());
    }
    Ok(before.into_iter().zip(after).collect())
}

fn evaluate_flow_traced(input: &FlowInput<'_>, options: &EvaluationOptions<'_>) -> Result<FlowReport> {
    let run_id = RunId::new();
    let span = tracing::info_span!("flow", run_id = %run_id, source = %input.source);
    let _flow = span.enter();
    evaluate_flow(input, options)
}

/// Evaluate each flow in turn
///
/// A flow that fails (to load or to evaluate) is recorded with its error and
/// the remaining flows are still evaluated.
pub fn evaluate_batch<'c>(
    inputs: Vec<std::result::Result<FlowInput<'c>, (String, ExError)>>,
    options: &EvaluationOptions<'_>,
) -> BatchReport {
    let batch_id = BatchId::new();
    let batch_span = tracing::info_span!("batch", batch_id = %batch_id);
    let _batch = batch_span.enter();

    let start = Instant::now();
    log_op_start!("evaluate_batch", flow_count = inputs.len());

    let flows: Vec<FlowOutcome> = inputs
        .into_iter()
        .map(|input| match input {
            Ok(input) => match evaluate_flow_traced(&input, options) {
                Ok(report) => FlowOutcome::Evaluated(report),
                Err(error) => FlowOutcome::Failed {
                    source: input.source.clone(),
                    error,
                },
            },
            Err((source, error)) => FlowOutcome::Failed { source, error },
        })
        .collect();

    let report = BatchReport { flows };
    log_op_end!(
        "evaluate_batch",
        duration_ms = start.elapsed().as_millis() as u64,
        flow_count = report.flows.len(),
        failure_count = report.failures().count()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparator::RecordedComparator;

    fn snapshot(name: &str) -> FlowSnapshot {
        serde_json::from_value(serde_json::json!({
            "flow": {"name": name},
            "flowContents": {"identifier": "root", "name": "Root"}
        }))
        .unwrap()
    }

    #[test]
    fn test_first_version_has_no_changes_section() {
        let comparator = RecordedComparator::default();
        let input = FlowInput {
            source: "flows/a.json".to_string(),
            before: None,
            after: snapshot("ingest"),
            comparator: &comparator,
        };
        let report = evaluate_flow(&input, &EvaluationOptions::default()).unwrap();
        assert_eq!(report.changes, None);
        assert_eq!(
            report.text(),
            "### Executing Flow Diff for flow: `ingest`\n\
             #### No changes as this is the first version of the flow\n"
        );
    }

    #[test]
    fn test_flow_name_prefers_previous_version() {
        let comparator = RecordedComparator::default();
        let input = FlowInput {
            source: "flows/a.json".to_string(),
            before: Some(snapshot("old-name")),
            after: snapshot("new-name"),
            comparator: &comparator,
        };
        let report = evaluate_flow(&input, &EvaluationOptions::default()).unwrap();
        assert_eq!(report.flow_name.as_deref(), Some("old-name"));
        assert!(report
            .text()
            .ends_with("#### No relevant changes found in the flow\n"));
    }

    #[test]
    fn test_pair_snapshot_lists_rejects_mismatch() {
        let err = pair_snapshot_lists(vec!["a", "b"], vec!["c"]).unwrap_err();
        assert_eq!(err.kind(), crate::errors::ExErrorKind::InvalidInput);

        let pairs = pair_snapshot_lists(vec!["a"], vec!["b"]).unwrap();
        assert_eq!(pairs, vec![("a", "b")]);
    }

    #[test]
    fn test_mismatch_report_carries_marker() {
        let text = mismatch_report();
        assert!(text.starts_with(REPORT_MARKER));
        assert!(text.ends_with("Please check the input files.\n"));
    }
}
