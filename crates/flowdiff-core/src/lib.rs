//! FlowDiff Core - checkstyle rules and change reports for versioned flows
//!
//! This crate provides the evaluation engine behind the `flowdiff` CI gate:
//! - The configuration tree model of a versioned flow snapshot
//! - Rule resolution (include/exclude gating, per-flow overrides)
//! - The built-in checkstyle rule catalog
//! - Rendering of structural differences into Markdown report lines
//! - Deterministic report assembly for one flow or a batch of flows
//!
//! Finding the differences between two snapshots is left to a
//! [`FlowComparator`](comparator::FlowComparator).

pub mod checkstyle;
pub mod comparator;
pub mod context;
pub mod diff;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod parameter_reference;
pub mod report;

pub use flowdiff_core_types::schema;

#[doc(hidden)]
pub use tracing;

// Re-export commonly used types
pub use checkstyle::{run_checkstyle, RuleConfig, RuleId, RulesConfig};
pub use comparator::{ComparableFlow, FlowComparator, RecordedComparator};
pub use context::EvaluationContext;
pub use diff::{DifferenceType, FlowDifference};
pub use errors::{ExError, ExErrorKind, FlowDiffError, Result};
pub use model::FlowSnapshot;
pub use report::{
    evaluate_batch, evaluate_flow, mismatch_report, pair_snapshot_lists, BatchReport,
    EvaluationOptions, FlowInput, FlowOutcome, FlowReport, REPORT_MARKER,
};
