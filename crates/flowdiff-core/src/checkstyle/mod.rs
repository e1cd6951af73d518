//! Checkstyle: policy rules evaluated against the newer snapshot
//!
//! - `config`: the rules document (`include`, `exclude`, per-rule settings)
//! - `resolution`: rule gating and parameter resolution with per-flow overrides
//! - `catalog`: the `RuleId` catalog and the `CheckstyleRule` trait
//! - `rules`: the built-in rule implementations

pub mod catalog;
pub mod config;
pub mod resolution;
pub mod rules;

pub use catalog::{CheckstyleRule, RuleId};
pub use config::{ParamValue, RuleConfig, RulesConfig};

use std::time::Instant;

use crate::model::FlowSnapshot;
use crate::{log_op_end, log_op_start};

/// Run every active rule against `snapshot`
///
/// Violations are grouped rule by rule in catalog order. Identifiers in the
/// document's `include`/`exclude` lists that name no built-in rule are
/// logged and ignored.
pub fn run_checkstyle(
    snapshot: &FlowSnapshot,
    flow_name: Option<&str>,
    config: Option<&RulesConfig>,
) -> Vec<String> {
    let start = Instant::now();
    log_op_start!("run_checkstyle", flow_name = flow_name.unwrap_or_default());

    let includes = resolution::effective_includes(config);
    let excludes = resolution::effective_excludes(config);

    for unknown in includes
        .iter()
        .chain(excludes.iter())
        .filter(|id| RuleId::from_id(id).is_none())
    {
        tracing::warn!(rule_id = %unknown, "unknown checkstyle rule in rules document");
    }

    let mut violations = Vec::new();
    for id in RuleId::ALL {
        let rule = id.rule();
        if !rule.applies(&includes, &excludes, config, flow_name) {
            tracing::debug!(rule_id = id.as_str(), "checkstyle rule skipped");
            continue;
        }
        let rule_config = config.and_then(|c| c.rule(id.as_str()));
        let found = rule.check(snapshot, flow_name, rule_config);
        tracing::debug!(
            rule_id = id.as_str(),
            violation_count = found.len(),
            "checkstyle rule evaluated"
        );
        violations.extend(found);
    }

    log_op_end!(
        "run_checkstyle",
        duration_ms = start.elapsed().as_millis() as u64,
        violation_count = violations.len()
    );
    violations
}
