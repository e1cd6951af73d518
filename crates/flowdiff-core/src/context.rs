//! Per-flow evaluation context
//!
//! Lookups the renderer needs while formatting one flow's differences:
//! process groups by identifier and parameter contexts by name, both taken
//! from the newer snapshot. A context is built for one flow and dropped
//! once that flow's report is assembled.

use std::collections::HashMap;

use crate::model::{FlowSnapshot, ParameterContext, ProcessGroup};

pub const UNNAMED_FLOW: &str = "Unnamed Flow";

/// Backticked flow name for report headers, or `Unnamed Flow`
pub fn flow_display_name(flow_name: Option<&str>) -> String {
    match flow_name.filter(|n| !n.is_empty()) {
        Some(name) => format!("`{}`", name),
        None => UNNAMED_FLOW.to_string(),
    }
}

#[derive(Debug)]
pub struct EvaluationContext<'a> {
    flow_name: Option<&'a str>,
    process_groups: HashMap<&'a str, &'a ProcessGroup>,
    snapshot: &'a FlowSnapshot,
}

impl<'a> EvaluationContext<'a> {
    pub fn new(flow_name: Option<&'a str>, snapshot: &'a FlowSnapshot) -> Self {
        let mut process_groups = HashMap::new();
        snapshot.flow_contents.walk_post_order(&mut |group| {
            process_groups.insert(group.identifier.as_str(), group);
        });
        Self {
            flow_name: flow_name.filter(|n| !n.is_empty()),
            process_groups,
            snapshot,
        }
    }

    /// Name matched against rule patterns; an unnamed flow matches as `""`
    pub fn pattern_subject(&self) -> &'a str {
        self.flow_name.unwrap_or_default()
    }

    pub fn display_name(&self) -> String {
        flow_display_name(self.flow_name)
    }

    pub fn snapshot(&self) -> &'a FlowSnapshot {
        self.snapshot
    }

    pub fn process_group(&self, identifier: &str) -> Option<&'a ProcessGroup> {
        self.process_groups.get(identifier).copied()
    }

    pub fn parameter_context(&self, name: &str) -> Option<&'a ParameterContext> {
        self.snapshot.parameter_contexts.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> FlowSnapshot {
        serde_json::from_str(
            r#"{
                "flowContents": {
                    "identifier": "root",
                    "name": "Root",
                    "processGroups": [{"identifier": "child", "name": "Child"}]
                },
                "parameterContexts": {"ctx": {"name": "ctx"}}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_lookups() {
        let snapshot = snapshot();
        let ctx = EvaluationContext::new(Some("ingest"), &snapshot);
        assert_eq!(ctx.process_group("child").and_then(|g| g.name.as_deref()), Some("Child"));
        assert_eq!(ctx.process_group("root").map(|g| g.identifier.as_str()), Some("root"));
        assert!(ctx.process_group("missing").is_none());
        assert!(ctx.parameter_context("ctx").is_some());
        assert_eq!(ctx.display_name(), "`ingest`");
    }

    #[test]
    fn test_unnamed_flow() {
        let snapshot = snapshot();
        assert_eq!(EvaluationContext::new(None, &snapshot).display_name(), "Unnamed Flow");
        assert_eq!(EvaluationContext::new(Some(""), &snapshot).display_name(), "Unnamed Flow");
        assert_eq!(EvaluationContext::new(None, &snapshot).pattern_subject(), "");
        assert_eq!(EvaluationContext::new(Some("ingest"), &snapshot).pattern_subject(), "ingest");
    }
}
