use crate::checkstyle::catalog::{CheckstyleRule, RuleId};
use crate::checkstyle::config::RuleConfig;
use crate::model::{bracketed, FlowSnapshot};

/// Flags connections whose source and destination are the same component
pub struct NoSelfLoopRule;

impl CheckstyleRule for NoSelfLoopRule {
    fn id(&self) -> RuleId {
        RuleId::NoSelfLoop
    }

    fn check(
        &self,
        snapshot: &FlowSnapshot,
        _flow_name: Option<&str>,
        _config: Option<&RuleConfig>,
    ) -> Vec<String> {
        let mut violations = Vec::new();
        snapshot.flow_contents.walk_post_order(&mut |group| {
            for connection in group.connections.iter().filter(|c| c.is_self_loop()) {
                violations.push(format!(
                    "Component named `{}` of type `{}` has a self-loop connection for relationship(s) `{}`. \
                     The recommended approach is to use the framework-level retry mechanism to avoid scenarios \
                     where FlowFiles would stay in the connection forever and to have proper backoff mechanism.",
                    connection.source_name(),
                    connection.source.r#type,
                    bracketed(&connection.selected_relationships)
                ));
            }
        });
        violations
    }
}
