use crate::checkstyle::catalog::{CheckstyleRule, RuleId};
use crate::checkstyle::config::RuleConfig;
use crate::checkstyle::resolution::{resolve_scalar, split_list};
use crate::diff::describe::connection_route;
use crate::model::{bracketed, FlowSnapshot};

const PARAMETER_NAME: &str = "prioritizers";

/// Requires every connection to use exactly the configured prioritizers
///
/// Order does not matter; duplicates do. Without configuration the rule
/// reports nothing.
pub struct EnforcePrioritizerRule;

fn same_multiset(a: &[String], b: &[String]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut a: Vec<&String> = a.iter().collect();
    let mut b: Vec<&String> = b.iter().collect();
    a.sort();
    b.sort();
    a == b
}

impl CheckstyleRule for EnforcePrioritizerRule {
    fn id(&self) -> RuleId {
        RuleId::EnforcePrioritizer
    }

    fn check(
        &self,
        snapshot: &FlowSnapshot,
        flow_name: Option<&str>,
        config: Option<&RuleConfig>,
    ) -> Vec<String> {
        let Some(required) = resolve_scalar(config, flow_name, PARAMETER_NAME) else {
            return Vec::new();
        };
        let required = split_list(&required);

        let mut violations = Vec::new();
        snapshot.flow_contents.walk_post_order(&mut |group| {
            for connection in &group.connections {
                if same_multiset(&required, &connection.prioritizers) {
                    continue;
                }
                violations.push(format!(
                    "The connection {} is configured with prioritizers `{}` but should have {}",
                    connection_route(connection),
                    bracketed(&connection.prioritizers),
                    bracketed(&required)
                ));
            }
        });
        violations
    }
}
