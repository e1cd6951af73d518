use std::sync::OnceLock;

use regex::Regex;

use crate::checkstyle::catalog::{CheckstyleRule, RuleId};
use crate::checkstyle::config::RuleConfig;
use crate::checkstyle::resolution::excluded_components;
use crate::diff::describe::connection_route;
use crate::model::FlowSnapshot;

/// Flags connections whose backpressure is disabled by a zero threshold
pub struct BackpressureThresholdRule;

fn leading_number() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^\s*([0-9]+(?:\.[0-9]+)?)").ok())
        .as_ref()
}

/// `"0 B"`, `"0.0 KB"` and `"0"` are zero; unparseable sizes are not
fn is_zero_data_size(threshold: &str) -> bool {
    leading_number()
        .and_then(|re| re.captures(threshold))
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .is_some_and(|value| value == 0.0)
}

impl CheckstyleRule for BackpressureThresholdRule {
    fn id(&self) -> RuleId {
        RuleId::BackpressureThreshold
    }

    fn check(
        &self,
        snapshot: &FlowSnapshot,
        flow_name: Option<&str>,
        config: Option<&RuleConfig>,
    ) -> Vec<String> {
        let excluded = excluded_components(config, flow_name);

        let mut violations = Vec::new();
        snapshot.flow_contents.walk_post_order(&mut |group| {
            for connection in &group.connections {
                if excluded.contains(&connection.identifier) {
                    continue;
                }
                if is_zero_data_size(&connection.back_pressure_data_size_threshold) {
                    violations.push(format!(
                        "The connection {} (id: `{}`) has data size backpressure threshold set to 0. \
                         Configure a positive value to enable backpressure.",
                        connection_route(connection),
                        connection.identifier
                    ));
                }
                if connection.back_pressure_object_threshold == 0 {
                    violations.push(format!(
                        "The connection {} (id: `{}`) has object count backpressure threshold set to 0. \
                         Configure a positive value to enable backpressure.",
                        connection_route(connection),
                        connection.identifier
                    ));
                }
            }
        });
        violations
    }
}
