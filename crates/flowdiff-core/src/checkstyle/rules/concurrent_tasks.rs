use crate::checkstyle::catalog::{CheckstyleRule, RuleId};
use crate::checkstyle::config::RuleConfig;
use crate::checkstyle::resolution::{excluded_components, resolve_scalar};
use crate::model::FlowSnapshot;

const DEFAULT_LIMIT: u32 = 2;

/// Flags processors scheduled with more concurrent tasks than `limit`
pub struct ConcurrentTasksRule;

fn parse_limit(raw: &str) -> Option<u32> {
    raw.parse::<u32>()
        .ok()
        .or_else(|| raw.parse::<f64>().ok().filter(|v| *v >= 0.0).map(|v| v as u32))
}

impl CheckstyleRule for ConcurrentTasksRule {
    fn id(&self) -> RuleId {
        RuleId::ConcurrentTasks
    }

    fn check(
        &self,
        snapshot: &FlowSnapshot,
        flow_name: Option<&str>,
        config: Option<&RuleConfig>,
    ) -> Vec<String> {
        let limit = match resolve_scalar(config, flow_name, "limit") {
            Some(raw) => parse_limit(&raw).unwrap_or_else(|| {
                tracing::warn!(
                    rule_id = self.id().as_str(),
                    value = %raw,
                    "invalid concurrent task limit, using default"
                );
                DEFAULT_LIMIT
            }),
            None => DEFAULT_LIMIT,
        };

        let excluded = excluded_components(config, flow_name);

        let mut violations = Vec::new();
        snapshot.flow_contents.walk_post_order(&mut |group| {
            for processor in &group.processors {
                let tasks = processor.concurrently_schedulable_task_count;
                if tasks <= limit || excluded.contains(&processor.identifier) {
                    continue;
                }
                violations.push(format!(
                    "Processor named `{}` (id: `{}`) is configured with {} concurrent tasks",
                    processor.name.as_deref().unwrap_or("null"),
                    processor.identifier,
                    tasks
                ));
            }
        });
        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_limit() {
        assert_eq!(parse_limit("4"), Some(4));
        assert_eq!(parse_limit("8.0"), Some(8));
        assert_eq!(parse_limit("many"), None);
        assert_eq!(parse_limit("-1"), None);
    }
}
