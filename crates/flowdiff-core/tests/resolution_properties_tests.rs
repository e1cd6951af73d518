#![allow(clippy::unwrap_used, clippy::expect_used)]

use flowdiff_core::checkstyle::resolution::{
    effective_excludes, effective_includes, is_active, resolve_list, resolve_scalar,
};
use flowdiff_core::{RuleConfig, RulesConfig};
use proptest::prelude::*;
use serde_json::json;

fn rule_id() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "concurrentTasks",
        "snapshotMetadata",
        "emptyParameter",
        "noSelfLoop",
    ])
    .prop_map(str::to_string)
}

fn flow_name() -> impl Strategy<Value = String> {
    "[a-z]{1,6}(-[a-z]{1,6})?"
}

proptest! {
    #[test]
    fn prop_explicit_include_makes_exclude_irrelevant(
        id in rule_id(),
        name in flow_name(),
        exclude in prop::collection::vec(rule_id(), 0..4),
    ) {
        let config: RulesConfig = serde_json::from_value(json!({
            "include": [id.clone()],
            "exclude": exclude,
        })).unwrap();
        let includes = effective_includes(Some(&config));
        let excludes = effective_excludes(Some(&config));
        prop_assert!(is_active(&id, &includes, &excludes, Some(&config), Some(&name)));
    }

    #[test]
    fn prop_flow_pattern_exclusion_wins(
        id in rule_id(),
        name in flow_name(),
    ) {
        let mut rule_table = serde_json::Map::new();
        rule_table.insert(id.clone(), json!({"exclude": [regex::escape(&name)]}));
        let config: RulesConfig = serde_json::from_value(json!({
            "include": [id.clone()],
            "rules": rule_table,
        })).unwrap();
        let includes = effective_includes(Some(&config));
        prop_assert!(!is_active(&id, &includes, &[], Some(&config), Some(&name)));
    }

    #[test]
    fn prop_matching_override_replaces_scalar(
        base in 0u32..100,
        value in 0u32..100,
        name in flow_name(),
    ) {
        let config: RuleConfig = serde_json::from_value(json!({
            "parameters": {"limit": base},
            "overrides": {".*": {"limit": value}},
        })).unwrap();
        let resolved = resolve_scalar(Some(&config), Some(&name), "limit");
        prop_assert_eq!(resolved, Some(value.to_string()));
    }

    #[test]
    fn prop_matching_override_extends_list(
        base in prop::collection::vec("[a-z]{1,4}", 0..4),
        extra in prop::collection::vec("[a-z]{1,4}", 0..4),
        name in flow_name(),
    ) {
        let config: RuleConfig = serde_json::from_value(json!({
            "parameters": {"excludeComponents": base.join(",")},
            "overrides": {".*": {"excludeComponents": extra.join(",")}},
        })).unwrap();
        let resolved = resolve_list(Some(&config), Some(&name), "excludeComponents");
        let expected: Vec<String> = base.iter().chain(extra.iter()).cloned().collect();
        prop_assert_eq!(resolved, expected);
    }
}
