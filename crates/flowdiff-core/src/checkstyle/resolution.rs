//! Rule selection and parameter resolution
//!
//! A rule runs for a flow when it passes the include/exclude gate and the
//! flow name matches none of the rule's exclusion patterns. Its parameters
//! start from the base values; every override whose pattern matches the flow
//! name then replaces (scalars) or extends (lists) them, in document order.
//!
//! Patterns are regular expressions matched against the whole flow name.

use regex::Regex;

use super::catalog::RuleId;
use super::config::{ParamValue, RuleConfig, RulesConfig};

/// List parameter naming component identifiers a rule should skip
pub const EXCLUDE_COMPONENTS: &str = "excludeComponents";

/// Rule identifiers selected by the document, or the whole catalog
pub fn effective_includes(config: Option<&RulesConfig>) -> Vec<String> {
    match config.and_then(|c| c.include.as_ref()) {
        Some(include) => include.clone(),
        None => RuleId::ALL.iter().map(|r| r.as_str().to_string()).collect(),
    }
}

/// Rule identifiers to drop; empty whenever an explicit include list exists
pub fn effective_excludes(config: Option<&RulesConfig>) -> Vec<String> {
    match config {
        Some(c) if c.include.is_none() => c.exclude.clone().unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// Whether `pattern` matches the whole of `flow_name`
///
/// An invalid pattern never matches.
pub fn flow_matches(pattern: &str, flow_name: &str) -> bool {
    match Regex::new(&format!("^(?:{})$", pattern)) {
        Ok(re) => re.is_match(flow_name),
        Err(err) => {
            tracing::warn!(
                pattern = pattern,
                error = %err,
                "ignoring invalid flow name pattern"
            );
            false
        }
    }
}

/// Whether the rule `rule_id` runs for `flow_name`
pub fn is_active(
    rule_id: &str,
    includes: &[String],
    excludes: &[String],
    config: Option<&RulesConfig>,
    flow_name: Option<&str>,
) -> bool {
    if !includes.iter().any(|r| r == rule_id) || excludes.iter().any(|r| r == rule_id) {
        return false;
    }

    let patterns = match config
        .and_then(|c| c.rule(rule_id))
        .and_then(|r| r.exclude.as_ref())
    {
        Some(patterns) => patterns,
        None => return true,
    };

    match flow_name {
        Some(name) => !patterns.iter().any(|p| flow_matches(p, name)),
        None => true,
    }
}

/// Scalar text of a parameter value; sequences are joined with `,`
pub fn value_to_scalar(value: &ParamValue) -> Option<String> {
    match value {
        ParamValue::Null => None,
        ParamValue::String(s) => Some(s.clone()),
        ParamValue::Array(items) => Some(
            items
                .iter()
                .filter_map(value_to_scalar)
                .collect::<Vec<_>>()
                .join(","),
        ),
        other => Some(other.to_string()),
    }
}

/// Split a comma-separated list, trimming and dropping empty tokens
pub fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn value_to_list(value: &ParamValue) -> Vec<String> {
    match value {
        ParamValue::Array(items) => items
            .iter()
            .filter_map(value_to_scalar)
            .flat_map(|s| split_list(&s))
            .collect(),
        other => value_to_scalar(other)
            .map(|s| split_list(&s))
            .unwrap_or_default(),
    }
}

/// Override tables whose pattern matches the flow, in document order
fn matching_overrides<'a>(
    rule_config: &'a RuleConfig,
    flow_name: Option<&'a str>,
) -> impl Iterator<Item = &'a indexmap::IndexMap<String, ParamValue>> + 'a {
    rule_config
        .overrides
        .iter()
        .filter(move |(pattern, _)| flow_name.is_some_and(|name| flow_matches(pattern, name)))
        .map(|(_, values)| values)
}

/// Effective scalar parameter: base value, replaced by each matching override
pub fn resolve_scalar(
    rule_config: Option<&RuleConfig>,
    flow_name: Option<&str>,
    key: &str,
) -> Option<String> {
    let rule_config = rule_config?;
    let mut resolved = rule_config.parameters.get(key).and_then(value_to_scalar);
    for values in matching_overrides(rule_config, flow_name) {
        if let Some(value) = values.get(key).and_then(value_to_scalar) {
            resolved = Some(value);
        }
    }
    resolved
}

/// Effective list parameter: base entries, extended by each matching override
pub fn resolve_list(
    rule_config: Option<&RuleConfig>,
    flow_name: Option<&str>,
    key: &str,
) -> Vec<String> {
    let Some(rule_config) = rule_config else {
        return Vec::new();
    };
    let mut resolved = rule_config
        .parameters
        .get(key)
        .map(value_to_list)
        .unwrap_or_default();
    for values in matching_overrides(rule_config, flow_name) {
        if let Some(value) = values.get(key) {
            resolved.extend(value_to_list(value));
        }
    }
    resolved
}

/// Component identifiers listed under `excludeComponents` for this flow
pub fn excluded_components(rule_config: Option<&RuleConfig>, flow_name: Option<&str>) -> Vec<String> {
    resolve_list(rule_config, flow_name, EXCLUDE_COMPONENTS)
}
