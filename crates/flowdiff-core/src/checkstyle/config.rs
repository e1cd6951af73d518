//! Rules document model
//!
//! ```yaml
//! include: [concurrentTasks, unusedParameter]
//! exclude: [snapshotMetadata]
//! rules:
//!   concurrentTasks:
//!     parameters: { limit: 4, excludeComponents: "id-1, id-2" }
//!     overrides: { "prod-.*": { limit: 8 } }
//!     exclude: [ "sandbox-.*" ]
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Free-form parameter value as written in the rules document
pub type ParamValue = serde_json::Value;

/// Top-level rules document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RulesConfig {
    /// Explicit rule selection; absent means the whole catalog
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<String>>,

    /// Rules to drop from the default selection; ignored when `include` is set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<String>>,

    #[serde(default)]
    pub rules: IndexMap<String, RuleConfig>,
}

impl RulesConfig {
    pub fn rule(&self, id: &str) -> Option<&RuleConfig> {
        self.rules.get(id)
    }
}

/// Per-rule configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleConfig {
    /// Base parameter values
    #[serde(default)]
    pub parameters: IndexMap<String, ParamValue>,

    /// Flow-name regex -> parameter values, applied in document order
    #[serde(default)]
    pub overrides: IndexMap<String, IndexMap<String, ParamValue>>,

    /// Flow-name regexes for which the rule is skipped entirely
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules_config_from_json() {
        let json = r#"{
            "exclude": ["snapshotMetadata"],
            "rules": {
                "concurrentTasks": {
                    "parameters": {"limit": 4},
                    "overrides": {"prod-.*": {"limit": 8}, "prod-eu": {"limit": 16}},
                    "exclude": ["sandbox-.*"]
                }
            }
        }"#;
        let config: RulesConfig = serde_json::from_str(json).unwrap();
        assert!(config.include.is_none());
        let rule = config.rule("concurrentTasks").unwrap();
        let patterns: Vec<&str> = rule.overrides.keys().map(String::as_str).collect();
        assert_eq!(patterns, vec!["prod-.*", "prod-eu"]);
        assert_eq!(rule.exclude.as_deref(), Some(&["sandbox-.*".to_string()][..]));
    }
}
