use serde::{Deserialize, Serialize};

use super::config::{RuleConfig, RulesConfig};
use super::resolution::is_active;
use super::rules::{
    BackpressureThresholdRule, ConcurrentTasksRule, DefaultParametersRule, EmptyParameterRule,
    EnforcePrioritizerRule, NoSelfLoopRule, SnapshotMetadataRule, UnusedParameterRule,
};
use crate::model::FlowSnapshot;

/// A named, independently configurable policy check
pub trait CheckstyleRule: Send + Sync {
    fn id(&self) -> RuleId;

    /// Violation messages for `snapshot`, in traversal order
    fn check(
        &self,
        snapshot: &FlowSnapshot,
        flow_name: Option<&str>,
        config: Option<&RuleConfig>,
    ) -> Vec<String>;

    /// Include/exclude gating for this rule
    fn applies(
        &self,
        includes: &[String],
        excludes: &[String],
        config: Option<&RulesConfig>,
        flow_name: Option<&str>,
    ) -> bool {
        is_active(self.id().as_str(), includes, excludes, config, flow_name)
    }
}

/// Built-in rule catalog, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleId {
    ConcurrentTasks,
    SnapshotMetadata,
    EmptyParameter,
    DefaultParameters,
    UnusedParameter,
    NoSelfLoop,
    EnforcePrioritizer,
    BackpressureThreshold,
}

impl RuleId {
    pub const ALL: [RuleId; 8] = [
        RuleId::ConcurrentTasks,
        RuleId::SnapshotMetadata,
        RuleId::EmptyParameter,
        RuleId::DefaultParameters,
        RuleId::UnusedParameter,
        RuleId::NoSelfLoop,
        RuleId::EnforcePrioritizer,
        RuleId::BackpressureThreshold,
    ];

    /// Configuration key of the rule
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleId::ConcurrentTasks => "concurrentTasks",
            RuleId::SnapshotMetadata => "snapshotMetadata",
            RuleId::EmptyParameter => "emptyParameter",
            RuleId::DefaultParameters => "defaultParameters",
            RuleId::UnusedParameter => "unusedParameter",
            RuleId::NoSelfLoop => "noSelfLoop",
            RuleId::EnforcePrioritizer => "enforcePrioritizer",
            RuleId::BackpressureThreshold => "backpressureThreshold",
        }
    }

    pub fn from_id(id: &str) -> Option<RuleId> {
        RuleId::ALL.iter().copied().find(|r| r.as_str() == id)
    }

    /// The rule implementation
    pub fn rule(&self) -> &'static dyn CheckstyleRule {
        match self {
            RuleId::ConcurrentTasks => &ConcurrentTasksRule,
            RuleId::SnapshotMetadata => &SnapshotMetadataRule,
            RuleId::EmptyParameter => &EmptyParameterRule,
            RuleId::DefaultParameters => &DefaultParametersRule,
            RuleId::UnusedParameter => &UnusedParameterRule,
            RuleId::NoSelfLoop => &NoSelfLoopRule,
            RuleId::EnforcePrioritizer => &EnforcePrioritizerRule,
            RuleId::BackpressureThreshold => &BackpressureThresholdRule,
        }
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_round_trip_through_catalog() {
        for id in RuleId::ALL {
            assert_eq!(RuleId::from_id(id.as_str()), Some(id));
            assert_eq!(id.rule().id(), id);
        }
        assert_eq!(RuleId::from_id("unknownRule"), None);
    }
}
