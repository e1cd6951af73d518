use std::collections::HashSet;

use super::all_parameters;
use crate::checkstyle::catalog::{CheckstyleRule, RuleId};
use crate::checkstyle::config::RuleConfig;
use crate::model::FlowSnapshot;
use crate::parameter_reference::parameter_references;

/// Flags parameters no processor or controller service property references
pub struct UnusedParameterRule;

impl CheckstyleRule for UnusedParameterRule {
    fn id(&self) -> RuleId {
        RuleId::UnusedParameter
    }

    fn check(
        &self,
        snapshot: &FlowSnapshot,
        _flow_name: Option<&str>,
        _config: Option<&RuleConfig>,
    ) -> Vec<String> {
        let referenced: HashSet<&str> = snapshot
            .flow_contents
            .property_values()
            .into_iter()
            .flat_map(parameter_references)
            .collect();

        all_parameters(snapshot)
            .filter(|p| !referenced.contains(p.name.as_str()))
            .map(|p| format!("Parameter named `{}` is not used anywhere in the flow", p.name))
            .collect()
    }
}
