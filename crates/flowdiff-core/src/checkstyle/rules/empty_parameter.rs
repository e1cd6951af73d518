use super::all_parameters;
use crate::checkstyle::catalog::{CheckstyleRule, RuleId};
use crate::checkstyle::config::RuleConfig;
use crate::model::FlowSnapshot;

/// Flags parameters set to the empty string (null is fine)
pub struct EmptyParameterRule;

impl CheckstyleRule for EmptyParameterRule {
    fn id(&self) -> RuleId {
        RuleId::EmptyParameter
    }

    fn check(
        &self,
        snapshot: &FlowSnapshot,
        _flow_name: Option<&str>,
        _config: Option<&RuleConfig>,
    ) -> Vec<String> {
        all_parameters(snapshot)
            .filter(|p| p.value.as_deref() == Some(""))
            .map(|p| format!("Parameter named `{}` is set to empty string", p.name))
            .collect()
    }
}
