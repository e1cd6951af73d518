use super::all_parameters;
use crate::checkstyle::catalog::{CheckstyleRule, RuleId};
use crate::checkstyle::config::RuleConfig;
use crate::checkstyle::resolution::resolve_list;
use crate::model::FlowSnapshot;

const PARAMETER_NAME: &str = "defaultParameters";

/// Only parameters listed under `defaultParameters` may carry a value, and
/// those must carry one.
pub struct DefaultParametersRule;

impl CheckstyleRule for DefaultParametersRule {
    fn id(&self) -> RuleId {
        RuleId::DefaultParameters
    }

    fn check(
        &self,
        snapshot: &FlowSnapshot,
        flow_name: Option<&str>,
        config: Option<&RuleConfig>,
    ) -> Vec<String> {
        let with_default = resolve_list(config, flow_name, PARAMETER_NAME);

        let mut violations = Vec::new();
        for parameter in all_parameters(snapshot) {
            let listed = with_default.iter().any(|n| *n == parameter.name);
            match (listed, parameter.value.is_some()) {
                (true, false) => violations.push(format!(
                    "Parameter named `{}` is `null` even though it should have a default value",
                    parameter.name
                )),
                (false, true) => violations.push(format!(
                    "Parameter named `{}` is set with value `{}` and is not configured as a parameter that should have a default value",
                    parameter.name,
                    parameter.display_value()
                )),
                _ => {}
            }
        }
        violations
    }
}
