use serde::{Deserialize, Serialize};

/// Named group of substitution variables; the name is its identity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub inherited_parameter_contexts: Vec<String>,
}

impl ParameterContext {
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub sensitive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Parameter {
    /// Value as it may appear in a report: masked when sensitive, `null` when absent
    pub fn display_value(&self) -> String {
        flowdiff_core_types::mask_if(self.sensitive, self.value.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_value_masks_sensitive() {
        let secret = Parameter {
            name: "password".to_string(),
            value: Some("hunter2".to_string()),
            sensitive: true,
            description: None,
        };
        assert_eq!(secret.display_value(), "<Sensitive Value>");

        let unset = Parameter {
            name: "url".to_string(),
            ..Default::default()
        };
        assert_eq!(unset.display_value(), "null");
    }
}
