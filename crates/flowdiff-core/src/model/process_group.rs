use serde::{Deserialize, Serialize};

use super::{Connection, ControllerService, Funnel, Label, Port, Processor, RemoteProcessGroup};

/// A (possibly nested) group of components
///
/// A snapshot has exactly one root group (`flowContents`); identifiers are
/// unique across the whole tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessGroup {
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,

    #[serde(default)]
    pub process_groups: Vec<ProcessGroup>,
    #[serde(default)]
    pub processors: Vec<Processor>,
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub controller_services: Vec<ControllerService>,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub funnels: Vec<Funnel>,
    #[serde(default)]
    pub input_ports: Vec<Port>,
    #[serde(default)]
    pub output_ports: Vec<Port>,
    #[serde(default)]
    pub remote_process_groups: Vec<RemoteProcessGroup>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter_context_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub versioned_flow_coordinates: Option<VersionedFlowCoordinates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_file_concurrency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_file_outbound_policy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_engine: Option<String>,
}

impl ProcessGroup {
    /// Visit this group and all descendants, children before parents
    pub fn walk_post_order<'a>(&'a self, visit: &mut dyn FnMut(&'a ProcessGroup)) {
        for child in &self.process_groups {
            child.walk_post_order(visit);
        }
        visit(self);
    }

    /// Every processor property value and controller service property value
    /// in this group and its descendants
    pub fn property_values(&self) -> Vec<&str> {
        let mut values = Vec::new();
        self.walk_post_order(&mut |group| {
            for processor in &group.processors {
                values.extend(processor.properties.values().flatten().map(String::as_str));
            }
            for service in &group.controller_services {
                values.extend(service.properties.values().flatten().map(String::as_str));
            }
        });
        values
    }
}

/// Registry coordinates of a nested versioned group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionedFlowCoordinates {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "super::string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub version: Option<String>,
}

impl VersionedFlowCoordinates {
    /// Field-by-field change summary against a newer set of coordinates
    ///
    /// Fields absent on both sides are omitted.
    pub fn describe_changes(&self, after: &VersionedFlowCoordinates) -> String {
        let fields = [
            ("branch", &self.branch, &after.branch),
            ("bucket", &self.bucket_id, &after.bucket_id),
            ("flow ID", &self.flow_id, &after.flow_id),
            ("version", &self.version, &after.version),
            ("registry ID", &self.registry_id, &after.registry_id),
            ("storage location", &self.storage_location, &after.storage_location),
        ];

        let mut changes = Vec::new();
        for (label, before, after) in fields {
            if before == after {
                if let Some(value) = before {
                    changes.push(format!("{} unchanged (`{}`)", label, value));
                }
            } else {
                changes.push(format!(
                    "{} changed from `{}` to `{}`",
                    label,
                    super::or_null(before.as_deref()),
                    super::or_null(after.as_deref())
                ));
            }
        }
        changes.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(id: &str, children: Vec<ProcessGroup>) -> ProcessGroup {
        ProcessGroup {
            identifier: id.to_string(),
            process_groups: children,
            ..Default::default()
        }
    }

    #[test]
    fn test_walk_post_order_visits_children_first() {
        let root = group("root", vec![group("a", vec![group("a1", vec![])]), group("b", vec![])]);
        let mut seen = Vec::new();
        root.walk_post_order(&mut |g| seen.push(g.identifier.clone()));
        assert_eq!(seen, vec!["a1", "a", "b", "root"]);
    }

    #[test]
    fn test_coordinates_version_accepts_number() {
        let vfc: VersionedFlowCoordinates =
            serde_json::from_str(r#"{"bucketId": "b", "version": 3}"#).unwrap();
        assert_eq!(vfc.version.as_deref(), Some("3"));
    }

    #[test]
    fn test_describe_changes() {
        let before = VersionedFlowCoordinates {
            branch: Some("main".to_string()),
            bucket_id: Some("bkt".to_string()),
            flow_id: Some("f1".to_string()),
            version: Some("1".to_string()),
            ..Default::default()
        };
        let after = VersionedFlowCoordinates {
            version: Some("2".to_string()),
            ..before.clone()
        };
        assert_eq!(
            before.describe_changes(&after),
            "branch unchanged (`main`), bucket unchanged (`bkt`), flow ID unchanged (`f1`), version changed from `1` to `2`"
        );
    }
}
