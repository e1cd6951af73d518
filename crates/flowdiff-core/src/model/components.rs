use std::borrow::Cow;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{bracketed, ParameterContext, ProcessGroup};

/// Extension coordinates (`group:artifact:version`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bundle {
    pub group: String,
    pub artifact: String,
    pub version: String,
}

/// Descriptor metadata for one extension property
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDescriptor {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub sensitive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifies_controller_service: Option<String>,
}

/// Components backed by a pluggable implementation class
pub trait ConfigurableExtension {
    /// Fully-qualified implementation class
    fn extension_type(&self) -> &str;
    fn properties(&self) -> &IndexMap<String, Option<String>>;
    fn property_descriptors(&self) -> &IndexMap<String, PropertyDescriptor>;

    /// Text after the last `.` of the implementation class
    fn short_type(&self) -> &str {
        let full = self.extension_type();
        full.rsplit_once('.').map_or(full, |(_, short)| short)
    }

    fn is_sensitive(&self, key: &str) -> bool {
        self.property_descriptors()
            .get(key)
            .is_some_and(|d| d.sensitive)
    }

    /// Property value as it may appear in a report
    fn display_property(&self, key: &str) -> String {
        let value = self.properties().get(key).and_then(|v| v.as_deref());
        flowdiff_core_types::mask_if(self.is_sensitive(key), value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Processor {
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(rename = "type", default)]
    pub r#type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle: Option<Bundle>,
    #[serde(default = "default_concurrency")]
    pub concurrently_schedulable_task_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduling_strategy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduling_period: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_node: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bulletin_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_duration_millis: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub penalty_duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yield_duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_count: Option<u32>,
    #[serde(default)]
    pub retried_relationships: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backoff_mechanism: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_backoff_period: Option<String>,
    #[serde(default)]
    pub auto_terminated_relationships: Vec<String>,
    #[serde(default)]
    pub properties: IndexMap<String, Option<String>>,
    #[serde(default)]
    pub property_descriptors: IndexMap<String, PropertyDescriptor>,
}

fn default_concurrency() -> u32 {
    1
}

impl ConfigurableExtension for Processor {
    fn extension_type(&self) -> &str {
        &self.r#type
    }

    fn properties(&self) -> &IndexMap<String, Option<String>> {
        &self.properties
    }

    fn property_descriptors(&self) -> &IndexMap<String, PropertyDescriptor> {
        &self.property_descriptors
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerService {
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(rename = "type", default)]
    pub r#type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle: Option<Bundle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_state: Option<String>,
    #[serde(default)]
    pub properties: IndexMap<String, Option<String>>,
    #[serde(default)]
    pub property_descriptors: IndexMap<String, PropertyDescriptor>,
}

impl ConfigurableExtension for ControllerService {
    fn extension_type(&self) -> &str {
        &self.r#type
    }

    fn properties(&self) -> &IndexMap<String, Option<String>> {
        &self.properties
    }

    fn property_descriptors(&self) -> &IndexMap<String, PropertyDescriptor> {
        &self.property_descriptors
    }
}

/// Endpoint of a connection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectableComponent {
    pub id: String,
    #[serde(rename = "type", default)]
    pub r#type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

pub const DEFAULT_DATA_SIZE_THRESHOLD: &str = "1 GB";
pub const DEFAULT_OBJECT_THRESHOLD: u64 = 10_000;
pub const DEFAULT_LOAD_BALANCE_STRATEGY: &str = "DO_NOT_LOAD_BALANCE";
pub const DEFAULT_LOAD_BALANCE_COMPRESSION: &str = "DO_NOT_COMPRESS";
pub const DEFAULT_FLOWFILE_EXPIRATION: &str = "0 sec";

fn default_data_size_threshold() -> String {
    DEFAULT_DATA_SIZE_THRESHOLD.to_string()
}

fn default_object_threshold() -> u64 {
    DEFAULT_OBJECT_THRESHOLD
}

fn default_load_balance_strategy() -> String {
    DEFAULT_LOAD_BALANCE_STRATEGY.to_string()
}

fn default_load_balance_compression() -> String {
    DEFAULT_LOAD_BALANCE_COMPRESSION.to_string()
}

fn default_flowfile_expiration() -> String {
    DEFAULT_FLOWFILE_EXPIRATION.to_string()
}

/// A directed, relationship-labeled edge between two connectables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    pub source: ConnectableComponent,
    pub destination: ConnectableComponent,
    #[serde(default)]
    pub selected_relationships: Vec<String>,
    #[serde(default = "default_data_size_threshold")]
    pub back_pressure_data_size_threshold: String,
    #[serde(default = "default_object_threshold")]
    pub back_pressure_object_threshold: u64,
    #[serde(default = "default_load_balance_strategy")]
    pub load_balance_strategy: String,
    #[serde(default = "default_load_balance_compression")]
    pub load_balance_compression: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partitioning_attribute: Option<String>,
    #[serde(default)]
    pub prioritizers: Vec<String>,
    #[serde(default = "default_flowfile_expiration")]
    pub flow_file_expiration: String,
}

impl Connection {
    pub fn is_self_loop(&self) -> bool {
        self.source.id == self.destination.id
    }

    /// The connection's name, or its relationship list when unnamed
    pub fn label(&self) -> String {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => bracketed(&self.selected_relationships),
        }
    }

    pub fn source_name(&self) -> &str {
        self.source.name.as_deref().unwrap_or("null")
    }

    pub fn destination_name(&self) -> &str {
        self.destination.name.as_deref().unwrap_or("null")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_identifier: Option<String>,
    #[serde(default)]
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Funnel {
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_identifier: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Port {
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteProcessGroup {
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_uris: Option<String>,
}

/// Component of a kind not modeled here (remote ports, reporting tasks, ...)
///
/// Keeps its `componentType` so it serializes back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtherComponent {
    pub component_type: String,
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl OtherComponent {
    /// `REMOTE_INPUT_PORT` reads as `Remote Input Port`
    fn type_name(&self) -> String {
        self.component_type
            .split('_')
            .filter(|word| !word.is_empty())
            .map(|word| {
                let lower = word.to_ascii_lowercase();
                let mut chars = lower.chars();
                match chars.next() {
                    Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A component as carried by a difference record, tagged by `componentType`
///
/// Unknown tags land in `Other` instead of failing the whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "componentType", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Component {
    Processor(Processor),
    ControllerService(ControllerService),
    Connection(Connection),
    ProcessGroup(Box<ProcessGroup>),
    Funnel(Funnel),
    Label(Label),
    InputPort(Port),
    OutputPort(Port),
    RemoteProcessGroup(RemoteProcessGroup),
    ParameterContext(ParameterContext),
    #[serde(untagged)]
    Other(OtherComponent),
}

impl Component {
    /// Display name of the component kind
    pub fn type_name(&self) -> Cow<'static, str> {
        let name = match self {
            Component::Processor(_) => "Processor",
            Component::ControllerService(_) => "Controller Service",
            Component::Connection(_) => "Connection",
            Component::ProcessGroup(_) => "Process Group",
            Component::Funnel(_) => "Funnel",
            Component::Label(_) => "Label",
            Component::InputPort(_) => "Input Port",
            Component::OutputPort(_) => "Output Port",
            Component::RemoteProcessGroup(_) => "Remote Process Group",
            Component::ParameterContext(_) => "Parameter Context",
            Component::Other(c) => return Cow::Owned(c.type_name()),
        };
        Cow::Borrowed(name)
    }

    pub fn is_modeled(&self) -> bool {
        !matches!(self, Component::Other(_))
    }

    /// Parameter contexts carry no identifier in exports; their name stands in.
    pub fn identifier(&self) -> Option<&str> {
        match self {
            Component::Processor(c) => Some(&c.identifier),
            Component::ControllerService(c) => Some(&c.identifier),
            Component::Connection(c) => Some(&c.identifier),
            Component::ProcessGroup(c) => Some(&c.identifier),
            Component::Funnel(c) => Some(&c.identifier),
            Component::Label(c) => Some(&c.identifier),
            Component::InputPort(c) | Component::OutputPort(c) => Some(&c.identifier),
            Component::RemoteProcessGroup(c) => Some(&c.identifier),
            Component::ParameterContext(c) => c.identifier.as_deref().or(Some(c.name.as_str())),
            Component::Other(c) => Some(&c.identifier),
        }
    }

    pub fn instance_identifier(&self) -> Option<&str> {
        match self {
            Component::Processor(c) => c.instance_identifier.as_deref(),
            Component::ControllerService(c) => c.instance_identifier.as_deref(),
            Component::Connection(c) => c.instance_identifier.as_deref(),
            Component::ProcessGroup(c) => c.instance_identifier.as_deref(),
            Component::Funnel(c) => c.instance_identifier.as_deref(),
            Component::Label(c) => c.instance_identifier.as_deref(),
            Component::InputPort(c) | Component::OutputPort(c) => c.instance_identifier.as_deref(),
            Component::RemoteProcessGroup(c) => c.instance_identifier.as_deref(),
            Component::ParameterContext(_) => None,
            Component::Other(c) => c.instance_identifier.as_deref(),
        }
    }

    /// Non-empty component name, if any
    pub fn name(&self) -> Option<&str> {
        let name = match self {
            Component::Processor(c) => c.name.as_deref(),
            Component::ControllerService(c) => c.name.as_deref(),
            Component::Connection(c) => c.name.as_deref(),
            Component::ProcessGroup(c) => c.name.as_deref(),
            Component::InputPort(c) | Component::OutputPort(c) => c.name.as_deref(),
            Component::RemoteProcessGroup(c) => c.name.as_deref(),
            Component::ParameterContext(c) => Some(c.name.as_str()),
            Component::Other(c) => c.name.as_deref(),
            Component::Funnel(_) | Component::Label(_) => None,
        };
        name.filter(|n| !n.is_empty())
    }

    pub fn as_extension(&self) -> Option<&dyn ConfigurableExtension> {
        match self {
            Component::Processor(p) => Some(p),
            Component::ControllerService(c) => Some(c),
            _ => None,
        }
    }

    /// Descriptor used in report lines, e.g. ``Processor of type `LogAttribute` named `Log` ``
    pub fn describe(&self) -> String {
        let mut out = self.type_name().to_string();
        if let Some(ext) = self.as_extension() {
            out.push_str(&format!(" of type `{}`", ext.short_type()));
        }
        if let Some(name) = self.name() {
            out.push_str(&format!(" named `{}`", name));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processor(name: Option<&str>) -> Processor {
        Processor {
            identifier: "p1".to_string(),
            name: name.map(str::to_string),
            r#type: "org.apache.nifi.processors.standard.LogAttribute".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_describe_extension_with_name() {
        let c = Component::Processor(processor(Some("Log")));
        assert_eq!(c.describe(), "Processor of type `LogAttribute` named `Log`");
    }

    #[test]
    fn test_describe_unnamed_funnel() {
        let c = Component::Funnel(Funnel {
            identifier: "f".to_string(),
            ..Default::default()
        });
        assert_eq!(c.describe(), "Funnel");
    }

    #[test]
    fn test_component_tagged_deserialization() {
        let json = r#"{
            "componentType": "CONNECTION",
            "identifier": "c1",
            "source": {"id": "a", "type": "PROCESSOR", "name": "A"},
            "destination": {"id": "b", "type": "PROCESSOR", "name": "B"},
            "selectedRelationships": ["success"]
        }"#;
        let c: Component = serde_json::from_str(json).unwrap();
        let Component::Connection(conn) = c else {
            panic!("expected a connection");
        };
        assert_eq!(conn.back_pressure_data_size_threshold, "1 GB");
        assert_eq!(conn.back_pressure_object_threshold, 10_000);
        assert_eq!(conn.label(), "[success]");
        assert!(!conn.is_self_loop());
    }

    #[test]
    fn test_unknown_component_type_is_kept() {
        let json = r#"{
            "componentType": "REMOTE_INPUT_PORT",
            "identifier": "rp1",
            "instanceIdentifier": "rp1-instance",
            "name": "Inbound",
            "targetId": "abc"
        }"#;
        let c: Component = serde_json::from_str(json).unwrap();
        assert!(!c.is_modeled());
        assert_eq!(c.type_name(), "Remote Input Port");
        assert_eq!(c.describe(), "Remote Input Port named `Inbound`");
        assert_eq!(c.instance_identifier(), Some("rp1-instance"));

        let back = serde_json::to_value(&c).unwrap();
        assert_eq!(back["componentType"], "REMOTE_INPUT_PORT");
        assert_eq!(back["identifier"], "rp1");
    }

    #[test]
    fn test_sensitive_property_is_masked() {
        let mut p = processor(None);
        p.properties
            .insert("Password".to_string(), Some("hunter2".to_string()));
        p.property_descriptors.insert(
            "Password".to_string(),
            PropertyDescriptor {
                name: "Password".to_string(),
                sensitive: true,
                ..Default::default()
            },
        );
        assert_eq!(p.display_property("Password"), "<Sensitive Value>");
        assert_eq!(p.display_property("Missing"), "null");
    }

    #[test]
    fn test_parameter_context_identifier_falls_back_to_name() {
        let c = Component::ParameterContext(ParameterContext {
            name: "ctx".to_string(),
            ..Default::default()
        });
        assert_eq!(c.identifier(), Some("ctx"));
        assert_eq!(c.instance_identifier(), None);
    }
}
