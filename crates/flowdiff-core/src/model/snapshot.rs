use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{ParameterContext, ProcessGroup};

/// One versioned flow document as exported by the registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowSnapshot {
    /// Provenance block; its absence is itself a checkstyle finding
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_metadata: Option<SnapshotMetadata>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow: Option<FlowInfo>,

    /// Root process group
    pub flow_contents: ProcessGroup,

    /// Parameter contexts keyed by name, in document order
    #[serde(default)]
    pub parameter_contexts: IndexMap<String, ParameterContext>,
}

impl FlowSnapshot {
    /// The flow name, if present and non-empty
    pub fn flow_name(&self) -> Option<&str> {
        self.flow
            .as_ref()
            .and_then(|f| f.name.as_deref())
            .filter(|n| !n.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_identifier: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
