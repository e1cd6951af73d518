//! Read-only view of a versioned flow snapshot
//!
//! Field names follow the registry's JSON export (camelCase); unknown
//! fields are ignored. Maps keep document order so that traversal and
//! serialization are deterministic.

pub mod components;
pub mod parameter;
pub mod process_group;
pub mod snapshot;

pub use components::{
    Bundle, Component, ConfigurableExtension, ConnectableComponent, Connection, ControllerService,
    Funnel, Label, Port, Processor, PropertyDescriptor, RemoteProcessGroup,
};
pub use parameter::{Parameter, ParameterContext};
pub use process_group::{ProcessGroup, VersionedFlowCoordinates};
pub use snapshot::{FlowInfo, FlowSnapshot, SnapshotMetadata};

use serde::{Deserialize, Deserializer};

/// Accept either a JSON string or number for fields whose type changed
/// between registry versions (e.g. flow coordinate versions).
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// Java-style rendering of an optional value: absent prints as `null`.
pub(crate) fn or_null<T: std::fmt::Display>(value: Option<T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "null".to_string(),
    }
}

/// `[a, b]` rendering of a list
pub(crate) fn bracketed<T: AsRef<str>>(items: &[T]) -> String {
    let joined: Vec<&str> = items.iter().map(AsRef::as_ref).collect();
    format!("[{}]", joined.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bracketed() {
        assert_eq!(bracketed::<&str>(&[]), "[]");
        assert_eq!(bracketed(&["success", "failure"]), "[success, failure]");
    }

    #[test]
    fn test_or_null() {
        assert_eq!(or_null(Some("x")), "x");
        assert_eq!(or_null::<&str>(None), "null");
    }
}
