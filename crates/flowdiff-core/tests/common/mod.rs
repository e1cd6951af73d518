use flowdiff_core::{FlowDifference, FlowSnapshot, RulesConfig};
use serde_json::{json, Value};

/// Build a snapshot from a JSON value, panicking on malformed fixtures
#[allow(dead_code)]
pub fn snapshot(value: Value) -> FlowSnapshot {
    serde_json::from_value(value).expect("fixture snapshot")
}

/// A named flow whose root group holds `contents` (merged into the group)
#[allow(dead_code)]
pub fn named_flow(name: &str, contents: Value) -> FlowSnapshot {
    let mut root = json!({"identifier": "root", "name": "Root"});
    if let (Some(root), Value::Object(extra)) = (root.as_object_mut(), contents) {
        root.extend(extra);
    }
    snapshot(json!({
        "snapshotMetadata": {"author": "ci", "timestamp": 1700000000000i64, "comments": "export"},
        "flow": {"identifier": "flow-1", "name": name},
        "flowContents": root,
    }))
}

#[allow(dead_code)]
pub fn processor(id: &str, name: &str, tasks: u32) -> Value {
    json!({
        "identifier": id,
        "instanceIdentifier": format!("{}-instance", id),
        "groupIdentifier": "root",
        "name": name,
        "type": "org.example.processors.FetchRecords",
        "concurrentlySchedulableTaskCount": tasks,
    })
}

#[allow(dead_code)]
pub fn connectable(id: &str, name: &str) -> Value {
    json!({"id": id, "type": "PROCESSOR", "groupId": "root", "name": name})
}

#[allow(dead_code)]
pub fn connection(id: &str, source: Value, destination: Value, relationships: &[&str]) -> Value {
    json!({
        "identifier": id,
        "instanceIdentifier": format!("{}-instance", id),
        "groupIdentifier": "root",
        "source": source,
        "destination": destination,
        "selectedRelationships": relationships,
    })
}

#[allow(dead_code)]
pub fn rules(value: Value) -> RulesConfig {
    serde_json::from_value(value).expect("fixture rules")
}

/// Rules document enabling only `rule_id`
#[allow(dead_code)]
pub fn only(rule_id: &str) -> RulesConfig {
    rules(json!({"include": [rule_id]}))
}

#[allow(dead_code)]
pub fn difference(value: Value) -> FlowDifference {
    serde_json::from_value(value).expect("fixture difference")
}
