//! Deterministic total order over a difference set
//!
//! Key = `componentA` instance identifier (falling back to its identifier)
//! followed by the SHA-256 of the record's canonical JSON, or the hash alone
//! when there is no `componentA`. Records with equal keys are identical and
//! collapse to one.

use std::collections::BTreeMap;

use sha2::{Digest, Sha256};

use super::model::FlowDifference;
use crate::errors::{ExError, ExErrorKind, Result};

/// SHA-256 (hex) of the canonical JSON serialization of a difference
///
/// # Errors
///
/// Returns `ExErrorKind::Serialization` if the record cannot be serialized.
pub fn structural_hash(diff: &FlowDifference) -> Result<String> {
    let canonical = serde_json::to_string(diff).map_err(|e| {
        ExError::new(ExErrorKind::Serialization)
            .with_op("structural_hash")
            .with_message(e.to_string())
    })?;
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Sort key of a difference
///
/// # Errors
///
/// Returns `ExErrorKind::Serialization` if the record cannot be serialized.
pub fn ordering_key(diff: &FlowDifference) -> Result<String> {
    let hash = structural_hash(diff)?;
    let prefix = diff
        .component_a
        .as_ref()
        .and_then(|c| c.instance_identifier().or_else(|| c.identifier()));
    Ok(match prefix {
        Some(id) => format!("{}{}", id, hash),
        None => hash,
    })
}

/// Sort by ordering key and drop duplicates
///
/// The result does not depend on the input order.
///
/// # Errors
///
/// Returns `ExErrorKind::Serialization` if a record cannot be serialized.
pub fn order_differences(diffs: Vec<FlowDifference>) -> Result<Vec<FlowDifference>> {
    let mut ordered = BTreeMap::new();
    for diff in diffs {
        ordered.entry(ordering_key(&diff)?).or_insert(diff);
    }
    Ok(ordered.into_values().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::model::{DiffValue, DifferenceType};
    use crate::model::{Component, Funnel};

    fn funnel_diff(id: &str, kind: DifferenceType) -> FlowDifference {
        let mut diff = FlowDifference::new(kind);
        diff.component_a = Some(Component::Funnel(Funnel {
            identifier: id.to_string(),
            ..Default::default()
        }));
        diff
    }

    #[test]
    fn test_hash_is_deterministic() {
        let diff = funnel_diff("f1", DifferenceType::ComponentRemoved);
        assert_eq!(structural_hash(&diff).unwrap(), structural_hash(&diff).unwrap());
        assert_eq!(structural_hash(&diff).unwrap().len(), 64);
    }

    #[test]
    fn test_key_prefers_instance_identifier() {
        let mut diff = FlowDifference::new(DifferenceType::ComponentRemoved);
        diff.component_a = Some(Component::Funnel(Funnel {
            identifier: "versioned-id".to_string(),
            instance_identifier: Some("instance-id".to_string()),
            group_identifier: None,
        }));
        assert!(ordering_key(&diff).unwrap().starts_with("instance-id"));

        let bare = FlowDifference::new(DifferenceType::Other("X".to_string()));
        assert_eq!(ordering_key(&bare).unwrap(), structural_hash(&bare).unwrap());
    }

    #[test]
    fn test_order_is_input_independent_and_collapses_duplicates() {
        let a = funnel_diff("a", DifferenceType::ComponentRemoved);
        let mut b = funnel_diff("b", DifferenceType::NameChanged);
        b.value_b = Some(DiffValue::Text("x".to_string()));

        let forward = order_differences(vec![a.clone(), b.clone(), a.clone()]).unwrap();
        let backward = order_differences(vec![b, a.clone()]).unwrap();
        assert_eq!(forward, backward);
        assert_eq!(forward.len(), 2);
        assert_eq!(forward[0], a);
    }
}
