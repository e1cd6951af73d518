//! Recorded difference sets
//!
//! An out-of-process comparator writes the differences between two
//! snapshots as a JSON array of difference records.

use std::fs;
use std::path::Path;

use flowdiff_core::{FlowDifference, RecordedComparator};

use crate::errors::{invalid_differences, io_error, Result};

pub fn parse_differences_str(content: &str, origin: &str) -> Result<Vec<FlowDifference>> {
    serde_json::from_str(content).map_err(|e| invalid_differences(origin, e))
}

pub fn load_differences(path: &Path) -> Result<Vec<FlowDifference>> {
    let content = fs::read_to_string(path).map_err(|e| io_error("load_differences", path, e))?;
    let differences = parse_differences_str(&content, &path.display().to_string())?;
    tracing::debug!(
        path = %path.display(),
        difference_count = differences.len(),
        "loaded recorded differences"
    );
    Ok(differences)
}

/// Comparator replaying the document at `path`; no document means no differences
pub fn load_comparator(path: Option<&Path>) -> Result<RecordedComparator> {
    match path {
        Some(path) => Ok(RecordedComparator::new(load_differences(path)?)),
        None => Ok(RecordedComparator::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowdiff_core::{DifferenceType, ExErrorKind};

    #[test]
    fn test_parse_difference_document() {
        let diffs = parse_differences_str(
            r#"[{"differenceType": "NAME_CHANGED", "valueA": "a", "valueB": "b"}]"#,
            "inline",
        )
        .unwrap();
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].difference_type, DifferenceType::NameChanged);
    }

    #[test]
    fn test_parse_keeps_remote_port_records() {
        let diffs = parse_differences_str(
            r#"[
                {"differenceType": "NAME_CHANGED", "valueA": "a", "valueB": "b",
                 "componentA": {"componentType": "REMOTE_INPUT_PORT", "identifier": "rp1", "name": "a", "targetId": "t"},
                 "componentB": {"componentType": "REMOTE_INPUT_PORT", "identifier": "rp1", "name": "b", "targetId": "t"}},
                {"differenceType": "COMPONENT_ADDED",
                 "componentB": {"componentType": "FUNNEL", "identifier": "f1"}}
            ]"#,
            "inline",
        )
        .unwrap();
        assert_eq!(diffs.len(), 2);
        let port = diffs[0].component_a.as_ref().unwrap();
        assert!(!port.is_modeled());
        assert_eq!(port.describe(), "Remote Input Port named `a`");
        assert!(diffs[1].component_b.as_ref().unwrap().is_modeled());
    }

    #[test]
    fn test_parse_rejects_non_array() {
        let err = parse_differences_str(r#"{"differenceType": "NAME_CHANGED"}"#, "d.json")
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Serialization);
    }
}
