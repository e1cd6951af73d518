//! Flow snapshot loading
//!
//! Snapshots are the registry's JSON export of one flow version.

use std::fs;
use std::path::Path;
use std::time::Instant;

use flowdiff_core::{log_op_end, log_op_error, log_op_start, FlowSnapshot};

use crate::errors::{invalid_snapshot, io_error, Result};

/// Parse a snapshot from JSON text; `origin` names the source in errors
pub fn parse_snapshot_str(content: &str, origin: &str) -> Result<FlowSnapshot> {
    serde_json::from_str(content).map_err(|e| invalid_snapshot(origin, e))
}

/// Read and parse the snapshot at `path`
pub fn load_snapshot(path: &Path) -> Result<FlowSnapshot> {
    let start = Instant::now();
    let origin = path.display().to_string();
    log_op_start!("load_snapshot", path = origin.as_str());

    let result = fs::read_to_string(path)
        .map_err(|e| io_error("load_snapshot", path, e))
        .and_then(|content| parse_snapshot_str(&content, &origin));

    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(_) => log_op_end!("load_snapshot", duration_ms = duration_ms, path = origin.as_str()),
        Err(err) => log_op_error!(
            "load_snapshot",
            err.clone(),
            duration_ms = duration_ms,
            path = origin.as_str()
        ),
    }
    result
}

/// Previous version of a flow, if it can be read
///
/// A new flow has no previous version: a missing path, an unreadable file
/// and an unparsable document all mean "first version".
pub fn load_optional_snapshot(path: Option<&Path>) -> Option<FlowSnapshot> {
    let path = path?;
    match load_snapshot(path) {
        Ok(snapshot) => Some(snapshot),
        Err(err) => {
            tracing::warn!(
                path = %path.display(),
                error = %err,
                "previous snapshot unavailable, treating flow as first version"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowdiff_core::ExErrorKind;

    #[test]
    fn test_parse_minimal_snapshot() {
        let snapshot =
            parse_snapshot_str(r#"{"flowContents": {"identifier": "root"}}"#, "inline").unwrap();
        assert_eq!(snapshot.flow_contents.identifier, "root");
        assert!(snapshot.flow_name().is_none());
    }

    #[test]
    fn test_parse_error_names_origin() {
        let err = parse_snapshot_str("{", "flows/a.json").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidSnapshot);
        assert_eq!(err.flow(), Some("flows/a.json"));
    }

    #[test]
    fn test_optional_snapshot_without_path() {
        assert!(load_optional_snapshot(None).is_none());
    }
}
