use crate::checkstyle::catalog::{CheckstyleRule, RuleId};
use crate::checkstyle::config::RuleConfig;
use crate::model::FlowSnapshot;

/// Requires the provenance block (author, timestamp, comments)
pub struct SnapshotMetadataRule;

impl CheckstyleRule for SnapshotMetadataRule {
    fn id(&self) -> RuleId {
        RuleId::SnapshotMetadata
    }

    fn check(
        &self,
        snapshot: &FlowSnapshot,
        _flow_name: Option<&str>,
        _config: Option<&RuleConfig>,
    ) -> Vec<String> {
        if snapshot.snapshot_metadata.is_some() {
            return Vec::new();
        }
        vec!["Flow snapshot metadata is missing. Export the flow definition from the registry \
              so that it carries the snapshot metadata (author, timestamp and comments)."
            .to_string()]
    }
}
