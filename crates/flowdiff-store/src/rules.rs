//! Checkstyle rules document loading

use std::fs;
use std::path::Path;
use std::time::Instant;

use flowdiff_core::{log_op_end, log_op_error, log_op_start, RulesConfig};

use crate::errors::{invalid_rules, io_error, Result};

/// Parse a rules document from YAML text
///
/// An empty document is an empty configuration.
pub fn parse_rules_str(content: &str) -> Result<RulesConfig> {
    if content.trim().is_empty() {
        return Ok(RulesConfig::default());
    }
    serde_yaml::from_str(content).map_err(invalid_rules)
}

/// Read and parse the rules document at `path`
pub fn load_rules_config(path: &Path) -> Result<RulesConfig> {
    let start = Instant::now();
    log_op_start!("load_rules_config", path = %path.display());

    let result = fs::read_to_string(path)
        .map_err(|e| io_error("load_rules_config", path, e))
        .and_then(|content| parse_rules_str(&content));

    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(config) => log_op_end!(
            "load_rules_config",
            duration_ms = duration_ms,
            rule_count = config.rules.len()
        ),
        Err(err) => log_op_error!("load_rules_config", err.clone(), duration_ms = duration_ms),
    }
    result
}

/// Rules document for a run; `None` selects the default rule set
///
/// A document that cannot be read or parsed is reported on stderr and the
/// run continues with the default rule set.
pub fn load_rules_config_or_default(path: Option<&Path>) -> Option<RulesConfig> {
    let path = path?;
    match load_rules_config(path) {
        Ok(config) => Some(config),
        Err(err) => {
            eprintln!(
                "Failed to load checkstyle rules from {}, using default rules: {}",
                path.display(),
                err
            );
            None
        }
    }
}
