//! Error handling for flowdiff-store
//!
//! Wraps flowdiff-core ExError with loader-specific helpers

use std::path::Path;

use flowdiff_core::errors::{ExError, ExErrorKind, FlowDiffError};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create an IO error for `path`
pub fn io_error(operation: &str, path: &Path, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_flow(path.display().to_string())
        .with_message(err.to_string())
}

/// Create a snapshot parse error
pub fn invalid_snapshot(path: &str, reason: impl ToString) -> ExError {
    ExError::from(FlowDiffError::InvalidSnapshot {
        path: path.to_string(),
        reason: reason.to_string(),
    })
    .with_op("load_snapshot")
}

/// Create a rules document parse error
pub fn invalid_rules(reason: impl ToString) -> ExError {
    ExError::from(FlowDiffError::InvalidRulesConfig {
        reason: reason.to_string(),
    })
    .with_op("load_rules_config")
}

/// Create a difference document parse error
pub fn invalid_differences(path: &str, reason: impl ToString) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op("load_differences")
        .with_flow(path.to_string())
        .with_message(format!("Invalid difference document: {}", reason.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helpers_classify_errors() {
        assert_eq!(invalid_snapshot("a.json", "eof").kind(), ExErrorKind::InvalidSnapshot);
        assert_eq!(invalid_rules("bad").kind(), ExErrorKind::InvalidConfig);
        assert_eq!(
            invalid_differences("d.json", "bad").kind(),
            ExErrorKind::Serialization
        );

        let err = io_error(
            "load_snapshot",
            Path::new("missing.json"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(err.kind(), ExErrorKind::Io);
        assert_eq!(err.flow(), Some("missing.json"));
    }
}
