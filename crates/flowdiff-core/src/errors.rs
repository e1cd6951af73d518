//! Error types for flow evaluation
//!
//! [`ExError`] is what crosses crate boundaries and what the CLI prints:
//! a kind with a stable code plus where the failure happened. Domain
//! failures are raised as [`FlowDiffError`] and converted on the way out.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExError>;

/// Failure classes with stable codes for CI log scraping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    InvalidInput,
    InvalidConfig,
    InvalidPattern,
    InvalidSnapshot,
    MissingField,
    NotFound,
    /// The comparator produced a difference inconsistent with the snapshots
    ContractViolation,
    Io,
    Serialization,
    ExternalService,
    Internal,
}

impl ExErrorKind {
    pub fn code(&self) -> &'static str {
        use ExErrorKind::*;
        match self {
            InvalidInput => "ERR_INVALID_INPUT",
            InvalidConfig => "ERR_INVALID_CONFIG",
            InvalidPattern => "ERR_INVALID_PATTERN",
            InvalidSnapshot => "ERR_INVALID_SNAPSHOT",
            MissingField => "ERR_MISSING_FIELD",
            NotFound => "ERR_NOT_FOUND",
            ContractViolation => "ERR_CONTRACT_VIOLATION",
            Io => "ERR_IO",
            Serialization => "ERR_SERIALIZATION",
            ExternalService => "ERR_EXTERNAL_SERVICE",
            Internal => "ERR_INTERNAL",
        }
    }
}

/// Where an error happened, as far as the raising code knows
#[derive(Debug, Clone, Default)]
struct Location {
    op: Option<String>,
    flow: Option<String>,
    rule: Option<String>,
    component: Option<String>,
}

/// Structured error carried across the workspace
///
/// Built fluently from a kind:
///
/// ```
/// use flowdiff_core::errors::{ExError, ExErrorKind};
///
/// let err = ExError::new(ExErrorKind::Io)
///     .with_op("load_snapshot")
///     .with_flow("flows/ingest.json")
///     .with_message("permission denied");
/// assert_eq!(
///     err.to_string(),
///     "[ERR_IO] load_snapshot: permission denied (flow: flows/ingest.json)"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    message: String,
    at: Location,
    source: Option<Box<ExError>>,
}

impl ExError {
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            message: String::new(),
            at: Location::default(),
            source: None,
        }
    }

    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.at.op = Some(op.into());
        self
    }

    /// Flow name, or the snapshot path when the name is not known yet
    pub fn with_flow(mut self, flow: impl Into<String>) -> Self {
        self.at.flow = Some(flow.into());
        self
    }

    pub fn with_rule_id(mut self, rule_id: impl Into<String>) -> Self {
        self.at.rule = Some(rule_id.into());
        self
    }

    pub fn with_component_id(mut self, id: impl Into<String>) -> Self {
        self.at.component = Some(id.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.at.op.as_deref()
    }

    pub fn flow(&self) -> Option<&str> {
        self.at.flow.as_deref()
    }

    pub fn component_id(&self) -> Option<&str> {
        self.at.component.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        match (&self.at.op, self.message.is_empty()) {
            (Some(op), false) => write!(f, " {}: {}", op, self.message)?,
            (Some(op), true) => write!(f, " {}", op)?,
            (None, false) => write!(f, " {}", self.message)?,
            (None, true) => {}
        }
        let context = [
            ("flow", &self.at.flow),
            ("rule", &self.at.rule),
            ("component", &self.at.component),
        ];
        for (label, value) in context {
            if let Some(value) = value {
                write!(f, " ({}: {})", label, value)?;
            }
        }
        if let Some(source) = &self.source {
            write!(f, "; caused by {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|s| s as &(dyn std::error::Error + 'static))
    }
}

/// Domain error taxonomy for FlowDiff evaluation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlowDiffError {
    // ===== Configuration Errors =====
    /// The rules document could not be parsed
    #[error("Invalid checkstyle rules document: {reason}")]
    InvalidRulesConfig { reason: String },

    /// A flow-name pattern is not a valid regular expression
    #[error("Invalid flow name pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    // ===== Snapshot Errors =====
    /// The snapshot could not be parsed
    #[error("Invalid flow snapshot {path}: {reason}")]
    InvalidSnapshot { path: String, reason: String },

    /// A flow with a previous version came without its difference document
    #[error("Difference set unavailable for {path}: a previous snapshot was given without a difference document")]
    MissingDifferences { path: String },

    /// Old and new snapshot lists have different lengths
    #[error("Mismatched snapshot lists: {before} old snapshot(s) for {after} new snapshot(s)")]
    MismatchedSnapshotLists { before: usize, after: usize },

    // ===== Comparator Contract Errors =====
    /// A difference references a parameter missing from its context
    #[error("Parameter `{parameter}` not found in parameter context `{context}`")]
    ParameterNotFound { context: String, parameter: String },

    /// A difference references a parameter context missing from the snapshot
    #[error("Parameter context `{context}` not found in the snapshot")]
    ParameterContextNotFound { context: String },

    /// A component names an owning process group missing from the snapshot
    #[error("Process group `{group_id}` not found in the snapshot")]
    ProcessGroupNotFound { group_id: String },

    /// A difference lacks a component its kind requires
    #[error("{difference_type} difference is missing component {side}")]
    MissingComponent {
        difference_type: String,
        side: &'static str,
    },

    /// A difference lacks the field name its kind requires
    #[error("{difference_type} difference is missing its field name")]
    MissingFieldName { difference_type: String },

    /// A difference carries a component of the wrong kind
    #[error("{difference_type} difference expected a {expected} component, got {actual}")]
    UnexpectedComponent {
        difference_type: String,
        expected: &'static str,
        actual: String,
    },

    /// A difference carries a value of the wrong shape
    #[error("{difference_type} difference expected {expected} values")]
    UnexpectedValue {
        difference_type: String,
        expected: &'static str,
    },
}

impl From<FlowDiffError> for ExError {
    fn from(err: FlowDiffError) -> Self {
        let message = err.to_string();
        match err {
            FlowDiffError::InvalidRulesConfig { .. } => {
                ExError::new(ExErrorKind::InvalidConfig).with_message(message)
            }
            FlowDiffError::InvalidPattern { .. } => {
                ExError::new(ExErrorKind::InvalidPattern).with_message(message)
            }
            FlowDiffError::InvalidSnapshot { path, .. } => {
                ExError::new(ExErrorKind::InvalidSnapshot)
                    .with_flow(path)
                    .with_message(message)
            }
            FlowDiffError::MissingDifferences { path } => ExError::new(ExErrorKind::InvalidInput)
                .with_flow(path)
                .with_message(message),
            FlowDiffError::MismatchedSnapshotLists { .. } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(message)
            }
            FlowDiffError::ParameterNotFound { context, .. }
            | FlowDiffError::ParameterContextNotFound { context } => {
                ExError::new(ExErrorKind::ContractViolation)
                    .with_component_id(context)
                    .with_message(message)
            }
            FlowDiffError::ProcessGroupNotFound { group_id } => {
                ExError::new(ExErrorKind::ContractViolation)
                    .with_component_id(group_id)
                    .with_message(message)
            }
            FlowDiffError::MissingComponent { .. }
            | FlowDiffError::MissingFieldName { .. }
            | FlowDiffError::UnexpectedComponent { .. }
            | FlowDiffError::UnexpectedValue { .. } => {
                ExError::new(ExErrorKind::ContractViolation).with_message(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(ExErrorKind::InvalidConfig.code(), "ERR_INVALID_CONFIG");
        assert_eq!(
            ExErrorKind::ContractViolation.code(),
            "ERR_CONTRACT_VIOLATION"
        );
        assert_eq!(ExErrorKind::Io.code(), "ERR_IO");
    }

    #[test]
    fn test_display_includes_context() {
        let err = ExError::new(ExErrorKind::InvalidSnapshot)
            .with_op("load_snapshot")
            .with_flow("flows/a.json")
            .with_rule_id("noSelfLoop")
            .with_message("not valid JSON");
        assert_eq!(
            err.to_string(),
            "[ERR_INVALID_SNAPSHOT] load_snapshot: not valid JSON (flow: flows/a.json) (rule: noSelfLoop)"
        );
        assert_eq!(ExError::new(ExErrorKind::Internal).to_string(), "[ERR_INTERNAL]");
    }

    #[test]
    fn test_parameter_not_found_is_contract_violation() {
        let err: ExError = FlowDiffError::ParameterNotFound {
            context: "ctx".to_string(),
            parameter: "p".to_string(),
        }
        .into();
        assert_eq!(err.kind(), ExErrorKind::ContractViolation);
        assert_eq!(err.component_id(), Some("ctx"));
        assert!(err.message().contains("`p`"));
    }

    #[test]
    fn test_source_chain() {
        let inner = ExError::new(ExErrorKind::Io).with_message("disk gone");
        let outer = ExError::new(ExErrorKind::InvalidSnapshot).with_source(inner);
        assert_eq!(outer.source_error().map(|e| e.kind()), Some(ExErrorKind::Io));
        assert!(std::error::Error::source(&outer).is_some());
    }
}
