//! Redaction of sensitive values
//!
//! Parameter and property values flagged sensitive in a snapshot never reach
//! a report line, a violation message or a log field.

use std::fmt;

/// Text printed in place of a sensitive value
pub const SENSITIVE_PLACEHOLDER: &str = "<Sensitive Value>";

/// Holder whose `Debug` and `Display` both print [`SENSITIVE_PLACEHOLDER`]
///
/// ```
/// use flowdiff_core_types::Sensitive;
///
/// let token = Sensitive::new("ghp_123".to_string());
/// assert_eq!(format!("{} {:?}", token, token), "<Sensitive Value> <Sensitive Value>");
/// assert_eq!(token.expose(), "ghp_123");
/// ```
#[derive(Clone)]
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    pub fn expose(&self) -> &T {
        &self.0
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(SENSITIVE_PLACEHOLDER)
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Report text for a property or parameter value
///
/// Sensitive values print the placeholder whether set or not; absent plain
/// values print `null`.
pub fn mask_if(sensitive: bool, value: Option<&str>) -> String {
    if sensitive {
        return SENSITIVE_PLACEHOLDER.to_string();
    }
    value.unwrap_or("null").to_string()
}
