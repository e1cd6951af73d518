//! Field keys and event names of the structured log
//!
//! The logging macros emit these keys; the test capture layer and log
//! assertions read them back.

pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

pub const FIELD_FLOW_NAME: &str = "flow_name";
pub const FIELD_VIOLATION_COUNT: &str = "violation_count";

pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
