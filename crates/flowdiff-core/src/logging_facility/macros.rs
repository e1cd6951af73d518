//! Canonical logging macros
//!
//! Every evaluation boundary (flow, batch, rule pass, loader) emits exactly
//! one start event and one end or end_error event, each tagged with the
//! calling module, the operation name and the event name.

/// Emit one boundary event at `$level`
#[doc(hidden)]
#[macro_export]
macro_rules! __log_op_event {
    ($level:ident, $op:expr, $event:expr) => {
        $crate::tracing::$level!(component = module_path!(), op = $op, event = $event)
    };
    ($level:ident, $op:expr, $event:expr, $($field:tt)*) => {
        $crate::tracing::$level!(component = module_path!(), op = $op, event = $event, $($field)*)
    };
}

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use flowdiff_core::log_op_start;
/// log_op_start!("evaluate_flow");
/// log_op_start!("evaluate_flow", flow_name = "ingest");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        $crate::__log_op_event!(info, $op, $crate::schema::EVENT_START)
    };
    ($op:expr, $($field:tt)*) => {
        $crate::__log_op_event!(info, $op, $crate::schema::EVENT_START, $($field)*)
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use flowdiff_core::log_op_end;
/// log_op_end!("evaluate_flow", duration_ms = 42);
/// log_op_end!("evaluate_flow", duration_ms = 42, violation_count = 3);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        $crate::__log_op_event!(info, $op, $crate::schema::EVENT_END, duration_ms = $duration)
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        $crate::__log_op_event!(
            info,
            $op,
            $crate::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        )
    };
}

/// Log the failed end of an operation
///
/// Accepts anything convertible into [`ExError`](crate::errors::ExError) and
/// records its kind and stable code.
///
/// # Example
///
/// ```
/// # use flowdiff_core::log_op_error;
/// # use flowdiff_core::errors::FlowDiffError;
/// let err = FlowDiffError::InvalidRulesConfig { reason: "bad".to_string() };
/// log_op_error!("load_rules", err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::__log_op_event!(
            error,
            $op,
            $crate::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            message = %ex_err
        )
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::__log_op_event!(
            error,
            $op,
            $crate::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            message = %ex_err,
            $($field)*
        )
    }};
}
