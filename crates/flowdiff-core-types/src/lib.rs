//! Types shared by the FlowDiff engine, loaders and CLI
//!
//! - [`RunId`] and [`BatchId`] correlate log events per flow and per batch
//! - [`Sensitive`] and [`mask_if`] keep sensitive values out of reports
//! - [`schema`] names the structured log fields

pub mod correlation;
pub mod schema;
pub mod sensitive;

pub use correlation::{BatchId, RunId};
pub use sensitive::{mask_if, Sensitive, SENSITIVE_PLACEHOLDER};
