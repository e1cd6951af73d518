//! FlowDiff Store - loading the documents a run works from
//!
//! Provides:
//! - Flow snapshots exported by the registry (JSON)
//! - Checkstyle rules documents (YAML)
//! - Difference sets recorded by an out-of-process comparator (JSON)

pub mod differences;
pub mod errors;
pub mod rules;
pub mod snapshot;

// Re-export key types
pub use errors::Result;
