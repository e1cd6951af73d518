//! Built-in checkstyle rules
//!
//! Tree-walking rules visit child groups before the group's own components;
//! parameter rules visit contexts and parameters in document order.

mod backpressure_threshold;
mod concurrent_tasks;
mod default_parameters;
mod empty_parameter;
mod enforce_prioritizer;
mod no_self_loop;
mod snapshot_metadata;
mod unused_parameter;

pub use backpressure_threshold::BackpressureThresholdRule;
pub use concurrent_tasks::ConcurrentTasksRule;
pub use default_parameters::DefaultParametersRule;
pub use empty_parameter::EmptyParameterRule;
pub use enforce_prioritizer::EnforcePrioritizerRule;
pub use no_self_loop::NoSelfLoopRule;
pub use snapshot_metadata::SnapshotMetadataRule;
pub use unused_parameter::UnusedParameterRule;

use crate::model::{FlowSnapshot, Parameter};

/// Every parameter of every context, in document order
fn all_parameters(snapshot: &FlowSnapshot) -> impl Iterator<Item = &Parameter> {
    snapshot
        .parameter_contexts
        .values()
        .flat_map(|context| context.parameters.iter())
}
