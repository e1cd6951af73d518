//! Boundary to the external flow comparator
//!
//! Finding structural differences is not this crate's job. A comparator
//! receives both configuration trees with their parameter contexts and
//! returns an unordered set of difference records.

use indexmap::IndexMap;

use crate::diff::FlowDifference;
use crate::errors::Result;
use crate::model::{FlowSnapshot, ParameterContext, ProcessGroup};

/// One side of a comparison
#[derive(Debug, Clone, Copy)]
pub struct ComparableFlow<'a> {
    pub contents: &'a ProcessGroup,
    pub parameter_contexts: &'a IndexMap<String, ParameterContext>,
}

impl<'a> From<&'a FlowSnapshot> for ComparableFlow<'a> {
    fn from(snapshot: &'a FlowSnapshot) -> Self {
        Self {
            contents: &snapshot.flow_contents,
            parameter_contexts: &snapshot.parameter_contexts,
        }
    }
}

pub trait FlowComparator {
    /// Differences between `before` and `after`, in no particular order
    ///
    /// # Errors
    ///
    /// Implementation specific; a failure fails the evaluation of that flow.
    fn compare(
        &self,
        before: ComparableFlow<'_>,
        after: ComparableFlow<'_>,
    ) -> Result<Vec<FlowDifference>>;
}

/// Replays a difference set computed ahead of time
///
/// Used when the comparator runs out of process and hands over its result
/// as a document.
#[derive(Debug, Clone, Default)]
pub struct RecordedComparator {
    differences: Vec<FlowDifference>,
}

impl RecordedComparator {
    pub fn new(differences: Vec<FlowDifference>) -> Self {
        Self { differences }
    }
}

impl FlowComparator for RecordedComparator {
    fn compare(
        &self,
        _before: ComparableFlow<'_>,
        _after: ComparableFlow<'_>,
    ) -> Result<Vec<FlowDifference>> {
        Ok(self.differences.clone())
    }
}
