//! Structural differences: model, deterministic ordering and rendering
//!
//! ## Guarantees
//!
//! - **Determinism**: the same difference set renders to byte-identical
//!   lines regardless of the order the comparator returned it in.
//! - **Redaction**: values of sensitive properties and parameters are
//!   replaced by `<Sensitive Value>`.
//! - **Forward compatibility**: unknown difference kinds render through a
//!   generic fallback instead of failing.

pub mod describe;
pub mod model;
pub mod order;
pub mod render;

pub use model::{DiffValue, DifferenceType, FlowDifference};
pub use order::order_differences;
pub use render::{render, Rendered};
