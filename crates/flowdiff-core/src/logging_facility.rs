//! Structured logging for flow evaluation
//!
//! `init` installs the process subscriber from a [`Profile`]. The
//! `log_op_*` macros mark operation boundaries, and `test_capture` records
//! those boundaries so tests can assert on them.

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, LogCapture};
