//! External process invocation with streaming output capture.

pub mod capture;
pub mod runner;

pub use capture::LogPreview;
pub use runner::{run, RunOutcome, RunSpec, RunStatus};
