//! Utility modules for common functionality
//!
//! Provides subprocess execution with timeouts and output capture.

pub mod process;

pub use process::{Executor, RunOptions};
