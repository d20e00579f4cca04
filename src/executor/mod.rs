//! Test execution
//!
//! Runs rendering tests one after another through the engine binding.

mod runner;

pub use runner::{interpret_output, RenderingTester, CPU_INFO_UNAVAILABLE, NO_RESULTS_MESSAGE};
