//! Shared helpers

mod logger;
mod timer;

pub use logger::{init_logger, LogLevel};
pub use timer::{format_duration_ms, Timer};
