//! Data models for rendering tests
//!
//! This module contains all data structures used throughout the application.

mod render_config;
mod test_result;

pub use render_config::{FramebufferFormat, FramebufferType, RendererType, SceneType, TestConfig};
pub use test_result::{RunSummary, TestResult};
