//! Configuration
//!
//! Settings are layered: built-in defaults, then the config file, then
//! `RENDER_TESTER_*` environment variables, then command-line flags.

#![allow(dead_code)]

mod env;
mod file;
mod profile;

pub use env::{print_env_help, EnvConfig};
pub use file::ConfigFile;
pub use profile::{ProfileManager, SuiteProfile};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::engine::DEFAULT_RESOURCE_PACKAGE;

/// Application settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding the engine library; the loader's search path if unset
    pub library_dir: Option<PathBuf>,

    /// Resource package handed to the engine at initialization
    pub resource: String,

    /// Default output format
    pub format: String,

    /// Where runs are stored; the platform data directory if unset
    pub results_dir: Option<PathBuf>,

    /// Debug logging
    pub verbose: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            library_dir: None,
            resource: DEFAULT_RESOURCE_PACKAGE.to_string(),
            format: "table".to_string(),
            results_dir: None,
            verbose: false,
        }
    }
}

impl AppConfig {
    /// Override settings with whatever the environment provides
    pub fn apply_env(&mut self, env: &EnvConfig) {
        if let Some(dir) = &env.library_dir {
            self.library_dir = Some(PathBuf::from(dir));
        }
        if let Some(resource) = &env.resource {
            self.resource = resource.clone();
        }
        if let Some(format) = &env.format {
            self.format = format.clone();
        }
        if let Some(dir) = &env.results_dir {
            self.results_dir = Some(PathBuf::from(dir));
        }
        if let Some(verbose) = env.verbose {
            self.verbose = verbose;
        }
    }
}
