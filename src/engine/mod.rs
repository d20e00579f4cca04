//! Rendering engine binding
//!
//! The benchmark engine is a closed, pre-built native library reached
//! through three C entry points. [`RenderingEngine`] is the seam the
//! tester talks to; [`NativeEngine`] is the dynamically loaded binding.

mod ffi;
mod native;

pub use native::NativeEngine;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Base name of the engine library, without platform prefix/suffix
pub const LIBRARY_NAME: &str = "infogl";

/// Resource package loaded when none is configured
pub const DEFAULT_RESOURCE_PACKAGE: &str = "GLVIEW.RMX";

/// Status string the engine reports for a successful test
pub const STATUS_OK: &str = "OK";

/// Engine binding errors
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Failed to load {}: {source}", .path.display())]
    LibraryLoad {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },

    #[error("Missing entry point {} in {}", .0, .1.display())]
    MissingSymbol(&'static str, PathBuf),

    #[error("Failed to initialize resource package: {path} (status {status})")]
    ResourcePackage { path: String, status: i32 },

    #[error("Invalid test payload: {0}")]
    InvalidPayload(String),

    #[error("Engine call did not complete: {0}")]
    TaskFailed(String),
}

/// One node of the engine's result list, copied out of native memory
#[derive(Clone, Debug, PartialEq)]
pub struct EngineRecord {
    pub index: i32,
    /// Duration reported by the engine, in seconds
    pub duration: i32,
    pub fps: f32,
    /// `None` when the engine left the status string null
    pub status: Option<String>,
}

impl EngineRecord {
    pub fn is_ok(&self) -> bool {
        self.status.as_deref() == Some(STATUS_OK)
    }
}

/// CPU identification as reported by the engine
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CpuInfo {
    pub name: Option<String>,
    pub code_name: Option<String>,
    pub package: Option<String>,
    pub vendor_name: Option<String>,
    pub specification: Option<String>,
    pub technology: Option<String>,
    pub instructions: Option<String>,
    pub max_tdp: i32,
    pub stepping: i32,
    pub revision: i32,
    pub model: i32,
    pub family: i32,
    pub ext_model: i32,
    pub ext_family: i32,
    pub signature: i32,
    pub freq_ghz: i32,
    pub freq_mhz: i32,
    pub ram_bytes: i32,
    pub cores: i32,
    pub threads: i32,
}

/// Operations exposed by the rendering engine
///
/// Calls block until the engine returns.
pub trait RenderingEngine: Send + Sync {
    /// Load the resource package. A negative status means it was rejected.
    fn init_resource_package(&self, path: &str) -> Result<i32, EngineError>;

    fn read_cpu_info(&self) -> CpuInfo;

    /// Run the tests described by `xml`.
    ///
    /// `Ok(None)` when the engine returned no result list at all.
    fn run_rendering_tests(&self, xml: &str) -> Result<Option<Vec<EngineRecord>>, EngineError>;
}

/// Platform file name of the engine library (`infogl.dll`, `libinfogl.so`, ...)
pub fn library_file_name() -> PathBuf {
    PathBuf::from(libloading::library_filename(LIBRARY_NAME))
}

/// Resolve the library path, optionally inside `dir`
pub fn library_path(dir: Option<&Path>) -> PathBuf {
    match dir {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(library_file_name()),
        _ => library_file_name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_path() {
        let bare = library_path(None);
        assert!(bare.to_string_lossy().contains(LIBRARY_NAME));
        assert_eq!(bare.parent(), Some(Path::new("")));

        let nested = library_path(Some(Path::new("vendor")));
        assert!(nested.starts_with("vendor"));
        assert_eq!(nested.file_name(), bare.file_name());

        assert_eq!(library_path(Some(Path::new(""))), bare);
    }

    #[test]
    fn test_record_status() {
        let mut record = EngineRecord {
            index: 1,
            duration: 5,
            fps: 60.0,
            status: Some("OK".to_string()),
        };
        assert!(record.is_ok());

        record.status = Some("ok".to_string());
        assert!(!record.is_ok());

        record.status = None;
        assert!(!record.is_ok());
    }

    #[test]
    fn test_error_messages() {
        let err = EngineError::ResourcePackage {
            path: "GLVIEW.RMX".to_string(),
            status: -1,
        };
        assert_eq!(
            err.to_string(),
            "Failed to initialize resource package: GLVIEW.RMX (status -1)"
        );
    }
}
