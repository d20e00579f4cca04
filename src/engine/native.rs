//! Dynamically loaded engine library

use libloading::{Library, Symbol};
use std::ffi::CString;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::ffi::{
    self, GvCpuid, InitWadFn, ReadCpuidFn, RunRenderingTestsFn, SYMBOL_INIT_WAD,
    SYMBOL_READ_CPUID, SYMBOL_RUN_RENDERING_TESTS,
};
use super::{CpuInfo, EngineError, EngineRecord, RenderingEngine};

/// Engine library with its three entry points resolved
///
/// The library handle is owned exclusively and released on drop. The entry
/// points are plain function pointers copied out of the library, so the
/// handle must outlive them; it is declared last to drop last.
pub struct NativeEngine {
    path: PathBuf,
    init_wad: InitWadFn,
    read_cpuid: ReadCpuidFn,
    run_tests: RunRenderingTestsFn,
    _library: Library,
}

impl NativeEngine {
    /// Load the library at `path` and resolve all entry points.
    ///
    /// Fails if the library cannot be loaded or any entry point is missing.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref().to_path_buf();
        debug!("Loading engine library {}", path.display());

        // SAFETY: loading runs the library's initializers; the engine
        // library is a trusted vendor binary.
        let library = unsafe { Library::new(&path) }.map_err(|source| EngineError::LibraryLoad {
            path: path.clone(),
            source,
        })?;

        // SAFETY: the signatures match the vendor SDK header.
        let (init_wad, read_cpuid, run_tests) = unsafe {
            (
                resolve::<InitWadFn>(&library, SYMBOL_INIT_WAD, &path)?,
                resolve::<ReadCpuidFn>(&library, SYMBOL_READ_CPUID, &path)?,
                resolve::<RunRenderingTestsFn>(&library, SYMBOL_RUN_RENDERING_TESTS, &path)?,
            )
        };

        info!("Engine library loaded from {}", path.display());

        Ok(Self {
            path,
            init_wad,
            read_cpuid,
            run_tests,
            _library: library,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

unsafe fn resolve<T: Copy>(
    library: &Library,
    name: &'static str,
    path: &Path,
) -> Result<T, EngineError> {
    let symbol: Symbol<T> = library
        .get(name.as_bytes())
        .map_err(|_| EngineError::MissingSymbol(name, path.to_path_buf()))?;
    Ok(*symbol)
}

fn to_c_string(value: &str) -> Result<CString, EngineError> {
    CString::new(value).map_err(|e| EngineError::InvalidPayload(e.to_string()))
}

impl RenderingEngine for NativeEngine {
    fn init_resource_package(&self, path: &str) -> Result<i32, EngineError> {
        let path = to_c_string(path)?;
        // SAFETY: `path` is a valid NUL-terminated string for the call.
        Ok(unsafe { (self.init_wad)(path.as_ptr()) })
    }

    fn read_cpu_info(&self) -> CpuInfo {
        let mut raw = GvCpuid::default();
        // SAFETY: `raw` is a properly laid out, writable gvCpuid; the engine
        // fills in pointers to strings it owns, which are copied right away.
        unsafe {
            (self.read_cpuid)(&mut raw);
            raw.to_owned_info()
        }
    }

    fn run_rendering_tests(&self, xml: &str) -> Result<Option<Vec<EngineRecord>>, EngineError> {
        let payload = to_c_string(xml)?;
        // SAFETY: `payload` outlives the call. The returned list is owned by
        // the engine and stays valid until the next call, so it is copied
        // before returning.
        let head = unsafe { (self.run_tests)(payload.as_ptr()) };
        if head.is_null() {
            return Ok(None);
        }
        Ok(Some(unsafe { ffi::collect_records(head) }))
    }
}
