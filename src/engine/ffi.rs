//! Raw C ABI of the rendering engine library
//!
//! Layouts mirror the vendor SDK header. Everything here is `unsafe` to
//! consume; the safe wrappers live in [`super::native`].

#![allow(dead_code)]

use std::ffi::{c_char, c_float, c_int, CStr};

use super::{CpuInfo, EngineRecord};

pub const SYMBOL_INIT_WAD: &str = "oevInitWad";
pub const SYMBOL_READ_CPUID: &str = "oevReadCpuid";
pub const SYMBOL_RUN_RENDERING_TESTS: &str = "oevRunRenderingTests";

/// CPU identification record filled in by `oevReadCpuid`
#[repr(C)]
#[derive(Debug)]
pub struct GvCpuid {
    pub name: *mut c_char,
    pub code_name: *mut c_char,
    pub package: *mut c_char,
    pub vendor_name: *mut c_char,
    pub specification: *mut c_char,
    pub technology: *mut c_char,
    pub instructions: *mut c_char,
    pub max_tdp: c_int,
    pub stepping: c_int,
    pub revision: c_int,
    pub model: c_int,
    pub family: c_int,
    pub ext_model: c_int,
    pub ext_family: c_int,
    pub signature: c_int,
    pub freq_ghz: c_int,
    pub freq_mhz: c_int,
    pub ram_b: c_int,
    pub cores: c_int,
    pub threads: c_int,
}

impl Default for GvCpuid {
    fn default() -> Self {
        Self {
            name: std::ptr::null_mut(),
            code_name: std::ptr::null_mut(),
            package: std::ptr::null_mut(),
            vendor_name: std::ptr::null_mut(),
            specification: std::ptr::null_mut(),
            technology: std::ptr::null_mut(),
            instructions: std::ptr::null_mut(),
            max_tdp: 0,
            stepping: 0,
            revision: 0,
            model: 0,
            family: 0,
            ext_model: 0,
            ext_family: 0,
            signature: 0,
            freq_ghz: 0,
            freq_mhz: 0,
            ram_b: 0,
            cores: 0,
            threads: 0,
        }
    }
}

/// Node of the result list returned by `oevRunRenderingTests`
#[repr(C)]
#[derive(Debug)]
pub struct GvRenderingTestResult {
    pub struct_size: c_int,
    pub index: c_int,
    pub duration: c_int,
    pub fps: c_float,
    pub result: *const c_char,
    pub next: *mut GvRenderingTestResult,
}

pub type InitWadFn = unsafe extern "C" fn(path: *const c_char) -> c_int;
pub type ReadCpuidFn = unsafe extern "C" fn(info: *mut GvCpuid);
pub type RunRenderingTestsFn =
    unsafe extern "C" fn(xml: *const c_char) -> *mut GvRenderingTestResult;

/// Copy a nullable C string
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string valid for reads.
pub unsafe fn owned_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        None
    } else {
        Some(CStr::from_ptr(ptr).to_string_lossy().into_owned())
    }
}

/// Copy the whole result list into owned records
///
/// # Safety
/// `head` must be null or the head of a well-formed, null-terminated list
/// that stays valid for the duration of the call.
pub unsafe fn collect_records(head: *const GvRenderingTestResult) -> Vec<EngineRecord> {
    let mut records = Vec::new();
    let mut node = head;

    while let Some(current) = node.as_ref() {
        records.push(EngineRecord {
            index: current.index,
            duration: current.duration,
            fps: current.fps,
            status: owned_string(current.result),
        });
        node = current.next;
    }

    records
}

impl GvCpuid {
    /// Copy into an owned [`CpuInfo`]
    ///
    /// # Safety
    /// Every string pointer must be null or a valid NUL-terminated string.
    pub unsafe fn to_owned_info(&self) -> CpuInfo {
        CpuInfo {
            name: owned_string(self.name),
            code_name: owned_string(self.code_name),
            package: owned_string(self.package),
            vendor_name: owned_string(self.vendor_name),
            specification: owned_string(self.specification),
            technology: owned_string(self.technology),
            instructions: owned_string(self.instructions),
            max_tdp: self.max_tdp,
            stepping: self.stepping,
            revision: self.revision,
            model: self.model,
            family: self.family,
            ext_model: self.ext_model,
            ext_family: self.ext_family,
            signature: self.signature,
            freq_ghz: self.freq_ghz,
            freq_mhz: self.freq_mhz,
            ram_bytes: self.ram_b,
            cores: self.cores,
            threads: self.threads,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;
    use std::ptr;

    fn node(index: c_int, fps: c_float, result: *const c_char) -> GvRenderingTestResult {
        GvRenderingTestResult {
            struct_size: std::mem::size_of::<GvRenderingTestResult>() as c_int,
            index,
            duration: 5,
            fps,
            result,
            next: ptr::null_mut(),
        }
    }

    #[test]
    fn test_collect_null_list() {
        let records = unsafe { collect_records(ptr::null()) };
        assert!(records.is_empty());
    }

    #[test]
    fn test_collect_linked_list() {
        let ok = CString::new("OK").unwrap();
        let failed = CString::new("Unsupported renderer").unwrap();

        let mut second = node(2, 0.0, failed.as_ptr());
        let mut first = node(1, 143.5, ok.as_ptr());
        first.next = &mut second;

        let records = unsafe { collect_records(&first) };
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].index, 1);
        assert_eq!(records[0].fps, 143.5);
        assert_eq!(records[0].status.as_deref(), Some("OK"));
        assert_eq!(records[1].status.as_deref(), Some("Unsupported renderer"));
    }

    #[test]
    fn test_collect_null_status() {
        let only = node(7, 10.0, ptr::null());
        let records = unsafe { collect_records(&only) };
        assert_eq!(records.len(), 1);
        assert!(records[0].status.is_none());
    }

    #[test]
    fn test_cpuid_to_owned() {
        let spec = CString::new("Intel(R) Core(TM) i9").unwrap();
        let cpuid = GvCpuid {
            specification: spec.as_ptr() as *mut c_char,
            cores: 8,
            threads: 16,
            ..GvCpuid::default()
        };

        let info = unsafe { cpuid.to_owned_info() };
        assert_eq!(info.specification.as_deref(), Some("Intel(R) Core(TM) i9"));
        assert!(info.name.is_none());
        assert_eq!(info.cores, 8);
        assert_eq!(info.threads, 16);
    }
}
