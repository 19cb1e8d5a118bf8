// In: src/backend/accelerated.rs

//! The accelerated backend: a table of native `demopy_*` entry points.
//!
//! The table is filled either from the kernels linked into this process
//! (feature `native`) or from a shared library opened with `libloading`. In the
//! latter case the `Library` handle is owned by the backend, so the function
//! pointers stay valid for as long as the backend lives.

use libloading::{Library, Symbol};
use std::ffi::{c_char, CStr};
use std::fmt;
use std::path::{Path, PathBuf};

use super::{Backend, BackendKind, Number};
use crate::error::DemopyError;
use crate::ffi::native::{KernelStatus, ABI_VERSION};

//==================================================================================
// 1. Native Function Signatures
//==================================================================================

type FnAbiVersion = unsafe extern "C" fn() -> u32;
type FnHello = unsafe extern "C" fn() -> *const c_char;
type FnAdd = unsafe extern "C" fn(a: i64, b: i64, out: *mut i64) -> i32;
type FnMultiply = unsafe extern "C" fn(a: f64, b: f64) -> f64;
type FnSumList = unsafe extern "C" fn(values: *const i64, len: usize, out: *mut i64) -> i32;
type FnReverseString =
    unsafe extern "C" fn(input: *const u8, input_len: usize, output: *mut u8, output_cap: usize) -> i32;
type FnPower =
    unsafe extern "C" fn(base: i64, exponent: i64, out_int: *mut i64, out_float: *mut f64) -> i32;

/// Native API function pointers.
#[derive(Clone, Copy)]
struct NativeKernels {
    abi_version: FnAbiVersion,
    hello: FnHello,
    add: FnAdd,
    multiply: FnMultiply,
    sum_list: FnSumList,
    reverse_string: FnReverseString,
    power: FnPower,
}

impl NativeKernels {
    #[cfg(feature = "native")]
    fn linked() -> Self {
        use crate::ffi::native;
        Self {
            abi_version: native::demopy_abi_version,
            hello: native::demopy_hello,
            add: native::demopy_add,
            multiply: native::demopy_multiply,
            sum_list: native::demopy_sum_list,
            reverse_string: native::demopy_reverse_string,
            power: native::demopy_power,
        }
    }

    /// Resolves every symbol of the ABI from `lib`.
    ///
    /// # Safety
    /// The library must export the `demopy_*` symbols with the signatures above.
    /// The returned pointers are only valid while `lib` is loaded.
    unsafe fn from_library(lib: &Library) -> Result<Self, DemopyError> {
        let abi_version: Symbol<FnAbiVersion> = lib.get(b"demopy_abi_version\0")?;
        let hello: Symbol<FnHello> = lib.get(b"demopy_hello\0")?;
        let add: Symbol<FnAdd> = lib.get(b"demopy_add\0")?;
        let multiply: Symbol<FnMultiply> = lib.get(b"demopy_multiply\0")?;
        let sum_list: Symbol<FnSumList> = lib.get(b"demopy_sum_list\0")?;
        let reverse_string: Symbol<FnReverseString> = lib.get(b"demopy_reverse_string\0")?;
        let power: Symbol<FnPower> = lib.get(b"demopy_power\0")?;

        Ok(Self {
            abi_version: *abi_version,
            hello: *hello,
            add: *add,
            multiply: *multiply,
            sum_list: *sum_list,
            reverse_string: *reverse_string,
            power: *power,
        })
    }

    fn check_abi(&self) -> Result<(), DemopyError> {
        let found = unsafe { (self.abi_version)() };
        if found != ABI_VERSION {
            return Err(DemopyError::AbiMismatch {
                expected: ABI_VERSION,
                found,
            });
        }
        Ok(())
    }
}

//==================================================================================
// 2. The Backend
//==================================================================================

/// Where an `AcceleratedBackend` got its kernels from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KernelSource {
    /// The kernels compiled into this process.
    Linked,
    /// A shared library opened at runtime.
    Library(PathBuf),
}

impl fmt::Display for KernelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelSource::Linked => f.write_str("linked"),
            KernelSource::Library(path) => write!(f, "{}", path.display()),
        }
    }
}

pub struct AcceleratedBackend {
    kernels: NativeKernels,
    source: KernelSource,
    // Keeps the library mapped while `kernels` points into it.
    _library: Option<Library>,
}

impl AcceleratedBackend {
    /// Uses the kernels linked into this process.
    #[cfg(feature = "native")]
    pub fn linked() -> Result<Self, DemopyError> {
        let kernels = NativeKernels::linked();
        kernels.check_abi()?;
        Ok(Self {
            kernels,
            source: KernelSource::Linked,
            _library: None,
        })
    }

    /// Opens `path`, resolves the full ABI and checks its version.
    pub fn load(path: &Path) -> Result<Self, DemopyError> {
        log::debug!("Attempting to load native kernels from: {}", path.display());

        // Safety: loading runs the library's initializers, and the symbol
        // signatures must match the ABI. Both are the contract of `demopy_*`
        // libraries; a mismatched version is rejected before any other call.
        let (library, kernels) = unsafe {
            let library = Library::new(path)?;
            let kernels = NativeKernels::from_library(&library)?;
            (library, kernels)
        };
        kernels.check_abi()?;

        Ok(Self {
            kernels,
            source: KernelSource::Library(path.to_path_buf()),
            _library: Some(library),
        })
    }

    pub fn kernel_source(&self) -> &KernelSource {
        &self.source
    }
}

impl fmt::Debug for AcceleratedBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AcceleratedBackend")
            .field("source", &self.source)
            .finish()
    }
}

impl Backend for AcceleratedBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Accelerated
    }

    fn source(&self) -> String {
        self.source.to_string()
    }

    fn hello(&self) -> String {
        let ptr = unsafe { (self.kernels.hello)() };
        if ptr.is_null() {
            log::warn!("demopy_hello from {} returned a null pointer", self.source);
            return String::new();
        }
        // Safety: the ABI promises a static NUL-terminated string.
        unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
    }

    fn add(&self, a: i64, b: i64) -> Result<i64, DemopyError> {
        let mut out = 0i64;
        let status = unsafe { (self.kernels.add)(a, b, &mut out) };
        KernelStatus::check(status, "add")?;
        Ok(out)
    }

    fn multiply(&self, a: f64, b: f64) -> f64 {
        unsafe { (self.kernels.multiply)(a, b) }
    }

    fn sum_list(&self, numbers: &[i64]) -> Result<i64, DemopyError> {
        let mut out = 0i64;
        let status = unsafe { (self.kernels.sum_list)(numbers.as_ptr(), numbers.len(), &mut out) };
        KernelStatus::check(status, "sum_list")?;
        Ok(out)
    }

    fn reverse_string(&self, s: &str) -> Result<String, DemopyError> {
        let mut buf = vec![0u8; s.len()];
        let status = unsafe {
            (self.kernels.reverse_string)(s.as_ptr(), s.len(), buf.as_mut_ptr(), buf.len())
        };
        KernelStatus::check(status, "reverse_string")?;
        String::from_utf8(buf).map_err(|_| DemopyError::InvalidUtf8)
    }

    fn power(&self, base: i64, exponent: i64) -> Result<Number, DemopyError> {
        let (mut int_out, mut float_out) = (0i64, 0f64);
        let status =
            unsafe { (self.kernels.power)(base, exponent, &mut int_out, &mut float_out) };
        match KernelStatus::check_power(status)? {
            KernelStatus::OkFloat => Ok(Number::Float(float_out)),
            _ => Ok(Number::Int(int_out)),
        }
    }
}
