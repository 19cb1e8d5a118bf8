// In: src/ffi/native.rs

//! The stable C ABI exported by the `demopy_gb_jj` cdylib.
//!
//! Any shared library exporting these `demopy_*` symbols with a matching
//! `demopy_abi_version()` can serve as the accelerated backend. The crate's own
//! cdylib is one such library, and with feature `native` the same functions are
//! linked straight into the process.
//!
//! Contracts shared by every export:
//! * Fallible functions return an `i32` status (`KernelStatus`) and write results
//!   through out-pointers only on success.
//! * Input buffers are never written to.
//! * No export panics or unwinds across the boundary.

use std::ffi::c_char;

use crate::error::DemopyError;
use crate::kernels::{arith, text};

/// Bumped whenever a symbol's signature or semantics change.
pub const ABI_VERSION: u32 = 1;

static NATIVE_GREETING_C: &[u8] = b"Hello from demopy_gb_jj (native edition)!\0";

//==================================================================================
// 1. Status Codes
//==================================================================================

#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelStatus {
    Ok = 0,
    /// `demopy_power` wrote its float out-pointer instead of the integer one.
    OkFloat = 1,
    Overflow = -1,
    ZeroToNegativePower = -2,
    InvalidUtf8 = -3,
    BufferTooSmall = -4,
    NullPointer = -5,
    /// Any other kernel failure.
    Internal = -6,
}

impl KernelStatus {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(KernelStatus::Ok),
            1 => Some(KernelStatus::OkFloat),
            -1 => Some(KernelStatus::Overflow),
            -2 => Some(KernelStatus::ZeroToNegativePower),
            -3 => Some(KernelStatus::InvalidUtf8),
            -4 => Some(KernelStatus::BufferTooSmall),
            -5 => Some(KernelStatus::NullPointer),
            -6 => Some(KernelStatus::Internal),
            _ => None,
        }
    }

    /// Translates the status of a call that writes a single out-pointer,
    /// attributing overflow to `op`. Only `Ok` counts as success.
    pub fn check(code: i32, op: &'static str) -> Result<(), DemopyError> {
        match KernelStatus::from_code(code) {
            Some(KernelStatus::Ok) => Ok(()),
            status => Err(KernelStatus::failure(status, code, op)),
        }
    }

    /// Like `check`, for `demopy_power`, which may also succeed with `OkFloat`.
    pub fn check_power(code: i32) -> Result<KernelStatus, DemopyError> {
        match KernelStatus::from_code(code) {
            Some(status @ (KernelStatus::Ok | KernelStatus::OkFloat)) => Ok(status),
            status => Err(KernelStatus::failure(status, code, "power")),
        }
    }

    fn failure(status: Option<KernelStatus>, code: i32, op: &'static str) -> DemopyError {
        match status {
            Some(KernelStatus::Overflow) => DemopyError::Overflow { op },
            Some(KernelStatus::ZeroToNegativePower) => DemopyError::ZeroToNegativePower,
            Some(KernelStatus::InvalidUtf8) => DemopyError::InvalidUtf8,
            Some(KernelStatus::BufferTooSmall) => DemopyError::BufferTooSmall,
            Some(KernelStatus::NullPointer) => DemopyError::KernelArgument("null pointer"),
            // A success code where it is not allowed is as unexpected as an unknown one.
            _ => DemopyError::KernelStatus(code),
        }
    }

    fn code(self) -> i32 {
        self as i32
    }
}

impl From<&DemopyError> for KernelStatus {
    fn from(err: &DemopyError) -> Self {
        match err {
            DemopyError::Overflow { .. } => KernelStatus::Overflow,
            DemopyError::ZeroToNegativePower => KernelStatus::ZeroToNegativePower,
            DemopyError::InvalidUtf8 => KernelStatus::InvalidUtf8,
            DemopyError::BufferTooSmall => KernelStatus::BufferTooSmall,
            DemopyError::KernelArgument(_) => KernelStatus::NullPointer,
            DemopyError::KernelStatus(code) => {
                KernelStatus::from_code(*code).unwrap_or(KernelStatus::Internal)
            }
            _ => KernelStatus::Internal,
        }
    }
}

//==================================================================================
// 2. Exported Symbols
//==================================================================================

#[no_mangle]
pub extern "C" fn demopy_abi_version() -> u32 {
    ABI_VERSION
}

/// Returns a pointer to a static, NUL-terminated greeting. The caller must not free it.
#[no_mangle]
pub extern "C" fn demopy_hello() -> *const c_char {
    NATIVE_GREETING_C.as_ptr().cast()
}

/// # Safety
/// `out` must be null or valid for a write of one `i64`.
#[no_mangle]
pub unsafe extern "C" fn demopy_add(a: i64, b: i64, out: *mut i64) -> i32 {
    if out.is_null() {
        return KernelStatus::NullPointer.code();
    }
    match a.checked_add(b) {
        Some(sum) => {
            *out = sum;
            KernelStatus::Ok.code()
        }
        None => KernelStatus::Overflow.code(),
    }
}

#[no_mangle]
pub extern "C" fn demopy_multiply(a: f64, b: f64) -> f64 {
    a * b
}

/// # Safety
/// `values` must be valid for reads of `len` elements (it may be null only when
/// `len == 0`), and `out` must be null or valid for a write of one `i64`.
#[no_mangle]
pub unsafe extern "C" fn demopy_sum_list(values: *const i64, len: usize, out: *mut i64) -> i32 {
    if out.is_null() || (values.is_null() && len != 0) {
        return KernelStatus::NullPointer.code();
    }
    let slice = if len == 0 {
        &[][..]
    } else {
        std::slice::from_raw_parts(values, len)
    };
    match arith::sum_i64(slice) {
        Some(sum) => {
            *out = sum;
            KernelStatus::Ok.code()
        }
        None => KernelStatus::Overflow.code(),
    }
}

/// Writes the char-reversed copy of `input` into `output`. The output is always
/// exactly `input_len` bytes long.
///
/// # Safety
/// `input` must be valid for reads of `input_len` bytes and `output` valid for
/// writes of `output_cap` bytes; either may be null only when its length is 0.
/// The two buffers must not overlap.
#[no_mangle]
pub unsafe extern "C" fn demopy_reverse_string(
    input: *const u8,
    input_len: usize,
    output: *mut u8,
    output_cap: usize,
) -> i32 {
    if (input.is_null() && input_len != 0) || (output.is_null() && output_cap != 0) {
        return KernelStatus::NullPointer.code();
    }
    if input_len == 0 {
        return KernelStatus::Ok.code();
    }
    if output_cap < input_len {
        return KernelStatus::BufferTooSmall.code();
    }
    let src = std::slice::from_raw_parts(input, input_len);
    let dst = std::slice::from_raw_parts_mut(output, output_cap);
    match text::reverse_utf8_into(src, dst) {
        Ok(_) => KernelStatus::Ok.code(),
        Err(e) => KernelStatus::from(&e).code(),
    }
}

/// Writes `base^exponent` to `out_int` (status `Ok`) for non-negative exponents,
/// or to `out_float` (status `OkFloat`) for negative ones.
///
/// # Safety
/// `out_int` and `out_float` must each be null or valid for a write of one value.
#[no_mangle]
pub unsafe extern "C" fn demopy_power(
    base: i64,
    exponent: i64,
    out_int: *mut i64,
    out_float: *mut f64,
) -> i32 {
    if out_int.is_null() || out_float.is_null() {
        return KernelStatus::NullPointer.code();
    }
    if exponent >= 0 {
        return match arith::pow_i64(base, exponent as u64) {
            Some(v) => {
                *out_int = v;
                KernelStatus::Ok.code()
            }
            None => KernelStatus::Overflow.code(),
        };
    }
    if base == 0 {
        return KernelStatus::ZeroToNegativePower.code();
    }
    *out_float = (base as f64).powf(exponent as f64);
    KernelStatus::OkFloat.code()
}
