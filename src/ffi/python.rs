// In: src/ffi/python.rs

use pyo3::prelude::*;

use crate::backend::Number;
use crate::facade;
use crate::observability;

//==================================================================================
// I. The Exported Functions
//==================================================================================
// Every function dispatches through the process-wide facade, so Python sees the
// same backend as Rust callers in the same process.

/// Returns a greeting that names the active backend.
#[pyfunction]
#[pyo3(name = "hello")]
pub fn hello_py() -> String {
    facade::hello()
}

/// Adds two integers. Raises OverflowError outside the 64-bit range.
#[pyfunction]
#[pyo3(name = "add")]
pub fn add_py(a: i64, b: i64) -> PyResult<i64> {
    Ok(facade::add(a, b)?)
}

/// Multiplies two floats.
#[pyfunction]
#[pyo3(name = "multiply")]
pub fn multiply_py(a: f64, b: f64) -> f64 {
    facade::multiply(a, b)
}

/// Sums a list of integers; 0 for an empty list.
#[pyfunction]
#[pyo3(name = "sum_list")]
pub fn sum_list_py(numbers: Vec<i64>) -> PyResult<i64> {
    Ok(facade::sum_list(&numbers)?)
}

/// Reverses a string by code point.
#[pyfunction]
#[pyo3(name = "reverse_string")]
pub fn reverse_string_py(s: &str) -> PyResult<String> {
    Ok(facade::reverse_string(s)?)
}

/// Raises `base` to `exponent`. Returns an int for non-negative exponents and a
/// float otherwise, like Python's `**`.
#[pyfunction]
#[pyo3(name = "power")]
pub fn power_py(py: Python, base: i64, exponent: i64) -> PyResult<PyObject> {
    match facade::power(base, exponent)? {
        Number::Int(v) => Ok(v.into_py(py)),
        Number::Float(v) => Ok(v.into_py(py)),
    }
}

//==================================================================================
// II. Introspection & Diagnostics
//==================================================================================

/// Returns "accelerated" or "fallback".
#[pyfunction]
#[pyo3(name = "backend_name")]
pub fn backend_name_py() -> &'static str {
    facade::backend_name()
}

#[pyfunction]
#[pyo3(name = "enable_verbose_logging", signature = (log_file = None))]
pub fn enable_verbose_logging_py(log_file: Option<String>) {
    observability::init_logging(log_file.as_deref());
}
