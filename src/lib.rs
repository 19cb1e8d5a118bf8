//! This file is the root of the `demopy_gb_jj` Rust crate.
//!
//! Its responsibilities are strictly limited to:
//! 1.  Declaring all the top-level modules of our library (`facade`, `backend`, etc.)
//!     so the Rust compiler knows they exist.
//! 2.  Re-exporting the facade functions that make up the public API.
//! 3.  Defining the `#[pymodule]` (feature `python`) which acts as the main entry
//!     point when the compiled library is imported into Python.

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[doc(hidden)]
pub use log as __log;

//==================================================================================
// 1. Module Declarations
//==================================================================================
#[macro_use]
mod observability; // Make macros available throughout the crate

pub mod backend;
pub mod config;
pub mod conformance;
pub mod error;
pub mod facade;
pub mod ffi;
pub mod kernels;

pub use backend::{Backend, BackendKind, Number};
pub use config::{BackendPreference, FacadeConfig};
pub use error::DemopyError;
pub use facade::{
    add, backend_kind, backend_name, exported_names, hello, multiply, power, reverse_string,
    sum_list, Facade, EXPORTS,
};
pub use observability::init_logging;

//==================================================================================
// 2. Python Module Definition
//==================================================================================
#[cfg(feature = "python")]
use pyo3::prelude::*;

/// The `demopy_gb_jj` Python module, containing all exposed Rust functions.
#[cfg(feature = "python")]
#[pymodule]
fn demopy_gb_jj(m: &Bound<'_, PyModule>) -> PyResult<()> {
    use ffi::python;

    // --- The six facade functions ---
    m.add_function(wrap_pyfunction!(python::hello_py, m)?)?;
    m.add_function(wrap_pyfunction!(python::add_py, m)?)?;
    m.add_function(wrap_pyfunction!(python::multiply_py, m)?)?;
    m.add_function(wrap_pyfunction!(python::sum_list_py, m)?)?;
    m.add_function(wrap_pyfunction!(python::reverse_string_py, m)?)?;
    m.add_function(wrap_pyfunction!(python::power_py, m)?)?;

    // --- Introspection and logging ---
    m.add_function(wrap_pyfunction!(python::backend_name_py, m)?)?;
    m.add_function(wrap_pyfunction!(python::enable_verbose_logging_py, m)?)?;

    // --- Expose version string and export list as module attributes ---
    m.add("__version__", VERSION)?;
    m.add("__all__", EXPORTS.to_vec())?;

    Ok(())
}
