//! This module serves as the public API for the Foreign Function Interface (FFI) layer.
//!
//! It holds the two boundaries this library exposes to other ecosystems: the
//! stable C ABI that makes the cdylib usable as an accelerated backend, and the
//! Python bindings built on top of the facade.

//==================================================================================
// 1. Module Declarations
//==================================================================================
/// The `demopy_*` C ABI, the contract between the facade and native backends.
pub mod native;

/// Contains all logic for interfacing with the Python/CPython ecosystem.
#[cfg(feature = "python")]
pub mod python;
