// In: src/error.rs

//! This module defines the single, unified error type for the entire demopy library.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DemopyError {
    // =========================================================================
    // === Numeric Policy Errors (raised identically by both backends)
    // =========================================================================
    #[error("Integer overflow in '{op}'")]
    Overflow { op: &'static str },

    #[error("0 cannot be raised to a negative power")]
    ZeroToNegativePower,

    // =========================================================================
    // === Caller-Contract Violations (invocation by name)
    // =========================================================================
    #[error("Unknown function: '{0}'")]
    UnknownFunction(String),

    #[error("'{name}' takes {expected} argument(s) but {got} were given")]
    Arity {
        name: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("Argument {index} of '{name}' must be {expected}, got {got}")]
    TypeMismatch {
        name: &'static str,
        index: usize,
        expected: &'static str,
        got: &'static str,
    },

    // =========================================================================
    // === Backend Loading Errors (absorbed by the facade, never surfaced)
    // =========================================================================
    #[error("Accelerated backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Native ABI version mismatch: expected {expected}, found {found}")]
    AbiMismatch { expected: u32, found: u32 },

    /// An error from `libloading` while opening the library or resolving a symbol.
    #[error("Dynamic library error: {0}")]
    Library(#[from] libloading::Error),

    // =========================================================================
    // === Native Kernel Errors
    // =========================================================================
    #[error("Input is not valid UTF-8")]
    InvalidUtf8,

    #[error("Output buffer is smaller than the input")]
    BufferTooSmall,

    #[error("Native kernel rejected its arguments: {0}")]
    KernelArgument(&'static str),

    #[error("Native kernel returned unknown status code {0}")]
    KernelStatus(i32),

    // =========================================================================
    // === Configuration Errors
    // =========================================================================
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// An error from the Serde JSON library, typically while parsing a config.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

impl DemopyError {
    /// True for errors caused by how the caller invoked a function, as opposed to
    /// the numeric policy of the function itself.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            DemopyError::UnknownFunction(_)
                | DemopyError::Arity { .. }
                | DemopyError::TypeMismatch { .. }
        )
    }
}

// =============================================================================
// === Python Exception Mapping ===
// =============================================================================

#[cfg(feature = "python")]
impl From<DemopyError> for pyo3::PyErr {
    fn from(err: DemopyError) -> pyo3::PyErr {
        use pyo3::exceptions::{PyOverflowError, PyTypeError, PyValueError, PyZeroDivisionError};
        match err {
            DemopyError::Overflow { .. } => PyOverflowError::new_err(err.to_string()),
            DemopyError::ZeroToNegativePower => PyZeroDivisionError::new_err(err.to_string()),
            ref e if e.is_contract_violation() => PyTypeError::new_err(err.to_string()),
            _ => PyValueError::new_err(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_violation_classification() {
        assert!(DemopyError::UnknownFunction("nope".to_string()).is_contract_violation());
        assert!(DemopyError::Arity {
            name: "add",
            expected: 2,
            got: 1
        }
        .is_contract_violation());
        assert!(!DemopyError::Overflow { op: "add" }.is_contract_violation());
        assert!(!DemopyError::ZeroToNegativePower.is_contract_violation());
    }

    #[test]
    fn test_messages_name_the_operation() {
        let msg = DemopyError::Overflow { op: "sum_list" }.to_string();
        assert!(msg.contains("sum_list"));
        let msg = DemopyError::AbiMismatch {
            expected: 1,
            found: 7,
        }
        .to_string();
        assert!(msg.contains('1') && msg.contains('7'));
    }
}
