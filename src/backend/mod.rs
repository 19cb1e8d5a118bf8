// In: src/backend/mod.rs

//! The capability set shared by every backend, and the two implementations of it.
//!
//! `Backend` is the seam between the facade and the code that does the work:
//!
//!   - `AcceleratedBackend` calls through the native C ABI, either linked into the
//!     process or loaded from a shared library.
//!   - `FallbackBackend` implements every operation directly in Rust and is always
//!     available.
//!
//! `loader::resolve` picks exactly one of them. Both must agree on every output
//! except `hello`.

pub mod accelerated;
pub mod fallback;
pub mod loader;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DemopyError;

pub use accelerated::{AcceleratedBackend, KernelSource};
pub use fallback::FallbackBackend;

//==================================================================================
// 1. Shared Types
//==================================================================================

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    Accelerated,
    Fallback,
}

impl BackendKind {
    pub fn name(&self) -> &'static str {
        match self {
            BackendKind::Accelerated => "accelerated",
            BackendKind::Fallback => "fallback",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The result of `power`: exact for non-negative exponents, fractional otherwise.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(untagged)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    /// Equality that compares floats by bit pattern, so `NaN == NaN` and `0.0 != -0.0`.
    pub fn bits_eq(&self, other: &Number) -> bool {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a == b,
            (Number::Float(a), Number::Float(b)) => a.to_bits() == b.to_bits(),
            _ => false,
        }
    }
}

impl From<i64> for Number {
    fn from(v: i64) -> Self {
        Number::Int(v)
    }
}

impl From<f64> for Number {
    fn from(v: f64) -> Self {
        Number::Float(v)
    }
}

//==================================================================================
// 2. The Backend Trait
//==================================================================================

/// The fixed set of operations every backend provides.
///
/// Numeric policy, identical for every implementer:
/// * `add` and `sum_list` are checked and report `DemopyError::Overflow`.
/// * `multiply` is plain IEEE-754 multiplication.
/// * `power` is exact for `exponent >= 0` (with `power(0, 0) == 1`), returns
///   `(base as f64).powf(exponent as f64)` for negative exponents, and reports
///   `ZeroToNegativePower` for a zero base with a negative exponent.
/// * `reverse_string` reverses chars, not bytes.
pub trait Backend: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// Where the implementation came from, for diagnostics.
    fn source(&self) -> String {
        self.kind().name().to_string()
    }

    fn hello(&self) -> String;

    fn add(&self, a: i64, b: i64) -> Result<i64, DemopyError>;

    fn multiply(&self, a: f64, b: f64) -> f64;

    fn sum_list(&self, numbers: &[i64]) -> Result<i64, DemopyError>;

    fn reverse_string(&self, s: &str) -> Result<String, DemopyError>;

    fn power(&self, base: i64, exponent: i64) -> Result<Number, DemopyError>;
}
