//! The portable backend: every operation written directly in Rust.

use num_traits::{checked_pow, CheckedAdd};

use super::{Backend, BackendKind, Number};
use crate::error::DemopyError;

pub(crate) const FALLBACK_GREETING: &str = "Hello from demopy_gb_jj (portable fallback)!";

#[derive(Debug, Default, Clone, Copy)]
pub struct FallbackBackend;

impl FallbackBackend {
    pub fn new() -> Self {
        FallbackBackend
    }
}

/// `base^exponent` for exponents too large for `usize`. Only bases -1, 0 and 1
/// stay in range.
fn unit_base_pow(base: i64, exponent: i64) -> Option<i64> {
    match base {
        0 | 1 => Some(base),
        -1 if exponent % 2 == 0 => Some(1),
        -1 => Some(-1),
        _ => None,
    }
}

impl Backend for FallbackBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Fallback
    }

    fn hello(&self) -> String {
        FALLBACK_GREETING.to_string()
    }

    fn add(&self, a: i64, b: i64) -> Result<i64, DemopyError> {
        CheckedAdd::checked_add(&a, &b).ok_or(DemopyError::Overflow { op: "add" })
    }

    fn multiply(&self, a: f64, b: f64) -> f64 {
        a * b
    }

    fn sum_list(&self, numbers: &[i64]) -> Result<i64, DemopyError> {
        let total: i128 = numbers.iter().map(|&v| v as i128).sum();
        i64::try_from(total).map_err(|_| DemopyError::Overflow { op: "sum_list" })
    }

    fn reverse_string(&self, s: &str) -> Result<String, DemopyError> {
        Ok(s.chars().rev().collect())
    }

    fn power(&self, base: i64, exponent: i64) -> Result<Number, DemopyError> {
        if exponent < 0 {
            if base == 0 {
                return Err(DemopyError::ZeroToNegativePower);
            }
            return Ok(Number::Float((base as f64).powf(exponent as f64)));
        }

        let result = match usize::try_from(exponent) {
            Ok(exp) => checked_pow(base, exp),
            Err(_) => unit_base_pow(base, exponent),
        };
        result
            .map(Number::Int)
            .ok_or(DemopyError::Overflow { op: "power" })
    }
}
