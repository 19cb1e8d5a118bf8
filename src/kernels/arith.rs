//! Integer kernels: lane-unrolled summation and checked exponentiation.
//!
//! Both are panic-free and report overflow as `None`.

//==================================================================================
// 1. Summation
//==================================================================================

const LANES: usize = 4;

/// Sums a slice of `i64` using four independent `i128` accumulators.
///
/// The `i128` lanes cannot overflow for any slice that fits in memory, so the
/// result does not depend on element order. `None` means the exact sum is
/// outside the `i64` range.
pub fn sum_i64(values: &[i64]) -> Option<i64> {
    let mut lanes = [0i128; LANES];
    let chunks = values.chunks_exact(LANES);
    let tail = chunks.remainder();

    for chunk in chunks {
        lanes[0] += chunk[0] as i128;
        lanes[1] += chunk[1] as i128;
        lanes[2] += chunk[2] as i128;
        lanes[3] += chunk[3] as i128;
    }

    let mut total: i128 = lanes.iter().sum();
    for &v in tail {
        total += v as i128;
    }

    i64::try_from(total).ok()
}

//==================================================================================
// 2. Exponentiation
//==================================================================================

/// Computes `base^exponent` by squaring, with every multiplication checked.
///
/// `pow_i64(b, 0)` is `Some(1)` for every `b`, including zero.
pub fn pow_i64(base: i64, exponent: u64) -> Option<i64> {
    let mut acc: i64 = 1;
    let mut base = base;
    let mut exp = exponent;

    loop {
        if exp & 1 == 1 {
            acc = acc.checked_mul(base)?;
        }
        exp >>= 1;
        if exp == 0 {
            return Some(acc);
        }
        // Only square when a higher bit still needs it.
        base = base.checked_mul(base)?;
    }
}
