//! This module contains the pure, stateless kernels behind the native C ABI.
//!
//! They are the "accelerated" implementations: hand-unrolled or allocation-free
//! versions of operations the fallback backend expresses directly. Each one must
//! agree exactly with its fallback counterpart for every input.

pub mod arith;
pub mod text;
