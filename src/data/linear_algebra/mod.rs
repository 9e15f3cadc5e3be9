//! # Linear algebra primitives
//!
//! A dense matrix with decomposition, inversion and solving, caching the expensive derived
//! quantities until the matrix is changed.

pub mod decomposition;
pub mod inverse;
pub mod matrix;

/// Absolute tolerance used for all comparisons against zero.
pub const EPSILON: f64 = 1e-10;

/// Whether two values are equal up to an absolute tolerance.
pub fn tolerance_equal(left: f64, right: f64, tolerance: f64) -> bool {
    (left - right).abs() <= tolerance
}

/// Whether a value is zero up to an absolute tolerance.
pub fn is_negligible(value: f64, tolerance: f64) -> bool {
    value.abs() <= tolerance
}
