#![allow(clippy::approx_constant)]
//! Floating point helpers for checking parameter domains, as convenience wrappers around methods
//! from the approx crate.

use approx::AbsDiffEq;

/// Tolerance for derived probabilities, which accumulate rounding error (e.g. `1 - a - m` for
/// `a + m == 1`).
pub const PROBABILITY_ACC: f64 = 1e-12;

/// Compares if two floats are close via `approx::abs_diff_eq` using a maximum absolute difference
/// (epsilon) of `acc`.
#[must_use]
pub fn almost_eq(a: f64, b: f64, acc: f64) -> bool {
    if a.is_infinite() && b.is_infinite() {
        return a == b;
    }
    a.abs_diff_eq(&b, acc)
}

/// Whether `value` lies in `[0, 1]`. `NaN` does not.
#[must_use]
pub fn is_probability(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

/// Whether a derived `value` lies in `[0, 1]` up to `PROBABILITY_ACC`.
#[must_use]
pub fn is_derived_probability(value: f64) -> bool {
    is_probability(value)
        || almost_eq(value, 0.0, PROBABILITY_ACC)
        || almost_eq(value, 1.0, PROBABILITY_ACC)
}
