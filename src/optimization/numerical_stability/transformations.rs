//! Numerical stability utilities.
//!
//! Provides safe implementations of the nonlinear link transforms used by
//! the built-in loss families. Both follow guarded strategies similar to
//! those in major ML libraries, using explicit cutoffs (`|x| > 20.0`) to
//! keep `f64` arithmetic in a well-conditioned regime.
//!
//! # Provided items
//! - [`EIGEN_EPS`]: eigenvalues at or below this are treated as zero when
//!   forming pseudoinverses or judging positive-definiteness.
//! - [`GENERAL_TOL`]: generic comparison tolerance (symmetry checks,
//!   degenerate denominators).
//! - [`safe_softplus(x)`]: stable `ln(1 + exp(x))`, ℝ → (0, ∞).
//! - [`safe_logistic(x)`]: stable `1 / (1 + exp(-x))`, ℝ → (0, 1).

/// Eigenvalue floor used by curvature diagnostics.
pub const EIGEN_EPS: f64 = 1e-10;

/// Generic numerical tolerance shared across the optimizer.
pub const GENERAL_TOL: f64 = 1e-12;

/// Numerically stable softplus: `softplus(x) = ln(1 + exp(x))`.
///
/// Computes softplus without overflow for large positive `x` and
/// with good precision for large negative `x`:
///
/// - For sufficiently large `x`, `softplus(x) ≈ x + ln1p(exp(-x)) ≈ x`.
/// - Otherwise, it falls back to `ln1p(exp(x))`.
///
/// # Parameters
/// - `x`: real input
///
/// # Returns
/// - `softplus(x)` as `f64`.
pub fn safe_softplus(x: f64) -> f64 {
    if x > 20.0 { x } else { x.exp().ln_1p() }
}

/// Numerically stable logistic function `σ(x) = 1 / (1 + exp(-x))`.
///
/// For negative `x` the algebraically equal form `exp(x) / (1 + exp(x))`
/// is used so that `exp` is only ever evaluated on non-positive inputs.
/// The result saturates to 0 or 1 without overflow.
pub fn safe_logistic(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}
