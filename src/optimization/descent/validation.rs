//! Validation helpers for the descent engine.
//!
//! This module centralizes the consistency checks used across the
//! optimizer interface:
//!
//! - **Option checks**: [`verify_tol_grad`], [`verify_tol_cost`],
//!   [`verify_rate`], [`verify_fd_step`] ensure numeric settings are finite
//!   and strictly positive when provided.
//! - **Shape contracts**: [`validate_dim`] enforces that a vector operand
//!   matches the context dimension; never truncates or pads.
//! - **Numeric faults**: [`validate_value`], [`validate_grad`],
//!   [`validate_hessian`], [`validate_theta`] reject NaN/±∞ with the offending
//!   index and value.
//!
//! These helpers standardize error reporting by returning domain-specific
//! [`OptError`] variants.
use crate::optimization::{
    descent::types::{Grad, Hessian, Theta},
    errors::{OptError, OptResult},
};

/// Validate the optional gradient‐norm tolerance.
///
/// # Errors
/// Returns [`OptError::InvalidTolGrad`] if the value is non-finite or ≤ 0.0.
pub fn verify_tol_grad(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Validate the optional cost‐change tolerance.
///
/// # Errors
/// Returns [`OptError::InvalidTolCost`] if the value is non-finite or ≤ 0.0.
pub fn verify_tol_cost(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Validate a learning-rate setting (`initial_rate`, `default_rate`, ...).
///
/// # Errors
/// Returns [`OptError::InvalidRate`] tagged with `name` if the value is
/// non-finite or ≤ 0.0.
pub fn verify_rate(name: &'static str, value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::InvalidRate { name, value, reason: "Rate must be finite." });
    }
    if value <= 0.0 {
        return Err(OptError::InvalidRate { name, value, reason: "Rate must be positive." });
    }
    Ok(())
}

/// Validate a finite-difference step (absolute or relative).
///
/// # Errors
/// Returns [`OptError::InvalidFdStep`] if the value is non-finite or ≤ 0.0.
pub fn verify_fd_step(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::InvalidFdStep { value, reason: "Step must be finite." });
    }
    if value <= 0.0 {
        return Err(OptError::InvalidFdStep { value, reason: "Step must be positive." });
    }
    Ok(())
}

/// Enforce that a vector operand has the context dimension.
///
/// # Errors
/// Returns [`OptError::DimensionMismatch`] naming `operand` when
/// `found != expected`.
pub fn validate_dim(operand: &'static str, expected: usize, found: usize) -> OptResult<()> {
    if found != expected {
        return Err(OptError::DimensionMismatch { operand, expected, found });
    }
    Ok(())
}

/// Validate that a scalar objective value is finite.
///
/// # Errors
/// Returns [`OptError::NonFiniteCost`] if the value is `NaN` or infinite.
pub fn validate_value(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(())
}

/// Validate a gradient vector against dimension and finiteness.
///
/// # Errors
/// - [`OptError::DimensionMismatch`] if length does not match `dim`.
/// - [`OptError::NonFiniteGradient`] with the index/value of the first
///   offending element.
pub fn validate_grad(grad: &Grad, dim: usize) -> OptResult<()> {
    validate_dim("gradient", dim, grad.len())?;
    for (index, &value) in grad.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::NonFiniteGradient { index, value });
        }
    }
    Ok(())
}

/// Validate the shape and entries of a Hessian matrix.
///
/// # Errors
/// - [`OptError::HessianDimMismatch`] if dimensions are not `dim × dim`.
/// - [`OptError::NonFiniteHessian`] for the first non-finite entry.
pub fn validate_hessian(hessian: &Hessian, dim: usize) -> OptResult<()> {
    if hessian.nrows() != dim || hessian.ncols() != dim {
        return Err(OptError::HessianDimMismatch {
            expected: dim,
            found: (hessian.nrows(), hessian.ncols()),
        });
    }
    for ((row, col), &value) in hessian.indexed_iter() {
        if !value.is_finite() {
            return Err(OptError::NonFiniteHessian { row, col, value });
        }
    }
    Ok(())
}

/// Validate that every parameter coordinate is finite.
///
/// # Errors
/// Returns [`OptError::NonFiniteParameter`] for the first offending entry.
pub fn validate_theta(theta: &Theta) -> OptResult<()> {
    for (index, &value) in theta.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::NonFiniteParameter { index, value });
        }
    }
    Ok(())
}
