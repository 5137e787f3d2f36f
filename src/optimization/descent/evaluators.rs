//! descent::evaluators — the four contract functions the driver is built on.
//!
//! Purpose
//! -------
//! Put a uniform, validated boundary around any [`Objective`]:
//!
//! - [`evaluate`]: finite scalar loss at `θ`.
//! - [`gradient`]: analytic gradient if the objective supplies one, central
//!   finite differences of [`evaluate`] otherwise.
//! - [`hessian`]: analytic Hessian if supplied; else central differences of
//!   the gradient; else second differences of the cost.
//! - [`learning_rate`]: secant step size from gradient/step history.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every vector operand is checked against `objective.dim(data)` first;
//!   a wrong length is a [`OptError::DimensionMismatch`], never truncated or
//!   padded.
//! - Non-finite outputs become numeric faults ([`OptError::kind`] ==
//!   `NumericFault`) and are returned to the caller, never retried here.
//! - All four functions are pure: no state is kept between calls, so the
//!   same inputs give bit-identical outputs.
//! - Only `GradientNotImplemented` / `HessianNotImplemented` trigger the
//!   finite-difference fallbacks; any other objective error propagates.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the analytic/FD switch, fault propagation from
//!   perturbed points, and dimension contracts on every operand.
use crate::optimization::{
    descent::{
        finite_diff::{FdStep, fd_gradient, fd_hessian_from_cost, fd_hessian_from_grad},
        step_size::{RateDecision, StepSizePolicy, secant_rate},
        traits::Objective,
        types::{Cost, Grad, Hessian, Step, Theta},
        validation::{validate_dim, validate_grad, validate_hessian, validate_value},
    },
    errors::{OptError, OptResult},
};

/// Evaluate the objective at `theta`.
///
/// # Errors
/// - [`OptError::DimensionMismatch`] if `theta.len() != objective.dim(data)`.
/// - [`OptError::NonFiniteCost`] if the loss is NaN or ±∞.
/// - Any error raised by `objective.value`.
pub fn evaluate<O: Objective>(objective: &O, data: &O::Data, theta: &Theta) -> OptResult<Cost> {
    validate_dim("theta", objective.dim(data), theta.len())?;
    let value = objective.value(theta, data)?;
    validate_value(value)?;
    Ok(value)
}

/// Gradient of the objective at `theta`.
///
/// Uses `objective.grad` when implemented; on `GradientNotImplemented`
/// falls back to central differences of [`evaluate`] with step policy
/// `fd_step`. A fault at any perturbed point propagates.
pub fn gradient<O: Objective>(
    objective: &O, data: &O::Data, theta: &Theta, fd_step: FdStep,
) -> OptResult<Grad> {
    let dim = objective.dim(data);
    validate_dim("theta", dim, theta.len())?;
    match objective.grad(theta, data) {
        Ok(grad) => {
            validate_grad(&grad, dim)?;
            Ok(grad)
        }
        Err(OptError::GradientNotImplemented) => {
            let cost = |x: &Theta| evaluate(objective, data, x);
            fd_gradient(&cost, theta, fd_step)
        }
        Err(err) => Err(err),
    }
}

/// Hessian of the objective at `theta`.
///
/// Resolution order: analytic `objective.hessian`, then central differences
/// of the analytic gradient, then second differences of the cost. The
/// gradient path is attempted directly; a `GradientNotImplemented` from its
/// first probe switches to the cost path. The result is never regularized;
/// positive-definiteness is the caller's concern.
pub fn hessian<O: Objective>(
    objective: &O, data: &O::Data, theta: &Theta, fd_step: FdStep,
) -> OptResult<Hessian> {
    let dim = objective.dim(data);
    validate_dim("theta", dim, theta.len())?;
    match objective.hessian(theta, data) {
        Ok(hess) => {
            validate_hessian(&hess, dim)?;
            Ok(hess)
        }
        Err(OptError::HessianNotImplemented) => {
            let grad_fn = |x: &Theta| -> OptResult<Grad> {
                let g = objective.grad(x, data)?;
                validate_grad(&g, dim)?;
                Ok(g)
            };
            match fd_hessian_from_grad(&grad_fn, theta, fd_step) {
                Err(OptError::GradientNotImplemented) => {
                    let cost = |x: &Theta| evaluate(objective, data, x);
                    fd_hessian_from_cost(&cost, theta, fd_step)
                }
                other => other,
            }
        }
        Err(err) => Err(err),
    }
}

/// Adapted learning rate from the last gradient change and step.
///
/// All three vectors must have the context dimension and `policy` must pass
/// [`StepSizePolicy::validate`]. Degenerate secant denominators resolve to
/// `policy.default_rate`; see
/// [`crate::optimization::descent::step_size`].
pub fn learning_rate<O: Objective>(
    objective: &O, data: &O::Data, policy: &StepSizePolicy, grad_now: &Grad, grad_prev: &Grad,
    step_prev: &Step,
) -> OptResult<f64> {
    Ok(learning_rate_detailed(objective, data, policy, grad_now, grad_prev, step_prev)?.rate)
}

/// Same as [`learning_rate`], also reporting whether the secant estimate,
/// a clamp, or the fallback produced the rate.
pub fn learning_rate_detailed<O: Objective>(
    objective: &O, data: &O::Data, policy: &StepSizePolicy, grad_now: &Grad, grad_prev: &Grad,
    step_prev: &Step,
) -> OptResult<RateDecision> {
    let dim = objective.dim(data);
    validate_dim("grad_now", dim, grad_now.len())?;
    validate_dim("grad_prev", dim, grad_prev.len())?;
    validate_dim("step_prev", dim, step_prev.len())?;
    policy.validate()?;
    Ok(secant_rate(policy, grad_now, grad_prev, step_prev))
}
