//! descent::finite_diff — finite-difference gradient and Hessian helpers.
//!
//! Purpose
//! -------
//! Provide central-difference gradient and Hessian approximations around a
//! parameter vector for objectives that do not supply analytic derivatives,
//! together with validation and symmetry cleanup.
//!
//! Key behaviors
//! -------------
//! - [`FdStep`] is the configurable ε policy: relative (`Scaled`), absolute
//!   (`Fixed`), or the `finitediff` crate's built-in step (`Auto`).
//! - [`fd_gradient`] takes central differences of the cost,
//!   `(f(θ + εᵢeᵢ) − f(θ − εᵢeᵢ)) / 2εᵢ`, costing `2d` evaluations.
//! - [`fd_hessian_from_grad`] takes central differences of a gradient map
//!   (`2d` gradient evaluations) and symmetrizes the result.
//! - [`fd_hessian_from_cost`] builds the Hessian from cost values alone
//!   when no gradient formula exists (`O(d²)` evaluations).
//!
//! Invariants & assumptions
//! ------------------------
//! - Any error raised by the objective during differencing propagates
//!   unchanged; a numeric fault is never turned into a silent NaN entry.
//! - Results returned from this module satisfy [`validate_grad`] /
//!   [`validate_hessian`].
//! - Symmetrization averages `(i, j)` and `(j, i)`; it never shifts the
//!   spectrum, so positive-definiteness is not manufactured here.
//!
//! Conventions
//! -----------
//! - On the cost-only Hessian path each step is the square root of the
//!   gradient step (`√εᵢ`), which balances truncation against the `ε⁻²`
//!   amplification of rounding error in second differences.
//! - The `Auto` policy routes gradients and gradient-based Hessians through
//!   `finitediff`; objective errors are captured in a `RefCell` slot because
//!   its closures must return plain values. The cost-only Hessian keeps the
//!   central stencil under `Auto`.
use std::cell::RefCell;

use finitediff::FiniteDiff;
use ndarray::Array1;

use crate::optimization::{
    descent::{
        types::{Cost, DEFAULT_FD_REL_STEP, Grad, Hessian, Theta},
        validation::{validate_grad, validate_hessian, verify_fd_step},
    },
    errors::{OptError, OptResult},
};

/// Finite-difference step policy.
///
/// - `Scaled(rel)`: `εᵢ = rel · max(1, |θᵢ|)`; keeps relative truncation and
///   rounding error balanced across coordinates of different magnitude.
/// - `Fixed(h)`: `εᵢ = h` for every coordinate.
/// - `Auto`: defer to the `finitediff` crate's built-in step sizes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FdStep {
    Scaled(f64),
    Fixed(f64),
    Auto,
}

impl Default for FdStep {
    fn default() -> Self {
        FdStep::Scaled(DEFAULT_FD_REL_STEP)
    }
}

impl FdStep {
    /// Check that the configured step is finite and strictly positive.
    pub fn validate(&self) -> OptResult<()> {
        match *self {
            FdStep::Scaled(h) | FdStep::Fixed(h) => verify_fd_step(h),
            FdStep::Auto => Ok(()),
        }
    }

    /// Gradient step for a coordinate with current value `x`.
    ///
    /// `Auto` has no explicit step; it reports the default relative rule so
    /// callers that need a number still get a sensible one.
    pub fn epsilon(&self, x: f64) -> f64 {
        match *self {
            FdStep::Scaled(rel) => rel * x.abs().max(1.0),
            FdStep::Fixed(h) => h,
            FdStep::Auto => DEFAULT_FD_REL_STEP * x.abs().max(1.0),
        }
    }
}

/// Central-difference gradient of a fallible scalar objective.
///
/// # Errors
/// - Any error returned by `f` (typically a numeric fault at a perturbed
///   point) is propagated as-is.
/// - [`OptError::NonFiniteGradient`] if a difference quotient overflows.
pub fn fd_gradient<F>(f: &F, theta: &Theta, step: FdStep) -> OptResult<Grad>
where
    F: Fn(&Theta) -> OptResult<Cost>,
{
    let dim = theta.len();
    let grad = match step {
        FdStep::Auto => {
            let closure_err: RefCell<Option<OptError>> = RefCell::new(None);
            let cost = capture_scalar(f, &closure_err);
            let g = theta.central_diff(&cost);
            if let Some(err) = closure_err.take() {
                return Err(err);
            }
            g
        }
        _ => {
            let mut grad = Array1::zeros(dim);
            let mut probe = theta.clone();
            for i in 0..dim {
                let x_i = theta[i];
                let eps = step.epsilon(x_i);
                probe[i] = x_i + eps;
                let f_plus = f(&probe)?;
                probe[i] = x_i - eps;
                let f_minus = f(&probe)?;
                probe[i] = x_i;
                grad[i] = (f_plus - f_minus) / (2.0 * eps);
            }
            grad
        }
    };
    validate_grad(&grad, dim)?;
    Ok(grad)
}

/// Central-difference Hessian from a fallible gradient map.
///
/// Column `j` is `(g(θ + εⱼeⱼ) − g(θ − εⱼeⱼ)) / 2εⱼ`; the result is then
/// symmetrized in place.
///
/// # Errors
/// - Any error returned by `g` is propagated as-is.
/// - [`OptError::HessianDimMismatch`] / [`OptError::NonFiniteHessian`] from
///   validation of the assembled matrix.
pub fn fd_hessian_from_grad<G>(g: &G, theta: &Theta, step: FdStep) -> OptResult<Hessian>
where
    G: Fn(&Theta) -> OptResult<Grad>,
{
    let dim = theta.len();
    let mut hess = match step {
        FdStep::Auto => {
            let closure_err: RefCell<Option<OptError>> = RefCell::new(None);
            let grad_fn = |x: &Theta| -> Grad {
                match g(x) {
                    Ok(v) => v,
                    Err(e) => {
                        let mut slot = closure_err.borrow_mut();
                        if slot.is_none() {
                            *slot = Some(e);
                        }
                        Array1::from_elem(x.len(), f64::NAN)
                    }
                }
            };
            let h = theta.central_hessian(&grad_fn);
            if let Some(err) = closure_err.take() {
                return Err(err);
            }
            h
        }
        _ => {
            let mut hess = Hessian::zeros((dim, dim));
            let mut probe = theta.clone();
            for j in 0..dim {
                let x_j = theta[j];
                let eps = step.epsilon(x_j);
                probe[j] = x_j + eps;
                let g_plus = g(&probe)?;
                probe[j] = x_j - eps;
                let g_minus = g(&probe)?;
                probe[j] = x_j;
                validate_grad(&g_plus, dim)?;
                validate_grad(&g_minus, dim)?;
                let column = (&g_plus - &g_minus) / (2.0 * eps);
                hess.column_mut(j).assign(&column);
            }
            hess
        }
    };
    validate_hessian(&hess, dim)?;
    symmetrize_hess(&mut hess);
    Ok(hess)
}

/// Hessian from cost values only, for objectives without any derivative.
///
/// Diagonal entries use `(f(θ + hᵢ) − 2f(θ) + f(θ − hᵢ)) / hᵢ²`; off-diagonal
/// entries use the four-point stencil
/// `(f(++) − f(+−) − f(−+) + f(−−)) / 4hᵢhⱼ`, with `hᵢ = √εᵢ`.
///
/// `Auto` takes the same stencil with the default relative step:
/// `finitediff` only offers a forward-difference cost-only Hessian.
///
/// # Errors
/// Same as [`fd_hessian_from_grad`], with errors coming from `f`.
pub fn fd_hessian_from_cost<F>(f: &F, theta: &Theta, step: FdStep) -> OptResult<Hessian>
where
    F: Fn(&Theta) -> OptResult<Cost>,
{
    let dim = theta.len();
    let h: Vec<f64> = theta.iter().map(|&x| step.epsilon(x).sqrt()).collect();
    let f0 = f(theta)?;
    let mut hess = Hessian::zeros((dim, dim));
    let mut probe = theta.clone();
    for i in 0..dim {
        probe[i] = theta[i] + h[i];
        let f_plus = f(&probe)?;
        probe[i] = theta[i] - h[i];
        let f_minus = f(&probe)?;
        probe[i] = theta[i];
        hess[[i, i]] = (f_plus - 2.0 * f0 + f_minus) / (h[i] * h[i]);
        for j in 0..i {
            let mut corner = |si: f64, sj: f64| -> OptResult<Cost> {
                probe[i] = theta[i] + si * h[i];
                probe[j] = theta[j] + sj * h[j];
                let v = f(&probe);
                probe[i] = theta[i];
                probe[j] = theta[j];
                v
            };
            let pp = corner(1.0, 1.0)?;
            let pm = corner(1.0, -1.0)?;
            let mp = corner(-1.0, 1.0)?;
            let mm = corner(-1.0, -1.0)?;
            let value = (pp - pm - mp + mm) / (4.0 * h[i] * h[j]);
            hess[[i, j]] = value;
            hess[[j, i]] = value;
        }
    }
    validate_hessian(&hess, dim)?;
    symmetrize_hess(&mut hess);
    Ok(hess)
}

// ---- Helper methods ----

/// Wrap a fallible cost into the plain `Fn(&Theta) -> f64` shape expected by
/// `finitediff`, parking the first error in `closure_err` and returning NaN.
fn capture_scalar<'a, F>(
    f: &'a F, closure_err: &'a RefCell<Option<OptError>>,
) -> impl Fn(&Theta) -> f64 + 'a
where
    F: Fn(&Theta) -> OptResult<Cost>,
{
    move |x: &Theta| match f(x) {
        Ok(v) => v,
        Err(e) => {
            let mut slot = closure_err.borrow_mut();
            if slot.is_none() {
                *slot = Some(e);
            }
            f64::NAN
        }
    }
}

/// Replace each off-diagonal pair `(i, j)` / `(j, i)` with their average.
fn symmetrize_hess(hess: &mut Hessian) {
    for i in 0..hess.nrows() {
        for j in 0..i {
            let avg = 0.5 * (hess[[i, j]] + hess[[j, i]]);
            hess[[i, j]] = avg;
            hess[[j, i]] = avg;
        }
    }
}
