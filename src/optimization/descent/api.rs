//! High-level entry point for minimizing an [`Objective`].
//!
//! Validates the options and the data payload, then hands over to the
//! descent driver in [`run::run_descent`](crate::optimization::descent::run::run_descent).
use crate::optimization::{
    descent::{
        run::run_descent,
        traits::{DescentOptions, Objective, OptimOutcome},
        types::Theta,
    },
    errors::OptResult,
};

/// Minimize `objective` over `data` starting from `theta0`.
///
/// # Behavior
/// - Re-validates `opts` (fields are public and may have been edited).
/// - Calls `objective.check(data)` once.
/// - Runs the secant-step descent driver and returns its [`OptimOutcome`].
///
/// # Errors
/// - Option and data validation errors.
/// - [`OptError::DimensionMismatch`](crate::optimization::errors::OptError::DimensionMismatch)
///   when `theta0` does not match `objective.dim(data)`.
/// - Numeric faults at `theta0`. Faults after the first update are reported
///   in the outcome with `state == DriverState::Faulted` instead.
///
/// # Example
/// ```
/// use ndarray::array;
/// use rust_descent::optimization::descent::{minimize, DescentOptions, DataContext, LossFamily};
///
/// let x = array![[1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];
/// let y = array![1.0, 2.0, 3.0];
/// let data = DataContext::new(x, y, 0.0)?;
/// let out = minimize(&LossFamily::Quadratic, array![0.0, 0.0], &data, &DescentOptions::default())?;
/// assert!(out.converged());
/// assert!((out.theta_hat[0] - 1.0).abs() < 1e-4);
/// # Ok::<(), rust_descent::optimization::errors::OptError>(())
/// ```
pub fn minimize<O: Objective>(
    objective: &O, theta0: Theta, data: &O::Data, opts: &DescentOptions,
) -> OptResult<OptimOutcome> {
    opts.validate()?;
    objective.check(data)?;
    run_descent(objective, data, theta0, opts)
}
