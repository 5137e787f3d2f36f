//! Descent driver: the `Initialized → Iterating → {Converged, MaxIterReached,
//! Faulted}` state machine over the evaluator contracts.
//!
//! Each iteration:
//! 1. gradient at the current iterate; stop if `‖g‖₂ < tol_grad`,
//! 2. learning rate: `initial_rate` on the first update, the secant rule
//!    afterwards,
//! 3. optional Newton correction when the Hessian is positive definite,
//! 4. update `θ ← θ + step`, re-evaluate the objective,
//! 5. stop if `|Δf| < tol_cost`; otherwise keep `g` and the step as history.
//!
//! The iteration cap is checked before every update. Numeric faults after
//! the initial evaluation end the run in `Faulted` with the last valid
//! iterate; every other error is returned to the caller.
use argmin_math::ArgminL2Norm;
use log::{Level, debug, info, log, warn};

use crate::{
    inference::curvature::newton_direction,
    optimization::{
        descent::{
            evaluators::{evaluate, gradient, hessian, learning_rate_detailed},
            step_size::RateSource,
            traits::{DescentOptions, DriverState, IterRecord, Objective, OptimOutcome},
            types::{Grad, Step, Theta},
            validation::{validate_dim, validate_theta},
            workspace::DescentWorkspace,
        },
        errors::{OptError, OptResult},
    },
};

/// Result of one driver iteration.
enum Progress {
    Continue,
    Converged(&'static str),
}

/// Run the descent state machine from `theta0`.
///
/// Options are assumed validated (see [`DescentOptions::validate`]).
///
/// # Errors
/// - [`OptError::DimensionMismatch`] if `theta0` does not match the
///   objective's dimension.
/// - Numeric faults at `theta0` itself (no valid iterate exists yet).
/// - Any non-numeric error raised during iteration, such as an objective
///   returning a gradient of the wrong length.
pub fn run_descent<O: Objective>(
    objective: &O, data: &O::Data, theta0: Theta, opts: &DescentOptions,
) -> OptResult<OptimOutcome> {
    let mut state = DriverState::Initialized;
    validate_dim("theta", objective.dim(data), theta0.len())?;
    validate_theta(&theta0)?;
    let cost0 = evaluate(objective, data, &theta0)?;
    let mut ws = DescentWorkspace::new(theta0, cost0, opts.collect_trace);
    debug!("descent: {state:?} at f(theta0) = {cost0:.6e}");

    state = DriverState::Iterating;
    loop {
        if let Some(max_iter) = opts.tols.max_iter {
            if ws.iterations >= max_iter {
                let status = format!("MaxIterReached: {max_iter} iterations without convergence");
                return Ok(finish(ws, DriverState::MaxIterReached, status, None));
            }
        }
        match advance(objective, data, opts, &mut ws) {
            Ok(Progress::Continue) => {}
            Ok(Progress::Converged(reason)) => {
                let status = format!("Converged: {reason}");
                return Ok(finish(ws, DriverState::Converged, status, None));
            }
            Err(err) if err.is_numeric_fault() => {
                warn!(
                    "descent: {state:?} -> Faulted at iteration {}: {err}",
                    ws.iterations + 1
                );
                let status = format!("Faulted: {err}");
                return Ok(finish(ws, DriverState::Faulted, status, Some(err)));
            }
            Err(err) => return Err(err),
        }
    }
}

/// Perform one update on `ws`.
fn advance<O: Objective>(
    objective: &O, data: &O::Data, opts: &DescentOptions, ws: &mut DescentWorkspace,
) -> OptResult<Progress> {
    let level = if opts.verbose { Level::Info } else { Level::Debug };

    ws.count_gradient();
    let grad = gradient(objective, data, &ws.theta, opts.fd_step)?;
    let grad_norm = grad.l2_norm();
    ws.last_grad_norm = Some(grad_norm);
    if opts.verbose && ws.iterations == 0 {
        log_initial_state(ws.cost, grad_norm);
    }
    if let Some(tol) = opts.tols.tol_grad {
        if grad_norm < tol {
            return Ok(Progress::Converged("gradient norm below tol_grad"));
        }
    }

    let rate = match (&ws.grad_prev, &ws.step_prev) {
        (Some(grad_prev), Some(step_prev)) => {
            let decision = learning_rate_detailed(
                objective,
                data,
                &opts.step_policy,
                &grad,
                grad_prev,
                step_prev,
            )?;
            if decision.source == RateSource::Fallback {
                warn!(
                    "descent: iteration {}: degenerate secant denominator, using default rate {:e}",
                    ws.iterations + 1,
                    decision.rate
                );
            }
            decision.rate
        }
        _ => opts.initial_rate,
    };

    let (step, rate, newton) = if opts.newton_correction {
        newton_step(objective, data, opts, ws, &grad, rate)?
    } else {
        (-rate * &grad, rate, false)
    };

    let theta_next = &ws.theta + &step;
    validate_theta(&theta_next)?;
    ws.count_cost();
    let cost_next = evaluate(objective, data, &theta_next)?;
    let cost_change = (cost_next - ws.cost).abs();

    ws.last_rate = Some(rate);
    ws.accept(theta_next, cost_next, grad, step);
    let iter = ws.iterations;
    ws.record(IterRecord { iter, cost: cost_next, grad_norm, rate, newton });
    log!(
        level,
        "descent: iter {iter:>4} f = {cost_next:.6e} |g| = {grad_norm:.3e} rate = {rate:.3e}{}",
        if newton { " (newton)" } else { "" }
    );

    if let Some(tol) = opts.tols.tol_cost {
        if cost_change < tol {
            return Ok(Progress::Converged("cost change below tol_cost"));
        }
    }
    Ok(Progress::Continue)
}

/// Newton step `−H⁻¹g` when the Hessian factors; the gradient step
/// `−rate·g` otherwise. Returns `(step, rate_used, newton_taken)`.
fn newton_step<O: Objective>(
    objective: &O, data: &O::Data, opts: &DescentOptions, ws: &mut DescentWorkspace, grad: &Grad,
    rate: f64,
) -> OptResult<(Step, f64, bool)> {
    ws.count_hessian();
    let hess = hessian(objective, data, &ws.theta, opts.fd_step)?;
    match newton_direction(&hess, grad) {
        Some(direction) => Ok((-direction, 1.0, true)),
        None => {
            warn!(
                "descent: iteration {}: Hessian not positive definite, taking gradient step",
                ws.iterations + 1
            );
            Ok((-rate * grad, rate, false))
        }
    }
}

fn finish(
    mut ws: DescentWorkspace, state: DriverState, status: String, fault: Option<OptError>,
) -> OptimOutcome {
    debug_assert!(state.is_terminal());
    info!(
        "descent: {status} after {} iterations, f = {:.6e}",
        ws.iterations, ws.cost
    );
    let trace = ws.take_trace();
    OptimOutcome {
        fn_evals: ws.fn_evals(),
        theta_hat: ws.theta,
        value: ws.cost,
        state,
        status,
        iterations: ws.iterations,
        grad_norm: ws.last_grad_norm,
        last_rate: ws.last_rate,
        fault,
        trace,
    }
}

// ---- Helper Methods ----

fn log_initial_state(cost0: f64, grad_norm0: f64) {
    eprintln!("{}", initial_state_line(cost0, grad_norm0));
}

fn initial_state_line(cost0: f64, grad_norm0: f64) -> String {
    format!("init: f(theta0) = {cost0:.6}, ||grad|| = {grad_norm0:.6}")
}
