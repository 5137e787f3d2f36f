//! Public API surface for objective minimization.
//!
//! - [`Objective`]: trait implemented by every loss the engine can minimize.
//! - [`DescentOptions`] and [`Tolerances`]: configuration for the driver.
//! - [`DriverState`]: the driver's state machine.
//! - [`OptimOutcome`]: normalized result returned by `minimize`.
use crate::optimization::{
    descent::{
        finite_diff::FdStep,
        step_size::StepSizePolicy,
        types::{Cost, DEFAULT_INITIAL_RATE, FnEvalMap, Grad, Hessian, Theta},
        validation::{verify_rate, verify_tol_cost, verify_tol_grad},
    },
    errors::{OptError, OptResult},
};

/// Differentiable objective over a read-only data payload.
///
/// - `type Data`: immutable context passed to every call (design matrix,
///   targets, hyperparameters, ...). Never mutated by the engine.
///
/// Required:
/// - `dim(&Data) -> usize`: expected parameter dimension `d`.
/// - `value(&Theta, &Data) -> OptResult<Cost>`: evaluate the loss.
///
/// Optional:
/// - `check(&Data)`: reject data the loss cannot handle. Called once before
///   a run.
/// - `grad(&Theta, &Data)`: analytic gradient. Defaults to
///   `Err(GradientNotImplemented)`, which makes the engine use central
///   finite differences of `value`.
/// - `hessian(&Theta, &Data)`: analytic Hessian. Defaults to
///   `Err(HessianNotImplemented)`, which makes the engine difference the
///   gradient (or the cost, if no gradient exists either).
///
/// Implementations must be pure: identical `(theta, data)` inputs give
/// bit-identical outputs.
pub trait Objective {
    type Data;

    // Required methods
    fn dim(&self, data: &Self::Data) -> usize;
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<Cost>;

    // Optional methods
    fn check(&self, _data: &Self::Data) -> OptResult<()> {
        Ok(())
    }

    fn grad(&self, _theta: &Theta, _data: &Self::Data) -> OptResult<Grad> {
        Err(OptError::GradientNotImplemented)
    }

    fn hessian(&self, _theta: &Theta, _data: &Self::Data) -> OptResult<Hessian> {
        Err(OptError::HessianNotImplemented)
    }
}

/// Numerical tolerances and iteration limits used by the driver.
///
/// - `tol_grad`: converge when `‖∇f(θₖ)‖₂ < tol_grad`.
/// - `tol_cost`: converge when `|f(θₖ₊₁) − f(θₖ)| < tol_cost`.
/// - `max_iter`: hard cap on the number of parameter updates.
///
/// Any field can be `None` but **at least one** must be provided.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub tol_grad: Option<f64>,
    pub tol_cost: Option<f64>,
    pub max_iter: Option<usize>,
}

impl Tolerances {
    /// Construct validated tolerances.
    ///
    /// # Errors
    /// - [`OptError::NoTolerancesProvided`] if all three are `None`.
    /// - [`OptError::InvalidTolGrad`] / [`OptError::InvalidTolCost`] for
    ///   non-finite or non-positive tolerances.
    /// - [`OptError::InvalidMaxIter`] if `max_iter == 0`.
    pub fn new(
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    ) -> OptResult<Self> {
        let tols = Self { tol_grad, tol_cost, max_iter };
        tols.validate()?;
        Ok(tols)
    }

    pub fn validate(&self) -> OptResult<()> {
        if self.tol_grad.is_none() && self.tol_cost.is_none() && self.max_iter.is_none() {
            return Err(OptError::NoTolerancesProvided);
        }
        verify_tol_cost(self.tol_cost)?;
        verify_tol_grad(self.tol_grad)?;
        if let Some(max_iter) = self.max_iter {
            if max_iter == 0 {
                return Err(OptError::InvalidMaxIter {
                    max_iter,
                    reason: "Maximum iterations must be greater than zero.",
                });
            }
        }
        Ok(())
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        Self { tol_grad: Some(1e-6), tol_cost: Some(1e-12), max_iter: Some(500) }
    }
}

/// Driver configuration.
///
/// Fields:
/// - `tols`: stopping rules.
/// - `step_policy`: secant rule, fallback rate and clamp band.
/// - `initial_rate`: learning rate for the first update, before any
///   gradient history exists.
/// - `fd_step`: finite-difference ε policy for objectives without analytic
///   derivatives.
/// - `newton_correction`: when `true`, each iteration requests the Hessian
///   and takes a Newton step if it is positive definite.
/// - `collect_trace`: keep a per-iteration [`IterRecord`] history.
/// - `verbose`: promote per-iteration events from `debug` to `info`.
///
/// Default:
/// - `tols`: `tol_grad = 1e-6`, `tol_cost = 1e-12`, `max_iter = 500`
/// - `step_policy`: BB1 with fallback `1e-3`, band `[1e-10, 1e10]`
/// - `initial_rate`: `0.1`; `fd_step`: `Scaled(1e-6)`
/// - all flags `false`
#[derive(Debug, Clone, PartialEq)]
pub struct DescentOptions {
    pub tols: Tolerances,
    pub step_policy: StepSizePolicy,
    pub initial_rate: f64,
    pub fd_step: FdStep,
    pub newton_correction: bool,
    pub collect_trace: bool,
    pub verbose: bool,
}

impl DescentOptions {
    /// Create validated options; flags start `false` and are switched on
    /// with the `with_*` builders.
    pub fn new(
        tols: Tolerances, step_policy: StepSizePolicy, initial_rate: f64, fd_step: FdStep,
    ) -> OptResult<Self> {
        let opts = Self {
            tols,
            step_policy,
            initial_rate,
            fd_step,
            newton_correction: false,
            collect_trace: false,
            verbose: false,
        };
        opts.validate()?;
        Ok(opts)
    }

    pub fn with_newton_correction(mut self, on: bool) -> Self {
        self.newton_correction = on;
        self
    }

    pub fn with_trace(mut self, on: bool) -> Self {
        self.collect_trace = on;
        self
    }

    pub fn with_verbose(mut self, on: bool) -> Self {
        self.verbose = on;
        self
    }

    /// Re-check every nested setting. Called by `minimize` since fields
    /// are public and may have been edited after construction.
    pub fn validate(&self) -> OptResult<()> {
        self.tols.validate()?;
        self.step_policy.validate()?;
        verify_rate("initial_rate", self.initial_rate)?;
        self.fd_step.validate()
    }
}

impl Default for DescentOptions {
    fn default() -> Self {
        Self {
            tols: Tolerances::default(),
            step_policy: StepSizePolicy::default(),
            initial_rate: DEFAULT_INITIAL_RATE,
            fd_step: FdStep::default(),
            newton_correction: false,
            collect_trace: false,
            verbose: false,
        }
    }
}

/// Descent driver state machine.
///
/// `Initialized → Iterating → {Converged, MaxIterReached, Faulted}`; the
/// last three are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Initialized,
    Iterating,
    Converged,
    MaxIterReached,
    Faulted,
}

impl DriverState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, DriverState::Converged | DriverState::MaxIterReached | DriverState::Faulted)
    }
}

/// One row of the optional iteration trace.
///
/// `cost` is the objective after the update; `grad_norm` and `rate` are the
/// values used to make it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterRecord {
    pub iter: usize,
    pub cost: Cost,
    pub grad_norm: f64,
    pub rate: f64,
    pub newton: bool,
}

/// Canonical result returned by `minimize`.
///
/// - `theta_hat`: final parameter vector (the last valid one when `Faulted`).
/// - `value`: objective at `theta_hat`.
/// - `state`: terminal [`DriverState`].
/// - `status`: human-readable termination status.
/// - `iterations`: number of parameter updates performed.
/// - `fn_evals`: `cost_count`, `gradient_count`, `hessian_count`.
/// - `grad_norm`: norm of the last computed gradient, if any.
/// - `last_rate`: learning rate of the last update, if any.
/// - `fault`: the numeric fault that stopped the run when `Faulted`.
/// - `trace`: iteration history when `collect_trace` was set.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimOutcome {
    pub theta_hat: Theta,
    pub value: Cost,
    pub state: DriverState,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
    pub grad_norm: Option<f64>,
    pub last_rate: Option<f64>,
    pub fault: Option<OptError>,
    pub trace: Option<Vec<IterRecord>>,
}

impl OptimOutcome {
    pub fn converged(&self) -> bool {
        self.state == DriverState::Converged
    }
}
