//! descent — secant-step gradient descent over pluggable objectives.
//!
//! Purpose
//! -------
//! Minimize a scalar objective `f(θ)` over an immutable data payload with
//! gradient descent whose learning rate adapts through a Barzilai–Borwein
//! secant rule. Callers pick a built-in [`LossFamily`] or implement
//! [`Objective`], then call [`minimize`].
//!
//! Key behaviors
//! -------------
//! - Four validated contracts in [`evaluators`]: `evaluate`, `gradient`,
//!   `hessian`, `learning_rate`. Analytic derivatives are used when the
//!   objective provides them, central finite differences otherwise.
//! - [`step_size`] turns gradient/step history into a clamped learning
//!   rate, falling back to a configured default on degenerate curvature.
//! - [`run`] drives the `Initialized → Iterating → {Converged,
//!   MaxIterReached, Faulted}` state machine, with an optional Newton
//!   correction when the Hessian is positive definite.
//! - [`adapter::ArgMinAdapter`] exposes the same contracts to `argmin`
//!   solvers.
//!
//! Invariants & assumptions
//! ------------------------
//! - Vectors must match `objective.dim(data)`; mismatches are errors and
//!   are never truncated or padded.
//! - Non-finite values are numeric faults. Before the first update they are
//!   returned as `Err`; after it the driver stops in `Faulted` and reports
//!   the last valid iterate.
//! - Each run owns its working buffers ([`workspace`]); the data payload
//!   is read-only and may be shared between independent runs.
//!
//! Conventions
//! -----------
//! - The engine always minimizes. Maximization problems negate their value.
//! - Errors are [`OptResult`](crate::optimization::errors::OptResult) /
//!   [`OptError`](crate::optimization::errors::OptError); nothing panics on
//!   bad input.
//! - Progress is reported through the `log` facade; the crate installs no
//!   logger.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each submodule.
//! - `tests/integration_descent_pipeline.rs` runs the engine end to end on
//!   the built-in loss families.

pub mod adapter;
pub mod api;
pub mod context;
pub mod evaluators;
pub mod finite_diff;
pub mod objectives;
pub mod run;
pub mod step_size;
pub mod traits;
pub mod types;
pub mod validation;
pub mod workspace;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::adapter::ArgMinAdapter;
pub use self::api::minimize;
pub use self::context::DataContext;
pub use self::evaluators::{evaluate, gradient, hessian, learning_rate, learning_rate_detailed};
pub use self::finite_diff::FdStep;
pub use self::objectives::{FnObjective, LossFamily};
pub use self::step_size::{RateDecision, RateSource, SecantRule, StepSizePolicy};
pub use self::traits::{
    DescentOptions, DriverState, IterRecord, Objective, OptimOutcome, Tolerances,
};
pub use self::types::{Cost, FnEvalMap, Grad, Hessian, Step, Theta};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_descent::optimization::descent::prelude::*;
//
// to import the main engine surface in a single line.

pub mod prelude {
    pub use super::api::minimize;
    pub use super::context::DataContext;
    pub use super::objectives::{FnObjective, LossFamily};
    pub use super::traits::{DescentOptions, DriverState, Objective, OptimOutcome, Tolerances};
    pub use super::types::{Cost, Grad, Theta};
}
