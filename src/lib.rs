//! rust_descent — secant-step gradient descent for model fitting.
//!
//! Purpose
//! -------
//! Serve as the crate root for the optimization core used by model-fitting
//! code: evaluate an objective, its gradient and Hessian over a read-only
//! data context, adapt the learning rate with a Barzilai–Borwein rule, and
//! drive the descent to convergence.
//!
//! Key behaviors
//! -------------
//! - `optimization::descent` exposes `minimize`, the `Objective` trait, the
//!   built-in `LossFamily` set (quadratic, logistic, Huber, Poisson) and the
//!   four evaluator contracts.
//! - `inference` computes curvature diagnostics at fitted parameters.
//! - `optimization::errors` is the single error surface.
//!
//! Invariants & assumptions
//! ------------------------
//! - Everything is single-threaded and synchronous. A run owns its buffers;
//!   data contexts are immutable and may be shared across runs.
//!
//! Downstream usage
//! ----------------
//! - Build a `DataContext`, pick a `LossFamily` (or implement `Objective`),
//!   and call `minimize` with `DescentOptions`.
//! - Install any `log` backend to see iteration events.
//!
//! Testing notes
//! -------------
//! - Unit tests live in the submodules; `tests/` holds end-to-end runs.

pub mod inference;
pub mod optimization;
