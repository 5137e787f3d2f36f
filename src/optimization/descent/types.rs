//! descent::types — shared numeric aliases for the descent engine.
//!
//! Purpose
//! -------
//! Centralize the core numeric types used by the optimizer so the rest of
//! the code stays agnostic to the `ndarray` containers underneath.
//!
//! Invariants & assumptions
//! ------------------------
//! - All optimizer vectors and matrices are `ndarray` containers over `f64`.
//! - `Theta`, `Grad`, and `Step` always share the context dimension `d`;
//!   `Hessian` is `d × d`.
//!
//! Testing notes
//! -------------
//! - This module only defines type aliases and constants; correctness is
//!   exercised by the modules that use them.
use ndarray::{Array1, Array2};
use std::collections::HashMap;

/// Parameter vector `θ` being fit.
pub type Theta = Array1<f64>;

/// Gradient vector `∇f(θ)`, matching the shape of `Theta`.
pub type Grad = Array1<f64>;

/// Step vector `θₖ − θₖ₋₁` between consecutive parameter vectors.
pub type Step = Array1<f64>;

/// Dense Hessian matrix; `d × d` for `d = Theta.len()`.
pub type Hessian = Array2<f64>;

/// Scalar objective value (the loss being minimized).
pub type Cost = f64;

/// Function-evaluation counters reported in the run outcome.
///
/// Keys are `"cost_count"`, `"gradient_count"` and `"hessian_count"`.
pub type FnEvalMap = HashMap<String, u64>;

/// Default relative finite-difference step: `εᵢ = 1e-6 · max(1, |θᵢ|)`.
pub const DEFAULT_FD_REL_STEP: f64 = 1e-6;

/// Default learning rate used for the first iteration.
pub const DEFAULT_INITIAL_RATE: f64 = 0.1;

/// Rate returned when the secant denominator is degenerate.
pub const DEFAULT_FALLBACK_RATE: f64 = 1e-3;

/// Default lower clamp of the adapted learning rate.
pub const DEFAULT_MIN_RATE: f64 = 1e-10;

/// Default upper clamp of the adapted learning rate.
pub const DEFAULT_MAX_RATE: f64 = 1e10;
