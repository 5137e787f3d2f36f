//! optimization — descent engine, numerical helpers, and unified error surface.
//!
//! Purpose
//! -------
//! Provide the optimization core consumed by model-fitting code: objectives
//! are evaluated, differentiated and minimized by a secant-step descent
//! driver, with all failures reported through one error type.
//!
//! Key behaviors
//! -------------
//! - `descent`: the objective contracts, built-in loss families, step-size
//!   adapter and descent driver.
//! - `numerical_stability`: stable scalar transforms and shared tolerances.
//! - `errors`: `OptError` / `OptResult<T>` with the numeric-fault and
//!   dimension-mismatch taxonomy.
//!
//! Conventions
//! -----------
//! - Parameters, gradients and Hessians are `ndarray` aliases (`Theta`,
//!   `Grad`, `Hessian`).
//! - Public entrypoints that can fail return `OptResult<T>`; callers never
//!   see raw `argmin` errors.
//! - No I/O beyond `log` events and the opt-in verbose start-up line.
//!
//! Testing notes
//! -------------
//! - Unit tests in the submodules focus on local concerns; the integration
//!   test in `tests/` runs full minimizations.

pub mod descent;
pub mod errors;
pub mod numerical_stability;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_descent::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::descent::prelude::*;
    pub use super::errors::{ErrorKind, OptError, OptResult};
    pub use super::numerical_stability::prelude::*;
}
