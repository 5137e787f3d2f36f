//! numerical_stability — numerically robust link transforms and tolerances.
//!
//! Purpose
//! -------
//! Collect numerically stable scalar transforms used by the built-in loss
//! families, plus the small shared tolerances the rest of the optimizer
//! relies on.
//!
//! Key behaviors
//! -------------
//! - Provide stable scalar transforms (`safe_softplus`, `safe_logistic`)
//!   for the logistic loss without overflow/underflow.
//! - Centralize small numeric tolerances (`EIGEN_EPS`, `GENERAL_TOL`) so
//!   the step-size adapter and curvature diagnostics share consistent
//!   guards.
//!
//! Conventions
//! -----------
//! - This module never logs, performs I/O, or touches global state; it is
//!   pure numerical helpers suitable for tight inner loops.
//! - All public transforms assume finite `f64` inputs; non-finite results
//!   produced upstream are caught by the evaluator contracts.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{EIGEN_EPS, GENERAL_TOL, safe_logistic, safe_softplus};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::transformations::{EIGEN_EPS, GENERAL_TOL, safe_logistic, safe_softplus};
}
