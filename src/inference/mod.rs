//! inference — curvature diagnostics at fitted parameters.
//!
//! Purpose
//! -------
//! Evaluate the Hessian on demand, off the descent hot path, and summarize
//! it: spectrum, positive-definiteness, condition number and classical
//! standard errors. The same Cholesky check backs the driver's optional
//! Newton correction.
//!
//! Conventions
//! -----------
//! - Hessians come from the evaluator contracts and are never regularized;
//!   an indefinite matrix is reported as such.
//! - All functions are pure with respect to I/O.

pub mod curvature;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::curvature::{
    CurvatureReport, curvature_report, is_positive_definite, newton_direction,
    report_from_hessian,
};

pub mod prelude {
    pub use super::curvature::{CurvatureReport, curvature_report};
}
