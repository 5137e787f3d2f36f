//! descent::context — strongly typed, read-only data bundle for built-in losses.
//!
//! Purpose
//! -------
//! Hold exactly the fields the built-in loss families need (design matrix,
//! targets, ridge penalty) in a validated, immutable structure that is
//! passed by shared reference to every evaluator call.
//!
//! Invariants & assumptions
//! ------------------------
//! - After a successful [`DataContext::new`]:
//!   - the design matrix is `n × d` with `n ≥ 1`, `d ≥ 1`, all entries finite,
//!   - `targets.len() == n` and all targets are finite,
//!   - `ridge` is finite and `≥ 0`.
//! - Loss-family-specific target domains (e.g. `[0, 1]` for logistic,
//!   `≥ 0` for Poisson) are checked by `Objective::check`
//!   (see `descent::objectives`), not here.
//!
//! Conventions
//! -----------
//! - The context never changes after construction; there are no `&mut`
//!   accessors. Independent optimizer runs may share one context across
//!   threads because it is only ever read.
use ndarray::{Array1, Array2};

use crate::optimization::errors::{OptError, OptResult};

#[derive(Debug, Clone, PartialEq)]
pub struct DataContext {
    design: Array2<f64>,
    targets: Array1<f64>,
    ridge: f64,
}

impl DataContext {
    /// Build a validated data context.
    ///
    /// # Errors
    /// - [`OptError::EmptyDesign`] if the design has no rows or no columns.
    /// - [`OptError::InvalidDesignEntry`] for the first non-finite design entry.
    /// - [`OptError::TargetLengthMismatch`] if `targets.len()` differs from
    ///   the number of design rows.
    /// - [`OptError::InvalidTarget`] for the first non-finite target.
    /// - [`OptError::InvalidRidge`] if `ridge` is negative or non-finite.
    pub fn new(design: Array2<f64>, targets: Array1<f64>, ridge: f64) -> OptResult<Self> {
        let (rows, cols) = design.dim();
        if rows == 0 || cols == 0 {
            return Err(OptError::EmptyDesign { rows, cols });
        }
        if let Some(((row, col), &value)) = design.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(OptError::InvalidDesignEntry { row, col, value });
        }
        if targets.len() != rows {
            return Err(OptError::TargetLengthMismatch { expected: rows, found: targets.len() });
        }
        if let Some((index, &value)) = targets.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(OptError::InvalidTarget {
                index,
                value,
                reason: "Targets must be finite.",
            });
        }
        if !ridge.is_finite() || ridge < 0.0 {
            return Err(OptError::InvalidRidge { value: ridge });
        }
        Ok(Self { design, targets, ridge })
    }

    /// Number of fitted coefficients `d` (design columns).
    pub fn dim(&self) -> usize {
        self.design.ncols()
    }

    /// Number of observations `n` (design rows).
    pub fn n_obs(&self) -> usize {
        self.design.nrows()
    }

    pub fn design(&self) -> &Array2<f64> {
        &self.design
    }

    pub fn targets(&self) -> &Array1<f64> {
        &self.targets
    }

    pub fn ridge(&self) -> f64 {
        self.ridge
    }
}
