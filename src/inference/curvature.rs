//! inference::curvature — on-demand Hessian diagnostics.
//!
//! Purpose
//! -------
//! Turn a Hessian at a parameter vector into the quantities callers need
//! off the hot path: its spectrum, an explicit positive-definiteness check,
//! a condition number, pseudo-inverse standard errors, and a Newton
//! direction when one exists.
//!
//! Key behaviors
//! -------------
//! - [`curvature_report`] requests the Hessian through
//!   [`descent::evaluators::hessian`](crate::optimization::descent::evaluators::hessian)
//!   and decomposes it with `nalgebra`'s `symmetric_eigen`.
//! - [`is_positive_definite`] and [`newton_direction`] use a Cholesky
//!   factorization; failure means "not PD", never an error.
//!
//! Invariants & assumptions
//! ------------------------
//! - Hessians reaching this module are validated (square, finite) and
//!   symmetric up to rounding; nothing here symmetrizes or regularizes.
//! - Eigenvalues at most [`EIGEN_EPS`] are treated as numerically zero when
//!   forming pseudo-inverse directions and the condition number.
//!
//! Conventions
//! -----------
//! - Hessians are on the scale of the objective being minimized, so for a
//!   loss that is a negative log-likelihood the standard errors are the
//!   classical observed-information ones.
//! - No explicit inverse is formed.
use nalgebra::{DMatrix, DVector};
use ndarray::Array1;

use crate::optimization::{
    descent::{
        evaluators::hessian,
        finite_diff::FdStep,
        traits::Objective,
        types::{Grad, Hessian, Theta},
    },
    errors::OptResult,
    numerical_stability::EIGEN_EPS,
};

/// Curvature summary at a parameter vector.
///
/// - `hessian`: the Hessian used for the diagnostics.
/// - `eigenvalues`: ascending eigenvalues of the Hessian.
/// - `positive_definite`: outcome of a Cholesky factorization.
/// - `condition_number`: `λ_max / λ_min` when `λ_min > EIGEN_EPS`.
/// - `std_errors`: `sqrt(diag(H⁺))` with near-zero eigenvalues dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct CurvatureReport {
    pub hessian: Hessian,
    pub eigenvalues: Array1<f64>,
    pub positive_definite: bool,
    pub condition_number: Option<f64>,
    pub std_errors: Array1<f64>,
}

/// Compute a [`CurvatureReport`] for `objective` at `theta`.
///
/// # Errors
/// Propagates dimension mismatches and numeric faults from the Hessian
/// evaluation.
pub fn curvature_report<O: Objective>(
    objective: &O, data: &O::Data, theta: &Theta, fd_step: FdStep,
) -> OptResult<CurvatureReport> {
    let hess = hessian(objective, data, theta, fd_step)?;
    Ok(report_from_hessian(hess))
}

/// Build a [`CurvatureReport`] from an already computed Hessian.
pub fn report_from_hessian(hess: Hessian) -> CurvatureReport {
    let n = hess.nrows();
    let positive_definite = is_positive_definite(&hess);
    let eigen = to_dmatrix(&hess).symmetric_eigen();

    let mut eigenvalues: Vec<f64> = eigen.eigenvalues.iter().copied().collect();
    eigenvalues.sort_by(f64::total_cmp);
    let condition_number = match (eigenvalues.first(), eigenvalues.last()) {
        (Some(&lo), Some(&hi)) if lo > EIGEN_EPS => Some(hi / lo),
        _ => None,
    };

    let q = &eigen.eigenvectors;
    let mut std_errors = Array1::<f64>::zeros(n);
    for i in 0..n {
        let var: f64 = eigen
            .eigenvalues
            .iter()
            .enumerate()
            .filter(|(_, lambda)| **lambda > EIGEN_EPS)
            .map(|(k, &lambda)| q[(i, k)] * q[(i, k)] / lambda)
            .sum();
        std_errors[i] = var.sqrt();
    }

    CurvatureReport {
        hessian: hess,
        eigenvalues: Array1::from(eigenvalues),
        positive_definite,
        condition_number,
        std_errors,
    }
}

/// `true` when a Cholesky factorization of `hess` succeeds.
pub fn is_positive_definite(hess: &Hessian) -> bool {
    to_dmatrix(hess).cholesky().is_some()
}

/// Solve `H d = g` by Cholesky; `None` when `H` is not positive definite.
///
/// The Newton update is then `θ ← θ − d`.
pub fn newton_direction(hess: &Hessian, grad: &Grad) -> Option<Grad> {
    let chol = to_dmatrix(hess).cholesky()?;
    let rhs = DVector::from_iterator(grad.len(), grad.iter().copied());
    let d = chol.solve(&rhs);
    let d = Array1::from_iter(d.iter().copied());
    d.iter().all(|v| v.is_finite()).then_some(d)
}

// ---- Helper methods ----

fn to_dmatrix(hess: &Hessian) -> DMatrix<f64> {
    DMatrix::from_fn(hess.nrows(), hess.ncols(), |i, j| hess[[i, j]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::descent::{context::DataContext, objectives::LossFamily};
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Check the spectrum, condition number and classical SEs on a diagonal
    // Hessian with known inverse.
    //
    // Given
    // -----
    // - H = diag(4, 1).
    //
    // Expect
    // ------
    // - Eigenvalues [1, 4], condition number 4, SEs [1/2, 1].
    fn diagonal_hessian_gives_known_diagnostics() {
        // Arrange
        let h = array![[4.0, 0.0], [0.0, 1.0]];

        // Act
        let report = report_from_hessian(h);

        // Assert
        assert!(report.positive_definite);
        assert_relative_eq!(report.eigenvalues[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(report.eigenvalues[1], 4.0, epsilon = 1e-12);
        assert_relative_eq!(report.condition_number.unwrap(), 4.0, epsilon = 1e-12);
        assert_relative_eq!(report.std_errors[0], 0.5, epsilon = 1e-12);
        assert_relative_eq!(report.std_errors[1], 1.0, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Indefinite and singular Hessians are reported, not repaired.
    fn indefinite_hessian_is_flagged_and_has_no_newton_direction() {
        let indefinite = array![[1.0, 0.0], [0.0, -2.0]];
        let singular = array![[1.0, 1.0], [1.0, 1.0]];

        assert!(!is_positive_definite(&indefinite));
        assert!(newton_direction(&indefinite, &array![1.0, 1.0]).is_none());
        let report = report_from_hessian(singular);
        assert!(report.condition_number.is_none());
        assert!(report.std_errors.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn newton_direction_solves_linear_system() {
        let h = array![[2.0, 1.0], [1.0, 3.0]];
        let g = array![3.0, 5.0];
        let d = newton_direction(&h, &g).unwrap();
        // H · [0.8, 1.4] = [3.0, 5.0]
        assert_relative_eq!(d[0], 0.8, epsilon = 1e-12);
        assert_relative_eq!(d[1], 1.4, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // A quadratic loss has curvature AᵗA independent of θ.
    fn quadratic_report_uses_gram_matrix() {
        let a = array![[1.0, 0.0], [0.0, 2.0], [1.0, 1.0]];
        let data = DataContext::new(a.clone(), array![0.0, 1.0, 2.0], 0.0).unwrap();
        let gram = a.t().dot(&a);
        for theta in [array![0.0, 0.0], array![5.0, -3.0]] {
            let report =
                curvature_report(&LossFamily::Quadratic, &data, &theta, FdStep::default()).unwrap();
            for ((i, j), &v) in report.hessian.indexed_iter() {
                assert_relative_eq!(v, gram[[i, j]], epsilon = 1e-12);
            }
            assert!(report.positive_definite);
        }
    }
}
