//! Adapter that exposes any [`Objective`] as an `argmin` problem.
//!
//! The descent driver does not need `argmin`; the adapter lets the same
//! objectives and data plug into `argmin` solvers (L-BFGS, Newton, ...)
//! owned by the surrounding library. Every call goes through the evaluator
//! contracts, so dimension checks, finite-difference fallbacks, and
//! numeric-fault reporting are identical on both paths. Errors travel
//! through `argmin::core::Error` boxed and are recovered intact by
//! `From<argmin::core::Error> for OptError`.
use argmin::core::{CostFunction, Error, Gradient, Hessian as ArgminHessian};

use crate::optimization::descent::{
    evaluators::{evaluate, gradient, hessian},
    finite_diff::FdStep,
    traits::Objective,
    types::{Cost, Grad, Hessian, Theta},
};

/// Bridges an [`Objective`] and its data to `argmin`'s `CostFunction`,
/// `Gradient` and `Hessian` traits.
#[derive(Debug)]
pub struct ArgMinAdapter<'a, O: Objective> {
    pub objective: &'a O,
    pub data: &'a O::Data,
    pub fd_step: FdStep,
}

impl<'a, O: Objective> ArgMinAdapter<'a, O> {
    /// Construct an adapter using the default finite-difference policy.
    pub fn new(objective: &'a O, data: &'a O::Data) -> Self {
        Self { objective, data, fd_step: FdStep::default() }
    }

    pub fn with_fd_step(mut self, fd_step: FdStep) -> Self {
        self.fd_step = fd_step;
        self
    }
}

impl<'a, O: Objective> CostFunction for ArgMinAdapter<'a, O> {
    type Param = Theta;
    type Output = Cost;

    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        Ok(evaluate(self.objective, self.data, theta)?)
    }
}

impl<'a, O: Objective> Gradient for ArgMinAdapter<'a, O> {
    type Param = Theta;
    type Gradient = Grad;

    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        Ok(gradient(self.objective, self.data, theta, self.fd_step)?)
    }
}

impl<'a, O: Objective> ArgminHessian for ArgMinAdapter<'a, O> {
    type Param = Theta;
    type Hessian = Hessian;

    fn hessian(&self, theta: &Self::Param) -> Result<Self::Hessian, Error> {
        Ok(hessian(self.objective, self.data, theta, self.fd_step)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::{
        descent::{context::DataContext, objectives::LossFamily},
        errors::OptError,
    };
    use approx::assert_relative_eq;
    use argmin::{
        core::{Executor, State},
        solver::{linesearch::MoreThuenteLineSearch, quasinewton::LBFGS},
    };
    use ndarray::array;

    fn data() -> DataContext {
        let x = array![[1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];
        DataContext::new(x, array![1.0, 2.0, 3.0], 0.0).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // The adapter returns exactly what the evaluator contracts return.
    fn adapter_matches_evaluators() {
        // Arrange
        let data = data();
        let fam = LossFamily::Quadratic;
        let adapter = ArgMinAdapter::new(&fam, &data);
        let theta = array![0.5, -0.5];

        // Act
        let c = adapter.cost(&theta).unwrap();
        let g = adapter.gradient(&theta).unwrap();
        let h = adapter.hessian(&theta).unwrap();

        // Assert
        assert_eq!(c, evaluate(&fam, &data, &theta).unwrap());
        assert_eq!(g, gradient(&fam, &data, &theta, FdStep::default()).unwrap());
        assert_eq!(h, hessian(&fam, &data, &theta, FdStep::default()).unwrap());
    }

    #[test]
    // Purpose
    // -------
    // Contract violations cross the argmin error boundary unchanged.
    fn errors_round_trip_through_argmin() {
        let data = data();
        let fam = LossFamily::Quadratic;
        let adapter = ArgMinAdapter::new(&fam, &data);

        let err = adapter.cost(&array![1.0, 2.0, 3.0]).unwrap_err();

        assert_eq!(
            OptError::from(err),
            OptError::DimensionMismatch { operand: "theta", expected: 2, found: 3 }
        );
    }

    #[test]
    // Purpose
    // -------
    // An argmin L-BFGS solver minimizes a built-in loss through the adapter.
    //
    // Given
    // -----
    // - Least squares with an exact fit at θ = [1, 2].
    //
    // Expect
    // ------
    // - The best parameter found is θ ≈ [1, 2].
    fn lbfgs_runs_on_adapter() {
        let data = data();
        let fam = LossFamily::Quadratic;
        let problem = ArgMinAdapter::new(&fam, &data);
        let solver: LBFGS<MoreThuenteLineSearch<Theta, Grad, f64>, Theta, Grad, f64> =
            LBFGS::new(MoreThuenteLineSearch::new(), 7);

        let result = Executor::new(problem, solver)
            .configure(|state| state.param(array![0.0, 0.0]).max_iters(100))
            .run()
            .unwrap();
        let theta_hat = result.state().clone().take_best_param().unwrap();

        assert_relative_eq!(theta_hat[0], 1.0, epsilon = 1e-5);
        assert_relative_eq!(theta_hat[1], 2.0, epsilon = 1e-5);
    }
}
