//! Integration tests for the descent engine.
//!
//! Purpose
//! -------
//! - Validate the end-to-end pipeline: from a validated `DataContext`,
//!   through the evaluator contracts and the step-size adapter, to full
//!   minimizations and curvature diagnostics at the fitted parameters.
//! - Exercise every built-in loss family and the closure-backed objective on
//!   small but realistic problems.
//!
//! Coverage
//! --------
//! - `optimization::descent::evaluators`:
//!   - Analytic vs finite-difference gradients, constant quadratic Hessian,
//!     idempotence, and dimension contracts.
//! - `optimization::descent::step_size` through `learning_rate`.
//! - `optimization::descent::minimize`:
//!   - Convergence, fault handling, robust fitting, and shared contexts.
//! - `inference::curvature`:
//!   - Diagnostics at a fitted logistic regression.
//!
//! Exclusions
//! ----------
//! - Fine-grained validation of options, finite-difference steps and
//!   numerical-stability helpers; these are covered by unit tests.
use approx::assert_relative_eq;
use ndarray::{Array1, Array2, array};
use rust_descent::{
    inference::curvature_report,
    optimization::{
        descent::{
            DataContext, DescentOptions, DriverState, FdStep, FnObjective, LossFamily, SecantRule,
            StepSizePolicy, Theta, Tolerances, evaluate, gradient, hessian, learning_rate,
            minimize,
        },
        errors::OptError,
    },
};

/// Purpose
/// -------
/// Small overdetermined least-squares problem `½‖Aθ − b‖²`.
fn least_squares_context() -> DataContext {
    let a = array![[2.0, -1.0, 0.5], [0.3, 1.5, -0.2], [1.0, 1.0, 1.0], [-0.4, 0.2, 2.0]];
    let b = array![1.0, -2.0, 0.5, 3.0];
    DataContext::new(a, b, 0.0).expect("valid least-squares context")
}

/// Purpose
/// -------
/// Binary outcomes on a single feature with class overlap, so the
/// logistic fit has a finite optimum.
fn logistic_context() -> DataContext {
    let n = 20;
    let t = Array1::linspace(-2.0, 2.0, n);
    let design = Array2::from_shape_fn((n, 2), |(i, j)| if j == 0 { 1.0 } else { t[i] });
    let targets = Array1::from_shape_fn(n, |i| {
        let positive = t[i] > 0.0;
        if positive ^ (i % 5 == 0) { 1.0 } else { 0.0 }
    });
    DataContext::new(design, targets, 0.1).expect("valid logistic context")
}

/// Purpose
/// -------
/// Line `y = 2 + 0.5 t` sampled at `t = 0..9` with one gross outlier.
fn outlier_context() -> DataContext {
    let n = 10;
    let design = Array2::from_shape_fn((n, 2), |(i, j)| if j == 0 { 1.0 } else { i as f64 });
    let mut targets = Array1::from_shape_fn(n, |i| 2.0 + 0.5 * i as f64);
    targets[n - 1] += 50.0;
    DataContext::new(design, targets, 0.0).expect("valid outlier context")
}

fn options(tol_grad: f64, max_iter: usize) -> DescentOptions {
    let tols = Tolerances::new(Some(tol_grad), Some(1e-14), Some(max_iter)).unwrap();
    DescentOptions::new(tols, StepSizePolicy::default(), 0.1, FdStep::default()).unwrap()
}

#[test]
// Purpose
// -------
// For f(θ) = ½‖Aθ − b‖² the analytic gradient Aᵗ(Aθ − b) matches central
// differences within 1e-5 relative error at ε = 1e-6.
fn quadratic_gradient_matches_central_differences() {
    // Arrange
    let data = least_squares_context();
    let a = data.design().clone();
    let b = data.targets().clone();
    let value_only = FnObjective::new(3, move |x: &Theta| {
        let r = a.dot(x) - &b;
        0.5 * r.dot(&r)
    });

    for theta in [array![0.0, 0.0, 0.0], array![1.5, -2.0, 0.25], array![-3.0, 4.0, 10.0]] {
        // Act
        let analytic =
            gradient(&LossFamily::Quadratic, &data, &theta, FdStep::default()).unwrap();
        let numeric = gradient(&value_only, &(), &theta, FdStep::default()).unwrap();
        let residual = data.design().dot(&theta) - data.targets();
        let closed_form = data.design().t().dot(&residual);

        // Assert
        for i in 0..3 {
            assert_relative_eq!(analytic[i], closed_form[i], max_relative = 1e-12);
            assert_relative_eq!(numeric[i], analytic[i], max_relative = 1e-5, epsilon = 1e-8);
        }
    }
}

#[test]
// Purpose
// -------
// The quadratic Hessian is AᵗA at every θ, whether analytic or obtained by
// differencing the cost.
fn quadratic_hessian_is_constant_gram_matrix() {
    let data = least_squares_context();
    let gram = data.design().t().dot(data.design());
    let a = data.design().clone();
    let b = data.targets().clone();
    let value_only = FnObjective::new(3, move |x: &Theta| {
        let r = a.dot(x) - &b;
        0.5 * r.dot(&r)
    });

    for theta in [array![0.0, 0.0, 0.0], array![2.0, -1.0, 0.5]] {
        let analytic = hessian(&LossFamily::Quadratic, &data, &theta, FdStep::default()).unwrap();
        let numeric = hessian(&value_only, &(), &theta, FdStep::default()).unwrap();
        for ((i, j), &g) in gram.indexed_iter() {
            assert_relative_eq!(analytic[[i, j]], g, epsilon = 1e-12);
            assert_relative_eq!(numeric[[i, j]], g, epsilon = 1e-4);
        }
    }
}

#[test]
// Purpose
// -------
// Step-size adapter through the public contract.
//
// Given
// -----
// - s = [1, 0], y = [2, 0] (grad_prev = 0).
// - s·y = 0 with a configured default rate of 0.05.
//
// Expect
// ------
// - BB1 rate 0.5; the default rate, finite, for the orthogonal case.
fn learning_rate_contract_matches_secant_rules() {
    let obj = FnObjective::new(2, |x: &Theta| x.dot(x));
    let policy = StepSizePolicy::new(SecantRule::Long, 0.05, 1e-8, 1e8).unwrap();
    let zero = array![0.0, 0.0];

    let rate = learning_rate(&obj, &(), &policy, &array![2.0, 0.0], &zero, &array![1.0, 0.0])
        .unwrap();
    assert_relative_eq!(rate, 0.5);

    let fallback =
        learning_rate(&obj, &(), &policy, &array![0.0, 2.0], &zero, &array![1.0, 0.0]).unwrap();
    assert_eq!(fallback, 0.05);
    assert!(fallback.is_finite());
}

#[test]
// Purpose
// -------
// f(x) = (x − 3)² from x₀ = 0 converges to 3 well within 200 iterations,
// and the loss never increases once the secant rate has kicked in.
fn shifted_parabola_converges_to_three() {
    // Arrange
    let obj = FnObjective::new(1, |x: &Theta| (x[0] - 3.0).powi(2));
    let opts = options(1e-6, 500).with_trace(true);

    // Act
    let out = minimize(&obj, array![0.0], &(), &opts).unwrap();

    // Assert
    assert_eq!(out.state, DriverState::Converged);
    assert!(out.iterations < 200);
    assert_relative_eq!(out.theta_hat[0], 3.0, epsilon = 1e-5);
    let trace = out.trace.expect("trace requested");
    for pair in trace[1..].windows(2) {
        assert!(pair[1].cost <= pair[0].cost);
    }
    for (k, record) in trace.iter().enumerate() {
        assert_eq!(record.iter, k + 1);
    }
}

#[test]
// Purpose
// -------
// Evaluator contracts are pure: identical inputs give bit-identical
// outputs for every loss family.
fn evaluators_are_idempotent() {
    let data = logistic_context();
    let theta = array![0.3, -0.7];
    let families =
        [LossFamily::Quadratic, LossFamily::Logistic, LossFamily::Huber { delta: 0.5 }, LossFamily::Poisson];
    for fam in families {
        assert_eq!(evaluate(&fam, &data, &theta).unwrap(), evaluate(&fam, &data, &theta).unwrap());
        assert_eq!(
            gradient(&fam, &data, &theta, FdStep::default()).unwrap(),
            gradient(&fam, &data, &theta, FdStep::default()).unwrap()
        );
        assert_eq!(
            hessian(&fam, &data, &theta, FdStep::default()).unwrap(),
            hessian(&fam, &data, &theta, FdStep::default()).unwrap()
        );
    }
}

#[test]
// Purpose
// -------
// A length-3 parameter vector against a 5-column context is rejected
// deterministically by every entry point.
fn dimension_mismatch_is_rejected_everywhere() {
    let design = Array2::from_shape_fn((6, 5), |(i, j)| ((i + 1) * (j + 2)) as f64 / 10.0);
    let data = DataContext::new(design, Array1::ones(6), 0.0).unwrap();
    let theta = Array1::<f64>::zeros(3);
    let fam = LossFamily::Quadratic;
    let expected = OptError::DimensionMismatch { operand: "theta", expected: 5, found: 3 };

    for _ in 0..2 {
        assert_eq!(evaluate(&fam, &data, &theta).unwrap_err(), expected);
        assert_eq!(gradient(&fam, &data, &theta, FdStep::default()).unwrap_err(), expected);
        assert_eq!(hessian(&fam, &data, &theta, FdStep::default()).unwrap_err(), expected);
        assert_eq!(
            minimize(&fam, theta.clone(), &data, &DescentOptions::default()).unwrap_err(),
            expected
        );
    }
}

#[test]
// Purpose
// -------
// Fit a ridge-penalized logistic regression and inspect the curvature at
// the optimum.
//
// Expect
// ------
// - Convergence with a near-zero gradient.
// - A positive definite Hessian with finite standard errors.
fn logistic_fit_converges_with_positive_definite_curvature() {
    let data = logistic_context();
    let opts = options(1e-7, 2000);

    let out = minimize(&LossFamily::Logistic, array![0.0, 0.0], &data, &opts).unwrap();

    assert!(out.converged(), "status: {}", out.status);
    let g = gradient(&LossFamily::Logistic, &data, &out.theta_hat, FdStep::default()).unwrap();
    assert!(g.iter().all(|v| v.abs() < 1e-4));
    assert!(out.theta_hat[1] > 0.0);

    let report =
        curvature_report(&LossFamily::Logistic, &data, &out.theta_hat, FdStep::default()).unwrap();
    assert!(report.positive_definite);
    assert!(report.condition_number.is_some());
    assert!(report.std_errors.iter().all(|s| s.is_finite() && *s > 0.0));
}

#[test]
// Purpose
// -------
// The Huber loss limits the pull of a gross outlier compared to least
// squares.
fn huber_fit_resists_outlier() {
    let data = outlier_context();
    let opts = options(1e-8, 5000);

    let ols = minimize(&LossFamily::Quadratic, array![0.0, 0.0], &data, &opts).unwrap();
    let huber = minimize(&LossFamily::Huber { delta: 1.0 }, array![0.0, 0.0], &data, &opts).unwrap();

    let ols_err = (ols.theta_hat[1] - 0.5).abs();
    let huber_err = (huber.theta_hat[1] - 0.5).abs();
    assert!(ols_err > 1.0);
    assert!(huber_err < 0.2, "huber slope {}", huber.theta_hat[1]);
}

#[test]
// Purpose
// -------
// Overflow of the Poisson exp link after the first update ends the run in
// `Faulted` with the last valid parameters.
//
// Given
// -----
// - One observation y = 1000, θ₀ = 0, initial rate 1: the first step
//   lands at θ = 999 where exp(θ) = ∞.
fn poisson_overflow_faults_with_last_valid_theta() {
    let data = DataContext::new(array![[1.0]], array![1000.0], 0.0).unwrap();
    let tols = Tolerances::new(Some(1e-8), None, Some(100)).unwrap();
    let opts = DescentOptions::new(tols, StepSizePolicy::default(), 1.0, FdStep::default()).unwrap();

    let out = minimize(&LossFamily::Poisson, array![0.0], &data, &opts).unwrap();

    assert_eq!(out.state, DriverState::Faulted);
    assert_eq!(out.theta_hat, array![0.0]);
    assert_eq!(out.value, 1.0);
    assert!(out.fault.as_ref().is_some_and(OptError::is_numeric_fault));
}

#[test]
// Purpose
// -------
// A read-only context can be shared by independent runs on separate
// threads; each run owns its buffers and produces the same result.
fn independent_runs_share_a_read_only_context() {
    let data = least_squares_context();
    let opts = options(1e-8, 1000);

    let (left, right) = std::thread::scope(|s| {
        let l = s.spawn(|| minimize(&LossFamily::Quadratic, Array1::zeros(3), &data, &opts));
        let r = s.spawn(|| minimize(&LossFamily::Quadratic, Array1::zeros(3), &data, &opts));
        (l.join().unwrap().unwrap(), r.join().unwrap().unwrap())
    });

    assert_eq!(left.theta_hat, right.theta_hat);
    assert_eq!(left.iterations, right.iterations);
}

#[test]
fn invalid_targets_are_rejected_before_running() {
    let data = DataContext::new(array![[1.0], [2.0]], array![0.0, 3.0], 0.0).unwrap();
    let err = minimize(&LossFamily::Logistic, array![0.0], &data, &DescentOptions::default())
        .unwrap_err();
    assert!(matches!(err, OptError::InvalidTarget { index: 1, .. }));
}
