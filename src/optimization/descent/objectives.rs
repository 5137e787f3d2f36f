//! descent::objectives — built-in loss families and a closure-backed objective.
//!
//! Purpose
//! -------
//! Provide the closed set of loss families the engine ships with, each with
//! analytic value, gradient, and Hessian over a [`DataContext`], plus
//! [`FnObjective`] for ad-hoc user losses known only through their values.
//!
//! Key behaviors
//! -------------
//! With `η = Xθ`, `r = η − y`, ridge `λ` and penalty `½λ‖θ‖²`:
//!
//! | family      | loss term                       | gradient            | Hessian            |
//! |-------------|---------------------------------|---------------------|--------------------|
//! | `Quadratic` | `½‖r‖²`                          | `Xᵗr + λθ`          | `XᵗX + λI`         |
//! | `Logistic`  | `Σ softplus(ηᵢ) − yᵢηᵢ`          | `Xᵗ(σ(η) − y) + λθ` | `XᵗWX + λI`, `W = σ(1−σ)` |
//! | `Huber`     | `Σ ρ_δ(rᵢ)`                      | `Xᵗψ_δ(r) + λθ`     | `XᵗDX + λI`, `D = 1{|r| ≤ δ}` |
//! | `Poisson`   | `Σ exp(ηᵢ) − yᵢηᵢ`               | `Xᵗ(exp(η) − y) + λθ` | `Xᵗdiag(exp η)X + λI` |
//!
//! Invariants & assumptions
//! ------------------------
//! - `Huber` is once continuously differentiable; its Hessian is the
//!   generalized (almost-everywhere) second derivative.
//! - `Poisson` can overflow `exp(η)` for large linear predictors; the
//!   resulting ∞ is reported by the evaluator layer as a numeric fault.
//! - Target domains are checked once per run by [`Objective::check`]:
//!   logistic targets in `[0, 1]`, Poisson targets `≥ 0`.
use ndarray::{Array1, Axis};

use crate::optimization::{
    descent::{
        context::DataContext,
        traits::Objective,
        types::{Cost, Grad, Hessian, Theta},
    },
    errors::{OptError, OptResult},
    numerical_stability::{safe_logistic, safe_softplus},
};

/// Built-in loss families over a [`DataContext`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LossFamily {
    Quadratic,
    Logistic,
    Huber { delta: f64 },
    Poisson,
}

impl LossFamily {
    /// Per-observation weights `w` such that the Hessian is `Xᵗdiag(w)X + λI`.
    fn curvature_weights(&self, eta: &Array1<f64>, targets: &Array1<f64>) -> Array1<f64> {
        match *self {
            LossFamily::Quadratic => Array1::ones(eta.len()),
            LossFamily::Logistic => eta.mapv(|e| {
                let p = safe_logistic(e);
                p * (1.0 - p)
            }),
            LossFamily::Huber { delta } => {
                let r = eta - targets;
                r.mapv(|ri| if ri.abs() <= delta { 1.0 } else { 0.0 })
            }
            LossFamily::Poisson => eta.mapv(f64::exp),
        }
    }

    /// Derivative of the loss term with respect to each `ηᵢ`.
    fn score(&self, eta: &Array1<f64>, targets: &Array1<f64>) -> Array1<f64> {
        match *self {
            LossFamily::Quadratic => eta - targets,
            LossFamily::Logistic => eta.mapv(safe_logistic) - targets,
            LossFamily::Huber { delta } => (eta - targets).mapv(|r| r.clamp(-delta, delta)),
            LossFamily::Poisson => eta.mapv(f64::exp) - targets,
        }
    }
}

fn ridge_value(theta: &Theta, ridge: f64) -> f64 {
    0.5 * ridge * theta.dot(theta)
}

impl Objective for LossFamily {
    type Data = DataContext;

    fn dim(&self, data: &DataContext) -> usize {
        data.dim()
    }

    fn check(&self, data: &DataContext) -> OptResult<()> {
        match *self {
            LossFamily::Quadratic => Ok(()),
            LossFamily::Huber { delta } => {
                if !delta.is_finite() || delta <= 0.0 {
                    return Err(OptError::InvalidHuberDelta { value: delta });
                }
                Ok(())
            }
            LossFamily::Logistic => {
                for (index, &value) in data.targets().iter().enumerate() {
                    if !(0.0..=1.0).contains(&value) {
                        return Err(OptError::InvalidTarget {
                            index,
                            value,
                            reason: "Logistic targets must lie in [0, 1].",
                        });
                    }
                }
                Ok(())
            }
            LossFamily::Poisson => {
                for (index, &value) in data.targets().iter().enumerate() {
                    if value < 0.0 {
                        return Err(OptError::InvalidTarget {
                            index,
                            value,
                            reason: "Poisson targets must be non-negative.",
                        });
                    }
                }
                Ok(())
            }
        }
    }

    fn value(&self, theta: &Theta, data: &DataContext) -> OptResult<Cost> {
        let eta = data.design().dot(theta);
        let y = data.targets();
        let loss = match *self {
            LossFamily::Quadratic => {
                let r = &eta - y;
                0.5 * r.dot(&r)
            }
            LossFamily::Logistic => {
                eta.iter().zip(y.iter()).map(|(&e, &yi)| safe_softplus(e) - yi * e).sum()
            }
            LossFamily::Huber { delta } => eta
                .iter()
                .zip(y.iter())
                .map(|(&e, &yi)| {
                    let r = (e - yi).abs();
                    if r <= delta { 0.5 * r * r } else { delta * (r - 0.5 * delta) }
                })
                .sum(),
            LossFamily::Poisson => {
                eta.iter().zip(y.iter()).map(|(&e, &yi)| e.exp() - yi * e).sum()
            }
        };
        Ok(loss + ridge_value(theta, data.ridge()))
    }

    fn grad(&self, theta: &Theta, data: &DataContext) -> OptResult<Grad> {
        let x = data.design();
        let eta = x.dot(theta);
        let score = self.score(&eta, data.targets());
        Ok(x.t().dot(&score) + data.ridge() * theta)
    }

    fn hessian(&self, theta: &Theta, data: &DataContext) -> OptResult<Hessian> {
        let x = data.design();
        let eta = x.dot(theta);
        let w = self.curvature_weights(&eta, data.targets());
        let weighted = x * &w.view().insert_axis(Axis(1));
        let mut hess = x.t().dot(&weighted);
        let ridge = data.ridge();
        for i in 0..hess.nrows() {
            hess[[i, i]] += ridge;
        }
        Ok(hess)
    }
}

/// Objective defined by a value closure of fixed dimension.
///
/// Gradients and Hessians are always obtained by finite differences. The
/// data payload is `()`; everything the closure needs is captured.
pub struct FnObjective<F> {
    dim: usize,
    value_fn: F,
}

impl<F> FnObjective<F>
where
    F: Fn(&Theta) -> f64,
{
    pub fn new(dim: usize, value_fn: F) -> Self {
        Self { dim, value_fn }
    }
}

impl<F> Objective for FnObjective<F>
where
    F: Fn(&Theta) -> f64,
{
    type Data = ();

    fn dim(&self, _data: &()) -> usize {
        self.dim
    }

    fn value(&self, theta: &Theta, _data: &()) -> OptResult<Cost> {
        Ok((self.value_fn)(theta))
    }
}
