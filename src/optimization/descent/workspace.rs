//! Per-run working buffers owned by the descent driver.
//!
//! A [`DescentWorkspace`] holds everything that changes between iterations:
//! the current iterate and its cost, the previous gradient and step used by
//! the secant rule, evaluation counters and the optional trace. One run owns
//! one workspace; nothing in it is shared with other runs.
use crate::optimization::descent::{
    traits::IterRecord,
    types::{Cost, FnEvalMap, Grad, Step, Theta},
};

#[derive(Debug, Clone)]
pub struct DescentWorkspace {
    pub theta: Theta,
    pub cost: Cost,
    pub grad_prev: Option<Grad>,
    pub step_prev: Option<Step>,
    pub last_grad_norm: Option<f64>,
    pub last_rate: Option<f64>,
    pub iterations: usize,
    cost_count: u64,
    gradient_count: u64,
    hessian_count: u64,
    trace: Option<Vec<IterRecord>>,
}

impl DescentWorkspace {
    /// Start a run at an already-evaluated `theta0`. The initial evaluation
    /// counts towards `cost_count`.
    pub fn new(theta0: Theta, cost0: Cost, collect_trace: bool) -> Self {
        Self {
            theta: theta0,
            cost: cost0,
            grad_prev: None,
            step_prev: None,
            last_grad_norm: None,
            last_rate: None,
            iterations: 0,
            cost_count: 1,
            gradient_count: 0,
            hessian_count: 0,
            trace: collect_trace.then(Vec::new),
        }
    }

    pub fn count_cost(&mut self) {
        self.cost_count += 1;
    }

    pub fn count_gradient(&mut self) {
        self.gradient_count += 1;
    }

    pub fn count_hessian(&mut self) {
        self.hessian_count += 1;
    }

    /// Accept an update: the new iterate becomes current and the gradient
    /// and step that produced it become the secant history.
    pub fn accept(&mut self, theta: Theta, cost: Cost, grad: Grad, step: Step) {
        self.theta = theta;
        self.cost = cost;
        self.grad_prev = Some(grad);
        self.step_prev = Some(step);
        self.iterations += 1;
    }

    pub fn record(&mut self, record: IterRecord) {
        if let Some(trace) = self.trace.as_mut() {
            trace.push(record);
        }
    }

    pub fn fn_evals(&self) -> FnEvalMap {
        let mut map = FnEvalMap::new();
        map.insert("cost_count".to_string(), self.cost_count);
        map.insert("gradient_count".to_string(), self.gradient_count);
        map.insert("hessian_count".to_string(), self.hessian_count);
        map
    }

    pub fn take_trace(&mut self) -> Option<Vec<IterRecord>> {
        self.trace.take()
    }
}
