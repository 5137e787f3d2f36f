//! descent::step_size — Barzilai–Borwein (secant) learning-rate adapter.
//!
//! Given the current and previous gradients and the previous step, the
//! adapter estimates curvature along the last step and turns it into a
//! scalar learning rate:
//!
//! ```text
//! s = θₖ − θₖ₋₁
//! y = ∇f(θₖ) − ∇f(θₖ₋₁)
//! Long  (BB1): rate = (s·s) / (s·y)
//! Short (BB2): rate = (s·y) / (y·y)
//! ```
//!
//! Degenerate denominators are not errors: when `s·y` is not positive
//! relative to `‖s‖‖y‖` (within [`GENERAL_TOL`]), meaning no usable curvature
//! along `s`, or the quotient is not a finite positive number,
//! the policy's `default_rate` is returned. Every secant estimate is clamped
//! into `[min_rate, max_rate]`.
use std::str::FromStr;

use ndarray::Array1;

use crate::optimization::{
    descent::{
        types::{
            DEFAULT_FALLBACK_RATE, DEFAULT_MAX_RATE, DEFAULT_MIN_RATE, Grad, Step,
        },
        validation::verify_rate,
    },
    errors::{OptError, OptResult},
    numerical_stability::GENERAL_TOL,
};

/// Which Barzilai–Borwein quotient to use.
///
/// Parsing accepts case-insensitive `"long"`/`"bb1"` and `"short"`/`"bb2"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SecantRule {
    /// `(s·s) / (s·y)`: the larger of the two estimates.
    #[default]
    Long,
    /// `(s·y) / (y·y)`: the more conservative estimate.
    Short,
}

impl FromStr for SecantRule {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "long" | "bb1" => Ok(SecantRule::Long),
            "short" | "bb2" => Ok(SecantRule::Short),
            _ => Err(OptError::InvalidSecantRule {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'long'/'bb1' or 'short'/'bb2'.",
            }),
        }
    }
}

/// Step-size configuration.
///
/// - `rule`: secant quotient.
/// - `default_rate`: returned when the secant denominator is degenerate.
/// - `min_rate` / `max_rate`: clamp band applied to every secant estimate.
///
/// Invariant (enforced by [`StepSizePolicy::new`]):
/// `0 < min_rate <= default_rate <= max_rate < ∞`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepSizePolicy {
    pub rule: SecantRule,
    pub default_rate: f64,
    pub min_rate: f64,
    pub max_rate: f64,
}

impl StepSizePolicy {
    pub fn new(
        rule: SecantRule, default_rate: f64, min_rate: f64, max_rate: f64,
    ) -> OptResult<Self> {
        let policy = Self { rule, default_rate, min_rate, max_rate };
        policy.validate()?;
        Ok(policy)
    }

    /// Re-check the invariants, e.g. after fields were edited in place.
    pub fn validate(&self) -> OptResult<()> {
        verify_rate("default_rate", self.default_rate)?;
        verify_rate("min_rate", self.min_rate)?;
        verify_rate("max_rate", self.max_rate)?;
        if !(self.min_rate <= self.default_rate && self.default_rate <= self.max_rate) {
            return Err(OptError::InvalidRateBand {
                min_rate: self.min_rate,
                default_rate: self.default_rate,
                max_rate: self.max_rate,
            });
        }
        Ok(())
    }
}

impl Default for StepSizePolicy {
    fn default() -> Self {
        Self {
            rule: SecantRule::Long,
            default_rate: DEFAULT_FALLBACK_RATE,
            min_rate: DEFAULT_MIN_RATE,
            max_rate: DEFAULT_MAX_RATE,
        }
    }
}

/// Where an adapted rate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateSource {
    /// Secant quotient inside the clamp band.
    Secant,
    /// Secant quotient clamped to `min_rate` or `max_rate`.
    Clamped,
    /// Degenerate denominator; `default_rate` used.
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateDecision {
    pub rate: f64,
    pub source: RateSource,
}

/// Compute the adapted learning rate and report how it was obtained.
///
/// Inputs must already share one dimension; the evaluator layer
/// (`descent::evaluators::learning_rate`) enforces this against the context.
pub fn secant_rate(
    policy: &StepSizePolicy, grad_now: &Grad, grad_prev: &Grad, step_prev: &Step,
) -> RateDecision {
    let y: Array1<f64> = grad_now - grad_prev;
    let s = step_prev;
    let sy = s.dot(&y);
    let scale = s.dot(s).sqrt() * y.dot(&y).sqrt();
    let fallback = RateDecision { rate: policy.default_rate, source: RateSource::Fallback };
    if !(sy > GENERAL_TOL * scale) {
        return fallback;
    }
    let raw = match policy.rule {
        SecantRule::Long => s.dot(s) / sy,
        SecantRule::Short => sy / y.dot(&y),
    };
    if !raw.is_finite() || raw <= 0.0 {
        return fallback;
    }
    let rate = raw.clamp(policy.min_rate, policy.max_rate);
    let source = if rate == raw { RateSource::Secant } else { RateSource::Clamped };
    RateDecision { rate, source }
}
