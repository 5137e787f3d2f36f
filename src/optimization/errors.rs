//! optimization::errors — unified error surface for the descent engine.
//!
//! Every fallible routine in the optimizer returns [`OptResult<T>`]. Variants
//! are grouped by origin (numeric faults, shape contracts, configuration,
//! data context, derivative availability, backend) and classified through
//! [`OptError::kind`] so callers can branch on the category without
//! matching every variant.
use argmin::core::{ArgminError, Error};

/// Crate-wide result alias for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;

/// Coarse classification of [`OptError`] variants.
///
/// - `NumericFault`: an evaluation produced NaN/±∞ from valid-looking inputs.
///   Surfaced to the driver, never retried inside the evaluators.
/// - `DimensionMismatch`: a vector or matrix disagrees with the context
///   dimension. Programming-contract violation; never retried.
/// - `InvalidConfig`: optimizer options failed validation.
/// - `InvalidData`: the data context failed validation.
/// - `NotImplemented`: an optional analytic derivative is missing; callers
///   fall back to finite differences.
/// - `Backend`: errors coming from `argmin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NumericFault,
    DimensionMismatch,
    InvalidConfig,
    InvalidData,
    NotImplemented,
    Backend,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- Numeric faults ----
    /// Objective returned a non-finite value.
    NonFiniteCost {
        value: f64,
    },
    /// Gradient elements need to be finite.
    NonFiniteGradient {
        index: usize,
        value: f64,
    },
    /// Hessian entries need to be finite.
    NonFiniteHessian {
        row: usize,
        col: usize,
        value: f64,
    },
    /// An updated parameter coordinate became non-finite.
    NonFiniteParameter {
        index: usize,
        value: f64,
    },

    // ---- Dimension contracts ----
    /// A vector operand disagrees with the context dimension.
    DimensionMismatch {
        operand: &'static str,
        expected: usize,
        found: usize,
    },
    /// Hessian matrix dimensions do not match parameter dimensions.
    HessianDimMismatch {
        expected: usize,
        found: (usize, usize),
    },

    // ---- Derivative availability ----
    /// Implies that finite differences should be used.
    GradientNotImplemented,
    /// Implies that finite differences of the gradient should be used.
    HessianNotImplemented,

    // ---- Options ----
    /// Gradient tolerance needs to be positive and finite.
    InvalidTolGrad {
        tol: f64,
        reason: &'static str,
    },
    /// Cost change tolerance needs to be positive and finite.
    InvalidTolCost {
        tol: f64,
        reason: &'static str,
    },
    /// Maximum iterations needs to be positive.
    InvalidMaxIter {
        max_iter: usize,
        reason: &'static str,
    },
    /// At least one stopping rule must be provided.
    NoTolerancesProvided,
    /// A learning-rate setting is not finite or not strictly positive.
    InvalidRate {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
    /// `min_rate <= default_rate <= max_rate` does not hold.
    InvalidRateBand {
        min_rate: f64,
        default_rate: f64,
        max_rate: f64,
    },
    /// Unknown secant rule name.
    InvalidSecantRule {
        name: String,
        reason: &'static str,
    },
    /// Finite-difference step needs to be positive and finite.
    InvalidFdStep {
        value: f64,
        reason: &'static str,
    },

    // ---- Data context ----
    /// Design matrix has no rows or no columns.
    EmptyDesign {
        rows: usize,
        cols: usize,
    },
    /// Design matrix entries need to be finite.
    InvalidDesignEntry {
        row: usize,
        col: usize,
        value: f64,
    },
    /// Target vector length must equal the number of design rows.
    TargetLengthMismatch {
        expected: usize,
        found: usize,
    },
    /// Target entry is outside the domain of the loss family.
    InvalidTarget {
        index: usize,
        value: f64,
        reason: &'static str,
    },
    /// Ridge penalty must be finite and non-negative.
    InvalidRidge {
        value: f64,
    },
    /// Huber threshold must be finite and strictly positive.
    InvalidHuberDelta {
        value: f64,
    },

    // ---- Argmin ----
    /// Wrapper for argmin::InvalidParameter
    InvalidParameter {
        text: String,
    },
    /// Wrapper for argmin::NotImplemented
    NotImplemented {
        text: String,
    },
    /// Wrapper for other argmin::Error types
    BackendError {
        text: String,
    },
}

impl OptError {
    /// Category of this error in the optimizer's taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            OptError::NonFiniteCost { .. }
            | OptError::NonFiniteGradient { .. }
            | OptError::NonFiniteHessian { .. }
            | OptError::NonFiniteParameter { .. } => ErrorKind::NumericFault,
            OptError::DimensionMismatch { .. } | OptError::HessianDimMismatch { .. } => {
                ErrorKind::DimensionMismatch
            }
            OptError::GradientNotImplemented | OptError::HessianNotImplemented => {
                ErrorKind::NotImplemented
            }
            OptError::InvalidTolGrad { .. }
            | OptError::InvalidTolCost { .. }
            | OptError::InvalidMaxIter { .. }
            | OptError::NoTolerancesProvided
            | OptError::InvalidRate { .. }
            | OptError::InvalidRateBand { .. }
            | OptError::InvalidSecantRule { .. }
            | OptError::InvalidFdStep { .. } => ErrorKind::InvalidConfig,
            OptError::EmptyDesign { .. }
            | OptError::InvalidDesignEntry { .. }
            | OptError::TargetLengthMismatch { .. }
            | OptError::InvalidTarget { .. }
            | OptError::InvalidRidge { .. }
            | OptError::InvalidHuberDelta { .. } => ErrorKind::InvalidData,
            OptError::InvalidParameter { .. }
            | OptError::NotImplemented { .. }
            | OptError::BackendError { .. } => ErrorKind::Backend,
        }
    }

    pub fn is_numeric_fault(&self) -> bool {
        self.kind() == ErrorKind::NumericFault
    }

    pub fn is_dimension_mismatch(&self) -> bool {
        self.kind() == ErrorKind::DimensionMismatch
    }
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Numeric faults ----
            OptError::NonFiniteCost { value } => {
                write!(f, "Numeric fault: non-finite cost value {value}")
            }
            OptError::NonFiniteGradient { index, value } => {
                write!(f, "Numeric fault: gradient entry {index} is {value}, must be finite")
            }
            OptError::NonFiniteHessian { row, col, value } => {
                write!(f, "Numeric fault: Hessian entry ({row}, {col}) is {value}, must be finite")
            }
            OptError::NonFiniteParameter { index, value } => {
                write!(f, "Numeric fault: parameter {index} became {value} after the update")
            }

            // ---- Dimension contracts ----
            OptError::DimensionMismatch { operand, expected, found } => {
                write!(f, "Dimension mismatch for {operand}: expected {expected}, found {found}")
            }
            OptError::HessianDimMismatch { expected, found } => {
                write!(
                    f,
                    "Hessian dimension mismatch: expected ({expected}, {expected}), found {found:?}"
                )
            }

            // ---- Derivative availability ----
            OptError::GradientNotImplemented => {
                write!(f, "Analytic gradient not implemented")
            }
            OptError::HessianNotImplemented => {
                write!(f, "Analytic Hessian not implemented")
            }

            // ---- Options ----
            OptError::InvalidTolGrad { tol, reason } => {
                write!(f, "Invalid gradient tolerance {tol}: {reason}")
            }
            OptError::InvalidTolCost { tol, reason } => {
                write!(f, "Invalid cost function change tolerance {tol}: {reason}")
            }
            OptError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid maximum iterations {max_iter}: {reason}")
            }
            OptError::NoTolerancesProvided => {
                write!(f, "No tolerances provided")
            }
            OptError::InvalidRate { name, value, reason } => {
                write!(f, "Invalid {name} {value}: {reason}")
            }
            OptError::InvalidRateBand { min_rate, default_rate, max_rate } => {
                write!(
                    f,
                    "Invalid rate band: require min_rate ({min_rate}) <= default_rate \
                     ({default_rate}) <= max_rate ({max_rate})"
                )
            }
            OptError::InvalidSecantRule { name, reason } => {
                write!(f, "Invalid secant rule '{name}': {reason}")
            }
            OptError::InvalidFdStep { value, reason } => {
                write!(f, "Invalid finite-difference step {value}: {reason}")
            }

            // ---- Data context ----
            OptError::EmptyDesign { rows, cols } => {
                write!(f, "Design matrix must be non-empty, found shape ({rows}, {cols})")
            }
            OptError::InvalidDesignEntry { row, col, value } => {
                write!(f, "Invalid design entry at ({row}, {col}): {value}, must be finite")
            }
            OptError::TargetLengthMismatch { expected, found } => {
                write!(f, "Target length mismatch: expected {expected}, found {found}")
            }
            OptError::InvalidTarget { index, value, reason } => {
                write!(f, "Invalid target at index {index}: {value}: {reason}")
            }
            OptError::InvalidRidge { value } => {
                write!(f, "Invalid ridge penalty {value}, must be finite and >= 0")
            }
            OptError::InvalidHuberDelta { value } => {
                write!(f, "Invalid Huber threshold {value}, must be finite and > 0")
            }

            // ---- Argmin ----
            OptError::InvalidParameter { text } => {
                write!(f, "Invalid parameter: {text}")
            }
            OptError::NotImplemented { text } => {
                write!(f, "Not implemented: {text}")
            }
            OptError::BackendError { text } => {
                write!(f, "Backend error: {text}")
            }
        }
    }
}

impl From<Error> for OptError {
    fn from(original_err: Error) -> Self {
        // Errors raised by our own objectives travel through argmin boxed;
        // recover them untouched first.
        let original_err = match original_err.downcast::<OptError>() {
            Ok(opt_err) => return opt_err,
            Err(err) => err,
        };
        match original_err.downcast::<ArgminError>() {
            Ok(ArgminError::InvalidParameter { text }) => OptError::InvalidParameter { text },
            Ok(ArgminError::NotImplemented { text }) => OptError::NotImplemented { text },
            Ok(other) => OptError::BackendError { text: other.to_string() },
            Err(err) => OptError::BackendError { text: err.to_string() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Check that the taxonomy groups numeric faults and shape violations
    // into the two categories the driver branches on.
    fn kind_classifies_faults_and_mismatches() {
        // Arrange
        let fault = OptError::NonFiniteGradient { index: 1, value: f64::NAN };
        let mismatch = OptError::DimensionMismatch { operand: "theta", expected: 5, found: 3 };
        let config = OptError::NoTolerancesProvided;

        // Assert
        assert!(fault.is_numeric_fault());
        assert!(!fault.is_dimension_mismatch());
        assert!(mismatch.is_dimension_mismatch());
        assert_eq!(config.kind(), ErrorKind::InvalidConfig);
        assert_eq!(OptError::GradientNotImplemented.kind(), ErrorKind::NotImplemented);
    }

    #[test]
    // Purpose
    // -------
    // Verify that an `OptError` boxed into an argmin `Error` converts back
    // into the same variant instead of a generic backend error.
    fn from_argmin_error_recovers_boxed_opt_error() {
        // Arrange
        let original = OptError::NonFiniteCost { value: f64::INFINITY };
        let boxed: Error = original.clone().into();

        // Act
        let recovered = OptError::from(boxed);

        // Assert
        assert_eq!(recovered, original);
    }

    #[test]
    // Purpose
    // -------
    // Ensure argmin's own error variants map onto the wrapper variants.
    fn from_argmin_error_maps_argmin_variants() {
        // Arrange
        let boxed: Error = ArgminError::NotImplemented { text: "hessian".to_string() }.into();

        // Act
        let err = OptError::from(boxed);

        // Assert
        match err {
            OptError::NotImplemented { text } => assert_eq!(text, "hessian"),
            other => panic!("Expected NotImplemented, got {other:?}"),
        }
    }

    #[test]
    fn display_mentions_operand_and_sizes() {
        let err = OptError::DimensionMismatch { operand: "step_prev", expected: 5, found: 3 };
        let msg = err.to_string();
        assert!(msg.contains("step_prev"));
        assert!(msg.contains('5'));
        assert!(msg.contains('3'));
    }
}
