//! Error taxonomy shared by the expression algebra, linear solvers, and
//! PDE/KDE layers.
//!
//! One flat, `#[non_exhaustive]` enum in the teacher's own style
//! (`core::error::DiffError`): hand-written `Display`, no `thiserror`.

use std::fmt;

/// A mathematical domain violation encountered while evaluating an
/// [`Expr`](crate::algebra::Expr).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainError {
    /// A negative base raised to a non-integer exponent would require a
    /// complex result.
    ComplexResultRequired,
    /// Zero base with a negative exponent, or any other division by zero
    /// encountered while evaluating.
    DivisionByZero,
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ComplexResultRequired => {
                write!(f, "negative base with non-integer exponent requires a complex result")
            }
            Self::DivisionByZero => write!(f, "division by zero"),
        }
    }
}

/// An algebraic operation that is undefined on its operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticError {
    /// Division by the zero expression or scalar zero.
    DivisionByZero,
    /// A constructor would have produced a non-finite coefficient.
    InfiniteCoefficient,
}

impl fmt::Display for ArithmeticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DivisionByZero => write!(f, "division by the zero expression"),
            Self::InfiniteCoefficient => write!(f, "operation produced a non-finite coefficient"),
        }
    }
}

/// Errors raised anywhere in this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MathError {
    /// See [`DomainError`].
    Domain(DomainError),
    /// See [`ArithmeticError`].
    Arithmetic(ArithmeticError),
    /// An out-of-contract constructor argument, e.g. reversed PDE bounds,
    /// `theta` outside `[0, 1]`, or mismatched array lengths.
    InvalidInput(String),
    /// The tridiagonal solver's diagonal-dominance guard failed at `row`.
    ///
    /// Never surfaces out of [`crate::pde::PdeSolver`] — caught internally
    /// and used to trigger the Gaussian fallback — but is part of the
    /// public contract of [`crate::linalg::solve_tridiagonal`].
    Instability {
        /// The row at which the dominance check first failed.
        row: usize,
    },
    /// The Gaussian solver could not find a pivot for some column.
    Indeterminate,
    /// A requested operation is not implemented, e.g. stepping a PDE
    /// solver backwards in time.
    NotImplemented(String),
}

impl fmt::Display for MathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain(e) => write!(f, "domain error: {e}"),
            Self::Arithmetic(e) => write!(f, "arithmetic error: {e}"),
            Self::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            Self::Instability { row } => write!(f, "tridiagonal system unstable at row {row}"),
            Self::Indeterminate => write!(f, "gaussian elimination could not find a pivot"),
            Self::NotImplemented(what) => write!(f, "not implemented: {what}"),
        }
    }
}

impl std::error::Error for MathError {}

impl From<DomainError> for MathError {
    fn from(e: DomainError) -> Self {
        Self::Domain(e)
    }
}

impl From<ArithmeticError> for MathError {
    fn from(e: ArithmeticError) -> Self {
        Self::Arithmetic(e)
    }
}

/// Convenience alias used throughout the crate.
pub type MathResult<T> = Result<T, MathError>;
