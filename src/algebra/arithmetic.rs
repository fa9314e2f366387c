//! Total `add`/`subtract`/`multiply`/`divide`/power operations (spec.md
//! §4.1, §6). Each tries a clean combination first, falling back to a
//! generic `Sum`/`Product`/inverse-`Monomial` wrapper — in practice this
//! fallback is already embedded in [`super::constructors::make_sum`] and
//! [`super::constructors::make_product`]'s own aggregation loops, so the
//! operations here simply delegate to the two-term constructors.

use super::Expr;
use super::constructors::{make_product, make_sum};
use crate::error::{ArithmeticError, DomainError, MathError, MathResult};

fn finite_result(e: Expr) -> MathResult<Expr> {
    if e.coeff.is_finite() {
        Ok(e)
    } else {
        Err(MathError::Arithmetic(ArithmeticError::InfiniteCoefficient))
    }
}

impl Expr {
    /// `self + other`.
    pub fn add(&self, other: &Self) -> MathResult<Self> {
        finite_result(make_sum(1.0, vec![self.clone(), other.clone()]))
    }

    /// `self + a`.
    pub fn add_scalar(&self, a: f64) -> MathResult<Self> {
        self.add(&Self::constant(a)?)
    }

    /// `self - other`.
    pub fn subtract(&self, other: &Self) -> MathResult<Self> {
        finite_result(make_sum(1.0, vec![self.clone(), super::constructors::scale(other, -1.0)]))
    }

    /// `self - a`.
    pub fn subtract_scalar(&self, a: f64) -> MathResult<Self> {
        self.subtract(&Self::constant(a)?)
    }

    /// `self * other`.
    pub fn multiply(&self, other: &Self) -> MathResult<Self> {
        finite_result(make_product(1.0, vec![self.clone(), other.clone()]))
    }

    /// `self * a`.
    pub fn multiply_scalar(&self, a: f64) -> MathResult<Self> {
        finite_result(super::constructors::scale(self, a))
    }

    /// `self / other`. Fails with `ArithmeticError::DivisionByZero` if
    /// `other` is the zero expression.
    pub fn divide(&self, other: &Self) -> MathResult<Self> {
        if other.is_zero() {
            return Err(MathError::Arithmetic(ArithmeticError::DivisionByZero));
        }
        let reciprocal = Self::monomial(1.0, -1.0, Some(other.clone()))?;
        self.multiply(&reciprocal)
    }

    /// `self / a`. Fails with `ArithmeticError::DivisionByZero` if `a == 0`.
    pub fn divide_scalar(&self, a: f64) -> MathResult<Self> {
        if a == 0.0 {
            return Err(MathError::Arithmetic(ArithmeticError::DivisionByZero));
        }
        self.multiply_scalar(1.0 / a)
    }

    /// `self^n` for an integer `n`. Non-negative `n` raises via the
    /// Monomial-of-`self` canonicalisation; negative `n` wraps the
    /// positive power in a reciprocal Monomial. A zero base with negative
    /// `n` fails with `DomainError::DivisionByZero` (spec.md §4.1).
    pub fn pow_i32(&self, n: i32) -> MathResult<Self> {
        if n < 0 && self.is_zero() {
            return Err(MathError::Domain(DomainError::DivisionByZero));
        }
        Self::monomial(1.0, f64::from(n), Some(self.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_of_like_terms_combines_coefficients() {
        let x = Expr::monomial(1.0, 1.0, None).unwrap();
        let two_x = Expr::monomial(2.0, 1.0, None).unwrap();
        assert_eq!(x.add(&two_x).unwrap(), Expr::monomial(3.0, 1.0, None).unwrap());
    }

    #[test]
    fn subtract_self_is_zero() {
        let x = Expr::monomial(1.0, 1.0, None).unwrap();
        assert!(x.subtract(&x).unwrap().is_zero());
    }

    #[test]
    fn multiply_combines_like_bases() {
        let x = Expr::monomial(1.0, 2.0, None).unwrap();
        let y = Expr::monomial(1.0, 3.0, None).unwrap();
        assert_eq!(x.multiply(&y).unwrap(), Expr::monomial(1.0, 5.0, None).unwrap());
    }

    #[test]
    fn divide_by_zero_expression_is_rejected() {
        let x = Expr::monomial(1.0, 1.0, None).unwrap();
        let zero = Expr::constant(0.0).unwrap();
        assert!(x.divide(&zero).is_err());
    }

    #[test]
    fn divide_scalar_by_zero_is_rejected() {
        let x = Expr::monomial(1.0, 1.0, None).unwrap();
        assert!(x.divide_scalar(0.0).is_err());
    }

    #[test]
    fn pow_i32_negative_of_zero_is_division_by_zero() {
        let zero = Expr::constant(0.0).unwrap();
        let err = zero.pow_i32(-1).unwrap_err();
        assert!(matches!(err, MathError::Domain(DomainError::DivisionByZero)));
    }

    #[test]
    fn pow_i32_matches_repeated_multiplication() {
        let x = Expr::monomial(1.0, 1.0, None).unwrap();
        let cubed = x.pow_i32(3).unwrap();
        assert_eq!(cubed, Expr::monomial(1.0, 3.0, None).unwrap());
    }
}
