//! Functional composition: substituting `x ↦ inner(x)` (spec.md §4.1, §6).

use super::constructors::{make_product, make_sum, scale};
use super::{Expr, ExprKind};
use crate::error::{ArithmeticError, MathError, MathResult};

fn finite_result(e: Expr) -> MathResult<Expr> {
    if e.coefficient().is_finite() {
        Ok(e)
    } else {
        Err(MathError::Arithmetic(ArithmeticError::InfiniteCoefficient))
    }
}

impl Expr {
    /// Substitutes `inner` for `x` everywhere in `self`, re-canonicalising
    /// the result.
    ///
    /// # Errors
    /// `ArithmeticError::InfiniteCoefficient` if the result would overflow.
    pub fn compose(&self, inner: &Self) -> MathResult<Self> {
        let composed = match self.kind() {
            ExprKind::Constant => return Ok(self.clone()),
            ExprKind::Monomial { power, inner: g } => {
                let substituted = match g {
                    Some(h) => h.compose(inner)?,
                    None => inner.clone(),
                };
                Self::monomial(1.0, *power, Some(substituted))?
            }
            ExprKind::NaturalExponent { inner: g } => {
                let substituted = match g {
                    Some(h) => h.compose(inner)?,
                    None => inner.clone(),
                };
                Self::natural_exponent(1.0, Some(substituted))?
            }
            ExprKind::Sum(terms) => {
                let composed_terms: MathResult<Vec<Self>> =
                    terms.iter().map(|t| t.compose(inner)).collect();
                make_sum(1.0, composed_terms?)
            }
            ExprKind::Product(factors) => {
                let composed_factors: MathResult<Vec<Self>> =
                    factors.iter().map(|f| f.compose(inner)).collect();
                make_product(1.0, composed_factors?)
            }
        };
        finite_result(scale(&composed, self.coefficient()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_substitutes_inner_everywhere() {
        // (x)^2 composed with (x + 1) is (x + 1)^2
        let square = Expr::monomial(1.0, 2.0, None).unwrap();
        let shift = Expr::sum(1.0, vec![Expr::monomial(1.0, 1.0, None).unwrap(), Expr::constant(1.0).unwrap()])
            .unwrap();
        let composed = square.compose(&shift).unwrap();
        for x in [-2.0, 0.0, 3.5] {
            let expected = (x + 1.0) * (x + 1.0);
            assert!((composed.evaluate(x).unwrap() - expected).abs() < 1e-10);
        }
    }

    #[test]
    fn compose_on_constant_is_identity() {
        let c = Expr::constant(7.0).unwrap();
        let shift = Expr::monomial(1.0, 1.0, None).unwrap();
        assert_eq!(c.compose(&shift).unwrap(), c);
    }

    #[test]
    fn compose_distributes_over_sum() {
        // (x + 1) composed with x^2 is x^2 + 1
        let e = Expr::sum(1.0, vec![Expr::monomial(1.0, 1.0, None).unwrap(), Expr::constant(1.0).unwrap()]).unwrap();
        let inner = Expr::monomial(1.0, 2.0, None).unwrap();
        let composed = e.compose(&inner).unwrap();
        let expected =
            Expr::sum(1.0, vec![Expr::monomial(1.0, 2.0, None).unwrap(), Expr::constant(1.0).unwrap()]).unwrap();
        assert_eq!(composed, expected);
    }
}
