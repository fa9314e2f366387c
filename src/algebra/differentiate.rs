//! Closed-form analytic differentiation with a process-wide memo keyed by
//! shape (spec.md §3: "the derivative of a shape is independent of its
//! outer coefficient, so it is memoised once per shape and reused").

use std::sync::{Arc, LazyLock, Mutex};

use rustc_hash::FxHashMap;

use super::constructors::{make_monomial, make_natural_exponent, make_product, make_sum};
use super::{Expr, ExprKind};
use crate::error::{ArithmeticError, MathError, MathResult};

static DERIVATIVE_MEMO: LazyLock<Mutex<FxHashMap<Expr, Expr>>> =
    LazyLock::new(|| Mutex::new(FxHashMap::default()));

fn finite_result(e: Expr) -> MathResult<Expr> {
    if e.coefficient().is_finite() {
        Ok(e)
    } else {
        Err(MathError::Arithmetic(ArithmeticError::InfiniteCoefficient))
    }
}

impl Expr {
    /// The first derivative with respect to `x`.
    ///
    /// # Errors
    /// `ArithmeticError::InfiniteCoefficient` if the result would overflow.
    pub fn differentiate(&self) -> MathResult<Self> {
        let shape_deriv = differentiate_shape(self)?;
        finite_result(super::constructors::scale(&shape_deriv, self.coefficient()))
    }

    /// The `n`-th derivative. `n <= 0` returns a clone of `self`.
    ///
    /// # Errors
    /// As [`Self::differentiate`].
    pub fn differentiate_n(&self, n: u32) -> MathResult<Self> {
        let mut current = self.clone();
        for _ in 0..n {
            current = current.differentiate()?;
        }
        Ok(current)
    }
}

/// Derivative of `self`'s *shape* (outer coefficient fixed at 1), looked
/// up in or inserted into the process-wide memo.
fn differentiate_shape(expr: &Expr) -> MathResult<Expr> {
    let shape = expr.shape();
    {
        let memo = DERIVATIVE_MEMO.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(cached) = memo.get(&shape) {
            return Ok(cached.clone());
        }
    }
    let computed = differentiate_kind(&shape)?;
    let mut memo = DERIVATIVE_MEMO.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    memo.entry(shape).or_insert_with(|| computed.clone());
    Ok(computed)
}

fn differentiate_kind(shape: &Expr) -> MathResult<Expr> {
    match shape.kind() {
        ExprKind::Constant => Ok(super::constructors::make_constant(0.0)),
        ExprKind::Monomial { power, inner: None } => {
            Ok(make_monomial(*power, power - 1.0, None))
        }
        ExprKind::Monomial { power, inner: Some(g) } => {
            let g_deriv = g.differentiate()?;
            let reduced_power = make_monomial(1.0, power - 1.0, Some(Arc::clone(g)));
            Ok(make_product(*power, vec![reduced_power, g_deriv]))
        }
        ExprKind::NaturalExponent { inner } => {
            let g = inner.clone().unwrap_or_else(|| Arc::new(Expr::variable()));
            let g_deriv = g.differentiate()?;
            let exponent = make_natural_exponent(1.0, inner.clone());
            Ok(make_product(1.0, vec![exponent, g_deriv]))
        }
        ExprKind::Sum(terms) => {
            let derivs: MathResult<Vec<Expr>> = terms.iter().map(|t| t.differentiate()).collect();
            Ok(make_sum(1.0, derivs?))
        }
        ExprKind::Product(factors) => {
            let mut sum_terms = Vec::with_capacity(factors.len());
            for (i, factor) in factors.iter().enumerate() {
                let deriv_i = factor.differentiate()?;
                let others: Vec<Expr> = factors
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| *j != i)
                    .map(|(_, f)| (**f).clone())
                    .collect();
                let term = if others.is_empty() {
                    deriv_i
                } else {
                    let mut factors_with_deriv = others;
                    factors_with_deriv.push(deriv_i);
                    make_product(1.0, factors_with_deriv)
                };
                sum_terms.push(term);
            }
            Ok(make_sum(1.0, sum_terms))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::Expr;

    // spec.md §8 property 3: differentiating x^3 three times yields
    // 3x^2, then 6x, then a Constant.
    #[test]
    fn cube_differentiates_down_to_a_constant() {
        let cube = Expr::monomial(1.0, 3.0, None).unwrap();

        let first = cube.differentiate().unwrap();
        assert_eq!(first, Expr::monomial(3.0, 2.0, None).unwrap());

        let second = first.differentiate().unwrap();
        assert_eq!(second, Expr::monomial(6.0, 1.0, None).unwrap());

        let third = second.differentiate().unwrap();
        assert!(matches!(third.kind(), super::super::ExprKind::Constant));
        assert_eq!(third.evaluate(0.0).unwrap(), 6.0);
    }

    // spec.md §8 property 3: d/dx sqrt(x) = 1/(2 sqrt(x)) for x > 0, a
    // DomainError for x <= 0.
    #[test]
    fn sqrt_derivative_matches_closed_form_for_positive_x() {
        let sqrt_x = Expr::monomial(1.0, 0.5, None).unwrap();
        let deriv = sqrt_x.differentiate().unwrap();
        for x in [0.01, 1.0, 4.0, 100.0] {
            let expected = 1.0 / (2.0 * x.sqrt());
            assert!((deriv.evaluate(x).unwrap() - expected).abs() < 1e-10);
        }
    }

    #[test]
    fn sqrt_derivative_fails_domain_at_nonpositive_x() {
        let sqrt_x = Expr::monomial(1.0, 0.5, None).unwrap();
        let deriv = sqrt_x.differentiate().unwrap();
        assert!(deriv.evaluate(0.0).is_err());
        assert!(deriv.evaluate(-1.0).is_err());
    }

    #[test]
    fn sum_rule_differentiates_termwise() {
        // d/dx (x^2 + 3x) = 2x + 3
        let e = Expr::sum(
            1.0,
            vec![Expr::monomial(1.0, 2.0, None).unwrap(), Expr::monomial(3.0, 1.0, None).unwrap()],
        )
        .unwrap();
        let deriv = e.differentiate().unwrap();
        let expected =
            Expr::sum(1.0, vec![Expr::monomial(2.0, 1.0, None).unwrap(), Expr::constant(3.0).unwrap()]).unwrap();
        assert_eq!(deriv, expected);
    }

    #[test]
    fn natural_exponent_is_its_own_derivative() {
        let e = Expr::natural_exponent(1.0, None).unwrap();
        let deriv = e.differentiate().unwrap();
        assert_eq!(deriv, e);
    }
}
