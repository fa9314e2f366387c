//! Common-factor extraction (spec.md §4.1, §6): rewrites a `Sum` whose
//! terms share a common monomial factor as `Product(factor, remainder)`.

use super::constructors::{make_monomial, make_product, make_sum, scale};
use super::{Expr, ExprKind};
use crate::error::{ArithmeticError, MathError, MathResult};
use std::sync::Arc;

fn finite_result(e: Expr) -> MathResult<Expr> {
    if e.coefficient().is_finite() {
        Ok(e)
    } else {
        Err(MathError::Arithmetic(ArithmeticError::InfiniteCoefficient))
    }
}

impl Expr {
    /// Extracts the greatest common monomial factor shared by every term
    /// of a `Sum`, rewriting it as `factor · remainder`. Returns a clone
    /// of `self` unchanged when no such factor exists (including when
    /// `self` is not a `Sum`).
    ///
    /// # Errors
    /// `ArithmeticError::InfiniteCoefficient` if the result would overflow.
    pub fn factorise(&self) -> MathResult<Self> {
        let ExprKind::Sum(terms) = self.kind() else {
            return Ok(self.clone());
        };
        let terms: Vec<Self> = terms.iter().map(|t| (**t).clone()).collect();
        match common_monomial_factor(&terms) {
            Some((factor, remainder)) => {
                let inner_sum = make_sum(1.0, remainder);
                let product = make_product(1.0, vec![factor, inner_sum]);
                finite_result(scale(&product, self.coefficient()))
            }
            None => Ok(self.clone()),
        }
    }
}

/// Finds the common monomial factor `g(x)^{p_min}` shared by every term,
/// when every term is itself a `Monomial` over the same `inner` with
/// `p_min = min(power)` strictly positive.
fn common_monomial_factor(terms: &[Expr]) -> Option<(Expr, Vec<Expr>)> {
    let mut shared_inner: Option<Option<Arc<Expr>>> = None;
    let mut powers = Vec::with_capacity(terms.len());
    for term in terms {
        let ExprKind::Monomial { power, inner } = term.kind() else {
            return None;
        };
        match &shared_inner {
            None => shared_inner = Some(inner.clone()),
            Some(existing) => {
                if !inner_eq(existing, inner) {
                    return None;
                }
            }
        }
        powers.push(*power);
    }
    let min_power = powers.iter().copied().fold(f64::INFINITY, f64::min);
    if !min_power.is_finite() || min_power <= 0.0 {
        return None;
    }
    let inner = shared_inner.flatten();
    let factor = make_monomial(1.0, min_power, inner.clone());
    let remainder: Vec<Expr> = terms
        .iter()
        .zip(powers)
        .map(|(term, power)| make_monomial(term.coefficient(), power - min_power, inner.clone()))
        .collect();
    Some((factor, remainder))
}

fn inner_eq(a: &Option<Arc<Expr>>, b: &Option<Arc<Expr>>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}
