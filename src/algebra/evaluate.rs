//! Numeric evaluation at a point (spec.md §4.1, §6).

use super::{Expr, ExprKind};
use crate::error::{DomainError, MathError, MathResult};

impl Expr {
    /// Evaluates this expression at `x`.
    ///
    /// # Errors
    /// `DomainError::ComplexResultRequired` for a negative base raised to
    /// a non-integer power; `DomainError::DivisionByZero` for a zero base
    /// raised to a negative power.
    pub fn evaluate(&self, x: f64) -> MathResult<f64> {
        let inner_value = match &self.kind {
            ExprKind::Constant => return Ok(self.coeff),
            ExprKind::Monomial { power, inner } => {
                let base = eval_inner(inner, x)?;
                return Ok(self.coeff * eval_power(base, *power)?);
            }
            ExprKind::NaturalExponent { inner } => eval_inner(inner, x)?,
            ExprKind::Sum(terms) => {
                let mut acc = 0.0;
                for t in terms {
                    acc += t.evaluate(x)?;
                }
                return Ok(self.coeff * acc);
            }
            ExprKind::Product(factors) => {
                let mut acc = 1.0;
                for f in factors {
                    acc *= f.evaluate(x)?;
                }
                return Ok(self.coeff * acc);
            }
        };
        Ok(self.coeff * inner_value.exp())
    }
}

fn eval_inner(inner: &Option<std::sync::Arc<Expr>>, x: f64) -> MathResult<f64> {
    match inner {
        Some(e) => e.evaluate(x),
        None => Ok(x),
    }
}

fn eval_power(base: f64, power: f64) -> MathResult<f64> {
    if base == 0.0 && power < 0.0 {
        return Err(MathError::Domain(DomainError::DivisionByZero));
    }
    if base < 0.0 && power.fract() != 0.0 {
        return Err(MathError::Domain(DomainError::ComplexResultRequired));
    }
    Ok(base.powf(power))
}
