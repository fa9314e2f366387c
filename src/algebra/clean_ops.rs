//! The "clean operation" protocol (spec.md §4.1): an arithmetic
//! combination of two expressions is attempted only when the result is no
//! more complex than either operand. `Sum`/`Product` aggregation in
//! `constructors.rs` repeatedly tries these against each bucket entry;
//! the general `add`/`multiply` in `arithmetic.rs` fall back to a
//! generic `Sum`/`Product` wrapper when a clean combination fails.

use std::sync::Arc;

use super::constructors::{leaf, make_monomial, make_sum};
use super::ordering::expr_cmp;
use super::{Expr, ExprKind};

/// `a + b`, only when the result collapses to a single term no more
/// complex than `a` or `b`: this succeeds exactly when `a` and `b` share
/// the same shape, in which case their coefficients simply add.
pub(crate) fn add_cleanly(a: &Expr, b: &Expr) -> Option<Expr> {
    if super::ordering::kind_eq(&a.kind, &b.kind) {
        Some(leaf(a.coeff + b.coeff, a.kind.clone()))
    } else {
        None
    }
}

/// `a * b`, only when the result is a single `Expr` no more complex than
/// `a` or `b`.
pub(crate) fn multiply_cleanly(a: &Expr, b: &Expr) -> Option<Expr> {
    match (&a.kind, &b.kind) {
        (ExprKind::Constant, _) => Some(super::constructors::scale(b, a.coeff)),
        (_, ExprKind::Constant) => Some(super::constructors::scale(a, b.coeff)),
        (ExprKind::Monomial { power: p1, inner: i1 }, ExprKind::Monomial { power: p2, inner: i2 }) => {
            if inner_eq(i1, i2) {
                Some(make_monomial(a.coeff * b.coeff, p1 + p2, i1.clone()))
            } else {
                combine_monomial_bases(a.coeff, *p1, i1, b.coeff, *p2, i2)
            }
        }
        (ExprKind::NaturalExponent { inner: i1 }, ExprKind::NaturalExponent { inner: i2 }) => {
            let x1 = i1.clone().unwrap_or_else(|| Arc::new(Expr::variable()));
            let x2 = i2.clone().unwrap_or_else(|| Arc::new(Expr::variable()));
            let combined_inner = make_sum(1.0, vec![(*x1).clone(), (*x2).clone()]);
            Some(super::constructors::make_natural_exponent(a.coeff * b.coeff, Some(Arc::new(combined_inner))))
        }
        _ => None,
    }
}

fn inner_eq(a: &Option<Arc<Expr>>, b: &Option<Arc<Expr>>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

/// Combine `c1·g1^p1 · c2·g2^p2` (`g1 ≠ g2`) into a single `Monomial` when
/// `p1` and `p2` share a common real "unit" exponent `k` with small
/// integer ratios `p1 = m·k`, `p2 = n·k`, via
/// `g1^p1·g2^p2 = (g1^m · g2^n)^k` (spec.md §4.1).
fn combine_monomial_bases(
    c1: f64,
    p1: f64,
    g1: &Option<Arc<Expr>>,
    c2: f64,
    p2: f64,
    g2: &Option<Arc<Expr>>,
) -> Option<Expr> {
    let (m, n, k) = common_exponent_ratio(p1, p2)?;
    let base1 = match g1 {
        Some(e) => (**e).clone(),
        None => Expr::variable(),
    };
    let base2 = match g2 {
        Some(e) => (**e).clone(),
        None => Expr::variable(),
    };
    #[allow(clippy::cast_precision_loss, reason = "m and n are small coprime exponent ratios, not large counts")]
    let raised1 = make_monomial(1.0, m as f64, Some(Arc::new(base1)));
    #[allow(clippy::cast_precision_loss, reason = "m and n are small coprime exponent ratios, not large counts")]
    let raised2 = make_monomial(1.0, n as f64, Some(Arc::new(base2)));
    let mut factors = vec![raised1, raised2];
    factors.sort_by(expr_cmp);
    let inner_product = super::constructors::make_product(1.0, factors);
    Some(make_monomial(c1 * c2, k, Some(Arc::new(inner_product))))
}

/// Finds small coprime integers `m, n` and a real `k` with `p1 = m·k`,
/// `p2 = n·k`, by approximating `p1/p2` as a fraction with a bounded
/// denominator (Stern–Brocot mediant search).
fn common_exponent_ratio(p1: f64, p2: f64) -> Option<(i64, i64, f64)> {
    if p1 == 0.0 || p2 == 0.0 {
        return None;
    }
    if is_integer(p1) && is_integer(p2) {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "is_integer guarantees no fractional part; exponents stay well within i64's range"
        )]
        let (n1, n2) = (p1 as i64, p2 as i64);
        let g = gcd(n1.unsigned_abs(), n2.unsigned_abs()).max(1);
        #[allow(
            clippy::cast_possible_wrap,
            reason = "gcd result is bounded by the (small, already-i64) inputs"
        )]
        let g = g as i64;
        #[allow(clippy::cast_precision_loss, reason = "g is a small gcd of two exponent numerators, not a large count")]
        let k = g as f64;
        return Some((n1 / g, n2 / g, k));
    }
    let ratio = p1 / p2;
    let (m, n) = best_rational_approximation(ratio, 32)?;
    #[allow(clippy::cast_precision_loss, reason = "n is a small bounded denominator from the mediant search")]
    let k = p2 / n as f64;
    Some((m, n, k))
}

fn is_integer(p: f64) -> bool {
    p.fract() == 0.0
}

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 { a } else { gcd(b, a % b) }
}

/// Stern–Brocot mediant search for the best rational approximation of
/// `target` with denominator at most `max_den`.
fn best_rational_approximation(target: f64, max_den: i64) -> Option<(i64, i64)> {
    if !target.is_finite() {
        return None;
    }
    let sign = if target < 0.0 { -1 } else { 1 };
    let target_abs = target.abs();
    let (mut lo_num, mut lo_den) = (0i64, 1i64);
    let (mut hi_num, mut hi_den) = (1i64, 0i64);
    const TOLERANCE: f64 = 1e-9;
    for _ in 0..64 {
        let mid_num = lo_num + hi_num;
        let mid_den = lo_den + hi_den;
        if mid_den > max_den {
            break;
        }
        #[allow(clippy::cast_precision_loss, reason = "denominators are bounded by max_den")]
        let mid = mid_num as f64 / mid_den as f64;
        if (mid - target_abs).abs() < TOLERANCE {
            return Some((sign * mid_num, mid_den));
        }
        if mid < target_abs {
            lo_num = mid_num;
            lo_den = mid_den;
        } else {
            hi_num = mid_num;
            hi_den = mid_den;
        }
    }
    None
}
