//! Invariant-enforcing smart constructors (spec.md §3).
//!
//! Two tiers: the `pub` functions validate the caller-supplied outer
//! coefficient and are the only place an out-of-contract value can enter
//! the algebra (spec.md: "Infinite coefficients are rejected at
//! construction"). The `pub(crate)` `make_*` functions assume their
//! inputs are already finite (true of any previously-constructed `Expr`)
//! and do the actual canonicalising rewrites; where a rewrite would
//! itself overflow to a non-finite coefficient, they skip that rewrite
//! and keep the more-nested-but-finite form instead, so they never need
//! to fail.

use std::sync::Arc;

use super::{Expr, ExprKind, hash};
use crate::error::{ArithmeticError, MathError, MathResult};

fn check_finite(a: f64) -> MathResult<()> {
    if a.is_finite() {
        Ok(())
    } else {
        Err(MathError::Arithmetic(ArithmeticError::InfiniteCoefficient))
    }
}

pub(crate) fn leaf(coeff: f64, kind: ExprKind) -> Expr {
    Expr { full_hash: hash::full_hash(coeff, &kind), coeff, kind }
}

/// Rebuild `e` with a new outer coefficient, preserving its shape.
pub(crate) fn scale(e: &Expr, factor: f64) -> Expr {
    leaf(e.coeff * factor, e.kind.clone())
}

pub(crate) fn make_constant(a: f64) -> Expr {
    leaf(a, ExprKind::Constant)
}

/// `a · g(x)^p`, canonicalised per spec.md §3.
pub(crate) fn make_monomial(a: f64, p: f64, inner: Option<Arc<Expr>>) -> Expr {
    if a == 0.0 {
        return make_constant(0.0);
    }
    if p == 0.0 {
        return make_constant(a);
    }
    let Some(g) = inner else {
        return leaf(a, ExprKind::Monomial { power: p, inner: None });
    };
    if p == 1.0 {
        return scale(&g, a);
    }
    match &g.kind {
        ExprKind::Constant => {
            let folded = a * g.coeff.powf(p);
            if folded.is_finite() {
                make_constant(folded)
            } else {
                leaf(a, ExprKind::Monomial { power: p, inner: Some(g) })
            }
        }
        ExprKind::Monomial { power: q, inner: h } => {
            let folded = a * g.coeff.powf(p);
            if folded.is_finite() {
                make_monomial(folded, p * q, h.clone())
            } else {
                leaf(a, ExprKind::Monomial { power: p, inner: Some(g) })
            }
        }
        ExprKind::NaturalExponent { inner: h } => {
            let folded = a * g.coeff.powf(p);
            if folded.is_finite() {
                let scaled_inner = scale_or_identity(h, p);
                make_natural_exponent(folded, Some(Arc::new(scaled_inner)))
            } else {
                leaf(a, ExprKind::Monomial { power: p, inner: Some(g) })
            }
        }
        ExprKind::Sum(_) if p > 0.0 && p.fract() == 0.0 && p <= 64.0 => {
            #[allow(
                clippy::cast_possible_truncation,
                reason = "the guard confirms p is a positive integer no larger than 64"
            )]
            let expanded = integer_power(&g, p as i64);
            scale(&expanded, a)
        }
        ExprKind::Product(factors) => {
            let folded_scalar = g.coeff.powf(p);
            if !folded_scalar.is_finite() {
                return leaf(a, ExprKind::Monomial { power: p, inner: Some(g) });
            }
            let raised: Vec<Expr> =
                factors.iter().map(|f| make_monomial(1.0, p, Some(Arc::clone(f)))).collect();
            let product = make_product(1.0, raised);
            scale(&product, a * folded_scalar)
        }
        // Sum with non-expandable exponent: stays nested, an irreducible leaf.
        ExprKind::Sum(_) => leaf(a, ExprKind::Monomial { power: p, inner: Some(g) }),
    }
}

/// Multiply `inner` (or the identity if `None`) by a scalar, returning an
/// `Expr` (never `None` — the identity scaled is itself an expression).
fn scale_or_identity(inner: &Option<Arc<Expr>>, factor: f64) -> Expr {
    match inner {
        Some(e) => scale(e, factor),
        None => make_monomial(factor, 1.0, None),
    }
}

/// Repeated multiplication by squaring; only called for small positive
/// integer exponents (bounded by the caller).
fn integer_power(base: &Expr, n: i64) -> Expr {
    debug_assert!(n > 0, "integer_power expects a positive exponent");
    let mut result = make_constant(1.0);
    let mut acc = base.clone();
    let mut k = n;
    while k > 0 {
        if k & 1 == 1 {
            result = make_product(1.0, vec![result, acc.clone()]);
        }
        acc = make_product(1.0, vec![acc.clone(), acc]);
        k >>= 1;
    }
    result
}

/// `a · exp(g(x))`, canonicalised per spec.md §3 (NaturalExponent absorbs
/// constant terms from a `Sum` inner into its outer coefficient).
pub(crate) fn make_natural_exponent(a: f64, inner: Option<Arc<Expr>>) -> Expr {
    if a == 0.0 {
        return make_constant(0.0);
    }
    let Some(g) = inner else {
        return leaf(a, ExprKind::NaturalExponent { inner: None });
    };
    match &g.kind {
        ExprKind::Constant => {
            let folded = a * g.coeff.exp();
            if folded.is_finite() {
                make_constant(folded)
            } else {
                leaf(a, ExprKind::NaturalExponent { inner: Some(g) })
            }
        }
        ExprKind::Sum(terms) => {
            if let Some(pos) = terms.iter().position(|t| matches!(t.kind, ExprKind::Constant)) {
                let constant_term = &terms[pos];
                let folded = a * constant_term.coeff.exp();
                if folded.is_finite() {
                    let remaining: Vec<Expr> = terms
                        .iter()
                        .enumerate()
                        .filter(|(i, _)| *i != pos)
                        .map(|(_, t)| (**t).clone())
                        .collect();
                    let new_inner = make_sum(1.0, remaining);
                    return make_natural_exponent(folded, Some(Arc::new(new_inner)));
                }
            }
            leaf(a, ExprKind::NaturalExponent { inner: Some(g) })
        }
        _ => leaf(a, ExprKind::NaturalExponent { inner: Some(g) }),
    }
}

/// `a · Σ tᵢ`: flatten, aggregate identical shapes, drop zeros (spec.md §3,
/// §4.1 "Sum aggregation").
pub(crate) fn make_sum(a: f64, terms: Vec<Expr>) -> Expr {
    if a == 0.0 {
        return make_constant(0.0);
    }
    let mut flat: Vec<Expr> = Vec::with_capacity(terms.len());
    flatten_sum_terms(terms, 1.0, &mut flat);
    let scaled: Vec<Expr> = flat.into_iter().filter(|t| !t.is_zero()).map(|t| scale(&t, a)).collect();
    if scaled.is_empty() {
        return make_constant(0.0);
    }

    let mut accum: Vec<Expr> = Vec::with_capacity(scaled.len());
    for term in scaled {
        let mut merged_at = None;
        for (i, e) in accum.iter().enumerate() {
            if let Some(merged) = super::clean_ops::add_cleanly(e, &term) {
                merged_at = Some((i, merged));
                break;
            }
        }
        match merged_at {
            Some((i, merged)) if merged.is_zero() => {
                accum.remove(i);
            }
            Some((i, merged)) => accum[i] = merged,
            None => accum.push(term),
        }
    }

    match accum.len() {
        0 => make_constant(0.0),
        1 => accum.into_iter().next().unwrap_or_else(|| make_constant(0.0)),
        _ => {
            accum.sort_by(super::ordering::expr_cmp);
            leaf(1.0, ExprKind::Sum(accum.into_iter().map(Arc::new).collect()))
        }
    }
}

fn flatten_sum_terms(terms: Vec<Expr>, outer: f64, out: &mut Vec<Expr>) {
    for t in terms {
        match &t.kind {
            ExprKind::Sum(sub) => {
                let factor = outer * t.coeff;
                for s in sub {
                    out.push(scale(s, factor));
                }
            }
            _ => out.push(scale(&t, outer)),
        }
    }
}

/// `a · Π fᵢ`: flatten, fold constants, distribute over any `Sum` factor
/// (returning a `Sum` in that case), aggregate identical bases (spec.md
/// §3, §4.1 "Product aggregation").
pub(crate) fn make_product(a: f64, factors: Vec<Expr>) -> Expr {
    if a == 0.0 {
        return make_constant(0.0);
    }
    let mut scalar = a;
    let mut flat: Vec<Expr> = Vec::with_capacity(factors.len());
    if !flatten_product_factors(factors, &mut scalar, &mut flat) {
        return make_constant(0.0);
    }
    if scalar == 0.0 {
        return make_constant(0.0);
    }

    if flat.iter().any(|f| matches!(f.kind, ExprKind::Sum(_))) {
        let terms = distribute(flat);
        return make_sum(scalar, terms);
    }

    make_product_no_distribute(scalar, flat)
}

/// Flattens nested products and folds constant factors into `scalar`.
/// Returns `false` if a zero factor was encountered (whole product is
/// zero).
fn flatten_product_factors(factors: Vec<Expr>, scalar: &mut f64, out: &mut Vec<Expr>) -> bool {
    for f in factors {
        if f.is_zero() {
            return false;
        }
        match &f.kind {
            ExprKind::Constant => *scalar *= f.coeff,
            ExprKind::Product(sub) => {
                *scalar *= f.coeff;
                for s in sub {
                    out.push((**s).clone());
                }
            }
            _ => out.push(f),
        }
    }
    true
}

/// Distributes a product over any `Sum` factors, returning the resulting
/// list of (non-sum) product terms to be summed.
fn distribute(factors: Vec<Expr>) -> Vec<Expr> {
    let mut partials: Vec<Vec<Expr>> = vec![Vec::new()];
    for f in factors {
        if let ExprKind::Sum(terms) = &f.kind {
            let sum_coeff = f.coeff;
            let mut next = Vec::with_capacity(partials.len() * terms.len());
            for p in &partials {
                for t in terms {
                    let mut np = p.clone();
                    np.push(scale(t, sum_coeff));
                    next.push(np);
                }
            }
            partials = next;
        } else {
            for p in &mut partials {
                p.push(f.clone());
            }
        }
    }
    partials.into_iter().map(|fs| make_product_no_distribute(1.0, fs)).collect()
}

/// Aggregates a factor list known to contain no `Sum` (and, post-flatten,
/// no `Constant` or `Product`) entries via the multiply-cleanly protocol.
fn make_product_no_distribute(scalar_in: f64, flat: Vec<Expr>) -> Expr {
    let mut scalar = scalar_in;
    let mut accum: Vec<Expr> = Vec::with_capacity(flat.len());

    'outer: for mut f in flat {
        loop {
            let mut merged_at = None;
            for (i, e) in accum.iter().enumerate() {
                if let Some(merged) = super::clean_ops::multiply_cleanly(e, &f) {
                    merged_at = Some((i, merged));
                    break;
                }
            }
            match merged_at {
                None => {
                    accum.push(f);
                    continue 'outer;
                }
                Some((i, merged)) => {
                    accum.remove(i);
                    if merged.is_zero() {
                        scalar = 0.0;
                        break 'outer;
                    }
                    if let ExprKind::Constant = merged.kind {
                        scalar *= merged.coeff;
                        continue 'outer;
                    }
                    f = merged;
                }
            }
        }
    }

    if scalar == 0.0 {
        return make_constant(0.0);
    }
    match accum.len() {
        0 => make_constant(scalar),
        1 => scale(&accum[0], scalar),
        _ => {
            accum.sort_by(super::ordering::expr_cmp);
            leaf(scalar, ExprKind::Product(accum.into_iter().map(Arc::new).collect()))
        }
    }
}

/// Public, validating constructors (spec.md §6).
impl Expr {
    /// `Constant(a)`.
    pub fn constant(a: f64) -> MathResult<Self> {
        check_finite(a)?;
        Ok(make_constant(a))
    }

    /// `a · g(x)^p`, or `a · x^p` when `inner` is `None`.
    pub fn monomial(a: f64, p: f64, inner: Option<Self>) -> MathResult<Self> {
        check_finite(a)?;
        Ok(make_monomial(a, p, inner.map(Arc::new)))
    }

    /// `a · exp(g(x))`, or `a · exp(x)` when `inner` is `None`.
    pub fn natural_exponent(a: f64, inner: Option<Self>) -> MathResult<Self> {
        check_finite(a)?;
        Ok(make_natural_exponent(a, inner.map(Arc::new)))
    }

    /// `a · Σ terms`.
    pub fn sum(a: f64, terms: Vec<Self>) -> MathResult<Self> {
        check_finite(a)?;
        Ok(make_sum(a, terms))
    }

    /// `a · Π factors`.
    pub fn product(a: f64, factors: Vec<Self>) -> MathResult<Self> {
        check_finite(a)?;
        Ok(make_product(a, factors))
    }

    /// The same shape with the outer coefficient replaced by `a`.
    pub fn with_coefficient(&self, a: f64) -> MathResult<Self> {
        check_finite(a)?;
        Ok(leaf(a, self.kind.clone()))
    }
}
