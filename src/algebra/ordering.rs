//! A stable total order over expressions, used to keep `Sum`/`Product`
//! children in canonical (sorted) order so that equality and hashing are
//! order-invariant across terms/factors (spec.md §9).

use std::cmp::Ordering;
use std::sync::Arc;

use super::{Expr, ExprKind};

/// Full structural equality of two kinds (coefficients of any nested
/// children are compared too, since a child `Expr`'s `PartialEq` already
/// folds in its own coefficient).
pub(crate) fn kind_eq(a: &ExprKind, b: &ExprKind) -> bool {
    match (a, b) {
        (ExprKind::Constant, ExprKind::Constant) => true,
        (
            ExprKind::Monomial { power: p1, inner: i1 },
            ExprKind::Monomial { power: p2, inner: i2 },
        ) => p1 == p2 && inner_eq(i1, i2),
        (ExprKind::NaturalExponent { inner: i1 }, ExprKind::NaturalExponent { inner: i2 }) => {
            inner_eq(i1, i2)
        }
        (ExprKind::Sum(t1), ExprKind::Sum(t2)) | (ExprKind::Product(t1), ExprKind::Product(t2)) => {
            t1.len() == t2.len() && t1.iter().zip(t2.iter()).all(|(x, y)| x == y)
        }
        _ => false,
    }
}

fn inner_eq(a: &Option<Arc<Expr>>, b: &Option<Arc<Expr>>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

/// Compare two expressions by a stable total order: rank first, then a
/// deep structural comparison, then the outer coefficient as a final
/// tie-break. Used only to keep `Sum`/`Product` children in a canonical
/// order; it has no mathematical meaning (it is not a magnitude
/// ordering).
pub fn expr_cmp(a: &Expr, b: &Expr) -> Ordering {
    kind_cmp(&a.kind, &b.kind).then_with(|| a.coeff.total_cmp(&b.coeff))
}

fn kind_cmp(a: &ExprKind, b: &ExprKind) -> Ordering {
    a.rank().cmp(&b.rank()).then_with(|| match (a, b) {
        (ExprKind::Constant, ExprKind::Constant) => Ordering::Equal,
        (
            ExprKind::Monomial { power: p1, inner: i1 },
            ExprKind::Monomial { power: p2, inner: i2 },
        ) => p1.total_cmp(p2).then_with(|| inner_cmp(i1, i2)),
        (ExprKind::NaturalExponent { inner: i1 }, ExprKind::NaturalExponent { inner: i2 }) => {
            inner_cmp(i1, i2)
        }
        (ExprKind::Sum(t1), ExprKind::Sum(t2)) | (ExprKind::Product(t1), ExprKind::Product(t2)) => {
            terms_cmp(t1, t2)
        }
        // unreachable: rank() already distinguishes different variants
        _ => Ordering::Equal,
    })
}

fn inner_cmp(a: &Option<Arc<Expr>>, b: &Option<Arc<Expr>>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => expr_cmp(x, y),
    }
}

fn terms_cmp(a: &[Arc<Expr>], b: &[Arc<Expr>]) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| {
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| expr_cmp(x, y))
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    })
}
