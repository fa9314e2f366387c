//! Structural, order-invariant hashing for expression shapes.
//!
//! `Sum`/`Product` children are always stored pre-sorted by
//! [`super::ordering::expr_cmp`] (a stable total order), so hashing them
//! in storage order is equivalent to multiset hashing: two values with
//! the same terms in any original order land in the same sorted order
//! and therefore hash identically.

use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

use super::{Expr, ExprKind};

/// Compute the full structural hash of `(coeff, kind)`.
pub(crate) fn full_hash(coeff: f64, kind: &ExprKind) -> u64 {
    let mut hasher = FxHasher::default();
    coeff.to_bits().hash(&mut hasher);
    hash_kind(kind, &mut hasher);
    hasher.finish()
}

fn hash_kind<H: Hasher>(kind: &ExprKind, hasher: &mut H) {
    kind.rank().hash(hasher);
    match kind {
        ExprKind::Constant => {}
        ExprKind::Monomial { power, inner } => {
            power.to_bits().hash(hasher);
            hash_inner(inner, hasher);
        }
        ExprKind::NaturalExponent { inner } => {
            hash_inner(inner, hasher);
        }
        ExprKind::Sum(terms) | ExprKind::Product(terms) => {
            terms.len().hash(hasher);
            for term in terms {
                term.full_hash.hash(hasher);
            }
        }
    }
}

fn hash_inner<H: Hasher>(inner: &Option<std::sync::Arc<Expr>>, hasher: &mut H) {
    match inner {
        None => 0u8.hash(hasher),
        Some(e) => {
            1u8.hash(hasher);
            e.full_hash.hash(hasher);
        }
    }
}
