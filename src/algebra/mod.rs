//! Canonicalising algebra of real, differentiable, single-variable
//! expressions.
//!
//! Every [`Expr`] carries an outer coefficient and a [`ExprKind`] tag; the
//! five kinds ([`ExprKind::Constant`], [`ExprKind::Monomial`],
//! [`ExprKind::NaturalExponent`], [`ExprKind::Sum`], [`ExprKind::Product`])
//! are the whole algebra. Constructors rewrite their arguments into
//! canonical form so that no two values compare equal without being the
//! same mathematical shape (see `constructors.rs`).
//!
//! Submodules implement one concern each, mirroring the teacher's
//! `core/expr/{mod,hash,ordering,analysis,evaluate}.rs` split:
//! - [`hash`] — structural, order-invariant hashing
//! - [`ordering`] — the stable total order used to keep `Sum`/`Product`
//!   children sorted
//! - `constructors` — the invariant-enforcing smart constructors
//! - `clean_ops` — the "clean operation" protocol (§4.1)
//! - `arithmetic` — total `add`/`subtract`/`multiply`/`divide`/power
//! - `evaluate` — `evaluate(x)`
//! - `differentiate` — `differentiate()` / `differentiate(n)` with the
//!   process-wide memo
//! - `compose`, `factorise`, `display`, `gaussian`

mod arithmetic;
mod clean_ops;
mod compose;
mod constructors;
mod differentiate;
mod display;
mod evaluate;
mod factorise;
mod gaussian;
pub mod hash;
pub mod ordering;

use std::sync::Arc;

pub use gaussian::gaussian_pdf;

/// A canonical, immutable real-valued expression in one variable.
///
/// Cloning is cheap: children are reference-counted ([`Arc`]).
#[derive(Debug, Clone)]
pub struct Expr {
    /// Structural hash over `(coeff, kind)`, precomputed so that unequal
    /// expressions can usually be rejected in O(1) before a full
    /// structural comparison.
    pub(crate) full_hash: u64,
    /// The outer coefficient `a`.
    pub(crate) coeff: f64,
    /// The expression kind.
    pub(crate) kind: ExprKind,
}

/// The kind of a canonical expression node.
///
/// `Monomial` and `NaturalExponent` carry an optional inner expression;
/// `None` means the inner function is the identity `x ↦ x`.
#[derive(Debug, Clone)]
pub enum ExprKind {
    /// `a` — a bare constant.
    Constant,
    /// `a · g(x)^p` (or `a · x^p` when `inner` is `None`).
    Monomial {
        /// The real exponent `p`.
        power: f64,
        /// The inner expression `g`, or `None` for the identity.
        inner: Option<Arc<Expr>>,
    },
    /// `a · exp(g(x))` (or `a · exp(x)` when `inner` is `None`).
    NaturalExponent {
        /// The inner expression `g`, or `None` for the identity.
        inner: Option<Arc<Expr>>,
    },
    /// `a · Σ tᵢ`. Always stored with 2+ terms in canonical sorted order.
    Sum(Vec<Arc<Expr>>),
    /// `a · Π fᵢ`. Always stored with 2+ factors in canonical sorted order.
    Product(Vec<Arc<Expr>>),
}

impl Expr {
    /// The outer coefficient `a`.
    #[must_use]
    pub fn coefficient(&self) -> f64 {
        self.coeff
    }

    /// The expression kind.
    #[must_use]
    pub fn kind(&self) -> &ExprKind {
        &self.kind
    }

    /// The canonical representation of the identity function `x ↦ x`.
    #[must_use]
    pub fn variable() -> Self {
        Self {
            full_hash: hash::full_hash(1.0, &ExprKind::Monomial { power: 1.0, inner: None }),
            coeff: 1.0,
            kind: ExprKind::Monomial { power: 1.0, inner: None },
        }
    }

    /// Is this `Constant(0)`, the unique zero?
    #[must_use]
    pub fn is_zero(&self) -> bool {
        matches!(self.kind, ExprKind::Constant) && self.coeff == 0.0
    }

    /// Structural hash of this value's *shape*: the same computation as
    /// [`Self::full_hash`] but with the outer coefficient fixed at `1.0`,
    /// i.e. the key used by the differentiation memo (spec.md §3).
    #[must_use]
    pub(crate) fn shape_hash(&self) -> u64 {
        hash::full_hash(1.0, &self.kind)
    }

    /// This value's shape: itself with outer coefficient normalised to 1.
    #[must_use]
    pub(crate) fn shape(&self) -> Self {
        Self {
            full_hash: self.shape_hash(),
            coeff: 1.0,
            kind: self.kind.clone(),
        }
    }
}

// Shape-and-coefficient equality (spec.md §3).
impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        if self.full_hash != other.full_hash {
            return false;
        }
        self.coeff == other.coeff && ordering::kind_eq(&self.kind, &other.kind)
    }
}
impl Eq for Expr {}

impl std::hash::Hash for Expr {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.full_hash.hash(state);
    }
}

impl ExprKind {
    pub(crate) fn rank(&self) -> u8 {
        match self {
            Self::Constant => 0,
            Self::Monomial { .. } => 1,
            Self::NaturalExponent { .. } => 2,
            Self::Sum(_) => 3,
            Self::Product(_) => 4,
        }
    }
}
