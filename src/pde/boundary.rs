//! Boundary condition records (spec.md §3, §6).

use std::fmt;
use std::sync::Arc;

/// The three boundary kinds a [`BoundaryCondition`] can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryKind {
    /// `u = v(t)`: the endpoint value is pinned.
    Dirichlet,
    /// `∂u/∂x = v(t)`: the endpoint derivative is pinned, via a ghost node.
    Neumann,
    /// `α(t)·u + β(t)·∂u/∂x = v(t)`: a linear combination is pinned.
    Robin,
}

type TimeFn = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// A boundary condition at one spatial endpoint of a [`crate::pde::PdeSolver`].
///
/// `alpha`/`beta` are meaningful only for [`BoundaryKind::Robin`]; other
/// kinds carry a constant-zero placeholder.
#[derive(Clone)]
pub struct BoundaryCondition {
    pub(crate) kind: BoundaryKind,
    pub(crate) location: f64,
    pub(crate) value: TimeFn,
    pub(crate) alpha: TimeFn,
    pub(crate) beta: TimeFn,
}

impl fmt::Debug for BoundaryCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundaryCondition")
            .field("kind", &self.kind)
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

fn zero_fn() -> TimeFn {
    Arc::new(|_t: f64| 0.0)
}

impl BoundaryCondition {
    /// `u = v(t)` at `location`.
    #[must_use]
    pub fn dirichlet(location: f64, value: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        Self { kind: BoundaryKind::Dirichlet, location, value: Arc::new(value), alpha: zero_fn(), beta: zero_fn() }
    }

    /// `∂u/∂x = v(t)` at `location`.
    #[must_use]
    pub fn neumann(location: f64, value: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        Self { kind: BoundaryKind::Neumann, location, value: Arc::new(value), alpha: zero_fn(), beta: zero_fn() }
    }

    /// `α(t)·u + β(t)·∂u/∂x = v(t)` at `location`.
    #[must_use]
    pub fn robin(
        location: f64,
        value: impl Fn(f64) -> f64 + Send + Sync + 'static,
        alpha: impl Fn(f64) -> f64 + Send + Sync + 'static,
        beta: impl Fn(f64) -> f64 + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind: BoundaryKind::Robin,
            location,
            value: Arc::new(value),
            alpha: Arc::new(alpha),
            beta: Arc::new(beta),
        }
    }

    /// The spatial location of this endpoint.
    #[must_use]
    pub fn location(&self) -> f64 {
        self.location
    }

    /// The boundary kind.
    #[must_use]
    pub fn kind(&self) -> BoundaryKind {
        self.kind
    }
}
