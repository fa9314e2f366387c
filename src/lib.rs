#![forbid(unsafe_code)]
//! A numerical/symbolic mathematics library with three interlocking
//! cores: a canonicalising symbolic expression algebra over the real
//! line with closed-form analytic differentiation, a θ-method
//! finite-difference solver for 1D linear parabolic PDEs with Dirichlet,
//! Neumann, and Robin boundaries, and the tridiagonal/Gaussian linear
//! solvers it relies on. A Gaussian KDE façade with automatic
//! Improved-Sheather–Jones bandwidth selection sits atop the core.
//!
//! # Usage
//!
//! ```
//! use real_anafis::algebra::Expr;
//!
//! let x = Expr::variable();
//! let squared = x.multiply(&x)?;
//! let derivative = squared.differentiate()?;
//! assert_eq!(derivative.evaluate(3.0)?, 6.0);
//! # Ok::<(), real_anafis::error::MathError>(())
//! ```

pub mod algebra;
pub mod error;
pub mod kde;
pub mod linalg;
pub mod pde;

#[cfg(test)]
mod tests;

pub use algebra::Expr;
pub use error::{MathError, MathResult};
pub use kde::{diffusion_kde, gaussian_kde};
pub use linalg::{solve_gaussian, solve_tridiagonal};
pub use pde::{BoundaryCondition, BoundaryKind, InitialCondition, PdeSolver};
