//! Linear solvers for the tridiagonal systems the PDE solver assembles at
//! every time step (spec.md §4.2), plus a dense Gaussian-elimination
//! fallback for when the tridiagonal system is not strictly diagonally
//! dominant.
//!
//! Grounded in the Thomas-algorithm implementations of
//! `ql-methods::finite_differences::TridiagonalOperator::solve` (forward
//! sweep + back substitution over `lower`/`diag`/`upper`/`rhs` slices) and
//! the complex Crank–Nicolson solver's `complex_thomas_solve`.

mod gaussian;
mod tridiagonal;

pub use gaussian::solve_gaussian;
pub use tridiagonal::solve_tridiagonal;
