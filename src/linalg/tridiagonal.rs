//! The Thomas algorithm: forward sweep + back substitution, specialised
//! for tridiagonal systems (spec.md §4.2). Grounded in
//! `ql-methods::finite_differences::TridiagonalOperator::solve` and the
//! Crank–Nicolson `complex_thomas_solve` forward/back-substitution shape.

use crate::error::{MathError, MathResult};

/// Solves `A x = rhs` for a tridiagonal `A` given as three same-length
/// slices: `sub[i]` is the sub-diagonal entry on row `i` (`sub[0]` is
/// unused), `diag[i]` the diagonal entry, and `sup[i]` the super-diagonal
/// entry (`sup[n-1]` is unused).
///
/// When `check_dominance` is set, every row must be strictly diagonally
/// dominant (`|diag[i]| > |sub[i]| + |sup[i]|`); a violation fails with
/// `MathError::Instability { row }` before any elimination is attempted.
/// Without the guard, a zero pivot encountered during elimination fails
/// the same way.
///
/// # Errors
/// `MathError::InvalidInput` if the slice lengths disagree;
/// `MathError::Instability` per the above.
pub fn solve_tridiagonal(
    sub: &[f64],
    diag: &[f64],
    sup: &[f64],
    rhs: &[f64],
    check_dominance: bool,
) -> MathResult<Vec<f64>> {
    let n = diag.len();
    if sub.len() != n || sup.len() != n || rhs.len() != n {
        return Err(MathError::InvalidInput("tridiagonal system arrays must have equal length".to_owned()));
    }
    if n == 0 {
        return Ok(Vec::new());
    }

    if check_dominance {
        for i in 0..n {
            let off_diagonal = sub[i].abs() + sup[i].abs();
            if diag[i].abs() <= off_diagonal {
                return Err(MathError::Instability { row: i });
            }
        }
    }

    let mut c_prime = vec![0.0; n];
    let mut d_prime = vec![0.0; n];

    let pivot0 = diag[0];
    if pivot0 == 0.0 {
        return Err(MathError::Instability { row: 0 });
    }
    c_prime[0] = sup[0] / pivot0;
    d_prime[0] = rhs[0] / pivot0;

    for i in 1..n {
        let pivot = diag[i] - sub[i] * c_prime[i - 1];
        if pivot == 0.0 {
            return Err(MathError::Instability { row: i });
        }
        if i < n - 1 {
            c_prime[i] = sup[i] / pivot;
        }
        d_prime[i] = (rhs[i] - sub[i] * d_prime[i - 1]) / pivot;
    }

    let mut x = vec![0.0; n];
    x[n - 1] = d_prime[n - 1];
    for i in (0..n - 1).rev() {
        x[i] = d_prime[i] - c_prime[i] * x[i + 1];
    }
    Ok(x)
}
